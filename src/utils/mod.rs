//! Utility module - shared helpers and types
//!
//! - [`AppError`] / [`AppResponse`] - unified error and response types
//! - [`logger`] - tracing setup
//! - [`time`] - Unix-millis helpers
//! - [`validation`] - input validation helpers

pub mod error;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse, AppResult, ok, ok_with_message};
pub use time::now_millis;
