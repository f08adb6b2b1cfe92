//! Authentication module
//!
//! - [`JwtService`] - token generation and validation
//! - [`CurrentUser`] - per-request caller identity
//! - [`require_auth`] - bearer-token middleware
//! - [`password`] - argon2 hashing and verification

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
pub use password::{hash_password, verify_password};
