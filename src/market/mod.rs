//! Order fulfillment core
//!
//! Everything with real invariants lives here:
//!
//! - [`cart`] - the per-member cart store (set semantics, self-purchase
//!   rejection)
//! - [`engine`] - the order lifecycle engine: checkout (cart -> orders with
//!   one OTP each) and OTP-verified closure
//! - [`otp`] - handover code generation, salted hashing, constant-time
//!   verification
//! - [`query`] - read-side projections over the order ledger
//!
//! All operations take the caller's identity explicitly as a parameter;
//! nothing in this module reads ambient request state.

pub mod cart;
pub mod engine;
pub mod otp;
pub mod query;

use thiserror::Error;

use crate::store::StorageError;
use crate::utils::AppError;

/// Failures of the fulfillment core
///
/// `Conflict` is retryable (a concurrent writer won); `InvalidOtp` and
/// `AlreadyCompleted` are not, and callers must be able to tell all three
/// apart.
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("You cannot add your own item to the cart")]
    SelfPurchase,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("Order is already completed")]
    AlreadyCompleted,

    #[error("Concurrent update lost, retry: {0}")]
    Conflict(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<MarketError> for AppError {
    fn from(e: MarketError) -> Self {
        match e {
            MarketError::ItemNotFound(id) => AppError::not_found(format!("Item {id}")),
            MarketError::OrderNotFound(id) => AppError::not_found(format!("Order {id}")),
            MarketError::SelfPurchase => {
                AppError::business_rule("You cannot add your own item to the cart")
            }
            MarketError::EmptyCart => AppError::business_rule("Cart is empty"),
            MarketError::InvalidOtp => AppError::InvalidCredential("Invalid OTP".to_string()),
            MarketError::AlreadyCompleted => {
                AppError::InvalidState("Order is already completed".to_string())
            }
            MarketError::Conflict(msg) => AppError::conflict(msg),
            MarketError::Storage(e) => e.into(),
        }
    }
}

pub type MarketResult<T> = Result<T, MarketError>;
