//! Tradepost - peer-to-peer marketplace with OTP-verified handover
//!
//! Members list items, stage other members' items in a cart, and convert
//! the cart into orders at checkout. Every order carries a one-time
//! handover code known only to the buyer; the seller submits it at
//! physical handover to close the order.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/      # Config, ServerState, Server
//! ├── auth/      # JWT + Argon2 authentication
//! ├── api/       # HTTP routes and handlers
//! ├── market/    # Fulfillment core: cart, lifecycle engine, OTP, queries
//! ├── store/     # redb storage (users, items, carts, order ledger)
//! └── utils/     # Errors, logging, time, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod market;
pub mod store;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use market::{MarketError, MarketResult};
pub use store::MarketStore;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
