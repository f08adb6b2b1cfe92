//! Server state
//!
//! [`ServerState`] holds shared references to every service a request
//! handler needs. It is `Clone` (everything inside is an `Arc` or cheap),
//! so axum can hand a copy to each request.

use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::Config;
use crate::core::error::Result;
use crate::store::MarketStore;

/// Shared application state
///
/// | Field | Purpose |
/// |-------|---------|
/// | `config` | Immutable configuration |
/// | `store` | redb-backed marketplace storage |
/// | `jwt_service` | Token generation/validation |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub store: MarketStore,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Initialize all services from configuration
    ///
    /// Creates the work directory if needed and opens (or creates) the
    /// database file inside it.
    pub fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;

        let db_path = config.db_path();
        let store = MarketStore::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "database opened");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self {
            config: config.clone(),
            store,
            jwt_service,
        })
    }
}
