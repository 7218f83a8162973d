//! Application state wiring.
//!
//! Binds the in-memory store and the static token validator into the
//! states the router needs. Real deployments replace both with
//! providers backed by their own infrastructure.

use std::sync::Arc;

use rg_storage::MemoryStore;
use rg_user_api::{AuthState, StaticTokenValidator, UserApiState};

use crate::config::ServerConfig;

/// Combined application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,
    /// The backing store.
    pub store: Arc<MemoryStore>,
    /// User administration API state.
    pub api: UserApiState,
    /// Authentication middleware state.
    pub auth: AuthState<StaticTokenValidator>,
}

impl AppState {
    /// Creates the application state from a store and a validator.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        store: Arc<MemoryStore>,
        validator: StaticTokenValidator,
    ) -> Self {
        Self {
            config,
            api: UserApiState::from_store(store.clone()),
            store,
            auth: AuthState::new(validator),
        }
    }
}
