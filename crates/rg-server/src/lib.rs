//! # rg-server
//!
//! Axum server for the Realmgate user administration API.
//!
//! Combines the `/user` API with health check and info endpoints. The
//! default wiring backs the provider traits with the in-memory store
//! and a static token validator; deployments substitute their own.
//!
//! ## Usage
//!
//! ```ignore
//! use rg_server::{Server, ServerConfig};
//!
//! let config = ServerConfig::from_env()?;
//! let server = Server::new(config).await?;
//! server.run().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use router::create_router;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use rg_model::realm::MASTER_REALM;
use rg_model::role::capabilities;
use rg_model::{Realm, User};
use rg_storage::{MemoryStore, RealmProvider, UserProvider};
use rg_user_api::{AuthContext, StaticTokenValidator};
use tokio::net::TcpListener;

/// The Realmgate server.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Creates a new server instance with the default wiring.
    ///
    /// Seeds the master realm and, when a bootstrap admin token is
    /// configured, an admin user that token authenticates as.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding the store fails.
    pub async fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let store = Arc::new(MemoryStore::new());
        let mut validator = StaticTokenValidator::new();
        bootstrap(&config, &store, &mut validator).await?;

        Ok(Self {
            state: AppState::new(config, store, validator),
        })
    }

    /// Creates a server around externally prepared components.
    ///
    /// No seeding happens; the caller owns the store contents and the
    /// token set. This is the integration-test entry point.
    #[must_use]
    pub fn with_components(
        config: ServerConfig,
        store: Arc<MemoryStore>,
        validator: StaticTokenValidator,
    ) -> Self {
        Self {
            state: AppState::new(config, store, validator),
        }
    }

    /// Returns the server configuration.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    /// Builds the application router without starting the server.
    #[must_use]
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Runs the server.
    ///
    /// Blocks until a shutdown signal is received.
    ///
    /// # Errors
    ///
    /// Returns an error if binding or serving fails.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr: SocketAddr =
            format!("{}:{}", self.state.config.host, self.state.config.port).parse()?;
        let app = self.router();

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Seeds the master realm and the optional bootstrap admin.
async fn bootstrap(
    config: &ServerConfig,
    store: &Arc<MemoryStore>,
    validator: &mut StaticTokenValidator,
) -> anyhow::Result<()> {
    let master = Realm::new(MASTER_REALM);
    RealmProvider::create(store.as_ref(), &master).await?;

    if let Some(token) = &config.bootstrap_admin_token {
        let admin = User::new(master.id, "admin");
        UserProvider::create(store.as_ref(), &admin).await?;
        validator.add_token(
            token.clone(),
            AuthContext {
                user_id: admin.id,
                username: admin.username.clone(),
                realm: master.name.clone(),
                capabilities: vec![capabilities::WRITE_ADMIN.to_string()],
                token: token.clone(),
            },
        );
        tracing::info!("Bootstrap admin registered in the master realm");
    }

    Ok(())
}

/// Waits for a shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {}
            Err(err) => tracing::error!("failed to install Ctrl+C handler: {err}"),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!("failed to install signal handler: {err}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
