//! Common test utilities and fixtures.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::oneshot;
use tokio::time::sleep;
use uuid::Uuid;

use rg_model::realm::MASTER_REALM;
use rg_model::role::capabilities;
use rg_model::{Realm, User};
use rg_storage::{MemoryStore, RealmProvider, UserProvider};
use rg_server::{Server, ServerConfig};
use rg_user_api::{AuthContext, StaticTokenValidator};

/// Bearer token of the master-realm administrator.
pub const ADMIN_TOKEN: &str = "admin-token";
/// Bearer token of the acme realm administrator.
pub const REALM_ADMIN_TOKEN: &str = "rita-token";
/// Bearer token of a plain acme user.
pub const USER_TOKEN: &str = "bob-token";
/// Bearer token of a plain user in another realm.
pub const OUTSIDER_TOKEN: &str = "eve-token";

/// Test environment running a live server over an in-memory store.
pub struct TestEnv {
    /// The backing store, for direct assertions.
    pub store: Arc<MemoryStore>,
    /// Base URL of the running server.
    pub base_url: String,
    /// HTTP client for testing.
    pub client: Client,
    /// The seeded acme realm.
    pub acme: Realm,
    /// ID of the plain acme user behind [`USER_TOKEN`].
    pub bob_id: Uuid,
    /// Server shutdown signal.
    _shutdown_tx: oneshot::Sender<()>,
}

impl TestEnv {
    /// Creates a new test environment with seeded realms and tokens.
    pub async fn new() -> anyhow::Result<Self> {
        // Initialize tracing for tests
        let _ = tracing_subscriber::fmt()
            .with_env_filter("rg_server=debug,rg_user_api=debug")
            .try_init();

        let store = Arc::new(MemoryStore::new());

        // Realms
        let master = Realm::new(MASTER_REALM);
        let acme = Realm::new("acme");
        let globex = Realm::new("globex");
        for realm in [&master, &acme, &globex] {
            RealmProvider::create(store.as_ref(), realm).await?;
        }

        // Users behind the predefined tokens
        let root = User::new(master.id, "root");
        let rita = User::new(acme.id, "rita");
        let bob = User::new(acme.id, "bob").with_email("bob@acme.example");
        let eve = User::new(globex.id, "eve");
        for user in [&root, &rita, &bob, &eve] {
            UserProvider::create(store.as_ref(), user).await?;
        }

        let mut validator = StaticTokenValidator::new();
        validator.add_token(
            ADMIN_TOKEN,
            context(&root, MASTER_REALM, &[capabilities::WRITE_ADMIN], ADMIN_TOKEN),
        );
        validator.add_token(
            REALM_ADMIN_TOKEN,
            context(&rita, "acme", &[capabilities::WRITE_ADMIN], REALM_ADMIN_TOKEN),
        );
        validator.add_token(USER_TOKEN, context(&bob, "acme", &[], USER_TOKEN));
        validator.add_token(OUTSIDER_TOKEN, context(&eve, "globex", &[], OUTSIDER_TOKEN));

        // Find an available port for the server
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let server_port = listener.local_addr()?.port();
        drop(listener);

        let base_url = format!("http://127.0.0.1:{server_port}");

        let mut config = ServerConfig::for_testing();
        config.port = server_port;
        config.base_url = base_url.clone();

        let (_shutdown_tx, shutdown_rx) = oneshot::channel();

        let server = Server::with_components(config, store.clone(), validator);
        tokio::spawn(async move {
            tokio::select! {
                result = server.run() => {
                    if let Err(e) = result {
                        tracing::error!("Server error: {}", e);
                    }
                }
                _ = shutdown_rx => {
                    tracing::info!("Server shutdown requested");
                }
            }
        });

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        wait_for_server(&client, &base_url).await?;

        Ok(Self {
            store,
            base_url,
            client,
            acme,
            bob_id: bob.id,
            _shutdown_tx,
        })
    }

    /// Builds a GET request against the API with a bearer token.
    pub fn get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
    }

    /// Builds a PUT request against the API with a bearer token.
    pub fn put(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .put(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
    }

    /// Builds a POST request against the API with a bearer token.
    pub fn post(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
    }

    /// Builds a DELETE request against the API with a bearer token.
    pub fn delete(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
    }
}

fn context(user: &User, realm: &str, caps: &[&str], token: &str) -> AuthContext {
    AuthContext {
        user_id: user.id,
        username: user.username.clone(),
        realm: realm.to_string(),
        capabilities: caps.iter().map(ToString::to_string).collect(),
        token: token.to_string(),
    }
}

/// Waits for the server to be ready.
async fn wait_for_server(client: &Client, base_url: &str) -> anyhow::Result<()> {
    let health_url = format!("{base_url}/health");
    let max_attempts = 50;

    for attempt in 1..=max_attempts {
        match client.get(&health_url).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!("Server ready after {} attempts", attempt);
                return Ok(());
            }
            Ok(response) => {
                tracing::debug!(
                    "Server not ready (status {}), attempt {}/{}",
                    response.status(),
                    attempt,
                    max_attempts
                );
            }
            Err(e) => {
                tracing::debug!(
                    "Server not ready ({}), attempt {}/{}",
                    e,
                    attempt,
                    max_attempts
                );
            }
        }
        sleep(Duration::from_millis(100)).await;
    }

    anyhow::bail!("Server did not become ready in time")
}
