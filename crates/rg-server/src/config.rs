//! Server configuration.
//!
//! Configuration is loaded from environment variables with sensible
//! defaults.

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host to bind to.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Base URL for the server (used in generated URLs).
    pub base_url: String,

    /// CORS allowed origins; `*` allows any origin.
    pub cors_origins: Vec<String>,

    /// Bootstrap admin token. When set, the server seeds an admin user
    /// in the master realm and accepts this token for it.
    pub bootstrap_admin_token: Option<String>,

    /// Log level.
    pub log_level: String,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but unparsable.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let host = std::env::var("RG_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("RG_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("RG_PORT is not a valid port: {raw}"))?,
            Err(_) => 8080,
        };

        let base_url =
            std::env::var("RG_BASE_URL").unwrap_or_else(|_| format!("http://{host}:{port}"));

        let cors_origins = std::env::var("RG_CORS_ORIGINS")
            .map(|s| s.split(',').map(str::trim).map(String::from).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let bootstrap_admin_token = std::env::var("RG_BOOTSTRAP_ADMIN_TOKEN").ok();

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            host,
            port,
            base_url,
            cors_origins,
            bootstrap_admin_token,
            log_level,
        })
    }

    /// Creates a configuration for testing.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            base_url: "http://localhost:8080".to_string(),
            cors_origins: vec!["*".to_string()],
            bootstrap_admin_token: None,
            log_level: "debug".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            base_url: "http://localhost:8080".to_string(),
            cors_origins: vec!["*".to_string()],
            bootstrap_admin_token: None,
            log_level: "info".to_string(),
        }
    }
}
