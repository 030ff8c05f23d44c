//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use std::env;

/// Listen port used when `PORT` is unset or unparsable
pub const DEFAULT_PORT: u16 = 5000;

const DEFAULT_RUST_LOG: &str = "postback=info,tower_http=info";

/// Backing store for player records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreProvider {
    Postgres,
    Memory,
}

/// Log output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone)]
pub struct Config {
    /// Player record store
    pub store_provider: StoreProvider,

    /// Database connection URL, required for the Postgres store
    pub database_url: Option<String>,

    /// Runtime configuration
    pub rust_log: String,
    pub log_format: LogFormat,
    pub port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("store_provider", &self.store_provider)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("rust_log", &self.rust_log)
            .field("log_format", &self.log_format)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let store_provider = match env::var("STORE_PROVIDER")
            .unwrap_or_else(|_| "postgres".to_string())
            .as_str()
        {
            "postgres" => StoreProvider::Postgres,
            "memory" => StoreProvider::Memory,
            other => {
                return Err(anyhow::anyhow!(
                    "Unknown store provider: {}. Supported providers: postgres, memory",
                    other
                ))
            }
        };

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        if store_provider == StoreProvider::Postgres && database_url.is_none() {
            return Err(anyhow::anyhow!("DATABASE_URL is required"));
        }

        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let config = Self {
            store_provider,
            database_url,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.to_string()),
            log_format,
            port: env::var("PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        };

        Ok(config)
    }
}
