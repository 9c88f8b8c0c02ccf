//! Service configuration.
use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

pub const DEFAULT_CONFIG_FILE: &str = "userdoc.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_store")]
    pub store: StoreSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    #[default]
    Mongodb,
}

impl StoreSettings {
    /// Bound on the startup connectivity check.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Bound on every store round-trip made while serving requests.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `userdoc.toml` is read when
    /// present. Variables such as `USERDOC_STORE__URI` override file values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("USERDOC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ApiError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.store.connect_timeout_secs == 0 {
            return Err(ApiError::Config(
                "store.connect_timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.store.request_timeout_secs == 0 {
            return Err(ApiError::Config(
                "store.request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.store.backend == BackendKind::Mongodb {
            if self.store.uri.trim().is_empty() {
                return Err(ApiError::Config("store.uri must be set for the mongodb backend".to_string()));
            }

            if self.store.database.trim().is_empty() {
                return Err(ApiError::Config(
                    "store.database must be set for the mongodb backend".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: default_server(),
            store: default_store(),
        }
    }
}

// Default value functions
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_store() -> StoreSettings {
    StoreSettings {
        backend: BackendKind::default(),
        uri: default_uri(),
        database: default_database(),
        connect_timeout_secs: default_connect_timeout_secs(),
        request_timeout_secs: default_request_timeout_secs(),
    }
}

fn default_uri() -> String {
    "mongodb://mongo:27017".to_string()
}

fn default_database() -> String {
    "test".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    5
}
