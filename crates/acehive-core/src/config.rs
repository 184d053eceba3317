//! Configuration management for the Acehive admin dashboard

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Environment variable prefix, e.g. `ACEHIVE__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "ACEHIVE";

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "acehive";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Dashboard web server configuration
    #[validate(nested)]
    pub server: ServerConfig,

    /// Remote backend configuration
    #[validate(nested)]
    pub backend: BackendConfig,

    /// Logging configuration
    #[validate(nested)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    #[validate(length(min = 1))]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,
}

/// Which backend implementation serves the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Hosted Supabase project (PostgREST + GoTrue)
    Supabase,
    /// In-process tables, for demos and tests
    Memory,
}

/// Remote backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BackendConfig {
    /// Backend implementation
    #[serde(default = "default_backend_kind")]
    pub kind: BackendKind,

    /// Project base URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: String,

    /// Public anon key sent as `apikey`
    #[serde(default)]
    pub anon_key: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    #[validate(range(min = 1, max = 600))]
    pub request_timeout: u64,

    /// JSON file with initial tables for the memory backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Human readable text
    Text,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// Log level or filter directive
    #[serde(default = "default_log_level")]
    #[validate(length(min = 1))]
    pub level: String,

    /// Log format
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_backend_kind() -> BackendKind {
    BackendKind::Supabase
}

const fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

impl Config {
    /// Load configuration from defaults, an optional file and the environment
    ///
    /// When `path` is `None`, `acehive.toml` (or any format the `config`
    /// crate understands) in the working directory is used if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or parsed, or if the
    /// resulting configuration fails validation.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.check()?;
        Ok(config)
    }

    /// Validate field ranges and cross-field requirements
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-range fields and a
    /// configuration error when a Supabase backend lacks its URL or key.
    pub fn check(&self) -> crate::Result<()> {
        self.validate()?;

        if self.backend.kind == BackendKind::Supabase {
            if self.backend.url.trim().is_empty() {
                return Err(crate::Error::Configuration {
                    message: "backend.url is required for the supabase backend".to_string(),
                });
            }
            if self.backend.anon_key.trim().is_empty() {
                return Err(crate::Error::Configuration {
                    message: "backend.anon_key is required for the supabase backend".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            backend: BackendConfig {
                kind: default_backend_kind(),
                url: String::new(),
                anon_key: String::new(),
                request_timeout: default_request_timeout(),
                seed_file: None,
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}
