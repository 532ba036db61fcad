//! Configuration management for the NPU chat gateway

pub mod file;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub use file::ConfigFile;

use crate::{Error, Result};

/// Gateway configuration, fixed at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Chat UI server configuration
    pub server: ServerConfig,

    /// Inference backend configuration
    pub backend: BackendConfig,

    /// Conversation context configuration
    pub context: ContextConfig,
}

/// Chat UI server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_address: String,

    /// Port to listen on
    pub port: u16,

    /// Path to extra static assets, served under `/static`
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 5000,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Socket address string for binding
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Inference backend configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Backend host
    pub address: String,

    /// Backend port
    pub port: u16,

    /// Seconds to wait for a reply
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
            timeout_secs: 120,
        }
    }
}

impl BackendConfig {
    /// Endpoint URL: `http://{address}:{port}/`
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}:{}/", self.address, self.port)
    }

    /// Backend call timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Conversation context configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    /// Whether context starts enabled
    pub enabled: bool,

    /// Maximum number of replies retained
    pub max_depth: usize,

    /// Keep replies containing CJK ideographs out of the history
    pub filter_non_latin: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_depth: 3,
            filter_non_latin: true,
        }
    }
}

impl Config {
    /// Load configuration (env > toml > default)
    ///
    /// Call [`Config::validate`] once command line overrides are applied.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit config file cannot be loaded
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let fc = file::load_config_file(config_path)?;
        Ok(Self::from_sources(fc, |key| std::env::var(key).ok()))
    }

    /// Merge a parsed config file with environment lookups over the defaults
    #[must_use]
    pub fn from_sources<F>(fc: ConfigFile, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_defaults = ServerConfig::default();
        let server = ServerConfig {
            bind_address: env("NPUCHAT_BIND_ADDRESS")
                .or(fc.server.bind_address)
                .unwrap_or(server_defaults.bind_address),
            port: parse_env(&env, "NPUCHAT_PORT")
                .or(fc.server.port)
                .unwrap_or(server_defaults.port),
            static_dir: env("NPUCHAT_STATIC_DIR")
                .map(PathBuf::from)
                .or(fc.server.static_dir),
        };

        let backend_defaults = BackendConfig::default();
        let backend = BackendConfig {
            address: env("NPUCHAT_BACKEND_ADDRESS")
                .or(fc.backend.address)
                .unwrap_or(backend_defaults.address),
            port: parse_env(&env, "NPUCHAT_BACKEND_PORT")
                .or(fc.backend.port)
                .unwrap_or(backend_defaults.port),
            timeout_secs: parse_env(&env, "NPUCHAT_TIMEOUT_SECS")
                .or(fc.backend.timeout_secs)
                .unwrap_or(backend_defaults.timeout_secs),
        };

        let context_defaults = ContextConfig::default();
        let context = ContextConfig {
            enabled: flag_env(&env, "NPUCHAT_CONTEXT_ENABLED")
                .or(fc.context.enabled)
                .unwrap_or(context_defaults.enabled),
            max_depth: parse_env(&env, "NPUCHAT_CONTEXT_DEPTH")
                .or(fc.context.max_depth)
                .unwrap_or(context_defaults.max_depth),
            filter_non_latin: flag_env(&env, "NPUCHAT_FILTER_NON_LATIN")
                .or(fc.context.filter_non_latin)
                .unwrap_or(context_defaults.filter_non_latin),
        };

        Self {
            server,
            backend,
            context,
        }
    }

    /// Check values that would make the gateway unusable
    ///
    /// # Errors
    ///
    /// Returns error if the backend timeout is zero or an address is empty
    pub fn validate(&self) -> Result<()> {
        if self.backend.timeout_secs == 0 {
            return Err(Error::Config("backend timeout must be at least 1 second".to_string()));
        }
        if self.backend.address.trim().is_empty() {
            return Err(Error::Config("backend address must not be empty".to_string()));
        }
        if self.server.bind_address.trim().is_empty() {
            return Err(Error::Config("bind address must not be empty".to_string()));
        }
        Ok(())
    }
}

fn parse_env<F, T>(env: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable environment value");
            None
        }
    }
}

fn flag_env<F>(env: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = env(key)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!(key, value = %raw, "ignoring unparseable environment flag");
            None
        }
    }
}
