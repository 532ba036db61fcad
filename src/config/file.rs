//! TOML configuration file loading
//!
//! Supports `~/.config/npuchat/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Chat UI server configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Inference backend configuration
    #[serde(default)]
    pub backend: BackendFileConfig,

    /// Conversation context configuration
    #[serde(default)]
    pub context: ContextFileConfig,
}

/// Chat UI server configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// Address to bind the chat UI to
    pub bind_address: Option<String>,

    /// Port to bind the chat UI to
    pub port: Option<u16>,

    /// Directory served under `/static`
    pub static_dir: Option<PathBuf>,
}

/// Inference backend configuration
#[derive(Debug, Default, Deserialize)]
pub struct BackendFileConfig {
    /// Backend host
    pub address: Option<String>,

    /// Backend port
    pub port: Option<u16>,

    /// Seconds to wait for a reply
    pub timeout_secs: Option<u64>,
}

/// Conversation context configuration
#[derive(Debug, Default, Deserialize)]
pub struct ContextFileConfig {
    /// Replay history into prompts at startup
    pub enabled: Option<bool>,

    /// Maximum number of replies retained
    pub max_depth: Option<usize>,

    /// Keep replies with CJK ideographs out of the history
    pub filter_non_latin: Option<bool>,
}

/// Load a config file
///
/// An explicitly named file must exist and parse. Without one, the standard
/// path is tried and a missing or broken file falls back to defaults.
///
/// # Errors
///
/// Returns error if an explicitly named file cannot be read or parsed
pub fn load_config_file(explicit: Option<&Path>) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), "loaded config file");
        return Ok(config);
    }

    let Some(path) = config_file_path() else {
        return Ok(ConfigFile::default());
    };

    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let config = match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ConfigFile::default()
        }
    };

    Ok(config)
}

/// Return the config file path: `~/.config/npuchat/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("npuchat").join("config.toml"))
}
