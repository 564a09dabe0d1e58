//! Client configuration.
//!
//! [`ClientConfig`] is the single source of truth for all runtime settings:
//! where the backend lives, how aggressively to poll while push delivery is
//! down, and how reconnection backs off.  It is a plain struct — no global
//! state, no environment reads here — populated from defaults, an optional
//! TOML file, and CLI overrides applied by the binary.
//!
//! Every field carries a serde default so a partial config file (or none at
//! all) works on first run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// All runtime configuration for the viewport client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the backend's request/response surface, including any
    /// API prefix (e.g. `http://127.0.0.1:8001/api`).
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Base URL for the push channel.  When absent it is derived from
    /// `backend_url` by swapping the scheme (http → ws, https → wss).
    #[serde(default)]
    pub ws_url: Option<String>,

    /// Milliseconds between pull requests while push delivery is down.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// First reconnect delay after push loss, in milliseconds.  Doubles on
    /// each failed attempt.
    #[serde(default = "default_reconnect_floor_ms")]
    pub reconnect_floor_ms: u64,

    /// Upper bound on the reconnect delay, in milliseconds.
    #[serde(default = "default_reconnect_ceiling_ms")]
    pub reconnect_ceiling_ms: u64,

    /// Debounce delay for address-bar suggestion lookups, in milliseconds.
    #[serde(default = "default_suggest_debounce_ms")]
    pub suggest_debounce_ms: u64,
}

fn default_backend_url() -> String {
    "http://127.0.0.1:8001/api".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_reconnect_floor_ms() -> u64 {
    500
}

fn default_reconnect_ceiling_ms() -> u64 {
    10_000
}

fn default_suggest_debounce_ms() -> u64 {
    300
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            ws_url: None,
            poll_interval_ms: default_poll_interval_ms(),
            reconnect_floor_ms: default_reconnect_floor_ms(),
            reconnect_ceiling_ms: default_reconnect_ceiling_ms(),
            suggest_debounce_ms: default_suggest_debounce_ms(),
        }
    }
}

impl ClientConfig {
    /// Loads a config from a TOML file.  Absent fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// The push-channel base URL: the configured override, or the backend
    /// URL with its scheme swapped to the WebSocket equivalent.
    pub fn ws_base(&self) -> String {
        if let Some(ws) = &self.ws_url {
            return ws.trim_end_matches('/').to_string();
        }
        let base = self.backend_url.trim_end_matches('/');
        if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base.to_string()
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn reconnect_floor(&self) -> Duration {
        Duration::from_millis(self.reconnect_floor_ms)
    }

    pub fn reconnect_ceiling(&self) -> Duration {
        Duration::from_millis(self.reconnect_ceiling_ms)
    }

    pub fn suggest_debounce(&self) -> Duration {
        Duration::from_millis(self.suggest_debounce_ms)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
