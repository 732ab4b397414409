//! Server configuration file (`docs.yaml`).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use scalar_docs::DocsConfig;
use scalar_docs_telemetry::{LogFormat, TelemetryConfig};

use crate::error::ServerError;

/// Full server configuration.
///
/// Loaded from an optional YAML file; CLI flags override individual values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (default: 127.0.0.1:8080).
    pub listen: String,

    /// Use zero-config auto-discovery instead of the `docs` search settings.
    pub auto: bool,

    /// Directory relative spec paths are resolved against. Defaults to the
    /// working directory.
    pub root: Option<PathBuf>,

    /// Middleware settings.
    pub docs: DocsConfig,

    /// Log level filter.
    pub log_level: String,

    /// Log format (`json` or `pretty`).
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".to_string(),
            auto: false,
            root: None,
            docs: DocsConfig::default(),
            log_level: "info".to_string(),
            log_format: "json".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        let content = std::fs::read_to_string(path).map_err(|source| ServerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ServerError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a config from YAML text.
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listen
            .parse()
            .map_err(|_| ServerError::InvalidListen(self.listen.clone()))
    }

    pub fn telemetry(&self) -> TelemetryConfig {
        let format = LogFormat::parse(&self.log_format).unwrap_or_default();
        TelemetryConfig {
            log_level: self.log_level.clone(),
            log_format: format,
        }
    }
}
