//! Server configuration from defaults, TOML and environment

use anyhow::{Context, Result};
use conversa::AnthropicConfig;
use sessao::ReaperConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default host address
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port number
pub const DEFAULT_PORT: u16 = 3002;

/// Default idle session lifetime in seconds (4 hours)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 4 * 60 * 60;

/// Default reaper sweep interval in seconds (1 hour)
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60 * 60;

/// Default request body limit (50 MiB)
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 50 * 1024 * 1024;

/// Accepted log levels
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Log level for tracing
    pub log_level: String,

    /// Directory whose dataset files replace the embedded ones
    pub data_dir: Option<PathBuf>,

    /// Directory served as static files
    pub static_dir: Option<PathBuf>,

    /// Chat backend API key; chat routes answer 503 without one
    #[serde(skip_serializing)]
    pub anthropic_api_key: Option<String>,

    /// Chat backend model
    pub claude_model: String,

    /// Idle time after which a session expires, in seconds
    pub session_ttl_secs: u64,

    /// Time between expiry sweeps, in seconds
    pub sweep_interval_secs: u64,

    /// Maximum accepted request body
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
            data_dir: None,
            static_dir: None,
            anthropic_api_key: None,
            claude_model: conversa::anthropic::DEFAULT_MODEL.to_string(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl ServerConfig {
    /// Load config from an optional TOML file, then apply environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Parse a TOML file; missing keys take their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Override fields from the process environment.
    ///
    /// Environment variables:
    /// - `CONSULTA_HOST`, `CONSULTA_PORT`, `CONSULTA_LOG_LEVEL`
    /// - `CONSULTA_DATA_DIR`, `CONSULTA_STATIC_DIR`
    /// - `ANTHROPIC_API_KEY`, `CLAUDE_MODEL`
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    /// Override fields from a variable lookup
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("CONSULTA_HOST") {
            self.host = host;
        }

        if let Some(port) = lookup("CONSULTA_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }

        if let Some(log_level) = lookup("CONSULTA_LOG_LEVEL") {
            self.log_level = log_level;
        }

        if let Some(dir) = lookup("CONSULTA_DATA_DIR").filter(|d| !d.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(dir) = lookup("CONSULTA_STATIC_DIR").filter(|d| !d.is_empty()) {
            self.static_dir = Some(PathBuf::from(dir));
        }

        if let Some(key) = lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.anthropic_api_key = Some(key);
        }

        if let Some(model) = lookup("CLAUDE_MODEL").filter(|m| !m.is_empty()) {
            self.claude_model = model;
        }
    }

    /// Get the socket address for the server
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("Invalid address: {}", e))
    }

    /// Get the full server URL
    #[must_use]
    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Reaper timing derived from the session settings
    #[must_use]
    pub fn reaper_config(&self) -> ReaperConfig {
        ReaperConfig {
            sweep_interval: Duration::from_secs(self.sweep_interval_secs),
            ttl: Duration::from_secs(self.session_ttl_secs),
        }
    }

    /// Chat backend settings, when an API key is configured
    #[must_use]
    pub fn anthropic_config(&self) -> Option<AnthropicConfig> {
        self.anthropic_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .map(|key| AnthropicConfig::new(key).with_model(self.claude_model.clone()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port cannot be zero".to_string());
        }

        if self.host.is_empty() {
            return Err("Host cannot be empty".to_string());
        }

        if self.session_ttl_secs == 0 {
            return Err("Session TTL must be greater than zero".to_string());
        }

        if self.sweep_interval_secs == 0 {
            return Err("Sweep interval must be greater than zero".to_string());
        }

        if self.body_limit_bytes == 0 {
            return Err("Body limit must be greater than zero".to_string());
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            ));
        }

        Ok(())
    }
}
