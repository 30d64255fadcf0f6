// File: src/config.rs
// Purpose: Application configuration, parsed from pipes.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration
///
/// Every key is optional; a missing file or empty file yields the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory that `Pipes::render` resolves view templates against
    #[serde(default = "default_views")]
    pub views: PathBuf,

    /// Honour a `_method` param on POST requests
    #[serde(default = "default_true", alias = "requestMethodOverride")]
    pub request_method_override: bool,

    /// Prefix stripped from incoming URIs (e.g. "/app")
    #[serde(default, alias = "requestBasePath")]
    pub request_base_path: String,

    /// Flush the response at the end of `run`
    #[serde(default = "default_true")]
    pub flush: bool,

    /// Extension appended to the tail when resolving cascade templates
    #[serde(default = "default_template_extension", alias = "templateExtension")]
    pub template_extension: String,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

// Default values
fn default_views() -> PathBuf {
    PathBuf::from("views")
}

fn default_template_extension() -> String {
    "html".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_true() -> bool {
    true
}

// Default implementations
impl Default for Config {
    fn default() -> Self {
        Self {
            views: default_views(),
            request_method_override: true,
            request_base_path: String::new(),
            flush: true,
            template_extension: default_template_extension(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./pipes.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("pipes.toml")
    }

    /// Socket address the reference server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
