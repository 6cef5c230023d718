//! Configuration file handling

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::paths::config_path;
use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Backend location
    #[serde(default)]
    pub backend: BackendConfig,

    /// Login credentials used by the login scenarios
    #[serde(default)]
    pub credentials: Credentials,
}

/// Where the pet-store backend lives
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Base URL, e.g. `http://localhost:8080`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the GraphQL endpoint relative to the base URL
    #[serde(default = "default_graphql_path")]
    pub graphql_path: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            graphql_path: default_graphql_path(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_graphql_path() -> String {
    "/graphql".to_string()
}

/// Email/password pair sent to the login endpoints
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Credentials {
    #[serde(default = "default_email")]
    pub email: String,
    #[serde(default = "default_password")]
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: default_email(),
            password: default_password(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn default_email() -> String {
    "admin@petstore.com".to_string()
}

fn default_password() -> String {
    "password123".to_string()
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default config file is
    /// used when present and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Some(path) = config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Parsed base URL of the backend
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.backend.base_url.trim();
        let url = Url::parse(raw).map_err(|e| Error::invalid_url(raw, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_url(raw, "scheme must be http or https"));
        }
        Ok(url)
    }
}
