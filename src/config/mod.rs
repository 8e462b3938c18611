//! Configuration loading and management

use crate::core::error::ConfigError;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, e.g. `127.0.0.1:3000`
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Relational store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL; the in-memory store is used when absent
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Paths of the cached views touched by the actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewsConfig {
    /// Invoice list view: invalidated after every write, redirect target
    /// after create and update
    #[serde(default = "default_invoices_path")]
    pub invoices: String,
}

/// Sign-in settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Scheme name passed to the identity provider
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Where a signed-in user lands
    #[serde(default = "default_landing")]
    pub landing: String,
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub views: ViewsConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_invoices_path() -> String {
    "/dashboard/invoices".to_string()
}

fn default_scheme() -> String {
    crate::core::auth::CREDENTIALS_SCHEME.to_string()
}

fn default_landing() -> String {
    "/dashboard".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            invoices: default_invoices_path(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            landing: default_landing(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

fn invalid_value(field: &str, value: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.to_string(),
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `POSTGRES_URL` and `BIND_ADDR` from the environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("POSTGRES_URL").ok(),
            std::env::var("BIND_ADDR").ok(),
        )
    }

    fn with_overrides(mut self, database_url: Option<String>, bind: Option<String>) -> Self {
        if let Some(url) = database_url.filter(|u| !u.is_empty()) {
            self.database.url = Some(url);
        }
        if let Some(bind) = bind.filter(|b| !b.is_empty()) {
            self.server.bind = bind;
        }
        self
    }

    /// Check the view paths
    ///
    /// Both paths must be absolute so they can double as redirect targets.
    /// The invoice list path also roots the action routes, so it must not be
    /// `/` or end with a slash.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("views.invoices", &self.views.invoices),
            ("auth.landing", &self.auth.landing),
        ] {
            if !value.starts_with('/') {
                return Err(invalid_value(field, value, "must be an absolute path"));
            }
        }
        if self.views.invoices.ends_with('/') {
            return Err(invalid_value(
                "views.invoices",
                &self.views.invoices,
                "must name a view below the root, without a trailing slash",
            ));
        }
        Ok(())
    }

    /// Create a default configuration (in-memory store, local listener)
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            views: ViewsConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}
