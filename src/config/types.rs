//! Configuration types for rookery
//!
//! This module defines the hub configuration that can be loaded from
//! TOML files and/or environment variables. The loaded [`HubConfig`] is
//! immutable: it is populated once at startup and read thereafter.

use crate::util::secret::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub(crate) const DEFAULT_REDIS_PORT: u16 = 6379;

/// Root hub configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HubConfig {
    /// Hub network binding and feature flags
    pub hub: HubNetworkConfig,

    /// Per-user workspace spawner settings
    pub spawner: SpawnerConfig,

    /// Reverse-proxy wiring
    pub proxy: ProxyConfig,

    /// Authentication policy
    pub auth: AuthConfig,

    /// Hub logging settings
    pub logging: LoggingConfig,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            hub: HubNetworkConfig::default(),
            spawner: SpawnerConfig::default(),
            proxy: ProxyConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Hub network binding and feature flags
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HubNetworkConfig {
    /// Address the hub's internal API binds to
    pub ip: String,

    /// Port the hub's internal API listens on
    pub port: u16,

    /// Address other services use to reach the hub (defaults to `ip`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_ip: Option<String>,

    /// Port other services use to reach the hub (defaults to `port`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_port: Option<u16>,

    /// Public URL the hub serves users on
    pub bind_url: String,

    /// Allow each user to run multiple named workspaces
    pub allow_named_servers: bool,

    /// Allow admin users to access other users' workspaces
    pub admin_access: bool,
}

impl Default for HubNetworkConfig {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".to_string(),
            port: 8081,
            connect_ip: None,
            connect_port: None,
            bind_url: "http://127.0.0.1:8000".to_string(),
            allow_named_servers: false,
            admin_access: false,
        }
    }
}

impl HubNetworkConfig {
    /// The address advertised to other services.
    pub fn advertised_ip(&self) -> &str {
        self.connect_ip.as_deref().unwrap_or(&self.ip)
    }

    /// The port advertised to other services.
    pub fn advertised_port(&self) -> u16 {
        self.connect_port.unwrap_or(self.port)
    }
}

/// Per-user workspace spawner settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Spawner plugin class selector
    pub class: String,

    /// Container image for the workspace (required by container spawners)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Launch command, argument vector
    pub cmd: Vec<String>,

    /// Path the workspace UI opens on, e.g. `/lab`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_url: Option<String>,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            class: "rookery.spawner.LocalProcessSpawner".to_string(),
            image: None,
            cmd: vec!["rookery-workspace".to_string()],
            default_url: None,
        }
    }
}

/// Reverse-proxy wiring
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Proxy plugin class selector
    pub class: String,

    /// URL of the proxy's control API
    pub api_url: String,

    /// Credential for the proxy's control API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_password: Option<SecretString>,

    /// Name of the proxy entrypoint user traffic enters through
    pub entrypoint: String,

    /// Whether the hub starts the proxy process itself
    pub should_start: bool,

    /// Routing-store connection (used by the Redis-backed proxy)
    pub redis: ProxyBackendConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            class: "rookery.proxy.ConfigurableHttpProxy".to_string(),
            api_url: "http://127.0.0.1:8001".to_string(),
            api_password: None,
            entrypoint: "http".to_string(),
            should_start: true,
            redis: ProxyBackendConfig::default(),
        }
    }
}

/// Routing-store connection parameters.
///
/// The split `host`/`port`/`password` fields are the canonical schema. The
/// composed `url` form is accepted only as legacy input and is normalized
/// into the split fields during loading; it never survives past
/// [`load_config`](crate::config::load_config).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyBackendConfig {
    /// Store host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Store port
    pub port: u16,

    /// Store credential
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<SecretString>,

    /// Legacy composed connection URL, `redis://[:password@]host:port`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for ProxyBackendConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_REDIS_PORT,
            password: None,
            url: None,
        }
    }
}

/// Authentication policy
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Authenticator plugin class selector
    pub class: String,

    /// Static shared credential (required by the dummy authenticator)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<SecretString>,

    /// Users granted hub administration rights
    pub admin_users: BTreeSet<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            class: "rookery.auth.PamAuthenticator".to_string(),
            password: None,
            admin_users: BTreeSet::new(),
        }
    }
}

/// Hub logging settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}
