//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Explicit `--set PATH=VALUE` assignments, in argument order
//! 2. Environment variables (ROOKERY_*)
//! 3. Configuration file (TOML)
//! 4. Default values
//!
//! The returned [`HubConfig`] is validated and normalized; in particular the
//! legacy composed routing-store URL never survives loading.

use crate::config::overrides::SetOverride;
use crate::config::types::{DEFAULT_REDIS_PORT, HubConfig, ProxyBackendConfig};
use crate::error::ConfigError;
use crate::plugin::{AuthenticatorKind, PluginClass, ProxyKind, SpawnerKind};
use crate::util::secret::SecretString;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;
use tracing::warn;
use url::Url;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "rookery.toml",
    ".rookery.toml",
    "~/.config/rookery/config.toml",
    "/etc/rookery/config.toml",
];

/// Environment variable prefix; `__` maps to nested keys,
/// e.g. `ROOKERY_PROXY__REDIS__HOST` -> `proxy.redis.host`.
const ENV_PREFIX: &str = "ROOKERY";

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<HubConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let mut hub_config: HubConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    normalize_backend(&mut hub_config.proxy.redis)?;
    validate_config(&hub_config)?;

    Ok(hub_config)
}

/// Load configuration from files, environment, and explicit assignments
pub fn load_config(
    config_path: Option<&str>,
    overrides: &[SetOverride],
) -> Result<HubConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. Start with defaults (handled by serde defaults on HubConfig)

    // 2. Add configuration file
    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // 3. Add environment variables with ROOKERY_ prefix
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. Honor the routing store's conventional environment variables,
    // unless the prefixed form is set (the prefixed form wins)
    if std::env::var("ROOKERY_PROXY__REDIS__PASSWORD").is_err()
        && let Ok(password) = std::env::var("REDIS_PASSWORD")
    {
        builder = builder
            .set_override("proxy.redis.password", password)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }
    if std::env::var("ROOKERY_PROXY__REDIS__URL").is_err()
        && let Ok(url) = std::env::var("REDIS_URL")
    {
        builder = builder
            .set_override("proxy.redis.url", url)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    // 5. Apply explicit assignments last, in argument order
    for over in overrides {
        builder = builder
            .set_override(over.path.as_str(), over.value.as_str())
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    // Build and deserialize
    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let mut hub_config: HubConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    normalize_backend(&mut hub_config.proxy.redis)?;
    validate_config(&hub_config)?;

    Ok(hub_config)
}

/// Fold the legacy composed routing-store URL into the split fields.
///
/// The split `host`/`port`/`password` fields are the canonical schema; the
/// composed form existed in older deployments. A composed URL that disagrees
/// with an explicitly set split field is an error rather than a silent pick.
fn normalize_backend(backend: &mut ProxyBackendConfig) -> Result<(), ConfigError> {
    let Some(raw) = backend.url.take() else {
        return Ok(());
    };

    let parsed = Url::parse(&raw).map_err(|e| {
        ConfigError::invalid(format!("proxy.redis.url is not a valid URL ({e}): {raw}"))
    })?;
    if parsed.scheme() != "redis" && parsed.scheme() != "rediss" {
        return Err(ConfigError::invalid(format!(
            "proxy.redis.url must use the redis:// or rediss:// scheme, got: {}",
            parsed.scheme()
        )));
    }
    let host = parsed
        .host_str()
        .ok_or_else(|| ConfigError::invalid("proxy.redis.url is missing a host"))?
        .to_string();
    let port = parsed.port().unwrap_or(DEFAULT_REDIS_PORT);
    let password = parsed.password().map(SecretString::new);

    if let Some(existing) = &backend.host
        && *existing != host
    {
        return Err(ConfigError::LegacyBackendConflict { field: "host" });
    }
    if backend.port != DEFAULT_REDIS_PORT && backend.port != port {
        return Err(ConfigError::LegacyBackendConflict { field: "port" });
    }
    if let (Some(existing), Some(from_url)) = (&backend.password, &password)
        && existing != from_url
    {
        return Err(ConfigError::LegacyBackendConflict { field: "password" });
    }

    warn!(
        host = %host,
        port = port,
        "proxy.redis.url is deprecated; use proxy.redis.host, proxy.redis.port, and proxy.redis.password"
    );

    backend.host = Some(host);
    backend.port = port;
    if password.is_some() {
        backend.password = password;
    }

    Ok(())
}

/// Validate configuration values
fn validate_config(config: &HubConfig) -> Result<(), ConfigError> {
    // Hub network
    if config.hub.ip.is_empty() {
        return Err(ConfigError::missing("hub.ip"));
    }
    if config.hub.port == 0 {
        return Err(ConfigError::invalid("hub.port must be greater than 0"));
    }
    if config.hub.connect_port == Some(0) {
        return Err(ConfigError::invalid(
            "hub.connect_port must be greater than 0",
        ));
    }
    validate_http_url(&config.hub.bind_url, "hub.bind_url")?;

    // Spawner
    let spawner_class = parse_class(&config.spawner.class, "spawner.class")?;
    if SpawnerKind::detect(spawner_class.as_str()).is_containerized() {
        match &config.spawner.image {
            Some(image) if !image.is_empty() => {}
            _ => {
                return Err(ConfigError::missing(
                    "spawner.image (required by container spawners)",
                ));
            }
        }
    }
    if config.spawner.cmd.is_empty() {
        return Err(ConfigError::invalid("spawner.cmd must not be empty"));
    }
    if config.spawner.cmd.iter().any(|arg| arg.is_empty()) {
        return Err(ConfigError::invalid(
            "spawner.cmd must not contain empty arguments",
        ));
    }

    // Proxy
    let proxy_class = parse_class(&config.proxy.class, "proxy.class")?;
    validate_http_url(&config.proxy.api_url, "proxy.api_url")?;
    if config.proxy.entrypoint.is_empty() {
        return Err(ConfigError::invalid("proxy.entrypoint must not be empty"));
    }
    if ProxyKind::detect(proxy_class.as_str()).uses_redis_store() {
        match &config.proxy.redis.host {
            Some(host) if !host.is_empty() => {}
            _ => {
                return Err(ConfigError::missing(
                    "proxy.redis.host (required by the Redis-backed proxy)",
                ));
            }
        }
        if config.proxy.redis.port == 0 {
            return Err(ConfigError::invalid(
                "proxy.redis.port must be greater than 0",
            ));
        }
    }

    // Authenticator
    let auth_class = parse_class(&config.auth.class, "auth.class")?;
    if AuthenticatorKind::detect(auth_class.as_str()).uses_static_password() {
        match &config.auth.password {
            Some(password) if !password.is_empty() => {}
            _ => {
                return Err(ConfigError::missing(
                    "auth.password (required by the static password authenticator)",
                ));
            }
        }
    }
    if config.auth.admin_users.iter().any(|user| user.trim().is_empty()) {
        return Err(ConfigError::invalid(
            "auth.admin_users must not contain empty names",
        ));
    }

    Ok(())
}

fn parse_class(raw: &str, field: &'static str) -> Result<PluginClass, ConfigError> {
    PluginClass::parse(raw).map_err(|source| ConfigError::InvalidClass { field, source })
}

fn validate_http_url(value: &str, field: &'static str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::missing(field));
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ConfigError::invalid(format!(
            "{field} must start with http:// or https://, got: {value}"
        )));
    }
    Ok(())
}
