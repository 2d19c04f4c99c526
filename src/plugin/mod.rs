//! Plugin class selectors for the hub's external collaborators.
//!
//! The spawner, proxy, and authenticator are external plugins named by
//! dotted class selectors such as `rookery_traefik_proxy.redis.TraefikRedisProxy`.
//! Rookery never loads these plugins itself; it validates the selectors and
//! recognizes the kinds that carry extra configuration requirements.

use crate::document::path::is_identifier;
use crate::error::PluginClassError;
use std::fmt;

/// A validated plugin class selector: `package.module.ClassName`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginClass(String);

impl PluginClass {
    /// Parse and validate a class selector.
    ///
    /// Requires at least two `.`-separated identifier segments; the final
    /// segment names the class, the rest name the providing package.
    pub fn parse(raw: &str) -> Result<Self, PluginClassError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PluginClassError {
                class: raw.to_string(),
                reason: "selector is empty".to_string(),
            });
        }
        let segments: Vec<&str> = trimmed.split('.').collect();
        if segments.len() < 2 {
            return Err(PluginClassError {
                class: raw.to_string(),
                reason: "expected a dotted path like `package.ClassName`".to_string(),
            });
        }
        for segment in &segments {
            if !is_identifier(segment) {
                return Err(PluginClassError {
                    class: raw.to_string(),
                    reason: format!("segment '{segment}' is not an identifier"),
                });
            }
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The full selector as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The class name (final segment).
    pub fn name(&self) -> &str {
        final_segment(&self.0)
    }

    /// The providing package (everything before the final segment).
    pub fn package(&self) -> &str {
        self.0.rsplit_once('.').map(|(pkg, _)| pkg).unwrap_or("")
    }
}

impl fmt::Display for PluginClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn final_segment(class: &str) -> &str {
    class.rsplit('.').next().unwrap_or(class)
}

/// Recognized spawner implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnerKind {
    /// Runs each workspace as a local child process.
    LocalProcess,
    /// Runs each workspace in a Docker container.
    Docker,
    /// Runs each workspace as a Kubernetes pod.
    Kube,
    /// An external plugin rookery has no special handling for.
    Other,
}

impl SpawnerKind {
    /// Detect the kind from a selector's class name.
    pub fn detect(class: &str) -> Self {
        match final_segment(class) {
            "LocalProcessSpawner" => SpawnerKind::LocalProcess,
            "DockerSpawner" => SpawnerKind::Docker,
            "KubeSpawner" => SpawnerKind::Kube,
            _ => SpawnerKind::Other,
        }
    }

    /// Whether workspaces run inside containers (an image is required).
    pub fn is_containerized(self) -> bool {
        matches!(self, SpawnerKind::Docker | SpawnerKind::Kube)
    }

    pub fn label(self) -> &'static str {
        match self {
            SpawnerKind::LocalProcess => "local process spawner",
            SpawnerKind::Docker => "docker spawner",
            SpawnerKind::Kube => "kubernetes spawner",
            SpawnerKind::Other => "external spawner plugin",
        }
    }
}

/// Recognized proxy implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyKind {
    /// The hub-managed HTTP proxy with an in-memory routing table.
    ConfigurableHttp,
    /// Traefik wired to a Redis routing store (requires backend settings).
    TraefikRedis,
    /// An external plugin rookery has no special handling for.
    Other,
}

impl ProxyKind {
    /// Detect the kind from a selector's class name.
    pub fn detect(class: &str) -> Self {
        match final_segment(class) {
            "ConfigurableHttpProxy" => ProxyKind::ConfigurableHttp,
            "TraefikRedisProxy" => ProxyKind::TraefikRedis,
            _ => ProxyKind::Other,
        }
    }

    /// Whether this proxy keeps its routing table in a Redis store.
    pub fn uses_redis_store(self) -> bool {
        self == ProxyKind::TraefikRedis
    }

    pub fn label(self) -> &'static str {
        match self {
            ProxyKind::ConfigurableHttp => "hub-managed http proxy",
            ProxyKind::TraefikRedis => "traefik proxy with redis routing store",
            ProxyKind::Other => "external proxy plugin",
        }
    }
}

/// Recognized authenticator implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticatorKind {
    /// System-account authentication.
    Pam,
    /// Single shared static password; test deployments only.
    Dummy,
    /// An external plugin rookery has no special handling for.
    Other,
}

impl AuthenticatorKind {
    /// Detect the kind from a selector's class name.
    pub fn detect(class: &str) -> Self {
        match final_segment(class) {
            "PamAuthenticator" => AuthenticatorKind::Pam,
            "DummyAuthenticator" => AuthenticatorKind::Dummy,
            _ => AuthenticatorKind::Other,
        }
    }

    /// Whether this authenticator checks a single static password.
    pub fn uses_static_password(self) -> bool {
        self == AuthenticatorKind::Dummy
    }

    pub fn label(self) -> &'static str {
        match self {
            AuthenticatorKind::Pam => "system account authenticator",
            AuthenticatorKind::Dummy => "static password authenticator",
            AuthenticatorKind::Other => "external authenticator plugin",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_segments() {
        let class = PluginClass::parse("rookery_dummy_auth.DummyAuthenticator").unwrap();
        assert_eq!(class.package(), "rookery_dummy_auth");
        assert_eq!(class.name(), "DummyAuthenticator");
    }

    #[test]
    fn test_parse_three_segments() {
        let class = PluginClass::parse("rookery_traefik_proxy.redis.TraefikRedisProxy").unwrap();
        assert_eq!(class.package(), "rookery_traefik_proxy.redis");
        assert_eq!(class.name(), "TraefikRedisProxy");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let class = PluginClass::parse("  pkg.Class  ").unwrap();
        assert_eq!(class.as_str(), "pkg.Class");
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(PluginClass::parse("").is_err());
        assert!(PluginClass::parse("NoPackage").is_err());
        assert!(PluginClass::parse("pkg..Class").is_err());
        assert!(PluginClass::parse("pkg.9Class").is_err());
        assert!(PluginClass::parse("pkg.Cla ss").is_err());
    }

    #[test]
    fn test_spawner_kind_detection() {
        assert_eq!(
            SpawnerKind::detect("rookery_kube_spawner.KubeSpawner"),
            SpawnerKind::Kube
        );
        assert!(SpawnerKind::detect("x.KubeSpawner").is_containerized());
        assert!(!SpawnerKind::detect("rookery.spawner.LocalProcessSpawner").is_containerized());
        assert_eq!(SpawnerKind::detect("vendor.FancySpawner"), SpawnerKind::Other);
    }

    #[test]
    fn test_proxy_kind_detection() {
        assert!(
            ProxyKind::detect("rookery_traefik_proxy.redis.TraefikRedisProxy").uses_redis_store()
        );
        assert!(!ProxyKind::detect("rookery.proxy.ConfigurableHttpProxy").uses_redis_store());
    }

    #[test]
    fn test_authenticator_kind_detection() {
        assert!(
            AuthenticatorKind::detect("rookery_dummy_auth.DummyAuthenticator")
                .uses_static_password()
        );
        assert_eq!(
            AuthenticatorKind::detect("corp.sso.OidcAuthenticator"),
            AuthenticatorKind::Other
        );
    }
}
