//! Configuration loading tests
//!
//! The three revision fixtures mirror the shipped hub configurations,
//! including the routing-store key drift between revisions 1 and 2.

use rookery::config::{SetOverride, load_config, load_config_from_str};
use rookery::error::ConfigError;
use rookery::plugin::{AuthenticatorKind, PluginClass, ProxyKind, SpawnerKind};
use rstest::rstest;

const REVISION_1: &str = r#"
[hub]
ip = "0.0.0.0"
connect_ip = "0.0.0.0"
port = 8081
allow_named_servers = true
admin_access = true

[spawner]
class = "rookery_kube_spawner.KubeSpawner"
image = "gitpod/openvscode-server:latest"
cmd = ["/openvscode-server/bin/openvscode-server", "--host=0.0.0.0", "--without-connection-token"]

[proxy]
class = "rookery_traefik_proxy.redis.TraefikRedisProxy"
api_url = "http://traefik-proxy:8080"
api_password = "traefik-api-secret"

[proxy.redis]
host = "redis"
port = 6379
password = "redis-secret"

[auth]
class = "rookery_dummy_auth.DummyAuthenticator"
password = "testpass"
admin_users = ["adminuser"]
"#;

// Revision 2 carries the same deployment with the routing store wired
// through the legacy composed URL instead of the split fields.
const REVISION_2: &str = r#"
[hub]
ip = "0.0.0.0"
connect_ip = "0.0.0.0"
port = 8081
allow_named_servers = true
admin_access = true

[spawner]
class = "rookery_kube_spawner.KubeSpawner"
image = "gitpod/openvscode-server:latest"
cmd = ["/openvscode-server/bin/openvscode-server", "--host=0.0.0.0", "--without-connection-token"]

[proxy]
class = "rookery_traefik_proxy.redis.TraefikRedisProxy"
api_url = "http://traefik-proxy:8080"
api_password = "traefik-api-secret"

[proxy.redis]
url = "redis://:redis-secret@redis:6379"

[auth]
class = "rookery_dummy_auth.DummyAuthenticator"
password = "testpass"
admin_users = ["adminuser"]
"#;

const REVISION_3: &str = r#"
[hub]
ip = "0.0.0.0"
connect_ip = "0.0.0.0"
port = 8081
bind_url = "http://localhost:8022"
allow_named_servers = false
admin_access = true

[spawner]
class = "rookery_kube_spawner.KubeSpawner"
image = "gitpod/openvscode-server:latest"
cmd = ["/openvscode-server/bin/openvscode-server", "--host=0.0.0.0", "--without-connection-token"]

[proxy]
class = "rookery_traefik_proxy.redis.TraefikRedisProxy"
api_url = "http://traefik-proxy:8080"
api_password = "traefik-api-secret"

[proxy.redis]
host = "redis"
port = 6379
password = "redis-secret"

[auth]
class = "rookery_dummy_auth.DummyAuthenticator"
password = "testpass"
admin_users = ["adminuser"]
"#;

#[test]
fn test_revision_1_network_and_flags() {
    let config = load_config_from_str(REVISION_1).unwrap();

    assert_eq!(config.hub.port, 8081);
    assert!(config.hub.admin_access);
    assert!(config.hub.allow_named_servers);
    assert_eq!(config.hub.ip, "0.0.0.0");
    assert_eq!(config.hub.advertised_ip(), "0.0.0.0");
    assert_eq!(config.hub.advertised_port(), 8081);

    assert_eq!(
        config.spawner.image.as_deref(),
        Some("gitpod/openvscode-server:latest")
    );
    assert_eq!(config.spawner.cmd.len(), 3);
    assert!(config.auth.admin_users.contains("adminuser"));
}

#[rstest]
#[case::split_backend(REVISION_1)]
#[case::legacy_backend_url(REVISION_2)]
#[case::rebased_bind_url(REVISION_3)]
fn test_every_revision_names_its_plugins(#[case] revision: &str) {
    let config = load_config_from_str(revision).unwrap();

    for (field, raw) in [
        ("spawner", &config.spawner.class),
        ("proxy", &config.proxy.class),
        ("auth", &config.auth.class),
    ] {
        assert!(!raw.is_empty(), "{field} class selector must not be empty");
        PluginClass::parse(raw).unwrap();
    }

    assert_eq!(
        SpawnerKind::detect(&config.spawner.class),
        SpawnerKind::Kube
    );
    assert_eq!(
        ProxyKind::detect(&config.proxy.class),
        ProxyKind::TraefikRedis
    );
    assert_eq!(
        AuthenticatorKind::detect(&config.auth.class),
        AuthenticatorKind::Dummy
    );
}

#[test]
fn test_revision_2_legacy_url_matches_revision_1_backend() {
    let rev1 = load_config_from_str(REVISION_1).unwrap();
    let rev2 = load_config_from_str(REVISION_2).unwrap();

    // The composed URL folds into the split fields; both revisions describe
    // the same backend once normalized.
    assert_eq!(rev2.proxy.redis.host.as_deref(), Some("redis"));
    assert_eq!(rev2.proxy.redis.port, 6379);
    assert_eq!(
        rev2.proxy.redis.password.as_ref().map(|p| p.expose_secret()),
        Some("redis-secret")
    );
    assert!(rev2.proxy.redis.url.is_none());
    assert_eq!(rev1.proxy.redis, rev2.proxy.redis);
}

#[test]
fn test_per_revision_values_stay_distinct() {
    let rev1 = load_config_from_str(REVISION_1).unwrap();
    let rev2 = load_config_from_str(REVISION_2).unwrap();
    let rev3 = load_config_from_str(REVISION_3).unwrap();

    assert_eq!(rev3.hub.bind_url, "http://localhost:8022");
    assert!(!rev3.hub.allow_named_servers);

    assert!(rev1.hub.allow_named_servers);
    assert!(rev2.hub.allow_named_servers);
    assert_eq!(rev1.hub.bind_url, "http://127.0.0.1:8000");
}

#[test]
fn test_loading_is_deterministic() {
    let once = load_config_from_str(REVISION_1).unwrap();
    let again = load_config_from_str(REVISION_1).unwrap();
    assert_eq!(once, again);
}

#[test]
fn test_starter_config_is_valid() {
    let config = load_config_from_str(include_str!("../rookery.example.toml")).unwrap();
    assert_eq!(config.hub.port, 8081);
    assert_eq!(
        SpawnerKind::detect(&config.spawner.class),
        SpawnerKind::LocalProcess
    );
    assert_eq!(
        AuthenticatorKind::detect(&config.auth.class),
        AuthenticatorKind::Pam
    );
}

#[test]
fn test_secrets_do_not_leak_through_debug() {
    let config = load_config_from_str(REVISION_1).unwrap();
    let debug_output = format!("{config:?}");
    assert!(!debug_output.contains("traefik-api-secret"));
    assert!(!debug_output.contains("redis-secret"));
    assert!(!debug_output.contains("testpass"));
}

#[test]
#[serial_test::serial]
fn test_explicit_config_path_must_exist() {
    let result = load_config(Some("/nonexistent/rookery.toml"), &[]);
    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
#[serial_test::serial]
fn test_env_overrides_file() {
    use std::env;
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("rookery.toml");
    fs::write(
        &config_path,
        r#"
[hub]
port = 9000
"#,
    )
    .unwrap();

    unsafe {
        env::set_var("ROOKERY_HUB__PORT", "9100");
    }

    let config = load_config(Some(config_path.to_str().unwrap()), &[]).unwrap();
    assert_eq!(config.hub.port, 9100);

    unsafe {
        env::remove_var("ROOKERY_HUB__PORT");
    }
}

#[test]
#[serial_test::serial]
fn test_redis_password_env_convention() {
    use std::env;
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("rookery.toml");
    fs::write(
        &config_path,
        r#"
[proxy]
class = "rookery_traefik_proxy.redis.TraefikRedisProxy"

[proxy.redis]
host = "redis"
"#,
    )
    .unwrap();

    unsafe {
        env::remove_var("ROOKERY_PROXY__REDIS__PASSWORD");
        env::set_var("REDIS_PASSWORD", "conventional-secret");
    }

    let config = load_config(Some(config_path.to_str().unwrap()), &[]).unwrap();
    assert_eq!(
        config
            .proxy
            .redis
            .password
            .as_ref()
            .map(|p| p.expose_secret()),
        Some("conventional-secret")
    );

    unsafe {
        env::remove_var("REDIS_PASSWORD");
    }
}

#[test]
#[serial_test::serial]
fn test_prefixed_env_wins_over_redis_convention() {
    use std::env;
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("rookery.toml");
    fs::write(
        &config_path,
        r#"
[proxy]
class = "rookery_traefik_proxy.redis.TraefikRedisProxy"

[proxy.redis]
host = "redis"
"#,
    )
    .unwrap();

    unsafe {
        env::set_var("ROOKERY_PROXY__REDIS__PASSWORD", "prefixed-secret");
        env::set_var("REDIS_PASSWORD", "conventional-secret");
    }

    let config = load_config(Some(config_path.to_str().unwrap()), &[]).unwrap();
    assert_eq!(
        config
            .proxy
            .redis
            .password
            .as_ref()
            .map(|p| p.expose_secret()),
        Some("prefixed-secret")
    );

    unsafe {
        env::remove_var("ROOKERY_PROXY__REDIS__PASSWORD");
        env::remove_var("REDIS_PASSWORD");
    }
}

#[test]
#[serial_test::serial]
fn test_set_assignments_apply_in_order_and_replay_identically() {
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("rookery.toml");
    fs::write(
        &config_path,
        r#"
[hub]
port = 8081
"#,
    )
    .unwrap();

    let overrides = SetOverride::parse_all(&[
        "hub.port=9000".to_string(),
        "hub.admin_access=true".to_string(),
        "hub.port=9001".to_string(),
    ])
    .unwrap();

    let once = load_config(Some(config_path.to_str().unwrap()), &overrides).unwrap();
    assert_eq!(once.hub.port, 9001);
    assert!(once.hub.admin_access);

    // Re-applying the same assignment sequence yields an identical result.
    let again = load_config(Some(config_path.to_str().unwrap()), &overrides).unwrap();
    assert_eq!(once, again);
}
