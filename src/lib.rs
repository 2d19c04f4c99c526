//! Rookery hub configuration front-end
//!
//! Rookery is a multi-user workspace hub: an orchestration runtime that
//! spawns a per-user workspace, routes traffic to it through a reverse
//! proxy, and authenticates users through a pluggable authenticator. This
//! crate is the hub's configuration surface:
//!
//! - **Layered loading** — defaults, a TOML file, `ROOKERY_*` environment
//!   variables, and explicit `--set path=value` assignments, last write wins
//! - **Validation up front** — ports, URLs, plugin class selectors, and
//!   kind-dependent requirements are checked before any hand-off
//! - **One canonical schema** — the legacy composed routing-store URL is
//!   folded into the split host/port/password fields at load time
//! - **Faithful hand-off** — the typed [`HubConfig`] flattens into the
//!   ordered dotted-path settings document the runtime consumes, with
//!   secrets redacted in every rendered form
//!
//! ## Example Configuration
//!
//! ```toml
//! [hub]
//! ip = "0.0.0.0"
//! port = 8081
//! allow_named_servers = true
//!
//! [spawner]
//! class = "rookery_kube_spawner.KubeSpawner"
//! image = "gitpod/openvscode-server:latest"
//! cmd = ["/openvscode-server/bin/openvscode-server", "--host=0.0.0.0"]
//!
//! [proxy]
//! class = "rookery_traefik_proxy.redis.TraefikRedisProxy"
//! api_url = "http://traefik-proxy:8080"
//!
//! [proxy.redis]
//! host = "redis"          # password via REDIS_PASSWORD
//!
//! [auth]
//! class = "rookery.auth.PamAuthenticator"
//! admin_users = ["adminuser"]
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod plugin;
pub mod util;

// Re-export main types
pub use config::{HubConfig, SetOverride, load_config, load_config_from_str};
pub use document::{OptionPath, SettingsDocument};
pub use error::{AppError, Result};
pub use util::SecretString;
