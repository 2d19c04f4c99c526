//! Configuration module
//!
//! Handles loading, validating, and normalizing the hub configuration from
//! TOML files, environment variables, and explicit assignments.

pub mod loader;
pub mod overrides;
pub mod types;

pub use loader::{load_config, load_config_from_str};
pub use overrides::SetOverride;
pub use types::*;
