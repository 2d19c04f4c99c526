//! Shared utilities

pub mod secret;

pub use secret::{REDACTED, SecretString};
