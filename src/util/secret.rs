//! Secret string type for credential handling.
//!
//! The hub configuration carries several credentials (the proxy control-API
//! password, the routing-store password, the static authenticator password).
//! This wrapper keeps them out of logs and rendered output.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Placeholder emitted wherever a secret would otherwise appear.
pub const REDACTED: &str = "[REDACTED]";

/// A wrapper for secrets that prevents accidental logging.
///
/// `Debug` and `Display` show [`REDACTED`] instead of the value, and the
/// `Serialize` impl emits the placeholder as well, so a rendered
/// configuration can never leak a credential. Rendered output is for
/// inspection, not round-tripping. Access to the real value requires an
/// explicit [`expose_secret`](Self::expose_secret) call.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    /// Create a new secret from any string-like value.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Explicitly expose the secret value.
    ///
    /// Use this only where the real value is needed, such as handing the
    /// configuration to the hub runtime.
    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Whether the secret is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl Drop for SecretString {
    fn drop(&mut self) {
        // Best-effort memory clearing; the compiler may optimize this away
        // and copies may exist elsewhere. Not a substitute for zeroize.
        self.0.clear();
        self.0.shrink_to_fit();
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString::new)
    }
}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(REDACTED)
    }
}
