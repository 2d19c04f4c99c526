//! Dotted option paths.
//!
//! Every option the hub runtime consumes is addressed by a dotted path such
//! as `proxy.redis.host`. Paths are validated once, at the edge.

use crate::error::DocumentError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new("^[A-Za-z_][A-Za-z0-9_]*$").expect("segment pattern is a valid regex")
    })
}

/// Whether `s` is a valid path segment (also used for class selectors).
pub(crate) fn is_identifier(s: &str) -> bool {
    segment_pattern().is_match(s)
}

/// A validated, non-empty dotted option path.
///
/// Each `.`-separated segment must be an identifier: a letter or underscore
/// followed by letters, digits, or underscores.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OptionPath(String);

impl OptionPath {
    /// Parse and validate a dotted path.
    pub fn parse(raw: &str) -> Result<Self, DocumentError> {
        if raw.is_empty() {
            return Err(DocumentError::EmptyPath);
        }
        for segment in raw.split('.') {
            if !is_identifier(segment) {
                return Err(DocumentError::InvalidPath {
                    path: raw.to_string(),
                    segment: segment.to_string(),
                });
            }
        }
        Ok(Self(raw.to_string()))
    }

    /// The path as written, e.g. `hub.port`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate the `.`-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl fmt::Display for OptionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OptionPath {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionPath::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_paths() {
        for raw in ["hub.port", "proxy.redis.host", "logging", "_internal.x9"] {
            let path = OptionPath::parse(raw).unwrap();
            assert_eq!(path.as_str(), raw);
        }
    }

    #[test]
    fn test_segments() {
        let path = OptionPath::parse("proxy.redis.host").unwrap();
        let segments: Vec<&str> = path.segments().collect();
        assert_eq!(segments, vec!["proxy", "redis", "host"]);
    }

    #[test]
    fn test_reject_empty() {
        assert!(matches!(
            OptionPath::parse(""),
            Err(DocumentError::EmptyPath)
        ));
    }

    #[test]
    fn test_reject_malformed() {
        for raw in ["hub..port", ".hub", "hub.", "9hub.port", "hub.po rt", "hub-port"] {
            assert!(
                matches!(
                    OptionPath::parse(raw),
                    Err(DocumentError::InvalidPath { .. })
                ),
                "expected {raw:?} to be rejected"
            );
        }
    }
}
