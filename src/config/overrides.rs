//! Explicit option assignments from the command line.
//!
//! `--set PATH=VALUE` assignments are applied after every other source, in
//! argument order, so the last assignment to a path wins. Values are plain
//! strings; scalar options are coerced during deserialization, while list-
//! and set-valued options belong in the configuration file or environment.

use crate::document::OptionPath;
use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A single `path=value` assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOverride {
    pub path: OptionPath,
    pub value: String,
}

impl SetOverride {
    /// Parse a list of raw `path=value` assignments, preserving order.
    pub fn parse_all(raw: &[String]) -> Result<Vec<Self>, ConfigError> {
        raw.iter().map(|s| s.parse()).collect()
    }
}

impl FromStr for SetOverride {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let Some((path, value)) = raw.split_once('=') else {
            return Err(ConfigError::InvalidOverride {
                assignment: raw.to_string(),
                reason: "expected PATH=VALUE".to_string(),
            });
        };
        let path = OptionPath::parse(path.trim()).map_err(|e| ConfigError::InvalidOverride {
            assignment: raw.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            path,
            value: value.to_string(),
        })
    }
}

impl fmt::Display for SetOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.path, self.value)
    }
}
