//! The settings document handed to the hub runtime.
//!
//! A [`SettingsDocument`] is an ordered sequence of dotted-path assignments.
//! Assignment is last-write-wins: reassigning a path keeps its original
//! position and replaces the value, so replaying the same assignment
//! sequence always produces an identical document.

use crate::document::path::OptionPath;
use crate::error::DocumentError;
use crate::util::secret::{REDACTED, SecretString};
use serde_json::json;
use std::collections::BTreeSet;
use std::fmt;

/// A value assigned to an option path.
///
/// The configuration surface is deliberately flat: scalars, strings,
/// ordered lists of strings, and unordered sets of strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
    List(Vec<String>),
    Set(BTreeSet<String>),
    Secret(SecretString),
}

impl Value {
    /// JSON form of the value; secrets map to the redaction placeholder.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Str(s) => json!(s),
            Value::Int(i) => json!(i),
            Value::Bool(b) => json!(b),
            Value::List(items) => json!(items),
            Value::Set(items) => json!(items),
            Value::Secret(_) => json!(REDACTED),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item:?}")?;
                }
                f.write_str("]")
            }
            Value::Set(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item:?}")?;
                }
                f.write_str("}")
            }
            Value::Secret(_) => f.write_str(REDACTED),
        }
    }
}

/// Ordered mapping from option paths to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsDocument {
    entries: Vec<(OptionPath, Value)>,
}

impl SettingsDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `path`, last write wins.
    ///
    /// A path that was already assigned keeps its original position in the
    /// document and takes the new value.
    pub fn assign(&mut self, path: OptionPath, value: Value) {
        match self.entries.iter_mut().find(|(p, _)| *p == path) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((path, value)),
        }
    }

    /// Parse `path` and assign `value` to it.
    pub fn set(&mut self, path: &str, value: Value) -> Result<(), DocumentError> {
        self.assign(OptionPath::parse(path)?, value);
        Ok(())
    }

    /// Look up the current value of a path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(p, _)| p.as_str() == path)
            .map(|(_, v)| v)
    }

    /// Number of assigned paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no assignments.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate assignments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&OptionPath, &Value)> {
        self.entries.iter().map(|(p, v)| (p, v))
    }

    /// JSON object form; keys are the dotted paths, secrets redacted.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (path, value) in self.iter() {
            map.insert(path.to_string(), value.to_json());
        }
        serde_json::Value::Object(map)
    }
}

impl fmt::Display for SettingsDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (path, value) in self.iter() {
            writeln!(f, "{path} = {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assign(doc: &mut SettingsDocument, path: &str, value: Value) {
        doc.set(path, value).unwrap();
    }

    #[test]
    fn test_last_write_wins_keeps_position() {
        let mut doc = SettingsDocument::new();
        assign(&mut doc, "hub.port", Value::Int(8000));
        assign(&mut doc, "hub.ip", Value::Str("0.0.0.0".into()));
        assign(&mut doc, "hub.port", Value::Int(8081));

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("hub.port"), Some(&Value::Int(8081)));

        let order: Vec<&str> = doc.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(order, vec!["hub.port", "hub.ip"]);
    }

    #[test]
    fn test_replay_is_idempotent() {
        let sequence = [
            ("hub.port", Value::Int(8081)),
            ("hub.admin_access", Value::Bool(true)),
            ("hub.port", Value::Int(8022)),
        ];

        let mut once = SettingsDocument::new();
        let mut twice = SettingsDocument::new();
        for (path, value) in &sequence {
            assign(&mut once, path, value.clone());
        }
        for _ in 0..2 {
            for (path, value) in &sequence {
                assign(&mut twice, path, value.clone());
            }
        }
        assert_eq!(once, twice);
    }

    #[test]
    fn test_display_formats() {
        let mut doc = SettingsDocument::new();
        assign(&mut doc, "spawner.image", Value::Str("img:latest".into()));
        assign(
            &mut doc,
            "spawner.cmd",
            Value::List(vec!["server".into(), "--host=0.0.0.0".into()]),
        );
        assign(
            &mut doc,
            "auth.password",
            Value::Secret(SecretString::new("testpass")),
        );

        let rendered = doc.to_string();
        assert!(rendered.contains(r#"spawner.image = "img:latest""#));
        assert!(rendered.contains(r#"spawner.cmd = ["server", "--host=0.0.0.0"]"#));
        assert!(rendered.contains("auth.password = [REDACTED]"));
        assert!(!rendered.contains("testpass"));
    }

    #[test]
    fn test_to_json_redacts_secrets() {
        let mut doc = SettingsDocument::new();
        assign(
            &mut doc,
            "proxy.api_password",
            Value::Secret(SecretString::new("s3cret")),
        );
        let json = doc.to_json();
        assert_eq!(json["proxy.api_password"], "[REDACTED]");
    }
}
