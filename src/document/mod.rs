//! Settings document module
//!
//! The flat, ordered, dotted-path assignment form of the configuration —
//! the shape the hub runtime actually consumes.

pub mod doc;
pub mod path;
pub mod render;

pub use doc::{SettingsDocument, Value};
pub use path::OptionPath;
