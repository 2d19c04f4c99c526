//! Flattening the typed configuration into a settings document.

use crate::config::HubConfig;
use crate::document::doc::{SettingsDocument, Value};
use crate::error::DocumentError;

impl HubConfig {
    /// Flatten into the ordered dotted-path document the hub runtime consumes.
    ///
    /// Optional settings that are unset are omitted rather than rendered as
    /// nulls; the advertised address and port are resolved to their
    /// effective values.
    pub fn to_document(&self) -> Result<SettingsDocument, DocumentError> {
        let mut doc = SettingsDocument::new();

        doc.set("hub.ip", Value::Str(self.hub.ip.clone()))?;
        doc.set("hub.port", Value::Int(self.hub.port.into()))?;
        doc.set(
            "hub.connect_ip",
            Value::Str(self.hub.advertised_ip().to_string()),
        )?;
        doc.set(
            "hub.connect_port",
            Value::Int(self.hub.advertised_port().into()),
        )?;
        doc.set("hub.bind_url", Value::Str(self.hub.bind_url.clone()))?;
        doc.set(
            "hub.allow_named_servers",
            Value::Bool(self.hub.allow_named_servers),
        )?;
        doc.set("hub.admin_access", Value::Bool(self.hub.admin_access))?;

        doc.set("spawner.class", Value::Str(self.spawner.class.clone()))?;
        if let Some(image) = &self.spawner.image {
            doc.set("spawner.image", Value::Str(image.clone()))?;
        }
        doc.set("spawner.cmd", Value::List(self.spawner.cmd.clone()))?;
        if let Some(default_url) = &self.spawner.default_url {
            doc.set("spawner.default_url", Value::Str(default_url.clone()))?;
        }

        doc.set("proxy.class", Value::Str(self.proxy.class.clone()))?;
        doc.set("proxy.api_url", Value::Str(self.proxy.api_url.clone()))?;
        if let Some(password) = &self.proxy.api_password {
            doc.set("proxy.api_password", Value::Secret(password.clone()))?;
        }
        doc.set("proxy.entrypoint", Value::Str(self.proxy.entrypoint.clone()))?;
        doc.set("proxy.should_start", Value::Bool(self.proxy.should_start))?;
        if let Some(host) = &self.proxy.redis.host {
            doc.set("proxy.redis.host", Value::Str(host.clone()))?;
            doc.set("proxy.redis.port", Value::Int(self.proxy.redis.port.into()))?;
            if let Some(password) = &self.proxy.redis.password {
                doc.set("proxy.redis.password", Value::Secret(password.clone()))?;
            }
        }

        doc.set("auth.class", Value::Str(self.auth.class.clone()))?;
        if let Some(password) = &self.auth.password {
            doc.set("auth.password", Value::Secret(password.clone()))?;
        }
        doc.set("auth.admin_users", Value::Set(self.auth.admin_users.clone()))?;

        doc.set("logging.level", Value::Str(self.logging.level.clone()))?;
        doc.set(
            "logging.format",
            Value::Str(self.logging.format.as_str().to_string()),
        )?;

        Ok(doc)
    }
}
