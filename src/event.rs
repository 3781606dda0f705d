//! Object-created notifications and tenant key derivation.
//!
//! Notifications follow the common bucket-event JSON shape:
//!
//! ```json
//! {"Records": [{"s3": {"bucket": {"name": "uploads"},
//!                      "object": {"key": "input/acme/export.csv"}}}]}
//! ```
//!
//! Input keys must look like `{input_prefix}/{tenant}/{file...}`; the output
//! key is `{output_prefix}/{tenant}/{file...}` unless a fixed file name is
//! configured.

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<EventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "eventName", default)]
    pub event_name: Option<String>,
    pub s3: EventEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventEntity {
    pub bucket: EventBucket,
    pub object: EventObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventBucket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventObject {
    pub key: String,
}

impl StorageEvent {
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("Parsing storage event JSON")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected key '{key}', expected {expected}")]
pub struct InvalidKey {
    pub key: String,
    pub expected: String,
}

/// Prefixes and naming used to turn an input key into an output key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayout {
    pub input_prefix: String,
    pub output_prefix: String,
    pub output_file_name: Option<String>,
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self {
            input_prefix: "input".to_string(),
            output_prefix: "output".to_string(),
            output_file_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantKey {
    pub tenant: String,
    /// Everything after the tenant segment; may contain further `/`.
    pub file_name: String,
}

impl KeyLayout {
    pub fn parse(&self, key: &str) -> Result<TenantKey, InvalidKey> {
        let invalid = || InvalidKey {
            key: key.to_string(),
            expected: format!("{}/{{tenant}}/{{file}}", self.input_prefix),
        };
        let mut parts = key.splitn(3, '/');
        let (Some(prefix), Some(tenant), Some(file_name)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if prefix != self.input_prefix
            || tenant.is_empty()
            || file_name.is_empty()
            || file_name.ends_with('/')
        {
            return Err(invalid());
        }
        Ok(TenantKey {
            tenant: tenant.to_string(),
            file_name: file_name.to_string(),
        })
    }

    pub fn output_key(&self, tenant_key: &TenantKey) -> String {
        let file_name = self
            .output_file_name
            .as_deref()
            .unwrap_or(&tenant_key.file_name);
        format!("{}/{}/{}", self.output_prefix, tenant_key.tenant, file_name)
    }
}
