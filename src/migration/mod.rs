//! Product property migrations
//!
//! Rewrites the legacy single-certificate property `networking_poe_ssl_cert`
//! into the certificate list property `networking_poe_ssl_certs`.
//!
//! A configuration document maps property keys to descriptors, each holding
//! at least a `value`. The document is kept as a generic JSON tree so keys the
//! migration does not know about pass through untouched.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use tile_harness::migration::{Document, migrate_with_default_ids, CERTS_KEY};
//!
//! let mut doc: Document = serde_json::from_value(json!({
//!     "networking_poe_ssl_cert": {
//!         "value": { "cert_pem": "CERT", "private_key_pem": "KEY" }
//!     }
//! })).unwrap();
//!
//! migrate_with_default_ids(&mut doc);
//! assert_eq!(doc[CERTS_KEY]["value"][0]["cert_chain"]["value"], "CERT");
//! ```
//!
//! # Repeated runs
//!
//! The legacy key is never removed, so migrating the same document twice
//! appends a second entry to the list.

use serde_json::{Map, Value, json};
use uuid::Uuid;

/// Legacy singular certificate property.
pub const LEGACY_CERT_KEY: &str = "networking_poe_ssl_cert";

/// Certificate list property introduced by the migration.
pub const CERTS_KEY: &str = "networking_poe_ssl_certs";

/// Display label given to the migrated certificate entry.
pub const CERT_DISPLAY_NAME: &str = "Certificate";

/// A configuration document: property key to property descriptor.
pub type Document = Map<String, Value>;

/// Source of unique identifiers for migrated entries.
pub trait IdGenerator {
    /// Returns a new, collision-resistant identifier.
    fn generate(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl<F> IdGenerator for F
where
    F: Fn() -> String,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Migrates the legacy certificate property in place.
///
/// If `networking_poe_ssl_cert` is absent or falsy the document is returned
/// unchanged. Otherwise a certificate entry is built from its `cert_pem` and
/// `private_key_pem` and added under `networking_poe_ssl_certs`. Missing
/// source fields are copied as `null`.
///
/// The document is mutated and also returned, so callers can chain.
pub fn migrate<'a>(document: &'a mut Document, ids: &dyn IdGenerator) -> &'a mut Document {
    let Some(legacy) = document.get(LEGACY_CERT_KEY).filter(|v| is_truthy(v)) else {
        return document;
    };

    let legacy_value = legacy.get("value");
    let field = |name: &str| {
        legacy_value
            .and_then(|v| v.get(name))
            .cloned()
            .unwrap_or(Value::Null)
    };

    let entry = json!({
        "guid": { "value": ids.generate() },
        "name": { "value": CERT_DISPLAY_NAME },
        "cert_chain": { "value": field("cert_pem") },
        "private_key": { "value": field("private_key_pem") },
    });

    let certs = document
        .entry(CERTS_KEY)
        .or_insert_with(|| json!({ "value": [] }));
    match certs.get_mut("value").and_then(Value::as_array_mut) {
        Some(list) => list.push(entry),
        None => *certs = json!({ "value": [entry] }),
    }

    tracing::debug!("Migrated {} into {}", LEGACY_CERT_KEY, CERTS_KEY);
    document
}

/// [`migrate`] with random UUID identifiers.
pub fn migrate_with_default_ids(document: &mut Document) -> &mut Document {
    migrate(document, &UuidGenerator)
}

// null, false, 0 and "" are falsy; containers are truthy even when empty.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
