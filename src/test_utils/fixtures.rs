//! Test fixtures for product configuration
//!
//! [`ProductFixture`] writes a properties document and a network config
//! document into a temporary directory and hands back a matching
//! [`ProductConfig`].

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::{OM_PASSWORD, OM_URL, OM_USERNAME, ProductConfig};

/// URL used for `OM_URL` by [`om_env`].
pub const TEST_OM_URL: &str = "https://opsman.example.com";

/// Lookup function yielding a complete Ops Manager environment.
pub fn om_env(name: &str) -> Option<String> {
    match name {
        OM_USERNAME => Some("admin".to_string()),
        OM_PASSWORD => Some("password".to_string()),
        OM_URL => Some(TEST_OM_URL.to_string()),
        _ => None,
    }
}

/// Temporary properties and network documents for one product.
pub struct ProductFixture {
    // Held so the directory lives as long as the fixture.
    _dir: TempDir,
    properties_file: PathBuf,
    network_config_file: PathBuf,
}

impl ProductFixture {
    /// Minimal properties with two keys and a single-AZ network config.
    pub fn basic() -> Result<Self> {
        Self::with_documents(
            &json!({
                ".properties.a": { "value": 1 },
                ".properties.b": { "value": 2 }
            }),
            &Self::default_network(),
        )
    }

    /// Writes the given documents as pretty JSON.
    pub fn with_documents(properties: &Value, network: &Value) -> Result<Self> {
        Self::with_raw(
            &serde_json::to_string_pretty(properties)?,
            &serde_json::to_string_pretty(network)?,
        )
    }

    /// Writes the given text verbatim, valid JSON or not.
    pub fn with_raw(properties: &str, network: &str) -> Result<Self> {
        let dir = TempDir::new().context("Failed to create fixture directory")?;
        let properties_file = dir.path().join("properties.json");
        let network_config_file = dir.path().join("network.json");
        fs::write(&properties_file, properties).context("Failed to write properties fixture")?;
        fs::write(&network_config_file, network).context("Failed to write network fixture")?;
        Ok(Self {
            _dir: dir,
            properties_file,
            network_config_file,
        })
    }

    /// Network config used by [`basic`](Self::basic).
    pub fn default_network() -> Value {
        json!({
            "singleton_availability_zone": { "name": "z1" },
            "other_availability_zones": [{ "name": "z1" }],
            "network": { "name": "services" }
        })
    }

    /// Product config pointing at the fixture documents.
    pub fn config(&self, name: &str, version: &str) -> ProductConfig {
        ProductConfig::new(name, version, &self.properties_file, &self.network_config_file)
    }

    /// Path of the properties document.
    pub fn properties_file(&self) -> &Path {
        &self.properties_file
    }

    /// Path of the network config document.
    pub fn network_config_file(&self) -> &Path {
        &self.network_config_file
    }
}
