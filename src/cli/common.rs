//! Options shared by the product commands.

use anyhow::{Result, bail};
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

use crate::config::ProductConfig;

/// Which product to work on, from a TOML file or individual flags.
///
/// Flags given alongside `--config` override the file's values.
#[derive(Args, Debug, Clone, Default)]
pub struct ProductArgs {
    /// TOML file with a `[product]` table.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Product name, as reported in the staged product type.
    #[arg(long)]
    pub name: Option<String>,

    /// Product version to stage.
    #[arg(long = "product-version", value_name = "VERSION")]
    pub product_version: Option<String>,

    /// JSON document with the minimal product properties.
    #[arg(long, value_name = "FILE")]
    pub properties_file: Option<PathBuf>,

    /// JSON document with the product network configuration.
    #[arg(long, value_name = "FILE")]
    pub network_config_file: Option<PathBuf>,
}

impl ProductArgs {
    /// Builds the product config. Missing values are left empty so that
    /// validation reports them by name.
    pub fn to_config(&self) -> Result<ProductConfig> {
        let mut config = match &self.config {
            Some(path) => ProductConfig::from_toml_file(path)?,
            None => ProductConfig::default(),
        };

        if let Some(name) = &self.name {
            config.name.clone_from(name);
        }
        if let Some(version) = &self.product_version {
            config.version.clone_from(version);
        }
        if let Some(path) = &self.properties_file {
            config.properties_file.clone_from(path);
        }
        if let Some(path) = &self.network_config_file {
            config.network_config_file.clone_from(path);
        }
        Ok(config)
    }
}

/// Parses a `KEY=VALUE` override. The value is read as JSON when it parses,
/// and as a plain string otherwise.
pub fn parse_override(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("invalid override {raw:?}: expected KEY=VALUE");
    };
    if key.is_empty() {
        bail!("invalid override {raw:?}: key is empty");
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
