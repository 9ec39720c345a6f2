//! Staging and configuring a product through `om`
//!
//! [`ProductService`] drives the `om` CLI against a live Ops Manager so
//! integration tests can assert on the manifest a tile renders for a given set
//! of properties:
//!
//! 1. [`configure`](ProductService::configure) reverts staged changes, stages
//!    the product and configures it with the base properties merged with the
//!    caller's overrides.
//! 2. [`render_manifest`](ProductService::render_manifest) looks up the staged
//!    product and fetches its manifest.
//!
//! Every step is a blocking `om` invocation; nothing is retried and nothing is
//! rolled back. If staging succeeds and configuring fails, the product stays
//! staged.
//!
//! # Example
//!
//! ```rust,no_run
//! use serde_json::{Map, json};
//! use tile_harness::config::ProductConfig;
//! use tile_harness::product::ProductService;
//!
//! # fn example() -> tile_harness::core::Result<()> {
//! let config = ProductConfig::new("p-redis", "2.4.0", "properties.json", "network.json");
//! let service = ProductService::new(config)?;
//!
//! let mut overrides = Map::new();
//! overrides.insert(".properties.plan_count".to_string(), json!(3));
//! service.configure(&overrides)?;
//!
//! let manifest = service.render_manifest()?;
//! println!("{manifest}");
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value, json};
use std::fs;

use crate::config::{OmEnvironment, ProductConfig};
use crate::core::{HarnessError, Result};
use crate::manifest::Manifest;
use crate::runner::{CommandOutput, Executor, RunError, SharedRunner};

/// Program name of the Ops Manager CLI.
pub const OM_COMMAND: &str = "om";

/// API path listing staged products.
pub const STAGED_PRODUCTS_PATH: &str = "/api/v0/staged/products";

/// Entry of the staged products listing.
#[derive(Debug, Clone, Deserialize)]
struct StagedProduct {
    #[serde(default, deserialize_with = "null_as_default")]
    guid: String,
    #[serde(rename = "type")]
    product_type: String,
}

/// Body of the staged manifest endpoint.
///
/// `null` is accepted wherever a key may be missing.
#[derive(Debug, Default, Deserialize)]
struct StagedManifestResponse {
    #[serde(default)]
    manifest: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "null_as_default")]
    errors: OmErrors,
}

// The error key is endpoint specific; the manifest endpoint reports under "base".
#[derive(Debug, Default, Deserialize)]
struct OmErrors {
    #[serde(default, rename = "base", deserialize_with = "null_as_default")]
    messages: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Stages, configures and renders one product.
pub struct ProductService {
    config: ProductConfig,
    env: OmEnvironment,
    runner: SharedRunner,
}

impl std::fmt::Debug for ProductService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductService")
            .field("config", &self.config)
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}

impl ProductService {
    /// Builds a service that runs the real `om` binary.
    ///
    /// Fails if `OM_USERNAME`, `OM_PASSWORD` or `OM_URL` is unset, or if any
    /// config field is empty.
    pub fn new(config: ProductConfig) -> Result<Self> {
        Self::with_runner(config, Executor::shared())
    }

    /// Builds a service with an injected runner, reading the process
    /// environment.
    pub fn with_runner(config: ProductConfig, runner: SharedRunner) -> Result<Self> {
        Self::with_environment(config, |name| std::env::var(name).ok(), runner)
    }

    /// Builds a service with both the environment lookup and the runner
    /// injected.
    ///
    /// The environment is checked before the config and no command is run.
    pub fn with_environment<F>(config: ProductConfig, lookup: F, runner: SharedRunner) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = OmEnvironment::from_lookup(lookup)?;
        config.validate()?;
        Ok(Self {
            config,
            env,
            runner,
        })
    }

    /// The product configuration this service was built with.
    pub fn config(&self) -> &ProductConfig {
        &self.config
    }

    /// Reverts staged changes, stages the product and configures it.
    ///
    /// `overrides` are wrapped as `{"value": ...}` and replace base properties
    /// of the same name (see [`merge_properties`]). Each `om` failure is fatal
    /// and carries the captured stderr. Earlier steps are not undone.
    pub fn configure(&self, overrides: &Map<String, Value>) -> Result<()> {
        let name = &self.config.name;
        let context = format!("Unable to configure product {name:?}");

        let properties_path = &self.config.properties_file;
        let properties_text =
            fs::read_to_string(properties_path).map_err(|e| HarnessError::io(&context, e))?;
        let base: Map<String, Value> = serde_json::from_str(&properties_text).map_err(|e| {
            HarnessError::io(
                format!(
                    "{context}: could not parse properties file {:?}",
                    properties_path.display().to_string()
                ),
                e,
            )
        })?;

        let network_path = &self.config.network_config_file;
        let network_text =
            fs::read_to_string(network_path).map_err(|e| HarnessError::io(&context, e))?;
        serde_json::from_str::<Value>(&network_text).map_err(|e| {
            HarnessError::io(
                format!(
                    "{context}: could not parse network config file {:?}",
                    network_path.display().to_string()
                ),
                e,
            )
        })?;

        let merged = merge_properties(&base, overrides);
        let properties_json =
            serde_json::to_string(&merged).map_err(|e| HarnessError::io(&context, e))?;

        self.om(&["revert-staged-changes"])
            .map_err(|e| HarnessError::external_tool("Unable to revert staged changes", e))?;
        tracing::debug!("Reverted staged changes");

        self.om(&[
            "stage-product",
            "--product-name",
            name.as_str(),
            "--product-version",
            self.config.version.as_str(),
        ])
        .map_err(|e| {
            HarnessError::external_tool(
                format!("Unable to stage product {name:?}, version {:?}", self.config.version),
                e,
            )
        })?;
        tracing::info!("Staged {} {}", name, self.config.version);

        self.om(&[
            "configure-product",
            "--product-name",
            name.as_str(),
            "--product-properties",
            properties_json.as_str(),
            "--product-network",
            network_text.as_str(),
        ])
        .map_err(|e| {
            tracing::warn!("Configuring {} failed; the product remains staged", name);
            HarnessError::external_tool(&context, e)
        })?;
        tracing::info!("Configured {} with {} properties", name, merged.len());

        Ok(())
    }

    /// Fetches the staged manifest for the configured product.
    ///
    /// The first staged product whose `type` equals the product name is used.
    /// Errors reported by Ops Manager take precedence over any manifest in the
    /// same response.
    pub fn render_manifest(&self) -> Result<Manifest> {
        let context = "Unable to retrieve staged products";
        let response = self
            .om(&["curl", "--path", STAGED_PRODUCTS_PATH])
            .map_err(|e| HarnessError::external_tool(context, e))?;
        let staged: Vec<StagedProduct> =
            serde_json::from_str::<Option<Vec<StagedProduct>>>(&response.stdout)
                .map_err(|e| HarnessError::protocol(context, e))?
                .unwrap_or_default();

        let guid = find_product_guid(&staged, &self.config.name)?;
        tracing::debug!("Found staged product {} with guid {}", self.config.name, guid);

        let context = format!("Unable to retrieve staged manifest for product guid {guid:?}");
        let path = format!("{STAGED_PRODUCTS_PATH}/{guid}/manifest");
        let response = self
            .om(&["curl", "--path", path.as_str()])
            .map_err(|e| HarnessError::external_tool(&context, e))?;
        let body: StagedManifestResponse = serde_json::from_str(&response.stdout)
            .map_err(|e| HarnessError::protocol(&context, e))?;

        if let Some(message) = body.errors.messages.first() {
            return Err(HarnessError::protocol(&context, message));
        }

        let manifest = body.manifest.unwrap_or_default();
        let yaml =
            serde_yaml::to_string(&manifest).map_err(|e| HarnessError::protocol(&context, e))?;

        Ok(Manifest::new(yaml, self.runner.clone()))
    }

    /// Runs `om` against the configured target.
    fn om(&self, args: &[&str]) -> std::result::Result<CommandOutput, RunError> {
        let mut full_args = vec![
            "--skip-ssl-validation".to_string(),
            "--target".to_string(),
            self.env.url.clone(),
        ];
        full_args.extend(args.iter().map(|a| (*a).to_string()));
        self.runner.run(OM_COMMAND, &full_args)
    }
}

/// Returns the guid of the first staged product of type `name`.
///
/// Only the first match is considered. If it has no guid the product counts
/// as not staged, and the error lists the types seen before it.
fn find_product_guid<'a>(staged: &'a [StagedProduct], name: &str) -> Result<&'a str> {
    let position = staged.iter().position(|p| p.product_type == name);
    match position.map(|i| staged[i].guid.as_str()) {
        Some(guid) if !guid.is_empty() => Ok(guid),
        _ => Err(HarnessError::NotFound {
            product: name.to_string(),
            staged: staged[..position.unwrap_or(staged.len())]
                .iter()
                .map(|p| p.product_type.clone())
                .collect(),
        }),
    }
}

/// Merges caller overrides into the base properties.
///
/// Every override is wrapped as `{"value": v}` and replaces any base entry of
/// the same key outright; base keys without an override pass through.
pub fn merge_properties(base: &Map<String, Value>, overrides: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), json!({ "value": value }));
    }
    merged
}
