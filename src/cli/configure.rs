//! Configure command: revert, stage and configure a product.

use anyhow::Result;
use clap::Parser;
use serde_json::{Map, Value};

use super::common::{ProductArgs, parse_override};
use crate::product::ProductService;

/// Revert staged changes, stage a product and configure it.
///
/// Requires `OM_USERNAME`, `OM_PASSWORD` and `OM_URL`. A failure after
/// staging leaves the product staged.
///
/// # Examples
///
/// ```bash
/// tile-harness configure --config tile.toml
/// tile-harness configure --name p-redis --product-version 2.4.0 \
///     --properties-file properties.json --network-config-file network.json \
///     --set .properties.plan_count=3 --set '.properties.syslog={"enabled": false}'
/// ```
#[derive(Parser, Debug)]
#[command(name = "configure")]
pub struct ConfigureCommand {
    #[command(flatten)]
    product: ProductArgs,

    /// Property override as KEY=VALUE; VALUE is JSON or a plain string.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    overrides: Vec<(String, Value)>,
}

impl ConfigureCommand {
    /// Execute the configure command.
    pub fn execute(self) -> Result<()> {
        let service = ProductService::new(self.product.to_config()?)?;
        service.configure(&self.override_map())?;
        println!("Configured {} {}", service.config().name, service.config().version);
        Ok(())
    }

    // Later --set flags win over earlier ones for the same key.
    fn override_map(&self) -> Map<String, Value> {
        self.overrides.iter().cloned().collect()
    }
}
