//! Render command: print the staged manifest of a product.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use super::common::ProductArgs;
use crate::product::ProductService;

/// Print the staged manifest of a product as YAML.
///
/// # Examples
///
/// ```bash
/// tile-harness render-manifest --config tile.toml
/// tile-harness render-manifest --config tile.toml --output manifest.yml
/// ```
#[derive(Parser, Debug)]
#[command(name = "render-manifest")]
pub struct RenderManifestCommand {
    #[command(flatten)]
    product: ProductArgs,

    /// Write the manifest to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl RenderManifestCommand {
    /// Execute the render-manifest command.
    pub fn execute(self) -> Result<()> {
        let service = ProductService::new(self.product.to_config()?)?;
        let manifest = service.render_manifest()?;

        match &self.output {
            Some(path) => {
                fs::write(path, manifest.as_str())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                tracing::info!("Wrote manifest to {}", path.display());
            }
            None => print!("{manifest}"),
        }
        Ok(())
    }
}
