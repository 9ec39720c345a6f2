//! Migration command for the legacy certificate property.
//!
//! Reads a properties document (property key to `{value: ...}` descriptor),
//! moves `networking_poe_ssl_cert` into `networking_poe_ssl_certs` and writes
//! the result as pretty JSON.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use crate::migration::{self, Document};

/// Migrate the legacy certificate property in a properties document.
///
/// # Examples
///
/// ```bash
/// # Print the migrated document
/// tile-harness migrate properties.json
///
/// # Rewrite the file
/// tile-harness migrate properties.json --in-place
/// ```
#[derive(Parser, Debug)]
#[command(name = "migrate")]
pub struct MigrateCommand {
    /// JSON properties document to migrate.
    file: PathBuf,

    /// Rewrite the file instead of printing to stdout.
    #[arg(short, long)]
    in_place: bool,
}

impl MigrateCommand {
    /// Execute the migrate command.
    pub fn execute(self) -> Result<()> {
        let rendered = self.render()?;

        if self.in_place {
            fs::write(&self.file, format!("{rendered}\n"))
                .with_context(|| format!("Failed to write {}", self.file.display()))?;
            tracing::info!("Migrated {}", self.file.display());
        } else {
            println!("{rendered}");
        }
        Ok(())
    }

    fn render(&self) -> Result<String> {
        let content = fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        let mut document: Document = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {} as a JSON object", self.file.display()))?;

        migration::migrate_with_default_ids(&mut document);

        serde_json::to_string_pretty(&document).context("Failed to serialize migrated document")
    }
}
