//! Command-line interface for tile-harness
//!
//! # Commands
//!
//! - `migrate` - Apply the certificate property migration to a JSON document
//! - `configure` - Revert, stage and configure a product through `om`
//! - `render-manifest` - Print the staged manifest of a product
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Only log errors
//!
//! Without either flag `RUST_LOG` is honored, defaulting to `info` for this
//! crate.
//!
//! # Examples
//!
//! ```bash
//! tile-harness migrate properties.json --in-place
//! tile-harness configure --config tile.toml --set .properties.plan_count=3
//! tile-harness render-manifest --config tile.toml --output manifest.yml
//! ```

mod common;
mod configure;
mod migrate;
mod render;

pub use common::{ProductArgs, parse_override};
pub use configure::ConfigureCommand;
pub use migrate::MigrateCommand;
pub use render::RenderManifestCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(
    name = "tile-harness",
    about = "Migrate tile properties and stage products through om",
    version,
    long_about = "tile-harness migrates product property documents and drives the om CLI \
                  to stage, configure and render Ops Manager products for integration tests."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging, including every executed command.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Migrate the legacy certificate property in a properties document
    Migrate(MigrateCommand),

    /// Revert staged changes, stage a product and configure it
    Configure(ConfigureCommand),

    /// Print the staged manifest of a product as YAML
    RenderManifest(RenderManifestCommand),
}

impl Cli {
    /// Log filter implied by the global flags, or `None` to defer to `RUST_LOG`.
    #[must_use]
    pub fn log_level(&self) -> Option<&'static str> {
        if self.verbose {
            Some("tile_harness=debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }

    /// Installs the tracing subscriber. Logs go to stderr so command output
    /// on stdout stays machine readable.
    pub fn init_logging(&self) {
        let filter = match self.log_level() {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tile_harness=info")),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Runs the selected subcommand.
    pub fn execute(self) -> Result<()> {
        self.init_logging();

        match self.command {
            Commands::Migrate(cmd) => cmd.execute(),
            Commands::Configure(cmd) => cmd.execute(),
            Commands::RenderManifest(cmd) => cmd.execute(),
        }
    }
}
