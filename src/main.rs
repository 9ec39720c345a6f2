//! tile-harness CLI entry point
//!
//! Parses arguments, runs the selected command and prints failures with a
//! suggestion before exiting non-zero.

use anyhow::Result;
use clap::Parser;
use tile_harness::cli;
use tile_harness::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
