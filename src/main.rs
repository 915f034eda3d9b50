//! Media Minder - keeps a media catalog in sync with the filesystem.
//!
//! Watches the configured movie, TV, and music roots, enriches new files
//! with external metadata, and reconciles the catalog so it always reflects
//! what is on disk. Files whose metadata lookup fails are flagged
//! not-available instead of being silently dropped.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod diff;
pub mod engine;
pub mod enrichment;
pub mod error;
pub mod model;
pub mod roots;
#[cfg(test)]
pub mod test_utils;
pub mod watch;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("media_minder=info".parse().unwrap()))
        .init();

    cli::run_command(&args)
}
