//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `watch`: Run the reconciliation daemon
//! - `sync`: One reconciliation pass now
//! - `rebuild`: Force re-enrichment of everything on disk
//! - `status`: Catalog counts and the not-available listing

mod rebuild;
mod status;
mod sync;
mod watch;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

pub use rebuild::cmd_rebuild;
pub use status::cmd_status;
pub use sync::cmd_sync;
pub use watch::cmd_watch;

use crate::catalog;
use crate::config::{self, Config};
use crate::error::ResultExt;
use crate::engine::{Engine, SyncPump, SyncReport};
use crate::enrichment::{SpotifyClient, TmdbClient};
use crate::roots::MediaRoots;
use crate::watch::scan_roots;

/// Media Minder CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the config file (default: OS config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database path override
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Watch the library roots and reconcile the catalog on every change
    Watch,
    /// Run one reconciliation pass now
    Sync,
    /// Force re-enrichment of everything currently on disk
    Rebuild {
        /// Rebuild movies
        #[arg(long)]
        movies: bool,
        /// Rebuild TV episodes
        #[arg(long)]
        tv: bool,
        /// Rebuild music
        #[arg(long)]
        music: bool,
    },
    /// Show catalog counts and the not-available listing
    Status,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;

    match &cli.command {
        Commands::Watch => cmd_watch(&rt, cli),
        Commands::Sync => cmd_sync(&rt, cli),
        Commands::Rebuild { movies, tv, music } => cmd_rebuild(&rt, cli, *movies, *tv, *music),
        Commands::Status => cmd_status(&rt, cli),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Load config honoring the `--config` and `--db` overrides.
pub(crate) fn load_config(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    };
    if let Some(db) = &cli.db {
        config.database.path = db.clone();
    }
    config
}

/// Validate roots, open the database, and assemble the engine with the
/// real providers. Fatal on configuration errors.
pub(crate) async fn build_engine(config: &Config) -> anyhow::Result<(Arc<Engine>, SyncPump)> {
    let roots = config.media_roots()?;
    let pool = catalog::init_db(&config.db_url())
        .await
        .with_context(format!("opening catalog database {}", config.db_url()))?;

    if config.credentials.tmdb_api_key.is_none() {
        tracing::warn!("No TMDB API key configured; movie and TV lookups will fail");
    }
    if config.credentials.spotify_client_id.is_none() {
        tracing::warn!("No Spotify credentials configured; music lookups will fail");
    }

    let tmdb = Arc::new(TmdbClient::new(
        config.credentials.tmdb_api_key.clone().unwrap_or_default(),
    ));
    let spotify = Arc::new(SpotifyClient::new(
        config
            .credentials
            .spotify_client_id
            .clone()
            .unwrap_or_default(),
        config
            .credentials
            .spotify_client_secret
            .clone()
            .unwrap_or_default(),
    ));

    let (engine, pump) = Engine::new(pool, roots, tmdb.clone(), tmdb, spotify);
    Ok((engine, pump))
}

/// Drain the root scan into a snapshot, with progress output for big
/// libraries.
pub(crate) async fn collect_snapshot(roots: &MediaRoots) -> Vec<String> {
    use futures::StreamExt;
    use std::io::Write;

    let mut stream = std::pin::pin!(scan_roots(roots));
    let mut snapshot = Vec::new();
    while let Some(path) = stream.next().await {
        snapshot.push(path);
        if snapshot.len() % 500 == 0 {
            print!("\rScanned {} files...", snapshot.len());
            let _ = std::io::stdout().flush();
        }
    }
    if snapshot.len() >= 500 {
        println!();
    }
    snapshot
}

/// Print a pass report the way an operator wants to read it.
pub(crate) fn print_report(report: &SyncReport) {
    println!(
        "not available: {}, to insert: {}, to delete: {}, unchanged: {}",
        report.not_available.len(),
        report.to_insert.len(),
        report.to_delete.len(),
        report.unchanged
    );
    for path in &report.not_available {
        println!("  ? {path}");
    }
    for path in &report.to_insert {
        println!("  + {path}");
    }
    for path in &report.to_delete {
        println!("  - {path}");
    }
    println!(
        "inserted {}, flagged not-available {}, deleted {}",
        report.inserted, report.flagged, report.deleted
    );
}
