//! Catalog status: table counts plus the not-available listing.

use tokio::runtime::Runtime;

use super::{Cli, load_config};
use crate::catalog;

/// Print catalog counts and every not-available entry.
pub fn cmd_status(rt: &Runtime, cli: &Cli) -> anyhow::Result<()> {
    rt.block_on(async {
        let config = load_config(cli);
        let pool = catalog::init_db(&config.db_url()).await?;

        let counts = catalog::catalog_counts(&pool).await?;
        println!("movies:        {}", counts.movies);
        println!("tv shows:      {}", counts.shows);
        println!("episodes:      {}", counts.episodes);
        println!("albums:        {}", counts.albums);
        println!("songs:         {}", counts.songs);
        println!("not available: {}", counts.not_available);

        let entries = catalog::list_not_available(&pool).await?;
        if !entries.is_empty() {
            println!("\nnot-available paths:");
            for entry in entries {
                println!("  [{}] {}", entry.kind, entry.fs_path);
            }
        }
        Ok(())
    })
}
