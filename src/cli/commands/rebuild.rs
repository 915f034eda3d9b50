//! Bulk rebuild: force re-enrichment of everything on disk.

use tokio::runtime::Runtime;

use super::{Cli, build_engine, collect_snapshot, load_config};
use crate::model::MediaKind;

/// Re-enrich everything currently on disk for the selected kinds.
/// No flags selects all kinds. Performs no deletions.
pub fn cmd_rebuild(
    rt: &Runtime,
    cli: &Cli,
    movies: bool,
    tv: bool,
    music: bool,
) -> anyhow::Result<()> {
    let kinds: Vec<MediaKind> = if !movies && !tv && !music {
        MediaKind::ALL.to_vec()
    } else {
        let mut kinds = Vec::new();
        if movies {
            kinds.push(MediaKind::Movie);
        }
        if tv {
            kinds.push(MediaKind::TvEpisode);
        }
        if music {
            kinds.push(MediaKind::Song);
        }
        kinds
    };

    rt.block_on(async {
        let config = load_config(cli);
        let roots = config.media_roots()?;
        let (engine, _pump) = build_engine(&config).await?;

        println!("Scanning library roots...");
        let snapshot = collect_snapshot(&roots).await;
        println!("Found {} media files on disk", snapshot.len());

        engine.mark_ready(snapshot);
        let report = engine.rebuild(&kinds).await?;
        println!(
            "Rebuild complete: {} upserted, {} flagged not-available",
            report.inserted, report.flagged
        );
        Ok(())
    })
}
