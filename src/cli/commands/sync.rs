//! One-shot reconciliation pass.

use tokio::runtime::Runtime;

use super::{Cli, build_engine, collect_snapshot, load_config, print_report};

/// Scan the roots, run a single sync pass, and print the report.
pub fn cmd_sync(rt: &Runtime, cli: &Cli) -> anyhow::Result<()> {
    rt.block_on(async {
        let config = load_config(cli);
        let roots = config.media_roots()?;
        let (engine, _pump) = build_engine(&config).await?;

        println!("Scanning library roots...");
        let snapshot = collect_snapshot(&roots).await;
        println!("Found {} media files on disk", snapshot.len());

        engine.mark_ready(snapshot);
        let report = engine.sync_now().await?;
        print_report(&report);
        Ok(())
    })
}
