//! The reconciliation daemon: watch the roots, reconcile on every change.

use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing::{info, warn};

use super::{Cli, build_engine, collect_snapshot, load_config};
use crate::engine::Engine;
use crate::watch::{LibraryWatcher, WatchEvent, scan_dir};

/// Run the daemon until Ctrl-C.
///
/// Wiring: initial scan seeds the engine and flips it ready; watcher events
/// mutate the live set (each one scheduling a coalesced sync); the pump
/// task drains triggers one pass at a time.
pub fn cmd_watch(rt: &Runtime, cli: &Cli) -> anyhow::Result<()> {
    rt.block_on(async {
        let config = load_config(cli);
        let roots = config.media_roots()?;
        let (engine, pump) = build_engine(&config).await?;

        let (watcher, events) =
            LibraryWatcher::new(&roots).map_err(|e| crate::error::Error::watch(e.to_string()))?;

        let pump_task = tokio::spawn(pump.run());

        // Scan after the watcher is registered so files landing mid-scan
        // are seen by one side or the other, never missed by both.
        println!("Scanning library roots...");
        let snapshot = collect_snapshot(&roots).await;
        println!(
            "Initial scan complete: {} media files. Watching for changes.",
            snapshot.len()
        );
        engine.mark_ready(snapshot);

        // Forward watcher events to the engine off the async runtime;
        // crossbeam recv blocks.
        let event_engine = Arc::clone(&engine);
        let event_roots = roots.clone();
        let forwarder = tokio::task::spawn_blocking(move || {
            while let Ok(event) = events.recv() {
                match event {
                    WatchEvent::Created(path) => {
                        event_engine.path_added(&path.to_string_lossy());
                    }
                    WatchEvent::Removed(path) => {
                        event_engine.path_removed(&path.to_string_lossy());
                    }
                    WatchEvent::DirCreated(path) => {
                        // A directory moved in can carry files that never
                        // get individual create events
                        for file in scan_dir(&path, &event_roots) {
                            event_engine.path_added(&file);
                        }
                    }
                    WatchEvent::Error(e) => {
                        warn!(target: "watch", error = %e, "Watcher reported an error");
                    }
                }
            }
            info!(target: "watch", "Event channel closed");
        });

        println!("Press Ctrl+C to stop.");
        tokio::signal::ctrl_c().await?;
        info!(target: "watch", "Shutting down");

        // Dropping the watcher closes the event channel, which ends the
        // forwarder; aborting the pump ends any wait for triggers.
        drop(watcher);
        let _ = forwarder.await;
        pump_task.abort();

        report_final_state(&engine).await;
        Ok(())
    })
}

async fn report_final_state(engine: &Engine) {
    match engine.list_not_available().await {
        Ok(entries) if !entries.is_empty() => {
            println!("{} path(s) remain not-available:", entries.len());
            for entry in entries {
                println!("  [{}] {}", entry.kind, entry.fs_path);
            }
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Could not read not-available registry"),
    }
}
