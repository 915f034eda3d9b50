//! Reconciliation engine: keeps the catalog in step with the filesystem.
//!
//! The engine owns the live path set (what the watcher currently sees on
//! disk) and drives every catalog mutation. A sync pass diffs the live set
//! against the catalog plus the not-available registry, enriches and
//! upserts new paths, and purges vanished ones.
//!
//! # Lifecycle
//!
//! The engine starts Initializing: watcher add/remove events mutate the
//! live set but do not trigger passes, so the initial-scan burst does not
//! cause one pass per file. [`Engine::mark_ready`] (fired once, on the
//! watcher's initial-scan-complete signal) seeds the live set and schedules
//! the first pass; from then on every event schedules a pass.
//!
//! # Concurrency
//!
//! At most one pass runs at a time (a tokio `Mutex` gate serializes
//! [`Engine::sync_now`] and [`Engine::rebuild`]). Triggers are posted to a
//! capacity-1 channel drained by [`SyncPump`]; a trigger arriving while a
//! pass is in flight coalesces into a single pending follow-up pass, so
//! mid-pass filesystem changes are picked up instead of lost.
//!
//! # Failure policy
//!
//! Inserts are fail-fast per media kind: a provider or store error abandons
//! the rest of that kind's batch for this pass (the paths stay in the next
//! diff's insert set). A NotFound outcome is not an error: the path is
//! recorded as not-available and the batch continues. Deletes are
//! best-effort: a failed delete is logged and the loop continues.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use sqlx::SqlitePool;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::catalog;
use crate::diff::snapshot_diff;
use crate::enrichment::domain::Lookup;
use crate::enrichment::{AlbumLookup, MovieLookup, TvLookup};
use crate::error::Result;
use crate::model::{MediaKind, NotAvailable};
use crate::roots::MediaRoots;

/// What one reconciliation pass saw and did.
///
/// Listings are sorted for stable output; nothing a pass computes is
/// silently swallowed.
#[derive(Debug, Default, Clone)]
pub struct SyncReport {
    /// Paths flagged not-available at pass start
    pub not_available: Vec<String>,
    /// Paths the diff selected for insertion
    pub to_insert: Vec<String>,
    /// Paths the diff selected for deletion
    pub to_delete: Vec<String>,
    /// Paths present in both catalog and filesystem
    pub unchanged: usize,
    /// Records successfully upserted this pass
    pub inserted: usize,
    /// Paths newly flagged not-available this pass
    pub flagged: usize,
    /// Paths purged from catalog tables this pass
    pub deleted: usize,
}

/// The reconciliation engine. Shared via `Arc`; all methods take `&self`.
pub struct Engine {
    pool: SqlitePool,
    roots: MediaRoots,
    movies: Arc<dyn MovieLookup>,
    tv: Arc<dyn TvLookup>,
    music: Arc<dyn AlbumLookup>,
    /// The live path set: what the watcher currently sees on disk.
    live: RwLock<HashSet<String>>,
    /// False until the watcher's initial scan completes.
    ready: AtomicBool,
    /// Serializes sync passes and rebuilds.
    pass_gate: tokio::sync::Mutex<()>,
    trigger_tx: mpsc::Sender<()>,
}

/// Drains the trigger channel, running one pass per trigger.
///
/// Run this on its own task in daemon mode. The capacity-1 channel means
/// any number of triggers arriving during a pass collapse into exactly one
/// follow-up pass.
pub struct SyncPump {
    engine: Arc<Engine>,
    rx: mpsc::Receiver<()>,
}

impl SyncPump {
    /// Run until the engine (and its trigger sender) is dropped.
    pub async fn run(mut self) {
        while self.rx.recv().await.is_some() {
            if let Err(e) = self.engine.sync_now().await {
                warn!(target: "engine::sync", error = %e, "Sync pass failed");
            }
        }
    }
}

impl Engine {
    /// Build an engine and its sync pump.
    pub fn new(
        pool: SqlitePool,
        roots: MediaRoots,
        movies: Arc<dyn MovieLookup>,
        tv: Arc<dyn TvLookup>,
        music: Arc<dyn AlbumLookup>,
    ) -> (Arc<Self>, SyncPump) {
        let (trigger_tx, rx) = mpsc::channel(1);
        let engine = Arc::new(Self {
            pool,
            roots,
            movies,
            tv,
            music,
            live: RwLock::new(HashSet::new()),
            ready: AtomicBool::new(false),
            pass_gate: tokio::sync::Mutex::new(()),
            trigger_tx,
        });
        let pump = SyncPump {
            engine: Arc::clone(&engine),
            rx,
        };
        (engine, pump)
    }

    /// Seed the live set from the watcher's initial snapshot and schedule
    /// the first pass. The Initializing -> Ready transition happens exactly
    /// once; later calls are ignored.
    pub fn mark_ready(&self, snapshot: impl IntoIterator<Item = String>) {
        if self.ready.swap(true, Ordering::SeqCst) {
            warn!(target: "engine", "mark_ready called twice, ignoring");
            return;
        }

        let mut live = self.live.write();
        for path in snapshot {
            if self.roots.classify(Path::new(&path)).is_some() {
                live.insert(path);
            }
        }
        let count = live.len();
        drop(live);

        info!(target: "engine", paths = count, "Initial scan complete, engine ready");
        self.schedule_sync();
    }

    /// Record a path that appeared on disk. Paths outside the library roots
    /// are silently ignored.
    pub fn path_added(&self, path: &str) {
        if self.roots.classify(Path::new(path)).is_none() {
            debug!(target: "engine", path, "Ignoring path outside library roots");
            return;
        }
        self.live.write().insert(path.to_string());
        if self.ready.load(Ordering::SeqCst) {
            self.schedule_sync();
        }
    }

    /// Record a path that vanished from disk.
    pub fn path_removed(&self, path: &str) {
        if self.roots.classify(Path::new(path)).is_none() {
            return;
        }
        self.live.write().remove(path);
        if self.ready.load(Ordering::SeqCst) {
            self.schedule_sync();
        }
    }

    /// Post a sync trigger. A full channel means a follow-up pass is
    /// already pending; the trigger coalesces into it.
    pub fn schedule_sync(&self) {
        let _ = self.trigger_tx.try_send(());
    }

    /// Run one reconciliation pass now. Serialized: a pass in flight is
    /// awaited, never raced.
    pub async fn sync_now(&self) -> Result<SyncReport> {
        let _gate = self.pass_gate.lock().await;
        self.run_pass().await
    }

    /// Force re-enrichment of everything currently on disk for the given
    /// kinds, ignoring the diff. Performs no deletions.
    pub async fn rebuild(&self, kinds: &[MediaKind]) -> Result<SyncReport> {
        let _gate = self.pass_gate.lock().await;

        let live = self.live.read().clone();
        let mut report = SyncReport {
            to_insert: sorted(live.iter().cloned()),
            ..SyncReport::default()
        };

        for kind in kinds {
            let batch = self.partition(&live, *kind);
            info!(target: "engine::rebuild", kind = %kind, count = batch.len(), "Rebuilding");
            self.insert_batch(*kind, &batch, &mut report).await;
        }

        info!(
            target: "engine::rebuild",
            inserted = report.inserted,
            flagged = report.flagged,
            "Rebuild complete"
        );
        Ok(report)
    }

    /// The not-available registry listing.
    pub async fn list_not_available(&self) -> Result<Vec<NotAvailable>> {
        Ok(catalog::list_not_available(&self.pool).await?)
    }

    /// One diff -> enrich -> upsert/delete cycle over a stable snapshot of
    /// the live set. Changes landing mid-pass are handled by the follow-up
    /// pass their trigger schedules.
    async fn run_pass(&self) -> Result<SyncReport> {
        let live = self.live.read().clone();

        let not_available = catalog::list_not_available_paths(&self.pool).await?;
        let catalog_known = catalog::list_catalog_paths(&self.pool).await?;

        let outcome = snapshot_diff(&live, &catalog_known, &not_available);

        let mut report = SyncReport {
            not_available: sorted(not_available.iter().cloned()),
            to_insert: sorted(outcome.to_insert.iter().cloned()),
            to_delete: sorted(outcome.to_delete.iter().cloned()),
            unchanged: outcome.unchanged.len(),
            ..SyncReport::default()
        };

        info!(
            target: "engine::sync",
            not_available = report.not_available.len(),
            to_insert = report.to_insert.len(),
            to_delete = report.to_delete.len(),
            unchanged = report.unchanged,
            "Computed snapshot diff"
        );
        debug!(
            target: "engine::sync",
            not_available = ?report.not_available,
            to_insert = ?report.to_insert,
            to_delete = ?report.to_delete,
            "Diff listings"
        );

        for kind in MediaKind::ALL {
            let batch = self.partition(&outcome.to_insert, kind);
            if !batch.is_empty() {
                self.insert_batch(kind, &batch, &mut report).await;
            }
        }

        let to_delete = report.to_delete.clone();
        self.delete_pass(&to_delete, &mut report).await;

        info!(
            target: "engine::sync",
            inserted = report.inserted,
            flagged = report.flagged,
            deleted = report.deleted,
            "Sync pass complete"
        );
        Ok(report)
    }

    /// Paths of one media kind, per the root the path falls under.
    fn partition(&self, paths: &HashSet<String>, kind: MediaKind) -> Vec<String> {
        sorted(
            paths
                .iter()
                .filter(|p| self.roots.classify(Path::new(p)) == Some(kind))
                .cloned(),
        )
    }

    /// Enrich and upsert one kind's insert batch.
    ///
    /// NotFound flags the path and continues; any provider or store error
    /// abandons the rest of the batch (retried next pass).
    async fn insert_batch(&self, kind: MediaKind, paths: &[String], report: &mut SyncReport) {
        for path in paths {
            let upsert = match self.lookup_and_upsert(kind, path).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(
                        target: "engine::sync",
                        kind = %kind,
                        path,
                        error = %e,
                        "Enrichment failed, abandoning the rest of this batch"
                    );
                    break;
                }
            };

            match upsert {
                BatchStep::Inserted => report.inserted += 1,
                BatchStep::Flagged => {
                    debug!(target: "engine::sync", kind = %kind, path, "No metadata match, flagged not-available");
                    report.flagged += 1;
                }
            }
        }
    }

    /// One path's lookup-then-upsert, dispatched by kind.
    async fn lookup_and_upsert(&self, kind: MediaKind, path: &str) -> Result<BatchStep> {
        let fs_path = Path::new(path);
        match kind {
            MediaKind::Movie => match self.movies.find_movie(fs_path).await? {
                Lookup::Found(movie) => {
                    catalog::upsert_movie(&self.pool, &movie).await?;
                    Ok(BatchStep::Inserted)
                }
                Lookup::NotFound => {
                    catalog::upsert_not_available(&self.pool, kind, path).await?;
                    Ok(BatchStep::Flagged)
                }
            },
            MediaKind::TvEpisode => match self.tv.find_show(fs_path).await? {
                Lookup::Found(show) => {
                    catalog::upsert_tv_show(&self.pool, &show).await?;
                    Ok(BatchStep::Inserted)
                }
                Lookup::NotFound => {
                    catalog::upsert_not_available(&self.pool, kind, path).await?;
                    Ok(BatchStep::Flagged)
                }
            },
            MediaKind::Song => match self.music.find_album(fs_path).await? {
                Lookup::Found(album) => {
                    catalog::upsert_album(&self.pool, &album).await?;
                    Ok(BatchStep::Inserted)
                }
                Lookup::NotFound => {
                    catalog::upsert_not_available(&self.pool, kind, path).await?;
                    Ok(BatchStep::Flagged)
                }
            },
        }
    }

    /// Purge vanished paths: the registry first (any kind), then the
    /// per-kind catalog tables. Every delete is best-effort; failures are
    /// logged and the loop continues.
    async fn delete_pass(&self, to_delete: &[String], report: &mut SyncReport) {
        for path in to_delete {
            if let Err(e) = catalog::delete_not_available(&self.pool, path).await {
                warn!(target: "engine::sync", path, error = %e, "Failed to purge not-available entry");
            }
        }

        for path in to_delete {
            let result = match self.roots.classify(Path::new(path)) {
                Some(MediaKind::Movie) => catalog::delete_movie_by_path(&self.pool, path).await,
                Some(MediaKind::TvEpisode) => {
                    catalog::delete_episode_by_path(&self.pool, path).await
                }
                Some(MediaKind::Song) => catalog::delete_song_by_path(&self.pool, path).await,
                None => continue,
            };
            match result {
                Ok(true) => report.deleted += 1,
                Ok(false) => {
                    debug!(target: "engine::sync", path, "No catalog row for vanished path")
                }
                Err(e) => {
                    warn!(target: "engine::sync", path, error = %e, "Failed to delete catalog row")
                }
            }
        }
    }
}

/// What happened to one path in an insert batch.
enum BatchStep {
    Inserted,
    Flagged,
}

fn sorted(paths: impl Iterator<Item = String>) -> Vec<String> {
    let mut v: Vec<String> = paths.collect();
    v.sort();
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::domain::{EnrichedAlbum, EnrichedMovie, EnrichedTvShow, EnrichmentError};
    use crate::enrichment::traits::mocks::MockProvider;
    use crate::test_utils::{sample_movie, temp_db};
    use tempfile::TempDir;

    struct Fixture {
        engine: Arc<Engine>,
        movies: Arc<MockProvider<EnrichedMovie>>,
        _pump: SyncPump,
        _dir: TempDir,
    }

    impl Fixture {
        fn pool(&self) -> &SqlitePool {
            &self.engine.pool
        }
    }

    async fn fixture(movies: MockProvider<EnrichedMovie>) -> Fixture {
        fixture_with(
            movies,
            MockProvider::<EnrichedTvShow>::new(),
            MockProvider::<EnrichedAlbum>::new(),
        )
        .await
    }

    async fn fixture_with(
        movies: MockProvider<EnrichedMovie>,
        tv: MockProvider<EnrichedTvShow>,
        music: MockProvider<EnrichedAlbum>,
    ) -> Fixture {
        let (pool, dir) = temp_db().await;
        let roots = MediaRoots::new("/m", "/t", "/a").unwrap();
        let movies = Arc::new(movies);
        let (engine, pump) = Engine::new(
            pool,
            roots,
            Arc::clone(&movies) as Arc<dyn MovieLookup>,
            Arc::new(tv),
            Arc::new(music),
        );
        Fixture {
            engine,
            movies,
            _pump: pump,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn test_new_movie_is_enriched_and_catalogued() {
        let f = fixture(MockProvider::new().found("/m/a.mkv", sample_movie(42, "/m/a.mkv"))).await;

        f.engine.mark_ready(vec!["/m/a.mkv".to_string()]);
        let report = f.engine.sync_now().await.unwrap();

        assert_eq!(report.to_insert, vec!["/m/a.mkv".to_string()]);
        assert_eq!(report.inserted, 1);

        let movie = catalog::get_movie_by_path(f.pool(), "/m/a.mkv")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(movie.tmdb_id, 42);

        let known = catalog::list_catalog_paths(f.pool()).await.unwrap();
        assert!(known.contains("/m/a.mkv"));
    }

    #[tokio::test]
    async fn test_not_found_flags_and_is_not_retried() {
        let f = fixture(MockProvider::new().not_found("/m/a.mkv")).await;

        f.engine.mark_ready(vec!["/m/a.mkv".to_string()]);
        let report = f.engine.sync_now().await.unwrap();
        assert_eq!(report.flagged, 1);
        assert_eq!(report.inserted, 0);

        let entries = f.engine.list_not_available().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].fs_path, "/m/a.mkv");
        assert_eq!(entries[0].kind, "movie");

        // second pass with unchanged filesystem: no retry storm
        let report = f.engine.sync_now().await.unwrap();
        assert!(report.to_insert.is_empty());
        assert_eq!(f.movies.call_count(), 1);
    }

    #[tokio::test]
    async fn test_sync_is_idempotent() {
        let f = fixture(MockProvider::new().found("/m/a.mkv", sample_movie(42, "/m/a.mkv"))).await;

        f.engine.mark_ready(vec!["/m/a.mkv".to_string()]);
        f.engine.sync_now().await.unwrap();
        let second = f.engine.sync_now().await.unwrap();

        assert!(second.to_insert.is_empty());
        assert!(second.to_delete.is_empty());
        assert_eq!(second.unchanged, 1);
    }

    #[tokio::test]
    async fn test_vanished_path_is_deleted() {
        let f = fixture(MockProvider::new().found("/m/a.mkv", sample_movie(42, "/m/a.mkv"))).await;

        f.engine.mark_ready(vec!["/m/a.mkv".to_string()]);
        f.engine.sync_now().await.unwrap();

        f.engine.path_removed("/m/a.mkv");
        let report = f.engine.sync_now().await.unwrap();

        assert_eq!(report.to_delete, vec!["/m/a.mkv".to_string()]);
        assert_eq!(report.deleted, 1);
        assert!(catalog::list_catalog_paths(f.pool()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_vanished_not_available_path_is_purged() {
        let f = fixture(MockProvider::new().not_found("/m/a.mkv")).await;

        f.engine.mark_ready(vec!["/m/a.mkv".to_string()]);
        f.engine.sync_now().await.unwrap();
        assert_eq!(f.engine.list_not_available().await.unwrap().len(), 1);

        // the flagged path disappears from disk; it was never catalogued
        // but must still be purged from the registry
        f.engine.path_removed("/m/a.mkv");
        let report = f.engine.sync_now().await.unwrap();

        assert_eq!(report.to_delete, vec!["/m/a.mkv".to_string()]);
        assert!(f.engine.list_not_available().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_double_remove_is_safe() {
        let f = fixture(MockProvider::new().found("/m/a.mkv", sample_movie(42, "/m/a.mkv"))).await;

        f.engine.mark_ready(vec!["/m/a.mkv".to_string()]);
        f.engine.sync_now().await.unwrap();

        f.engine.path_removed("/m/a.mkv");
        f.engine.path_removed("/m/a.mkv");
        let report = f.engine.sync_now().await.unwrap();
        assert_eq!(report.deleted, 1);

        // nothing left to delete; a further pass is clean
        let report = f.engine.sync_now().await.unwrap();
        assert!(report.to_delete.is_empty());
        assert_eq!(report.deleted, 0);
    }

    #[tokio::test]
    async fn test_provider_error_abandons_batch_until_next_pass() {
        // three movies; the middle one (in sorted order) fails
        let f = fixture(
            MockProvider::new()
                .found("/m/a.mkv", sample_movie(1, "/m/a.mkv"))
                .failing("/m/b.mkv", EnrichmentError::Network("timeout".to_string()))
                .found("/m/c.mkv", sample_movie(3, "/m/c.mkv")),
        )
        .await;

        f.engine.mark_ready(vec![
            "/m/a.mkv".to_string(),
            "/m/b.mkv".to_string(),
            "/m/c.mkv".to_string(),
        ]);
        let report = f.engine.sync_now().await.unwrap();

        // a committed before the failure; b and c abandoned
        assert_eq!(report.inserted, 1);
        let known = catalog::list_catalog_paths(f.pool()).await.unwrap();
        assert!(known.contains("/m/a.mkv"));
        assert!(!known.contains("/m/c.mkv"));

        // next pass retries the unprocessed remainder
        let report = f.engine.sync_now().await.unwrap();
        assert_eq!(
            report.to_insert,
            vec!["/m/b.mkv".to_string(), "/m/c.mkv".to_string()]
        );
    }

    #[tokio::test]
    async fn test_error_in_one_kind_does_not_stop_others() {
        let movies =
            MockProvider::new().failing("/m/a.mkv", EnrichmentError::Network("down".to_string()));
        let music = MockProvider::new()
            .found("/a/x/y/01 t.flac", crate::test_utils::sample_album("al", "/a/x/y/01 t.flac"));
        let f = fixture_with(movies, MockProvider::new(), music).await;

        f.engine.mark_ready(vec![
            "/m/a.mkv".to_string(),
            "/a/x/y/01 t.flac".to_string(),
        ]);
        let report = f.engine.sync_now().await.unwrap();

        // the movie batch died, the music batch still ran
        assert_eq!(report.inserted, 1);
        let known = catalog::list_catalog_paths(f.pool()).await.unwrap();
        assert!(known.contains("/a/x/y/01 t.flac"));
    }

    #[tokio::test]
    async fn test_paths_outside_roots_are_ignored() {
        let f = fixture(MockProvider::new()).await;

        f.engine.mark_ready(vec!["/elsewhere/a.mkv".to_string()]);
        f.engine.path_added("/elsewhere/b.mkv");
        let report = f.engine.sync_now().await.unwrap();

        assert!(report.to_insert.is_empty());
        assert_eq!(f.movies.call_count(), 0);
    }

    #[tokio::test]
    async fn test_events_before_ready_do_not_trigger_sync() {
        let f = fixture(MockProvider::new().found("/m/a.mkv", sample_movie(1, "/m/a.mkv"))).await;

        f.engine.path_added("/m/a.mkv");
        // no pass has run; nothing catalogued
        assert!(catalog::list_catalog_paths(f.pool()).await.unwrap().is_empty());

        // ready picks up the accumulated live set
        f.engine.mark_ready(Vec::new());
        let report = f.engine.sync_now().await.unwrap();
        assert_eq!(report.inserted, 1);
    }

    #[tokio::test]
    async fn test_rebuild_re_enriches_without_deleting() {
        let f = fixture(
            MockProvider::new()
                .found("/m/a.mkv", sample_movie(1, "/m/a.mkv"))
                .found("/m/b.mkv", sample_movie(2, "/m/b.mkv")),
        )
        .await;

        f.engine.mark_ready(vec!["/m/a.mkv".to_string(), "/m/b.mkv".to_string()]);
        f.engine.sync_now().await.unwrap();
        assert_eq!(f.movies.call_count(), 2);

        // rebuild hits the provider again for every live path, diff or not
        let report = f.engine.rebuild(&[MediaKind::Movie]).await.unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(f.movies.call_count(), 4);
        assert_eq!(report.deleted, 0);
    }

    #[tokio::test]
    async fn test_trigger_channel_coalesces() {
        let f = fixture(MockProvider::new()).await;

        // many triggers while nothing drains the channel: capacity 1 keeps
        // exactly one pending pass
        for _ in 0..10 {
            f.engine.schedule_sync();
        }
        // the pump would observe a single buffered trigger; draining it by
        // hand proves no backlog built up
        let mut rx = f._pump.rx;
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
