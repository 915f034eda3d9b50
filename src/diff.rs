//! Snapshot diffing between the live filesystem and the catalog.
//!
//! Pure set algebra over path sets. Given what is on disk, what the catalog
//! already knows, and what previously failed enrichment, compute what to
//! insert and what to purge. No ordering guarantees; deterministic for
//! identical inputs.

use std::collections::HashSet;

/// The three derived sets of one reconciliation pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiffOutcome {
    /// On disk, not in the catalog, not previously flagged unavailable.
    pub to_insert: HashSet<String>,
    /// Known to the system (catalogued or flagged) but gone from disk.
    pub to_delete: HashSet<String>,
    /// In both the catalog and on disk. Reported, never acted upon.
    pub unchanged: HashSet<String>,
}

/// Diff the live path set against the catalog's known-path universe.
///
/// `not_available` paths are excluded from `to_insert` so failed
/// enrichments are not retried every pass, but they still count as "known"
/// for deletion: a flagged path that vanishes from disk lands in
/// `to_delete` and gets purged from the registry.
pub fn snapshot_diff(
    live: &HashSet<String>,
    catalog_known: &HashSet<String>,
    not_available: &HashSet<String>,
) -> DiffOutcome {
    let to_insert = live
        .iter()
        .filter(|p| !catalog_known.contains(*p) && !not_available.contains(*p))
        .cloned()
        .collect();

    let to_delete = catalog_known
        .union(not_available)
        .filter(|p| !live.contains(*p))
        .cloned()
        .collect();

    let unchanged = catalog_known.intersection(live).cloned().collect();

    DiffOutcome {
        to_insert,
        to_delete,
        unchanged,
    }
}
