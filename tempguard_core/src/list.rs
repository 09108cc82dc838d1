//! Self-refreshing list cache
//!
//! `ListCache` is the engine behind both detectors. A refresh cycle fetches
//! every source, normalizes the entries into a candidate set and then either
//! promotes it (when it is larger than the acceptance threshold) or falls
//! back to the durable snapshot.
//!
//! The canonical set sits behind an `ArcSwap`: it is only ever replaced as a
//! whole, and readers never take a lock. Refresh cycles are serialized by a
//! single-flight mutex:
//! - scheduled refreshes `try_lock` and skip when a cycle is already running
//! - cold queries wait for the running cycle and only start their own if none
//!   completed while they waited

use crate::error::SourceError;
use crate::fetch::ListFetcher;
use crate::snapshot::SnapshotStore;
use crate::source::{Source, Trust};
use arc_swap::ArcSwap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// What a cache stores and how raw entries become canonical ones
pub trait EntryKind: Send + Sync + 'static {
    /// Short label used in logs
    fn label(&self) -> &'static str;

    /// Canonicalize a raw entry from a source, `None` if malformed
    fn normalize(&self, raw: &str) -> Option<String>;

    /// Whether an entry from a weak source is corroborated
    fn admit_weak(&self, _entry: &str) -> bool {
        false
    }

    /// Canonicalize an entry read back from the snapshot
    fn restore(&self, stored: &str) -> Option<String> {
        self.normalize(stored)
    }
}

/// Result of one refresh cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Candidate set accepted and now canonical
    Promoted { entries: usize },
    /// Candidate set rejected, canonical set reloaded from the snapshot
    RestoredFromSnapshot { entries: usize },
    /// Candidate set rejected and no usable snapshot; canonical set unchanged
    SnapshotUnavailable,
    /// Another cycle was already running
    Skipped,
}

/// Per-source outcome of candidate collection
#[derive(Debug)]
pub enum SourceReport {
    Fetched {
        source: String,
        trust: Trust,
        seen: usize,
        admitted: usize,
    },
    Unavailable {
        source: String,
        error: SourceError,
    },
}

/// Candidate set built from the sources, with diagnostics
#[derive(Debug)]
pub struct Candidates {
    pub entries: HashSet<String>,
    pub reports: Vec<SourceReport>,
}

pub struct ListCache<K: EntryKind> {
    kind: K,
    sources: Vec<Source>,
    fetcher: Arc<dyn ListFetcher>,
    store: SnapshotStore,
    /// Candidate sets must be strictly larger than this to be promoted
    min_entries: usize,
    entries: ArcSwap<HashSet<String>>,
    ready: AtomicBool,
    refresh_lock: Mutex<()>,
    /// Completed refresh cycles, whatever their outcome
    cycles: AtomicU64,
}

impl<K: EntryKind> ListCache<K> {
    pub fn new(
        kind: K,
        sources: Vec<Source>,
        fetcher: Arc<dyn ListFetcher>,
        store: SnapshotStore,
        min_entries: usize,
    ) -> Self {
        Self {
            kind,
            sources,
            fetcher,
            store,
            min_entries,
            entries: ArcSwap::from_pointee(HashSet::new()),
            ready: AtomicBool::new(false),
            refresh_lock: Mutex::new(()),
            cycles: AtomicU64::new(0),
        }
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Whether a promotion or snapshot load has happened
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Number of completed refresh cycles
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Acquire)
    }

    /// Current canonical set
    pub fn entries(&self) -> Arc<HashSet<String>> {
        self.entries.load_full()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.load().contains(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run a refresh cycle unless one is already in flight
    pub async fn refresh(&self) -> RefreshOutcome {
        let Ok(_guard) = self.refresh_lock.try_lock() else {
            tracing::debug!("{} refresh already in flight, skipping", self.kind.label());
            return RefreshOutcome::Skipped;
        };
        self.run_cycle().await
    }

    /// Make sure the cache has been through at least one cycle.
    ///
    /// A cold caller waits for at most one cycle: if another cycle completes
    /// while it waits for the lock, it does not start another even when that
    /// cycle left the cache cold.
    pub async fn ensure_ready(&self) {
        if self.is_ready() {
            return;
        }

        let seen = self.cycles();
        let _guard = self.refresh_lock.lock().await;
        if self.is_ready() || self.cycles() != seen {
            return;
        }

        tracing::info!("{} cache is cold, refreshing before answering", self.kind.label());
        self.run_cycle().await;
    }

    /// Fetch every source and build a candidate set.
    ///
    /// Strong sources are read first, then weak sources whose entries are
    /// only kept when `EntryKind::admit_weak` accepts them.
    pub async fn collect_candidates(&self) -> Candidates {
        let mut entries = HashSet::new();
        let mut reports = Vec::with_capacity(self.sources.len());

        let ordered = self
            .sources
            .iter()
            .filter(|s| s.trust == Trust::Strong)
            .chain(self.sources.iter().filter(|s| s.trust == Trust::Weak));

        for source in ordered {
            let raw = self
                .fetcher
                .fetch(&source.url)
                .await
                .and_then(|body| source.format.raw_entries(&source.url, &body));

            let raw = match raw {
                Ok(raw) => raw,
                Err(error) => {
                    tracing::warn!("{} source {} unavailable: {}", self.kind.label(), source.name, error);
                    reports.push(SourceReport::Unavailable {
                        source: source.name.clone(),
                        error,
                    });
                    continue;
                }
            };

            let seen = raw.len();
            let mut admitted = 0;
            for entry in raw.iter().filter_map(|r| self.kind.normalize(r)) {
                if source.trust == Trust::Weak && !self.kind.admit_weak(&entry) {
                    continue;
                }
                entries.insert(entry);
                admitted += 1;
            }

            tracing::debug!(
                "{} source {} ({}): {} lines, {} admitted",
                self.kind.label(),
                source.name,
                source.trust.as_str(),
                seen,
                admitted
            );
            reports.push(SourceReport::Fetched {
                source: source.name.clone(),
                trust: source.trust,
                seen,
                admitted,
            });
        }

        Candidates { entries, reports }
    }

    /// Caller must hold `refresh_lock`
    async fn run_cycle(&self) -> RefreshOutcome {
        let candidates = self.collect_candidates().await;

        let outcome = if candidates.entries.len() > self.min_entries {
            self.promote(candidates.entries).await
        } else {
            tracing::warn!(
                "{} candidate set has {} entries (need more than {}), falling back to snapshot",
                self.kind.label(),
                candidates.entries.len(),
                self.min_entries
            );
            self.restore_from_snapshot().await
        };

        self.cycles.fetch_add(1, Ordering::AcqRel);
        outcome
    }

    async fn promote(&self, candidate: HashSet<String>) -> RefreshOutcome {
        let count = candidate.len();
        let next = Arc::new(candidate);

        self.entries.store(next.clone());
        self.ready.store(true, Ordering::Release);
        tracing::info!("{} promoted {} entries", self.kind.label(), count);

        if let Err(e) = self.store.save(&next).await {
            tracing::warn!("{} snapshot not saved: {}", self.kind.label(), e);
        }

        RefreshOutcome::Promoted { entries: count }
    }

    async fn restore_from_snapshot(&self) -> RefreshOutcome {
        match self.store.load().await {
            Ok(stored) => {
                let restored: HashSet<String> = stored
                    .iter()
                    .filter_map(|entry| self.kind.restore(entry))
                    .collect();
                let count = restored.len();

                self.entries.store(Arc::new(restored));
                self.ready.store(true, Ordering::Release);
                tracing::info!("{} restored {} entries from snapshot", self.kind.label(), count);

                RefreshOutcome::RestoredFromSnapshot { entries: count }
            }
            Err(e) if e.is_missing() => {
                tracing::warn!("{} has no snapshot yet at {}", self.kind.label(), self.store.path().display());
                RefreshOutcome::SnapshotUnavailable
            }
            Err(e) => {
                tracing::warn!("{} snapshot unusable: {}", self.kind.label(), e);
                RefreshOutcome::SnapshotUnavailable
            }
        }
    }
}
