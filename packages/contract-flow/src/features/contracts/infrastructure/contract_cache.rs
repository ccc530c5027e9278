//! Validated Contract Cache
//!
//! Caches validated contracts per declaration so every call site of a
//! function reuses one `Arc<ValidatedContract>`.
//!
//! - Keyed by `DeclId`, tagged with the declaration revision
//! - A newer revision replaces the slot (rebuild, never mutate)
//! - At most one validation in flight per declaration: concurrent callers
//!   block on the slot's `OnceCell` and reuse the winner's result
//! - A cancelled validation leaves the slot empty

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;

use crate::features::cancellation::{CancellableResult, Cancelled};
use crate::features::contracts::domain::ContractDeclaration;
use crate::features::diagnostics::Diagnostic;
use crate::shared::models::DeclId;

/// Default number of pre-allocated slots
const CONTRACT_CACHE_CAPACITY: usize = 1_024;

/// Published validation result (immutable, shared)
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedContract {
    pub contract: ContractDeclaration,
    pub diagnostics: Vec<Diagnostic>,
    pub revision: u64,
}

#[derive(Debug)]
struct CacheSlot {
    revision: u64,
    cell: OnceCell<Arc<ValidatedContract>>,
}

impl CacheSlot {
    fn new(revision: u64) -> Self {
        Self {
            revision,
            cell: OnceCell::new(),
        }
    }
}

/// Thread-safe, single-flight contract cache
#[derive(Debug)]
pub struct ContractCache {
    slots: DashMap<DeclId, Arc<CacheSlot>>,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

impl ContractCache {
    pub fn new() -> Self {
        Self::with_capacity(CONTRACT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: DashMap::with_capacity(capacity),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    /// Return the cached contract for `decl` at `revision`, or run `validate`.
    ///
    /// `revision` must change whenever anything the validation reads changes,
    /// the enclosing scope frames included; the session passes the newest
    /// revision of the declaration and its enclosing declarations.
    ///
    /// `validate` runs at most once per (decl, revision) across threads.
    /// If it fails with `Cancelled`, nothing is published and the next
    /// caller validates again.
    pub fn get_or_validate<F>(
        &self,
        decl: DeclId,
        revision: u64,
        validate: F,
    ) -> CancellableResult<Arc<ValidatedContract>>
    where
        F: FnOnce() -> Result<ValidatedContract, Cancelled>,
    {
        let Some(slot) = self.slot_for(decl, revision) else {
            // Request for an older revision than the one cached: answer it
            // without publishing.
            self.misses.fetch_add(1, Ordering::Relaxed);
            return validate().map(Arc::new);
        };

        if let Some(cached) = slot.cell.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(cached));
        }

        let mut ran = false;
        let result = slot.cell.get_or_try_init(|| {
            ran = true;
            validate().map(Arc::new)
        });
        if ran {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }

        match result {
            Ok(published) => {
                tracing::trace!(decl = %decl, revision, ran, "contract cache lookup");
                Ok(Arc::clone(published))
            }
            Err(cancelled) => {
                tracing::debug!(decl = %decl, revision, "contract validation cancelled; nothing cached");
                Err(cancelled)
            }
        }
    }

    /// Slot for (decl, revision). `None` when a newer revision is cached.
    ///
    /// The shard guard is released before returning, so validation never
    /// runs while holding a map lock.
    fn slot_for(&self, decl: DeclId, revision: u64) -> Option<Arc<CacheSlot>> {
        let mut entry = self
            .slots
            .entry(decl)
            .or_insert_with(|| Arc::new(CacheSlot::new(revision)));
        if entry.revision < revision {
            *entry = Arc::new(CacheSlot::new(revision));
            self.invalidations.fetch_add(1, Ordering::Relaxed);
        } else if entry.revision > revision {
            return None;
        }
        Some(Arc::clone(&entry))
    }

    /// Published contract for `decl`, any revision
    pub fn get(&self, decl: DeclId) -> Option<Arc<ValidatedContract>> {
        let slot = self.slots.get(&decl).map(|s| Arc::clone(&s))?;
        slot.cell.get().cloned()
    }

    /// Drop the entry for `decl`
    pub fn invalidate(&self, decl: DeclId) -> bool {
        let removed = self.slots.remove(&decl).is_some();
        if removed {
            self.invalidations.fetch_add(1, Ordering::Relaxed);
        }
        removed
    }

    pub fn clear(&self) {
        self.slots.clear();
    }

    /// Number of published contracts
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.cell.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}

impl Default for ContractCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
