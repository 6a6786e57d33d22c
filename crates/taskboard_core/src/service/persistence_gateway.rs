//! Persistence gateway: the snapshot load/save round-trip.
//!
//! # Responsibility
//! - Serialize the whole snapshot into the storage medium.
//! - Load, normalize and, on absence or corruption, seed the snapshot.
//!
//! # Invariants
//! - `load` never fails: any read, parse or shape problem yields the seed.
//! - `load` right after `save(s)` returns a snapshot equal to `s`.
//! - Only metadata (sizes, counts, durations) is logged, never user text.

use crate::model::normalize::normalize_value_with_report;
use crate::model::seed::seed_snapshot;
use crate::model::snapshot::Snapshot;
use crate::repo::snapshot_repo::{SnapshotStore, StoreResult};
use log::{error, info, warn};
use serde_json::Value;
use std::time::Instant;

/// Load/save facade over one storage medium.
pub struct PersistenceGateway<S: SnapshotStore> {
    store: S,
}

impl<S: SnapshotStore> PersistenceGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Reads the stored snapshot.
    ///
    /// Absent or malformed content is replaced by the seeded default, which
    /// is written back. A medium read failure also returns the seed but
    /// leaves the stored value alone.
    pub fn load(&self) -> Snapshot {
        let started_at = Instant::now();
        let kind = self.store.kind();

        let raw = match self.store.read_raw() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=snapshot_load module=persistence status=fallback store={kind} reason=absent");
                return self.reseed();
            }
            Err(err) => {
                error!(
                    "event=snapshot_load module=persistence status=fallback store={kind} reason=read_failed error={err}"
                );
                return seed_snapshot();
            }
        };

        let value = match serde_json::from_str::<Value>(&raw) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) => {
                warn!(
                    "event=snapshot_load module=persistence status=fallback store={kind} reason=not_an_object bytes={}",
                    raw.len()
                );
                return self.reseed();
            }
            Err(err) => {
                warn!(
                    "event=snapshot_load module=persistence status=fallback store={kind} reason=parse_failed bytes={} line={} column={}",
                    raw.len(),
                    err.line(),
                    err.column()
                );
                return self.reseed();
            }
        };

        let (snapshot, report) = normalize_value_with_report(&value);
        info!(
            "event=snapshot_load module=persistence status=ok store={kind} duration_ms={} bytes={} boards={} cards={} generated_ids={} dropped_duplicates={} registered_catalog_entries={}",
            started_at.elapsed().as_millis(),
            raw.len(),
            snapshot.boards.len(),
            snapshot.card_count(),
            report.generated_ids,
            report.dropped_duplicates,
            report.registered_catalog_entries
        );
        snapshot
    }

    /// Serializes and stores the full snapshot.
    ///
    /// # Errors
    /// Returns the medium's failure; encoding itself cannot fail for
    /// snapshots built from the model types.
    pub fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let started_at = Instant::now();
        let kind = self.store.kind();
        let result = serde_json::to_string(snapshot)
            .map_err(Into::into)
            .and_then(|raw| self.store.write_raw(&raw).map(|()| raw.len()));

        match result {
            Ok(bytes) => {
                info!(
                    "event=snapshot_save module=persistence status=ok store={kind} duration_ms={} bytes={bytes} boards={}",
                    started_at.elapsed().as_millis(),
                    snapshot.boards.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=snapshot_save module=persistence status=error store={kind} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    fn reseed(&self) -> Snapshot {
        let seed = seed_snapshot();
        if self.save(&seed).is_err() {
            warn!("event=snapshot_seed module=persistence status=error store={} reason=write_failed", self.store.kind());
        }
        seed
    }
}
