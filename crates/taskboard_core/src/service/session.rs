//! Board session: holds the current snapshot for a hosting layer.
//!
//! # Responsibility
//! - Own the "current snapshot" value and the persistence gateway.
//! - Apply one intent at a time and persist the result.
//!
//! # Invariants
//! - Intents run synchronously, one after another; each persisted snapshot
//!   is causally after its predecessor.
//! - Unchanged results are not written again.
//! - A failed write keeps the new in-memory snapshot; the next successful
//!   save supersedes it (last write wins).

use crate::model::snapshot::Snapshot;
use crate::mutation::ValidationError;
use crate::repo::snapshot_repo::{SnapshotStore, StoreError};
use crate::service::persistence_gateway::PersistenceGateway;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of a session-applied intent.
#[derive(Debug)]
pub enum SessionError {
    /// Intent was malformed; the snapshot is unchanged.
    Validation(ValidationError),
    /// Snapshot changed in memory but could not be persisted.
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValidationError> for SessionError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Current snapshot plus the gateway that makes it durable.
pub struct BoardSession<S: SnapshotStore> {
    gateway: PersistenceGateway<S>,
    current: Snapshot,
}

impl<S: SnapshotStore> BoardSession<S> {
    /// Loads the stored snapshot (or the seed) from `store`.
    pub fn open(store: S) -> Self {
        let gateway = PersistenceGateway::new(store);
        let current = gateway.load();
        Self { gateway, current }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.current
    }

    pub fn gateway(&self) -> &PersistenceGateway<S> {
        &self.gateway
    }

    /// Re-reads the medium, discarding the in-memory snapshot.
    pub fn reload(&mut self) {
        self.current = self.gateway.load();
    }

    /// Applies an infallible intent returning a new snapshot.
    pub fn apply(
        &mut self,
        intent: impl FnOnce(&Snapshot) -> Snapshot,
    ) -> Result<(), SessionError> {
        self.apply_with(|snapshot| (intent(snapshot), ()))
    }

    /// Applies an intent that also yields a value (e.g. a created id).
    pub fn apply_with<T>(
        &mut self,
        intent: impl FnOnce(&Snapshot) -> (Snapshot, T),
    ) -> Result<T, SessionError> {
        let (next, output) = intent(&self.current);
        self.replace(next)?;
        Ok(output)
    }

    /// Applies an intent that may reject malformed input.
    pub fn try_apply(
        &mut self,
        intent: impl FnOnce(&Snapshot) -> Result<Snapshot, ValidationError>,
    ) -> Result<(), SessionError> {
        let next = intent(&self.current)?;
        self.replace(next)
    }

    fn replace(&mut self, next: Snapshot) -> Result<(), SessionError> {
        if next == self.current {
            return Ok(());
        }
        self.current = next;
        self.gateway.save(&self.current)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardSession, SessionError};
    use crate::model::catalog::{Label, LabelColor};
    use crate::mutation::board_ops::{create_board, rename_list};
    use crate::mutation::catalog_ops::create_label;
    use crate::repo::snapshot_repo::{MemorySnapshotStore, SnapshotStore};

    #[test]
    fn applied_intents_are_persisted() {
        let mut session = BoardSession::open(MemorySnapshotStore::default());
        let board_id = session
            .apply_with(|snapshot| create_board(snapshot, "Roadmap", None))
            .unwrap();

        let stored = session.gateway().store().read_raw().unwrap().unwrap();
        assert!(stored.contains(&board_id));

        session.reload();
        assert!(session.snapshot().board(&board_id).is_some());
    }

    #[test]
    fn validation_failure_leaves_snapshot_untouched() {
        let mut session = BoardSession::open(MemorySnapshotStore::default());
        let before = session.snapshot().clone();

        let blank = Label::new(" ", LabelColor::default());
        let err = session
            .try_apply(|snapshot| create_label(snapshot, &blank))
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert_eq!(session.snapshot(), &before);

        session
            .apply(|snapshot| rename_list(snapshot, "l2", "Doing"))
            .unwrap();
        assert_eq!(session.snapshot().list("l2").unwrap().title, "Doing");
    }
}
