//! Core domain logic for the task board.
//! This crate is the single source of truth for board invariants; hosting
//! layers hold a snapshot and call into it for every change.

pub mod db;
pub mod logging;
pub mod model;
pub mod moves;
pub mod mutation;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::board::{Board, Card, CardPatch, Checklist, ChecklistItem, List};
pub use model::catalog::{Label, LabelColor, Member, PaletteColor};
pub use model::normalize::{normalize_snapshot, normalize_value};
pub use model::seed::seed_snapshot;
pub use model::snapshot::Snapshot;
pub use moves::{apply_drop, move_card, move_list, DropKind, DropLocation, DropResult};
pub use mutation::{MutationResult, ValidationError};
pub use repo::snapshot_repo::{
    JsonFileSnapshotStore, MemorySnapshotStore, SnapshotStore, SqliteSnapshotStore, StoreError,
    StoreResult,
};
pub use search::filter::{
    archived_cards, boards_matching, filter_board, CardStatus, DueBucket, FilterSpec,
};
pub use service::persistence_gateway::PersistenceGateway;
pub use service::session::{BoardSession, SessionError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
