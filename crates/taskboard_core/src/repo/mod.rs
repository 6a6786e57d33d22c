//! Storage medium abstractions and implementations.
//!
//! # Responsibility
//! - Define the raw key-value contract used for snapshot persistence.
//! - Isolate SQLite and file-system details from the services.

pub mod snapshot_repo;
