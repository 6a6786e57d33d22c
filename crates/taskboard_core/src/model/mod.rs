//! Entity model for the task board.
//!
//! # Responsibility
//! - Define boards, lists, cards, checklists and the global label/member
//!   catalogs.
//! - Normalize loaded JSON into the canonical shape.
//! - Provide the seeded default snapshot.
//!
//! # Invariants
//! - Ids are opaque strings, unique within their entity class and never
//!   reused.
//! - Cards reference labels and members by id only.

pub mod board;
pub mod catalog;
pub mod normalize;
pub mod seed;
pub mod snapshot;

use uuid::Uuid;

/// Generates a fresh opaque entity id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
