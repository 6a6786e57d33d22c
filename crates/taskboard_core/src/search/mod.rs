//! Filter/query layer over snapshots.
//!
//! # Responsibility
//! - Derive display views (filtered boards, board title matches,
//!   archived cards) from a snapshot without mutating it.

pub mod filter;
