//! Core use-case services.
//!
//! # Responsibility
//! - Make snapshots durable through a storage medium.
//! - Give hosting layers one place to hold the current snapshot and apply
//!   intents.

pub mod persistence_gateway;
pub mod session;
