//! Habit identity and creation-time assignment.
//!
//! Every habit document is keyed by a *canonical* UUID representation: **32 lowercase
//! hexadecimal characters** (no hyphens).
//!
//! This crate provides:
//! - [`HabitId`], a wrapper that *guarantees* the canonical format once constructed.
//! - Sharding logic that derives a document directory from an identifier.
//! - [`CreationClock`], which hands out strictly increasing `createdAt` timestamps.
//!
//! ## Canonical UUID form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! Externally supplied identifiers (path parameters, CLI arguments) must already be canonical.
//! Use [`HabitId::parse`] to validate them.
//!
//! ## Sharded directory layout
//! For a canonical UUID `u`, file-backed stores keep the document under:
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`

mod service;

pub use service::{CreationClock, HabitId, Uuid};

/// Error type for UUID operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for UUID operations.
pub type UuidResult<T> = Result<T, UuidError>;
