//! # Habit Core
//!
//! Core data operations for the habit tracker.
//!
//! This crate contains:
//! - The [`Habit`] document model and its input shapes ([`NewHabit`], [`HabitPatch`])
//! - The [`HabitStore`] collection abstraction with in-memory and file-backed backends
//! - The [`HabitRepository`] that enforces required fields on create and update
//! - The [`HabitFanout`] that pushes full snapshots to real-time subscribers
//!
//! **No API concerns**: HTTP routing, websocket sessions and wire envelopes belong in
//! `api-rest` and `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod fanout;
pub mod habit;
pub mod repository;
pub mod store;

pub use config::{CoreConfig, StoreKind};
pub use constants::{DEFAULT_FANOUT_CAPACITY, DEFAULT_HABIT_DATA_DIR};
pub use error::{HabitError, HabitResult};
pub use fanout::{HabitFanout, HabitSnapshot};
pub use habit::{Habit, HabitDraft, HabitPatch, NewHabit};
pub use habit_types::{NonEmptyText, TextError};
pub use habit_uuid::HabitId;
pub use repository::HabitRepository;
pub use store::{open_store, FileStore, HabitStore, MemoryStore};
