//! Habit document collections.
//!
//! A [`HabitStore`] is the persistence collaborator behind the repository. It owns identity
//! assignment: `insert` stamps a fresh [`HabitId`] and a `createdAt` from a
//! [`habit_uuid::CreationClock`]. Documents are addressed by exact id for update and delete,
//! and listed by full scan sorted newest first.
//!
//! Single-document writes are atomic, including the read-merge-write of a partial update.
//! Nothing spans documents.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::config::{CoreConfig, StoreKind};
use crate::habit::{Habit, HabitDraft, HabitPatch};
use crate::HabitResult;
use habit_uuid::HabitId;
use std::sync::Arc;

pub trait HabitStore: Send + Sync {
    /// Inserts a new document, assigning its `id` and `createdAt`.
    fn insert(&self, draft: HabitDraft) -> HabitResult<Habit>;

    /// Returns every document, newest `createdAt` first.
    fn find_all(&self) -> HabitResult<Vec<Habit>>;

    fn find_by_id(&self, id: &HabitId) -> HabitResult<Option<Habit>>;

    /// Merges `patch` into the document and writes it back, all under the store's write lock,
    /// so concurrent partial updates to different fields never revert each other. Returns
    /// `None` if no such document exists.
    fn update(&self, id: &HabitId, patch: HabitPatch) -> HabitResult<Option<Habit>>;

    /// Removes the document. Returns `false` if no such document existed.
    fn delete_by_id(&self, id: &HabitId) -> HabitResult<bool>;
}

/// Opens the store selected by `cfg`.
///
/// # Errors
///
/// Returns an error if the file store's directory cannot be created or scanned.
pub fn open_store(cfg: &CoreConfig) -> HabitResult<Arc<dyn HabitStore>> {
    match cfg.store_kind() {
        StoreKind::Memory => {
            tracing::info!("using in-memory habit store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreKind::File => {
            let dir = cfg.habits_dir();
            tracing::info!("using file habit store at {}", dir.display());
            Ok(Arc::new(FileStore::open(dir)?))
        }
    }
}

/// Sorts newest first. Ties (only possible across store instances) fall back to id order so
/// the listing is still deterministic.
pub(crate) fn sort_newest_first(habits: &mut [Habit]) {
    habits.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
