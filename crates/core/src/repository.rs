//! Typed habit operations over a [`HabitStore`].
//!
//! The repository is where required fields are enforced: `create` validates a [`NewHabit`],
//! `update` re-validates the merged document. Identifiers arrive as strings from the outside
//! and are parsed here, so a malformed id surfaces as [`HabitError::InvalidId`].

use crate::habit::{Habit, HabitPatch, NewHabit};
use crate::store::{HabitStore, MemoryStore};
use crate::{HabitError, HabitResult};
use habit_uuid::HabitId;
use std::sync::Arc;

#[derive(Clone)]
pub struct HabitRepository {
    store: Arc<dyn HabitStore>,
}

impl HabitRepository {
    pub fn new(store: Arc<dyn HabitStore>) -> Self {
        Self { store }
    }

    /// Repository over a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Validates `input` and inserts it.
    ///
    /// # Errors
    ///
    /// - `HabitError::Validation` if `name` or `category` is missing or blank; nothing is
    ///   written in that case.
    /// - Store errors if the document cannot be persisted.
    pub fn create(&self, input: NewHabit) -> HabitResult<Habit> {
        let draft = input.validate()?;
        let habit = self.store.insert(draft)?;
        tracing::debug!("created habit {}", habit.id);
        Ok(habit)
    }

    /// All habits, newest first. An empty collection is an empty list.
    pub fn list(&self) -> HabitResult<Vec<Habit>> {
        self.store.find_all()
    }

    /// Merges `patch` into the habit with the given id.
    ///
    /// # Errors
    ///
    /// - `HabitError::InvalidId` if `id` is not a canonical habit id.
    /// - `HabitError::NotFound` if no habit has that id (including one deleted concurrently).
    /// - `HabitError::Validation` if the patch blanks a required field.
    pub fn update(&self, id: &str, patch: HabitPatch) -> HabitResult<Habit> {
        let id = HabitId::parse(id)?;
        let updated = self
            .store
            .update(&id, patch)?
            .ok_or(HabitError::NotFound(id))?;
        tracing::debug!("updated habit {}", id);
        Ok(updated)
    }

    /// Deletes the habit with the given id. Deleting an id that does not exist succeeds.
    ///
    /// # Errors
    ///
    /// - `HabitError::InvalidId` if `id` is not a canonical habit id.
    /// - Store errors if the document exists but cannot be removed.
    pub fn delete(&self, id: &str) -> HabitResult<()> {
        let id = HabitId::parse(id)?;
        if self.store.delete_by_id(&id)? {
            tracing::debug!("deleted habit {}", id);
        } else {
            tracing::debug!("delete of absent habit {} ignored", id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileStore;
    use tempfile::TempDir;

    /// Runs `check` against both store backends.
    fn with_each_store(check: impl Fn(HabitRepository)) {
        check(HabitRepository::in_memory());

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::open(temp_dir.path()).expect("open file store");
        check(HabitRepository::new(Arc::new(store)));
    }

    fn health(name: &str) -> NewHabit {
        NewHabit::new(name, "Health").with_tags(["am"])
    }

    #[test]
    fn test_create_rejects_empty_required_fields_and_writes_nothing() {
        with_each_store(|repo| {
            repo.create(health("existing")).unwrap();

            for input in [
                NewHabit::new("", "Health"),
                NewHabit::new("Run", ""),
                NewHabit {
                    category: Some("Health".into()),
                    ..Default::default()
                },
            ] {
                let err = repo.create(input).unwrap_err();
                assert!(matches!(err, HabitError::Validation(_)), "got {err:?}");
            }

            assert_eq!(repo.list().unwrap().len(), 1);
        });
    }

    #[test]
    fn test_create_assigns_unique_id_and_creation_time() {
        with_each_store(|repo| {
            let before = chrono::Utc::now().timestamp_millis();
            let habit = repo.create(health("Run").completed(true)).unwrap();
            let after = chrono::Utc::now().timestamp_millis();

            let created = habit.created_at.timestamp_millis();
            assert!(before <= created && created <= after);
            assert!(habit.is_completed);

            let others: Vec<_> = (0..5)
                .map(|i| repo.create(health(&format!("h{i}"))).unwrap().id)
                .collect();
            assert!(!others.contains(&habit.id));
            let mut unique = others.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), others.len());
        });
    }

    #[test]
    fn test_list_is_newest_first() {
        with_each_store(|repo| {
            assert!(repo.list().unwrap().is_empty());

            for name in ["b", "a", "d", "c"] {
                repo.create(health(name)).unwrap();
            }

            let listed = repo.list().unwrap();
            let names: Vec<_> = listed.iter().map(|h| h.name.as_str()).collect();
            assert_eq!(names, ["c", "d", "a", "b"]);
            assert!(listed.windows(2).all(|w| w[0].created_at > w[1].created_at));
        });
    }

    #[test]
    fn test_update_missing_id_fails_and_changes_nothing() {
        with_each_store(|repo| {
            let habit = repo.create(health("Run")).unwrap();
            let missing = HabitId::new().to_string();

            let err = repo
                .update(
                    &missing,
                    HabitPatch {
                        name: Some("Walk".into()),
                        ..Default::default()
                    },
                )
                .unwrap_err();
            assert!(matches!(err, HabitError::NotFound(_)));
            assert_eq!(repo.list().unwrap(), vec![habit]);
        });
    }

    #[test]
    fn test_update_rejects_malformed_id() {
        let repo = HabitRepository::in_memory();
        let err = repo.update("not-an-id", HabitPatch::default()).unwrap_err();
        assert!(matches!(err, HabitError::InvalidId(_)));
    }

    #[test]
    fn test_partial_update_changes_only_category_and_is_idempotent() {
        with_each_store(|repo| {
            let habit = repo.create(health("Run")).unwrap();
            let patch = HabitPatch {
                category: Some("X".into()),
                ..Default::default()
            };

            let once = repo.update(&habit.id.to_string(), patch.clone()).unwrap();
            assert_eq!(once.category, "X");
            assert_eq!(once.name, habit.name);
            assert_eq!(once.tags, habit.tags);
            assert_eq!(once.id, habit.id);
            assert_eq!(once.created_at, habit.created_at);

            let twice = repo.update(&habit.id.to_string(), patch).unwrap();
            assert_eq!(twice, once);
            assert_eq!(repo.list().unwrap(), vec![once]);
        });
    }

    #[test]
    fn test_concurrent_updates_to_different_fields_both_land() {
        with_each_store(|repo| {
            for i in 0..100 {
                let habit = repo.create(health("Run")).unwrap();
                let id = habit.id.to_string();
                let barrier = Arc::new(std::sync::Barrier::new(2));

                let rename = {
                    let (repo, id, barrier) = (repo.clone(), id.clone(), barrier.clone());
                    std::thread::spawn(move || {
                        barrier.wait();
                        repo.update(
                            &id,
                            HabitPatch {
                                name: Some(format!("A{i}")),
                                ..Default::default()
                            },
                        )
                    })
                };
                let complete = {
                    let (repo, id, barrier) = (repo.clone(), id.clone(), barrier.clone());
                    std::thread::spawn(move || {
                        barrier.wait();
                        repo.update(
                            &id,
                            HabitPatch {
                                is_completed: Some(true),
                                ..Default::default()
                            },
                        )
                    })
                };
                rename.join().unwrap().unwrap();
                complete.join().unwrap().unwrap();

                let stored = repo
                    .list()
                    .unwrap()
                    .into_iter()
                    .find(|h| h.id == habit.id)
                    .unwrap();
                assert_eq!(stored.name, format!("A{i}").as_str(), "trial {i}");
                assert!(stored.is_completed, "trial {i}");
            }
        });
    }

    #[test]
    fn test_update_rejects_blanking_required_field() {
        with_each_store(|repo| {
            let habit = repo.create(health("Run")).unwrap();
            let err = repo
                .update(
                    &habit.id.to_string(),
                    HabitPatch {
                        name: Some("".into()),
                        ..Default::default()
                    },
                )
                .unwrap_err();
            assert!(matches!(err, HabitError::Validation(_)));
            assert_eq!(repo.list().unwrap(), vec![habit]);
        });
    }

    #[test]
    fn test_delete_is_idempotent_and_removes_exactly_one() {
        with_each_store(|repo| {
            let keep = repo.create(health("keep")).unwrap();
            let gone = repo.create(health("gone")).unwrap();

            repo.delete(&HabitId::new().to_string())
                .expect("deleting an absent id succeeds");
            assert_eq!(repo.list().unwrap().len(), 2);

            repo.delete(&gone.id.to_string()).unwrap();
            repo.delete(&gone.id.to_string()).unwrap();
            assert_eq!(repo.list().unwrap(), vec![keep]);
        });
    }

    #[test]
    fn test_delete_rejects_malformed_id() {
        let repo = HabitRepository::in_memory();
        assert!(matches!(
            repo.delete("../../etc"),
            Err(HabitError::InvalidId(_))
        ));
    }
}
