//! File-backed habit collection.
//!
//! ## Storage Layout
//!
//! ```text
//! habits/
//!   <s1>/
//!     <s2>/
//!       <id>/
//!         habit.json
//! ```
//!
//! where `s1` and `s2` are the first four hex characters of the id. A document is rewritten by
//! writing `habit.json.tmp` next to it and renaming it over the original, so readers see either
//! the old or the new document, never a partial one.

use super::{sort_newest_first, HabitStore};
use crate::constants::{HABIT_DOCUMENT_FILENAME, HABIT_DOCUMENT_TMP_FILENAME};
use crate::habit::{Habit, HabitDraft, HabitPatch};
use crate::{HabitError, HabitResult};
use habit_uuid::{CreationClock, HabitId};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    clock: CreationClock,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Opens (creating if needed) a store rooted at `root`.
    ///
    /// Existing documents are scanned once so that new `createdAt` values sort after them.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::StorageDirCreation` if `root` cannot be created, or
    /// `HabitError::FileRead` if it cannot be scanned.
    pub fn open(root: impl Into<PathBuf>) -> HabitResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(HabitError::StorageDirCreation)?;

        let store = Self {
            root,
            clock: CreationClock::new(),
            write_lock: Mutex::new(()),
        };

        let existing = store.scan()?;
        for habit in &existing {
            store.clock.observe(habit.created_at);
        }
        tracing::debug!(
            "opened habit store at {} with {} documents",
            store.root.display(),
            existing.len()
        );

        Ok(store)
    }

    fn document_path(&self, id: &HabitId) -> PathBuf {
        id.sharded_dir(&self.root).join(HABIT_DOCUMENT_FILENAME)
    }

    fn lock(&self) -> HabitResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| HabitError::StoreUnavailable("file store lock poisoned".into()))
    }

    fn write_document(&self, habit: &Habit) -> HabitResult<()> {
        let dir = habit.id.sharded_dir(&self.root);
        fs::create_dir_all(&dir).map_err(HabitError::StorageDirCreation)?;

        let raw = serde_json::to_vec_pretty(habit).map_err(HabitError::Serialization)?;
        let tmp_path = dir.join(HABIT_DOCUMENT_TMP_FILENAME);
        fs::write(&tmp_path, raw).map_err(HabitError::FileWrite)?;
        fs::rename(&tmp_path, dir.join(HABIT_DOCUMENT_FILENAME)).map_err(HabitError::FileWrite)
    }

    fn read_document(path: &Path) -> HabitResult<Option<Habit>> {
        match fs::read(path) {
            Ok(raw) => serde_json::from_slice(&raw)
                .map(Some)
                .map_err(HabitError::Deserialization),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(HabitError::FileRead(e)),
        }
    }

    /// Walks `<root>/<s1>/<s2>/<id>/habit.json`.
    ///
    /// Unreadable shard directories and unparsable documents are skipped with a warning; only
    /// a failure to read the root itself is an error.
    fn scan(&self) -> HabitResult<Vec<Habit>> {
        let mut habits = Vec::new();

        let s1_iter = fs::read_dir(&self.root).map_err(HabitError::FileRead)?;
        for s1 in s1_iter.flatten() {
            let s1_path = s1.path();
            if !s1_path.is_dir() {
                continue;
            }

            let s2_iter = match fs::read_dir(&s1_path) {
                Ok(it) => it,
                Err(_) => continue,
            };

            for s2 in s2_iter.flatten() {
                let s2_path = s2.path();
                if !s2_path.is_dir() {
                    continue;
                }

                let id_iter = match fs::read_dir(&s2_path) {
                    Ok(it) => it,
                    Err(_) => continue,
                };

                for id_ent in id_iter.flatten() {
                    let id_path = id_ent.path();
                    let doc_path = id_path.join(HABIT_DOCUMENT_FILENAME);
                    if !doc_path.is_file() {
                        continue;
                    }

                    match Self::read_document(&doc_path) {
                        Ok(Some(habit)) => {
                            let dir_name = id_path.file_name().and_then(|os| os.to_str());
                            if dir_name == Some(habit.id.to_string().as_str()) {
                                habits.push(habit);
                            } else {
                                tracing::warn!(
                                    "habit id does not match its directory: {}",
                                    doc_path.display()
                                );
                            }
                        }
                        Ok(None) => {}
                        Err(e) => {
                            tracing::warn!("skipping habit {}: {}", doc_path.display(), e);
                        }
                    }
                }
            }
        }

        Ok(habits)
    }

    /// Removes now-empty shard directories above a deleted document. Best effort.
    fn prune_empty_shards(&self, id: &HabitId) {
        let dir = id.sharded_dir(&self.root);
        for shard in dir.ancestors().skip(1).take(2) {
            if fs::remove_dir(shard).is_err() {
                break;
            }
        }
    }
}

impl HabitStore for FileStore {
    fn insert(&self, draft: HabitDraft) -> HabitResult<Habit> {
        let _guard = self.lock()?;
        let habit = Habit::from_draft(draft, HabitId::new(), self.clock.next());
        self.write_document(&habit)?;
        Ok(habit)
    }

    fn find_all(&self) -> HabitResult<Vec<Habit>> {
        let mut habits = self.scan()?;
        sort_newest_first(&mut habits);
        Ok(habits)
    }

    fn find_by_id(&self, id: &HabitId) -> HabitResult<Option<Habit>> {
        Self::read_document(&self.document_path(id))
    }

    fn update(&self, id: &HabitId, patch: HabitPatch) -> HabitResult<Option<Habit>> {
        let _guard = self.lock()?;
        let Some(existing) = self.find_by_id(id)? else {
            return Ok(None);
        };
        let updated = existing.merged(patch)?;
        self.write_document(&updated)?;
        Ok(Some(updated))
    }

    fn delete_by_id(&self, id: &HabitId) -> HabitResult<bool> {
        let _guard = self.lock()?;
        let dir = id.sharded_dir(&self.root);
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                self.prune_empty_shards(id);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(HabitError::FileRemove(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewHabit;
    use tempfile::TempDir;

    fn draft(name: &str) -> HabitDraft {
        NewHabit::new(name, "Health")
            .with_tags(["am"])
            .validate()
            .unwrap()
    }

    #[test]
    fn test_insert_writes_sharded_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::open(temp_dir.path()).unwrap();

        let habit = store.insert(draft("Run")).unwrap();
        let doc = habit
            .id
            .sharded_dir(temp_dir.path())
            .join(HABIT_DOCUMENT_FILENAME);

        assert!(doc.is_file(), "document should exist at {}", doc.display());
        let raw = fs::read_to_string(&doc).unwrap();
        assert!(raw.contains("\"isCompleted\": false"));
        assert!(!doc.with_file_name(HABIT_DOCUMENT_TMP_FILENAME).exists());
    }

    #[test]
    fn test_documents_survive_reopen_and_new_ones_sort_first() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let first = {
            let store = FileStore::open(temp_dir.path()).unwrap();
            store.insert(draft("old")).unwrap()
        };

        let store = FileStore::open(temp_dir.path()).unwrap();
        let second = store.insert(draft("new")).unwrap();
        assert!(second.created_at > first.created_at);

        let all = store.find_all().unwrap();
        assert_eq!(all, vec![second, first]);
    }

    #[test]
    fn test_update_missing_document_returns_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::open(temp_dir.path()).unwrap();
        store.insert(draft("Run")).unwrap();

        let ghost = HabitId::new();
        let patch = HabitPatch {
            name: Some("Walk".into()),
            ..Default::default()
        };
        assert!(store.update(&ghost, patch).unwrap().is_none());
        assert!(store.find_by_id(&ghost).unwrap().is_none());
        assert!(!ghost.sharded_dir(temp_dir.path()).exists());
    }

    #[test]
    fn test_delete_removes_document_and_empty_shards() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::open(temp_dir.path()).unwrap();
        let habit = store.insert(draft("Run")).unwrap();

        assert!(store.delete_by_id(&habit.id).unwrap());
        assert!(!store.delete_by_id(&habit.id).unwrap());
        assert!(store.find_all().unwrap().is_empty());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_scan_skips_corrupt_documents() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::open(temp_dir.path()).unwrap();
        let good = store.insert(draft("good")).unwrap();

        let bad_id = HabitId::new();
        let bad_dir = bad_id.sharded_dir(temp_dir.path());
        fs::create_dir_all(&bad_dir).unwrap();
        fs::write(bad_dir.join(HABIT_DOCUMENT_FILENAME), b"{\"name\": \"\"}").unwrap();

        assert_eq!(store.find_all().unwrap(), vec![good]);
    }
}
