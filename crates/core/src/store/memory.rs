use super::{sort_newest_first, HabitStore};
use crate::habit::{Habit, HabitDraft, HabitPatch};
use crate::{HabitError, HabitResult};
use habit_uuid::{CreationClock, HabitId};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-local habit collection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<Vec<Habit>>,
    clock: CreationClock,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> HabitResult<RwLockReadGuard<'_, Vec<Habit>>> {
        self.docs
            .read()
            .map_err(|_| HabitError::StoreUnavailable("memory store lock poisoned".into()))
    }

    fn write(&self) -> HabitResult<RwLockWriteGuard<'_, Vec<Habit>>> {
        self.docs
            .write()
            .map_err(|_| HabitError::StoreUnavailable("memory store lock poisoned".into()))
    }
}

impl HabitStore for MemoryStore {
    fn insert(&self, draft: HabitDraft) -> HabitResult<Habit> {
        let mut docs = self.write()?;
        let habit = Habit::from_draft(draft, HabitId::new(), self.clock.next());
        docs.push(habit.clone());
        Ok(habit)
    }

    fn find_all(&self) -> HabitResult<Vec<Habit>> {
        let mut habits = self.read()?.clone();
        sort_newest_first(&mut habits);
        Ok(habits)
    }

    fn find_by_id(&self, id: &HabitId) -> HabitResult<Option<Habit>> {
        Ok(self.read()?.iter().find(|h| h.id == *id).cloned())
    }

    fn update(&self, id: &HabitId, patch: HabitPatch) -> HabitResult<Option<Habit>> {
        let mut docs = self.write()?;
        match docs.iter_mut().find(|h| h.id == *id) {
            Some(slot) => {
                *slot = slot.merged(patch)?;
                Ok(Some(slot.clone()))
            }
            None => Ok(None),
        }
    }

    fn delete_by_id(&self, id: &HabitId) -> HabitResult<bool> {
        let mut docs = self.write()?;
        let before = docs.len();
        docs.retain(|h| h.id != *id);
        Ok(docs.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewHabit;

    fn draft(name: &str) -> HabitDraft {
        NewHabit::new(name, "Health").validate().unwrap()
    }

    #[test]
    fn test_insert_assigns_identity() {
        let store = MemoryStore::new();
        let a = store.insert(draft("a")).unwrap();
        let b = store.insert(draft("b")).unwrap();

        assert_ne!(a.id, b.id);
        assert!(b.created_at > a.created_at);
    }

    #[test]
    fn test_find_all_is_newest_first() {
        let store = MemoryStore::new();
        for name in ["first", "second", "third"] {
            store.insert(draft(name)).unwrap();
        }

        let names: Vec<_> = store
            .find_all()
            .unwrap()
            .into_iter()
            .map(|h| h.name.into_inner())
            .collect();
        assert_eq!(names, ["third", "second", "first"]);
    }

    #[test]
    fn test_update_and_delete_report_missing_documents() {
        let store = MemoryStore::new();
        let habit = store.insert(draft("a")).unwrap();
        let ghost = HabitId::new();

        assert!(store.update(&ghost, HabitPatch::default()).unwrap().is_none());
        assert!(!store.delete_by_id(&ghost).unwrap());
        assert!(store.delete_by_id(&habit.id).unwrap());
        assert!(store.find_by_id(&habit.id).unwrap().is_none());
    }
}
