//! Local copy of the habit collection.

use crate::filter::HabitFilter;
use habit_core::Habit;
use std::collections::BTreeSet;

/// The last snapshot received from the server.
///
/// A snapshot always replaces the whole collection; the cache never merges.
#[derive(Clone, Debug, Default)]
pub struct HabitCache {
    habits: Vec<Habit>,
    revision: u64,
}

impl HabitCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the collection and bumps the revision.
    pub fn replace(&mut self, habits: Vec<Habit>) {
        self.habits = habits;
        self.revision += 1;
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    /// Number of snapshots applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id.to_string() == id)
    }

    pub fn visible(&self, filter: &HabitFilter) -> Vec<&Habit> {
        filter.apply(&self.habits)
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.habits
            .iter()
            .map(|h| h.category.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct tags across all habits, sorted.
    pub fn tags(&self) -> Vec<String> {
        self.habits
            .iter()
            .flat_map(|h| h.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use habit_core::{HabitRepository, NewHabit};

    fn snapshot() -> Vec<Habit> {
        let repo = HabitRepository::in_memory();
        repo.create(NewHabit::new("Run", "Health").with_tags(["am", "cardio"]))
            .unwrap();
        repo.create(NewHabit::new("Chess", "Game").with_tags(["pm"]))
            .unwrap();
        repo.create(NewHabit::new("Stretch", "Health").with_tags(["am"]))
            .unwrap();
        repo.list().unwrap()
    }

    #[test]
    fn test_replace_swaps_whole_collection() {
        let mut cache = HabitCache::new();
        assert!(cache.is_empty());

        cache.replace(snapshot());
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.revision(), 1);

        cache.replace(Vec::new());
        assert!(cache.is_empty());
        assert_eq!(cache.revision(), 2);
    }

    #[test]
    fn test_distinct_categories_and_tags() {
        let mut cache = HabitCache::new();
        cache.replace(snapshot());
        assert_eq!(cache.categories(), ["Game", "Health"]);
        assert_eq!(cache.tags(), ["am", "cardio", "pm"]);
    }

    #[test]
    fn test_get_by_id() {
        let mut cache = HabitCache::new();
        let habits = snapshot();
        let id = habits[1].id.to_string();
        cache.replace(habits);

        assert_eq!(cache.get(&id).map(|h| h.name.as_str()), Some("Chess"));
        assert!(cache.get("missing").is_none());
    }
}
