//! View-side selection over the cached collection.

use habit_core::Habit;

/// Category and tag selections. A habit is shown iff it passes both.
///
/// An unset selection (or one set to an empty string) passes everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HabitFilter {
    category: Option<String>,
    tag: Option<String>,
}

impl HabitFilter {
    pub fn new(category: Option<String>, tag: Option<String>) -> Self {
        Self {
            category: category.filter(|c| !c.is_empty()),
            tag: tag.filter(|t| !t.is_empty()),
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category.filter(|c| !c.is_empty());
    }

    pub fn set_tag(&mut self, tag: Option<String>) {
        self.tag = tag.filter(|t| !t.is_empty());
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.tag.is_none()
    }

    pub fn matches(&self, habit: &Habit) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| habit.category == c);
        let tag_ok = self.tag.as_deref().map_or(true, |t| habit.has_tag(t));
        category_ok && tag_ok
    }

    /// Habits that pass the filter, in input order.
    pub fn apply<'a>(&self, habits: &'a [Habit]) -> Vec<&'a Habit> {
        habits.iter().filter(|h| self.matches(h)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use habit_core::{HabitRepository, NewHabit};

    /// `[Health/am, Game/pm]`, in that order.
    fn habits() -> Vec<Habit> {
        let repo = HabitRepository::in_memory();
        let health = repo
            .create(NewHabit::new("Run", "Health").with_tags(["am"]))
            .unwrap();
        let game = repo
            .create(NewHabit::new("Chess", "Game").with_tags(["pm"]))
            .unwrap();
        vec![health, game]
    }

    fn names(selected: Vec<&Habit>) -> Vec<&str> {
        selected.into_iter().map(|h| h.name.as_str()).collect()
    }

    #[test]
    fn test_category_selects_exact_match() {
        let habits = habits();
        let filter = HabitFilter::new(Some("Health".into()), None);
        assert_eq!(names(filter.apply(&habits)), ["Run"]);
    }

    #[test]
    fn test_tag_selects_members() {
        let habits = habits();
        let filter = HabitFilter::new(None, Some("pm".into()));
        assert_eq!(names(filter.apply(&habits)), ["Chess"]);
    }

    #[test]
    fn test_unmatched_category_with_any_tag_yields_nothing() {
        let habits = habits();
        for tag in [None, Some("am"), Some("pm")] {
            let filter = HabitFilter::new(Some("Work".into()), tag.map(String::from));
            assert!(filter.apply(&habits).is_empty());
        }
    }

    #[test]
    fn test_filters_combine_as_conjunction() {
        let habits = habits();
        let filter = HabitFilter::new(Some("Health".into()), Some("pm".into()));
        assert!(filter.apply(&habits).is_empty());

        let filter = HabitFilter::new(Some("Game".into()), Some("pm".into()));
        assert_eq!(names(filter.apply(&habits)), ["Chess"]);
    }

    #[test]
    fn test_empty_selection_shows_everything() {
        let habits = habits();
        let filter = HabitFilter::new(Some(String::new()), Some(String::new()));
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&habits).len(), 2);
    }

    #[test]
    fn test_category_match_is_case_sensitive() {
        let habits = habits();
        let filter = HabitFilter::new(Some("health".into()), None);
        assert!(filter.apply(&habits).is_empty());
    }
}
