//! Transient create/edit form state.

use habit_core::{Habit, HabitPatch, NewHabit};

/// Splits a comma-separated tag field. Tags are trimmed and empty ones dropped.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// What submitting the form would send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Create(NewHabit),
    Update { id: String, patch: HabitPatch },
}

/// Name, category and raw tag text, plus the id of the habit being edited (if any).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HabitForm {
    pub name: String,
    pub category: String,
    pub tags: String,
    editing: Option<String>,
}

impl HabitForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills the form from `habit` and remembers its id, so the next submit is an update.
    pub fn load(&mut self, habit: &Habit) {
        self.name = habit.name.to_string();
        self.category = habit.category.to_string();
        self.tags = habit.tags.join(", ");
        self.editing = Some(habit.id.to_string());
    }

    /// Back to empty fields with no edit target.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// The request this form would produce, or `None` if name or category is empty.
    pub fn submission(&self) -> Option<Submission> {
        if self.name.trim().is_empty() || self.category.trim().is_empty() {
            return None;
        }

        let tags = parse_tags(&self.tags);
        Some(match &self.editing {
            Some(id) => Submission::Update {
                id: id.clone(),
                patch: HabitPatch {
                    name: Some(self.name.clone()),
                    category: Some(self.category.clone()),
                    tags: Some(tags),
                    is_completed: None,
                },
            },
            None => Submission::Create(
                NewHabit::new(self.name.clone(), self.category.clone()).with_tags(tags),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use habit_core::HabitRepository;

    #[test]
    fn test_parse_tags_trims_and_drops_empties() {
        assert_eq!(parse_tags(" am , ,cardio,,  "), ["am", "cardio"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn test_empty_name_or_category_submits_nothing() {
        let mut form = HabitForm::new();
        assert!(form.submission().is_none());

        form.name = "Run".into();
        assert!(form.submission().is_none());

        form.name.clear();
        form.category = "Health".into();
        assert!(form.submission().is_none());
    }

    #[test]
    fn test_new_form_submits_create() {
        let form = HabitForm {
            name: "Run".into(),
            category: "Health".into(),
            tags: "am, cardio".into(),
            ..Default::default()
        };

        assert_eq!(
            form.submission(),
            Some(Submission::Create(
                NewHabit::new("Run", "Health").with_tags(["am", "cardio"])
            ))
        );
    }

    #[test]
    fn test_loaded_form_submits_update_then_resets() {
        let repo = HabitRepository::in_memory();
        let habit = repo
            .create(NewHabit::new("Chess", "Game").with_tags(["pm", "mind"]))
            .unwrap();

        let mut form = HabitForm::new();
        form.load(&habit);
        assert_eq!(form.tags, "pm, mind");
        assert_eq!(form.editing_id(), Some(habit.id.to_string().as_str()));

        form.category = "Mind".into();
        match form.submission() {
            Some(Submission::Update { id, patch }) => {
                assert_eq!(id, habit.id.to_string());
                assert_eq!(patch.category.as_deref(), Some("Mind"));
                assert_eq!(patch.tags, Some(vec!["pm".to_string(), "mind".to_string()]));
                assert!(patch.is_completed.is_none());
            }
            other => panic!("expected update, got {other:?}"),
        }

        form.reset();
        assert_eq!(form, HabitForm::default());
        assert!(!form.is_editing());
    }
}
