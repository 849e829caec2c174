//! The habit document and its input shapes.
//!
//! [`Habit`] is what the store persists and what every endpoint returns. Callers never build
//! one directly: [`NewHabit`] is validated into a [`HabitDraft`], and the store turns the draft
//! into a `Habit` by assigning `id` and `createdAt`. Updates go through [`HabitPatch`].
//!
//! Wire field names are camelCase (`isCompleted`, `createdAt`).

use crate::{HabitError, HabitResult};
use chrono::{DateTime, Utc};
use habit_types::NonEmptyText;
use habit_uuid::HabitId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A persisted habit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    #[schema(value_type = String, example = "550e8400e29b41d4a716446655440000")]
    pub id: HabitId,
    #[schema(value_type = String, example = "Morning run")]
    pub name: NonEmptyText,
    #[schema(value_type = String, example = "Health")]
    pub category: NonEmptyText,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Builds the stored document from a validated draft plus store-assigned identity.
    pub fn from_draft(draft: HabitDraft, id: HabitId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            category: draft.category,
            tags: draft.tags,
            is_completed: draft.is_completed,
            created_at,
        }
    }

    /// Returns a copy of this habit with `patch` merged in.
    ///
    /// Fields absent from the patch are kept. `id` and `created_at` never change.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Validation` if the patch would blank `name` or `category`. `self`
    /// is left untouched in that case.
    pub fn merged(&self, patch: HabitPatch) -> HabitResult<Habit> {
        let mut problems = Vec::new();

        let name = match patch.name {
            Some(name) => required_text("name", &name, &mut problems),
            None => Some(self.name.clone()),
        };
        let category = match patch.category {
            Some(category) => required_text("category", &category, &mut problems),
            None => Some(self.category.clone()),
        };

        match (name, category) {
            (Some(name), Some(category)) if problems.is_empty() => Ok(Habit {
                id: self.id,
                name,
                category,
                tags: patch.tags.unwrap_or_else(|| self.tags.clone()),
                is_completed: patch.is_completed.unwrap_or(self.is_completed),
                created_at: self.created_at,
            }),
            _ => Err(HabitError::Validation(problems.join(", "))),
        }
    }

    /// True if `tag` is one of this habit's tags.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Request body for creating a habit.
///
/// Every field is optional on the wire so that a missing `name` is reported as a validation
/// error with a readable message rather than a decode failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewHabit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl NewHabit {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            category: Some(category.into()),
            tags: None,
            is_completed: None,
        }
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn completed(mut self, is_completed: bool) -> Self {
        self.is_completed = Some(is_completed);
        self
    }

    /// Checks the required fields and produces a draft ready for insertion.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Validation` naming every missing or blank required field.
    pub fn validate(self) -> HabitResult<HabitDraft> {
        let mut problems = Vec::new();

        let name = required_text("name", self.name.as_deref().unwrap_or(""), &mut problems);
        let category = required_text(
            "category",
            self.category.as_deref().unwrap_or(""),
            &mut problems,
        );

        match (name, category) {
            (Some(name), Some(category)) => Ok(HabitDraft {
                name,
                category,
                tags: self.tags.unwrap_or_default(),
                is_completed: self.is_completed.unwrap_or(false),
            }),
            _ => Err(HabitError::Validation(problems.join(", "))),
        }
    }
}

/// A validated habit that has not been assigned an identity yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HabitDraft {
    pub name: NonEmptyText,
    pub category: NonEmptyText,
    pub tags: Vec<String>,
    pub is_completed: bool,
}

/// Partial update body. `None` (omitted or `null`) leaves the field unchanged.
///
/// Unknown fields, including `id` and `createdAt`, are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HabitPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

fn required_text(field: &str, value: &str, problems: &mut Vec<String>) -> Option<NonEmptyText> {
    match NonEmptyText::new(value) {
        Ok(text) => Some(text),
        Err(_) => {
            problems.push(format!("{} is required", field));
            None
        }
    }
}
