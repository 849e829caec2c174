//! Real-time channel frames.
//!
//! Every websocket text frame is a JSON object `{"event": <name>, "data": <payload>}`. The only
//! event the server emits is [`UPDATE_HABITS_EVENT`], whose payload is the full ordered habit
//! collection.

use habit_core::Habit;
use serde::{Deserialize, Serialize};

pub const UPDATE_HABITS_EVENT: &str = "updateHabits";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealtimeEvent {
    pub event: String,
    pub data: Vec<Habit>,
}

impl RealtimeEvent {
    pub fn update_habits(habits: Vec<Habit>) -> Self {
        Self {
            event: UPDATE_HABITS_EVENT.to_string(),
            data: habits,
        }
    }

    pub fn is_update_habits(&self) -> bool {
        self.event == UPDATE_HABITS_EVENT
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// Encodes an `updateHabits` frame straight from a borrowed snapshot.
pub fn encode_update_habits(habits: &[Habit]) -> serde_json::Result<String> {
    #[derive(Serialize)]
    struct Frame<'a> {
        event: &'a str,
        data: &'a [Habit],
    }

    serde_json::to_string(&Frame {
        event: UPDATE_HABITS_EVENT,
        data: habits,
    })
}
