//! # API Shared
//!
//! Wire definitions shared by the habit server and its clients.
//!
//! Contains:
//! - Response envelopes (`ErrorRes`, `MessageRes`, `HealthRes`)
//! - The real-time event frame (`RealtimeEvent`) and its event names
//! - `HealthService`
//!
//! Used by `api-rest` to produce responses and by `habit-client` to decode them.

pub mod health;
pub mod realtime;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use health::HealthService;
pub use realtime::{encode_update_habits, RealtimeEvent, UPDATE_HABITS_EVENT};

/// Message returned by a successful delete.
pub const HABIT_DELETED_MESSAGE: &str = "Habit deleted successfully";

/// Message returned when listing fails on the server side.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch habits";

/// Error body returned with every 4xx/5xx response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

/// Confirmation body for operations that return no document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}
