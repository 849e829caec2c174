//! Habit resource handlers.
//!
//! Each mutating handler calls [`habit_core::HabitFanout::notify`] after the repository call
//! succeeds. The push is not coordinated with the HTTP response.

use crate::error::ApiError;
use crate::AppState;
use api_shared::{ErrorRes, HealthRes, HealthService, MessageRes};
use api_shared::{FETCH_FAILED_MESSAGE, HABIT_DELETED_MESSAGE};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use habit_core::{Habit, HabitPatch, NewHabit};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Liveness probe for monitoring and load balancers.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/habits",
    request_body = NewHabit,
    responses(
        (status = 201, description = "Habit created", body = Habit),
        (status = 400, description = "Missing name or category, or malformed body", body = ErrorRes)
    )
)]
/// Create a habit.
///
/// `name` and `category` are required; `tags` defaults to empty and `isCompleted` to false.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the body is not valid JSON for a habit,
/// - `name` or `category` is missing or blank,
/// - the store rejects the write.
#[axum::debug_handler]
pub async fn create_habit(
    State(state): State<AppState>,
    payload: Result<Json<NewHabit>, JsonRejection>,
) -> Result<(StatusCode, Json<Habit>), ApiError> {
    let Json(input) = payload?;

    match state.repo.create(input) {
        Ok(habit) => {
            state.fanout.notify(&state.repo);
            Ok((StatusCode::CREATED, Json(habit)))
        }
        Err(e) => {
            tracing::error!("Create habit error: {:?}", e);
            Err(ApiError::BadRequest(e.to_string()))
        }
    }
}

#[utoipa::path(
    get,
    path = "/habits",
    responses(
        (status = 200, description = "All habits, newest first", body = Vec<Habit>),
        (status = 500, description = "Store failure", body = ErrorRes)
    )
)]
/// List every habit, newest first.
///
/// # Errors
/// Returns `500 Internal Server Error` with a generic message if the store cannot be read.
#[axum::debug_handler]
pub async fn list_habits(State(state): State<AppState>) -> Result<Json<Vec<Habit>>, ApiError> {
    match state.repo.list() {
        Ok(habits) => Ok(Json(habits)),
        Err(e) => {
            tracing::error!("List habits error: {:?}", e);
            Err(ApiError::Internal(FETCH_FAILED_MESSAGE.into()))
        }
    }
}

#[utoipa::path(
    put,
    path = "/habits/{id}",
    params(("id" = String, Path, description = "Habit id (32 lowercase hex characters)")),
    request_body = HabitPatch,
    responses(
        (status = 200, description = "Habit updated", body = Habit),
        (status = 400, description = "Unknown id, malformed id, or invalid fields", body = ErrorRes)
    )
)]
/// Partially update a habit. Omitted fields are left unchanged.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the id is malformed or unknown,
/// - the body would blank `name` or `category`,
/// - the store rejects the write.
#[axum::debug_handler]
pub async fn update_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<HabitPatch>, JsonRejection>,
) -> Result<Json<Habit>, ApiError> {
    let Json(patch) = payload?;

    match state.repo.update(&id, patch) {
        Ok(habit) => {
            state.fanout.notify(&state.repo);
            Ok(Json(habit))
        }
        Err(e) => {
            tracing::error!("Update habit error: {:?}", e);
            Err(ApiError::BadRequest(e.to_string()))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/habits/{id}",
    params(("id" = String, Path, description = "Habit id (32 lowercase hex characters)")),
    responses(
        (status = 200, description = "Habit deleted, or already absent", body = MessageRes),
        (status = 400, description = "Malformed id or store failure", body = ErrorRes)
    )
)]
/// Delete a habit. Deleting an id that does not exist still succeeds.
///
/// # Errors
/// Returns `400 Bad Request` if the id is malformed or the store cannot remove the document.
#[axum::debug_handler]
pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageRes>, ApiError> {
    match state.repo.delete(&id) {
        Ok(()) => {
            state.fanout.notify(&state.repo);
            Ok(Json(MessageRes {
                message: HABIT_DELETED_MESSAGE.into(),
            }))
        }
        Err(e) => {
            tracing::error!("Delete habit error: {:?}", e);
            Err(ApiError::BadRequest(e.to_string()))
        }
    }
}
