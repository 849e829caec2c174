//! # API REST
//!
//! HTTP surface of the habit tracker.
//!
//! Handles:
//! - The four habit endpoints under a configurable prefix (default `/api`)
//! - The `/ws` websocket endpoint carrying `updateHabits` snapshots
//! - OpenAPI/Swagger documentation and CORS
//!
//! Data operations live in `habit-core`; wire envelopes in `api-shared`.

#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod realtime;

use axum::{
    routing::{get, put},
    Router,
};
use habit_core::{open_store, CoreConfig, HabitFanout, HabitRepository, HabitResult};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::RestConfig;
pub use error::ApiError;

/// Application state shared across handlers and websocket sessions.
#[derive(Clone)]
pub struct AppState {
    pub repo: HabitRepository,
    pub fanout: HabitFanout,
}

impl AppState {
    pub fn new(repo: HabitRepository, fanout: HabitFanout) -> Self {
        Self { repo, fanout }
    }

    /// Opens the configured store and creates the fan-out.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened.
    pub fn from_config(cfg: &CoreConfig) -> HabitResult<Self> {
        let store = open_store(cfg)?;
        Ok(Self::new(
            HabitRepository::new(store),
            HabitFanout::new(cfg.fanout_capacity()),
        ))
    }

    pub fn in_memory() -> Self {
        Self::new(HabitRepository::in_memory(), HabitFanout::default())
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::create_habit,
        handlers::list_habits,
        handlers::update_habit,
        handlers::delete_habit,
    ),
    components(schemas(
        habit_core::Habit,
        habit_core::NewHabit,
        habit_core::HabitPatch,
        api_shared::ErrorRes,
        api_shared::MessageRes,
        api_shared::HealthRes,
    ))
)]
pub struct ApiDoc;

/// The OpenAPI document with the habit paths moved under `api_prefix`.
pub fn api_doc(api_prefix: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let paths = std::mem::take(&mut doc.paths.paths);
    doc.paths.paths = paths
        .into_iter()
        .map(|(path, item)| {
            if path.starts_with("/habits") {
                (format!("{}{}", api_prefix, path), item)
            } else {
                (path, item)
            }
        })
        .collect();
    doc
}

/// Builds the full router: habit routes under the configured prefix, `/health`, `/ws`, and
/// the Swagger UI.
pub fn habit_router(state: AppState, cfg: &RestConfig) -> Router {
    let habits = Router::new()
        .route(
            "/habits",
            get(handlers::list_habits).post(handlers::create_habit),
        )
        .route(
            "/habits/:id",
            put(handlers::update_habit).delete(handlers::delete_habit),
        );

    let habits = if cfg.api_prefix().is_empty() {
        habits
    } else {
        Router::new().nest(cfg.api_prefix(), habits)
    };

    Router::new()
        .route("/health", get(handlers::health))
        .route("/ws", get(realtime::ws_handler))
        .merge(habits)
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_doc(cfg.api_prefix())),
        )
        .layer(cfg.cors_layer())
        .with_state(state)
}

/// Serves `app` on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server fails while running.
pub async fn serve<F>(
    listener: tokio::net::TcpListener,
    app: Router,
    shutdown: F,
) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
