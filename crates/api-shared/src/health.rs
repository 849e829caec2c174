use crate::HealthRes;

/// Liveness check served at `/health`.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Returns a `HealthRes` indicating the service is alive.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Habit tracker is alive".into(),
        }
    }
}
