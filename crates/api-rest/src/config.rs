//! HTTP surface configuration, resolved once at startup.

use axum::http::{HeaderValue, Method};
use habit_core::{HabitError, HabitResult};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Default listen address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:5001";

/// Default path prefix for the habit routes.
pub const DEFAULT_API_PREFIX: &str = "/api";

#[derive(Clone, Debug)]
pub struct RestConfig {
    addr: String,
    api_prefix: String,
    allowed_origins: Vec<HeaderValue>,
}

impl RestConfig {
    /// # Errors
    ///
    /// Returns `HabitError::InvalidConfig` if an origin is not a valid header value.
    pub fn new(
        addr: String,
        api_prefix: String,
        allowed_origins: Vec<String>,
    ) -> HabitResult<Self> {
        let allowed_origins = allowed_origins
            .into_iter()
            .map(|origin| {
                HeaderValue::from_str(&origin).map_err(|_| {
                    HabitError::InvalidConfig(format!("invalid allowed origin '{}'", origin))
                })
            })
            .collect::<HabitResult<Vec<_>>>()?;

        Ok(Self {
            addr,
            api_prefix: normalise_prefix(&api_prefix),
            allowed_origins,
        })
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Normalised prefix: empty, or `/segment` without a trailing slash.
    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// CORS policy: permissive when no origins are configured, otherwise restricted to the
    /// configured origins and the four habit methods.
    pub fn cors_layer(&self) -> CorsLayer {
        if self.allowed_origins.is_empty() {
            return CorsLayer::permissive();
        }

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.allowed_origins.clone()))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([axum::http::header::CONTENT_TYPE])
            .allow_credentials(true)
    }
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_REST_ADDR.into(),
            api_prefix: DEFAULT_API_PREFIX.into(),
            allowed_origins: Vec::new(),
        }
    }
}

/// Parse the API prefix from an optional string value. `None` means [`DEFAULT_API_PREFIX`];
/// an explicitly empty value mounts the routes at the root.
pub fn api_prefix_from_env_value(value: Option<String>) -> String {
    match value {
        None => DEFAULT_API_PREFIX.into(),
        Some(v) => normalise_prefix(&v),
    }
}

/// Parse a comma-separated origin list. Blank entries are dropped.
pub fn allowed_origins_from_env_value(value: Option<String>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

fn normalise_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_normalisation() {
        assert_eq!(api_prefix_from_env_value(None), "/api");
        assert_eq!(api_prefix_from_env_value(Some("".into())), "");
        assert_eq!(api_prefix_from_env_value(Some("/".into())), "");
        assert_eq!(api_prefix_from_env_value(Some("v1/".into())), "/v1");
        assert_eq!(api_prefix_from_env_value(Some(" /api ".into())), "/api");
    }

    #[test]
    fn test_origin_list_parsing() {
        let origins = allowed_origins_from_env_value(Some(
            "https://habits.example.com/, ,http://localhost:5173".into(),
        ));
        assert_eq!(
            origins,
            ["https://habits.example.com", "http://localhost:5173"]
        );
        assert!(allowed_origins_from_env_value(None).is_empty());
    }

    #[test]
    fn test_new_rejects_unrepresentable_origin() {
        let err = RestConfig::new(
            DEFAULT_REST_ADDR.into(),
            DEFAULT_API_PREFIX.into(),
            vec!["bad\norigin".into()],
        )
        .unwrap_err();
        assert!(matches!(err, HabitError::InvalidConfig(_)));
    }
}
