//! Client configuration: where the server lives and how the collection is kept fresh.

use crate::{ClientError, ClientResult};
use std::time::Duration;

/// Default server base URL.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5001";

/// Default path prefix for the habit routes.
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Timeout applied to every HTTP request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How the client keeps its cache in step with the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshMode {
    /// Re-fetch the whole collection every `interval`.
    Poll { interval: Duration },
    /// Listen on the websocket channel. When the connection ends, poll every `fallback`
    /// if set, otherwise stop.
    Push { fallback: Option<Duration> },
}

impl Default for RefreshMode {
    fn default() -> Self {
        Self::Poll {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    server_url: String,
    api_prefix: String,
    refresh: RefreshMode,
}

impl ClientConfig {
    /// # Errors
    ///
    /// Returns `ClientError::InvalidConfig` if `server_url` is not an `http://` or `https://`
    /// URL, or if a polling interval is zero.
    pub fn new(
        server_url: impl Into<String>,
        api_prefix: impl Into<String>,
        refresh: RefreshMode,
    ) -> ClientResult<Self> {
        let server_url = server_url.into().trim().trim_end_matches('/').to_string();
        if !(server_url.starts_with("http://") || server_url.starts_with("https://")) {
            return Err(ClientError::InvalidConfig(format!(
                "server url '{}' must start with http:// or https://",
                server_url
            )));
        }

        check_refresh(refresh)?;

        Ok(Self {
            server_url,
            api_prefix: normalise_prefix(&api_prefix.into()),
            refresh,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    pub fn refresh(&self) -> RefreshMode {
        self.refresh
    }

    /// # Errors
    ///
    /// Returns `ClientError::InvalidConfig` if a polling interval is zero.
    pub fn with_refresh(mut self, refresh: RefreshMode) -> ClientResult<Self> {
        check_refresh(refresh)?;
        self.refresh = refresh;
        Ok(self)
    }

    /// Collection URL, e.g. `http://localhost:5001/api/habits`.
    pub fn habits_url(&self) -> String {
        format!("{}{}/habits", self.server_url, self.api_prefix)
    }

    /// Websocket URL of the real-time channel, e.g. `ws://localhost:5001/ws`.
    pub fn ws_url(&self) -> String {
        if let Some(rest) = self.server_url.strip_prefix("https://") {
            format!("wss://{}/ws", rest)
        } else {
            let rest = self
                .server_url
                .strip_prefix("http://")
                .unwrap_or(&self.server_url);
            format!("ws://{}/ws", rest)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            api_prefix: DEFAULT_API_PREFIX.into(),
            refresh: RefreshMode::default(),
        }
    }
}

/// Parse the refresh mode from optional string values.
///
/// - `mode`: `poll` (default), `push` (falls back to polling), or `push-only`.
/// - `interval_ms`: polling interval in milliseconds, also used as the push fallback
///   interval. Defaults to [`DEFAULT_POLL_INTERVAL`].
pub fn refresh_mode_from_env_values(
    mode: Option<String>,
    interval_ms: Option<String>,
) -> ClientResult<RefreshMode> {
    let interval = match interval_ms
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    {
        None => DEFAULT_POLL_INTERVAL,
        Some(v) => Duration::from_millis(v.parse::<u64>().map_err(|e| {
            ClientError::InvalidConfig(format!("invalid poll interval '{}': {}", v, e))
        })?),
    };

    let mode = mode
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());

    match mode.as_deref() {
        None | Some("poll") => Ok(RefreshMode::Poll { interval }),
        Some("push") => Ok(RefreshMode::Push {
            fallback: Some(interval),
        }),
        Some("push-only") => Ok(RefreshMode::Push { fallback: None }),
        Some(other) => Err(ClientError::InvalidConfig(format!(
            "unknown refresh mode '{}' (expected 'poll', 'push' or 'push-only')",
            other
        ))),
    }
}

fn check_refresh(refresh: RefreshMode) -> ClientResult<()> {
    let zero_interval = match refresh {
        RefreshMode::Poll { interval } => interval.is_zero(),
        RefreshMode::Push { fallback } => fallback.is_some_and(|d| d.is_zero()),
    };
    if zero_interval {
        return Err(ClientError::InvalidConfig(
            "polling interval must be greater than zero".into(),
        ));
    }
    Ok(())
}

fn normalise_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
