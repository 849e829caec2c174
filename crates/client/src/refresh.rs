//! Refresh strategies.
//!
//! Both strategies deliver full snapshots to a callback from a background task:
//! - [`PollingRefresh`] re-fetches the collection on a fixed interval;
//! - [`PushRefresh`] listens for `updateHabits` frames on the websocket channel and, when
//!   the connection ends, optionally falls back to polling.
//!
//! The task lives as long as the returned [`Subscription`].

use crate::api::HttpHabitApi;
use crate::config::{ClientConfig, RefreshMode};
use crate::ClientResult;
use api_shared::RealtimeEvent;
use futures::StreamExt;
use habit_core::Habit;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::tungstenite::Message;

/// Receives every snapshot a strategy produces.
pub type UpdateCallback = Arc<dyn Fn(Vec<Habit>) + Send + Sync + 'static>;

pub trait CollectionRefresh: Send + Sync {
    /// Starts delivering snapshots to `callback` until the returned subscription is dropped.
    ///
    /// Must be called from within a Tokio runtime.
    fn subscribe_to_updates(&self, callback: UpdateCallback) -> Subscription;
}

/// Handle to a running refresh task. Dropping it stops the task.
#[derive(Debug)]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    fn spawn<F>(fut: F) -> Self
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        Self {
            task: tokio::spawn(fut),
        }
    }

    /// True once the task has ended on its own (e.g. push without fallback after a
    /// disconnect).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Resolves once the task has ended on its own. Pending forever for strategies that never
    /// stop.
    pub async fn finished(&mut self) {
        if !self.task.is_finished() {
            let _ = (&mut self.task).await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[derive(Clone, Debug)]
pub struct PollingRefresh {
    api: HttpHabitApi,
    interval: Duration,
}

impl PollingRefresh {
    pub fn new(api: HttpHabitApi, interval: Duration) -> Self {
        Self { api, interval }
    }
}

impl CollectionRefresh for PollingRefresh {
    fn subscribe_to_updates(&self, callback: UpdateCallback) -> Subscription {
        Subscription::spawn(poll_loop(self.api.clone(), self.interval, callback))
    }
}

#[derive(Clone, Debug)]
pub struct PushRefresh {
    ws_url: String,
    fallback: Option<(HttpHabitApi, Duration)>,
}

impl PushRefresh {
    pub fn new(ws_url: impl Into<String>, fallback: Option<(HttpHabitApi, Duration)>) -> Self {
        Self {
            ws_url: ws_url.into(),
            fallback,
        }
    }
}

impl CollectionRefresh for PushRefresh {
    fn subscribe_to_updates(&self, callback: UpdateCallback) -> Subscription {
        let ws_url = self.ws_url.clone();
        let fallback = self.fallback.clone();

        Subscription::spawn(async move {
            match listen(&ws_url, &callback).await {
                Ok(()) => tracing::info!("real-time channel closed: {}", ws_url),
                Err(e) => tracing::warn!("real-time channel failed: {}", e),
            }

            if let Some((api, interval)) = fallback {
                tracing::info!("falling back to polling every {:?}", interval);
                poll_loop(api, interval, callback).await;
            }
        })
    }
}

/// Builds the strategy selected by `config`.
pub fn refresh_for(config: &ClientConfig, api: HttpHabitApi) -> Box<dyn CollectionRefresh> {
    match config.refresh() {
        RefreshMode::Poll { interval } => Box::new(PollingRefresh::new(api, interval)),
        RefreshMode::Push { fallback } => Box::new(PushRefresh::new(
            config.ws_url(),
            fallback.map(|interval| (api, interval)),
        )),
    }
}

async fn poll_loop(api: HttpHabitApi, interval: Duration, callback: UpdateCallback) {
    // `interval` panics on a zero period.
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        match api.list().await {
            Ok(habits) => callback(habits),
            Err(e) => tracing::warn!("Failed to load habits: {}", e),
        }
    }
}

async fn listen(ws_url: &str, callback: &UpdateCallback) -> ClientResult<()> {
    let (mut socket, _) = tokio_tungstenite::connect_async(ws_url).await?;
    tracing::debug!("connected to real-time channel {}", ws_url);

    while let Some(message) = socket.next().await {
        match message? {
            Message::Text(text) => match RealtimeEvent::from_json(&text) {
                Ok(event) if event.is_update_habits() => callback(event.data),
                Ok(event) => tracing::debug!("ignoring real-time event '{}'", event.event),
                Err(e) => tracing::warn!("undecodable real-time frame: {}", e),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    Ok(())
}
