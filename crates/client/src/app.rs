//! The client application state.
//!
//! [`HabitClient`] owns the cache, the form and the filter. Snapshots reach the cache through
//! one channel: fetches made by the client itself and callbacks from a [`CollectionRefresh`]
//! both send into it, and [`HabitClient::apply_pending`] / [`HabitClient::next_update`]
//! drain it.

use crate::api::HttpHabitApi;
use crate::cache::HabitCache;
use crate::filter::HabitFilter;
use crate::form::{HabitForm, Submission};
use crate::refresh::{CollectionRefresh, Subscription};
use crate::{ClientError, ClientResult};
use habit_core::{Habit, HabitPatch};
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct HabitClient {
    api: HttpHabitApi,
    cache: HabitCache,
    pub form: HabitForm,
    pub filter: HabitFilter,
    updates_tx: mpsc::UnboundedSender<Vec<Habit>>,
    updates_rx: mpsc::UnboundedReceiver<Vec<Habit>>,
}

impl HabitClient {
    pub fn new(api: HttpHabitApi) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            api,
            cache: HabitCache::new(),
            form: HabitForm::new(),
            filter: HabitFilter::default(),
            updates_tx,
            updates_rx,
        }
    }

    pub fn api(&self) -> &HttpHabitApi {
        &self.api
    }

    pub fn cache(&self) -> &HabitCache {
        &self.cache
    }

    /// Cached habits that pass the current filter.
    pub fn visible(&self) -> Vec<&Habit> {
        self.cache.visible(&self.filter)
    }

    /// Starts `refresh`, routing its snapshots into this client's update channel.
    pub fn subscribe(&self, refresh: &dyn CollectionRefresh) -> Subscription {
        let tx = self.updates_tx.clone();
        refresh.subscribe_to_updates(Arc::new(move |habits: Vec<Habit>| {
            // The receiver lives as long as the client.
            let _ = tx.send(habits);
        }))
    }

    /// Applies every queued snapshot; only the newest one matters. Returns how many were
    /// drained.
    pub fn apply_pending(&mut self) -> usize {
        let mut latest = None;
        let mut drained = 0;
        while let Ok(habits) = self.updates_rx.try_recv() {
            latest = Some(habits);
            drained += 1;
        }
        if let Some(habits) = latest {
            self.cache.replace(habits);
        }
        drained
    }

    /// Waits for the next snapshot, then applies it and anything queued behind it.
    pub async fn next_update(&mut self) -> &HabitCache {
        if let Some(habits) = self.updates_rx.recv().await {
            self.cache.replace(habits);
            self.apply_pending();
        }
        &self.cache
    }

    /// Like [`next_update`](Self::next_update), but returns `None` once `subscription` has
    /// ended and every snapshot it delivered has been applied.
    pub async fn next_update_from(
        &mut self,
        subscription: &mut Subscription,
    ) -> Option<&HabitCache> {
        let received = tokio::select! {
            habits = self.updates_rx.recv() => habits,
            _ = subscription.finished() => None,
        };

        match received {
            Some(habits) => {
                self.cache.replace(habits);
                self.apply_pending();
                Some(&self.cache)
            }
            None if self.apply_pending() > 0 => Some(&self.cache),
            None => None,
        }
    }

    /// Fetches the collection and applies it.
    ///
    /// # Errors
    ///
    /// Returns an error if the list request fails; the cache is left as it was.
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let habits = self.api.list().await?;
        let _ = self.updates_tx.send(habits);
        self.apply_pending();
        Ok(())
    }

    /// Submits the form: update when editing, create otherwise.
    ///
    /// Returns `Ok(None)` without any request if name or category is empty. On success the
    /// form is reset and the collection re-fetched.
    ///
    /// # Errors
    ///
    /// Returns the server error if the write fails; the form keeps its contents.
    pub async fn submit(&mut self) -> ClientResult<Option<Habit>> {
        let habit = match self.form.submission() {
            None => return Ok(None),
            Some(Submission::Create(input)) => self.api.create(&input).await?,
            Some(Submission::Update { id, patch }) => self.api.update(&id, &patch).await?,
        };

        self.form.reset();
        self.refresh().await?;
        Ok(Some(habit))
    }

    /// Loads the cached habit `id` into the form for editing.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnknownHabit` if the cache has no habit with that id.
    pub fn start_edit(&mut self, id: &str) -> ClientResult<()> {
        let habit = self
            .cache
            .get(id)
            .ok_or_else(|| ClientError::UnknownHabit(id.to_string()))?;
        self.form.load(habit);
        Ok(())
    }

    /// Sets the completion flag of habit `id` and re-fetches.
    ///
    /// # Errors
    ///
    /// Returns the server error if the update fails.
    pub async fn set_completed(&mut self, id: &str, is_completed: bool) -> ClientResult<Habit> {
        let patch = HabitPatch {
            is_completed: Some(is_completed),
            ..Default::default()
        };
        let habit = self.api.update(id, &patch).await?;
        self.refresh().await?;
        Ok(habit)
    }

    /// Deletes habit `id` and re-fetches.
    ///
    /// # Errors
    ///
    /// Returns the server error if the delete fails.
    pub async fn delete(&mut self, id: &str) -> ClientResult<()> {
        self.api.delete(id).await?;
        self.refresh().await
    }
}
