//! HTTP client for the habit endpoints.

use crate::config::{ClientConfig, REQUEST_TIMEOUT};
use crate::{ClientError, ClientResult};
use api_shared::{ErrorRes, MessageRes};
use habit_core::{Habit, HabitId, HabitPatch, NewHabit};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// API client for the four habit operations.
#[derive(Clone, Debug)]
pub struct HttpHabitApi {
    client: Client,
    habits_url: String,
}

impl HttpHabitApi {
    /// Creates a new API client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            habits_url: config.habits_url(),
        })
    }

    /// Lists every habit, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn list(&self) -> ClientResult<Vec<Habit>> {
        let response = self.client.get(&self.habits_url).send().await?;
        read_json(response).await
    }

    /// Creates a habit.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with the server's message if validation fails.
    pub async fn create(&self, input: &NewHabit) -> ClientResult<Habit> {
        let response = self
            .client
            .post(&self.habits_url)
            .json(input)
            .send()
            .await?;
        read_json(response).await
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// - `ClientError::InvalidId` if `id` is not a canonical habit id; nothing is sent.
    /// - `ClientError::Api` if the id is unknown or the patch is invalid.
    pub async fn update(&self, id: &str, patch: &HabitPatch) -> ClientResult<Habit> {
        let url = self.habit_url(id)?;
        let response = self.client.put(&url).json(patch).send().await?;
        read_json(response).await
    }

    /// Deletes a habit. Deleting an unknown id succeeds.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidId` if `id` is not a canonical habit id; nothing is sent.
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let url = self.habit_url(id)?;
        let response = self.client.delete(&url).send().await?;
        let confirmation: MessageRes = read_json(response).await?;
        tracing::debug!("delete {}: {}", id, confirmation.message);
        Ok(())
    }

    /// Only canonical ids reach the URL, so a stray `/` or `?` cannot change the route.
    fn habit_url(&self, id: &str) -> ClientResult<String> {
        let id = HabitId::parse(id).map_err(|e| ClientError::InvalidId(e.to_string()))?;
        Ok(format!("{}/{}", self.habits_url, id))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    if response.status().is_success() {
        return Ok(response.json().await?);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorRes>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    Err(ClientError::Api { status, message })
}
