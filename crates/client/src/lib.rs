//! # Habit Client
//!
//! Client side of the habit tracker.
//!
//! This crate contains:
//! - [`HttpHabitApi`]: the four habit calls over HTTP
//! - [`HabitCache`]: the last fetched collection, replaced wholesale on every snapshot
//! - [`HabitFilter`] and [`HabitForm`]: view-side selection and transient edit state
//! - [`CollectionRefresh`]: polling and push strategies behind `subscribe_to_updates`
//! - [`HabitClient`]: ties the above together; the cache is only ever updated from the
//!   client's own update channel
//!
//! Used by the `habit` CLI and by anything else that wants to drive the server.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod form;
pub mod refresh;

pub use api::HttpHabitApi;
pub use app::HabitClient;
pub use cache::HabitCache;
pub use config::{ClientConfig, RefreshMode};
pub use error::{ClientError, ClientResult};
pub use filter::HabitFilter;
pub use form::{parse_tags, HabitForm, Submission};
pub use refresh::{
    refresh_for, CollectionRefresh, PollingRefresh, PushRefresh, Subscription, UpdateCallback,
};
