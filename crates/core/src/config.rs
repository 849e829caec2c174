//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the store and
//! fan-out. Request handling never reads process-wide environment variables.

use crate::constants::{DEFAULT_FANOUT_CAPACITY, HABITS_DIR_NAME};
use crate::{HabitError, HabitResult};
use std::path::PathBuf;
use std::str::FromStr;

/// Which [`crate::HabitStore`] backend to open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    /// Process-local collection, lost on restart.
    Memory,
    /// One JSON document per habit under the data directory.
    File,
}

impl FromStr for StoreKind {
    type Err = HabitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            other => Err(HabitError::InvalidConfig(format!(
                "unknown store kind '{}' (expected 'memory' or 'file')",
                other
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    store_kind: StoreKind,
    data_dir: PathBuf,
    fanout_capacity: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::InvalidConfig` if `fanout_capacity` is zero.
    pub fn new(
        store_kind: StoreKind,
        data_dir: PathBuf,
        fanout_capacity: usize,
    ) -> HabitResult<Self> {
        if fanout_capacity == 0 {
            return Err(HabitError::InvalidConfig(
                "fanout capacity must be greater than zero".into(),
            ));
        }

        Ok(Self {
            store_kind,
            data_dir,
            fanout_capacity,
        })
    }

    /// In-memory configuration, mostly useful for tests and demos.
    pub fn in_memory() -> Self {
        Self {
            store_kind: StoreKind::Memory,
            data_dir: PathBuf::new(),
            fanout_capacity: DEFAULT_FANOUT_CAPACITY,
        }
    }

    pub fn store_kind(&self) -> StoreKind {
        self.store_kind
    }

    /// Directory holding the habit documents of the file store.
    pub fn habits_dir(&self) -> PathBuf {
        self.data_dir.join(HABITS_DIR_NAME)
    }

    pub fn fanout_capacity(&self) -> usize {
        self.fanout_capacity
    }
}

/// Parse the store kind from an optional string value.
///
/// If `value` is `None` or empty/whitespace, the file store is used.
pub fn store_kind_from_env_value(value: Option<String>) -> HabitResult<StoreKind> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<StoreKind>()).transpose()?;

    Ok(parsed.unwrap_or(StoreKind::File))
}

/// Parse the fan-out capacity from an optional string value.
///
/// If `value` is `None` or empty/whitespace, [`DEFAULT_FANOUT_CAPACITY`] is used.
pub fn fanout_capacity_from_env_value(value: Option<String>) -> HabitResult<usize> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_FANOUT_CAPACITY),
        Some(v) => v.parse::<usize>().map_err(|e| {
            HabitError::InvalidConfig(format!("invalid fanout capacity '{}': {}", v, e))
        }),
    }
}
