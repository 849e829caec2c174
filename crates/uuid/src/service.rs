//! Internal implementation of habit identifiers and creation timestamps.

use crate::{UuidError, UuidResult};
use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Canonical habit identifier (32 lowercase hex characters, no hyphens).
///
/// Once constructed, the contained UUID is guaranteed to be in canonical form, so it can be
/// used directly as a document key and to derive storage paths.
///
/// # Construction
/// - [`HabitId::new`] generates a fresh identifier (stores call this on insert).
/// - [`HabitId::parse`] validates an externally supplied identifier.
///
/// # Display format
/// Always the canonical 32-character lowercase hex form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HabitId(Uuid);

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl HabitId {
    /// Generates a new random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be canonical.
    ///
    /// Hyphenated or uppercase forms are rejected rather than normalised, so the same habit can
    /// never be addressed by two different strings.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if Self::is_canonical(input) {
            return Uuid::parse_str(input).map(Self).map_err(|e| {
                UuidError::InvalidInput(format!("invalid habit id '{}': {}", input, e))
            });
        }
        Err(UuidError::InvalidInput(format!(
            "habit id must be 32 lowercase hex characters without hyphens, got: '{}'",
            input
        )))
    }

    /// Returns true if `input` is in canonical form.
    ///
    /// Purely syntactic: exactly 32 bytes, each one of `0-9` or `a-f`.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Returns `parent_dir/<s1>/<s2>/<id>/` where `s1`/`s2` are the first two pairs of hex
    /// characters of this identifier.
    ///
    /// Keeps any single directory from accumulating every document in the collection.
    pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        let canonical = self.0.simple().to_string();
        let s1 = &canonical[0..2];
        let s2 = &canonical[2..4];
        parent_dir.join(s1).join(s2).join(&canonical)
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for HabitId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HabitId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for HabitId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for HabitId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        HabitId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Hands out `createdAt` timestamps for newly inserted documents.
///
/// Timestamps have millisecond precision. Each call to [`CreationClock::next`] returns a value
/// strictly greater than the previous one (bumped by 1 ms if the wall clock has not advanced),
/// which makes "newest first" a total order even for creations in the same millisecond.
#[derive(Debug, Default)]
pub struct CreationClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl CreationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an existing timestamp so that later values sort after it.
    ///
    /// Stores call this for every document they load at startup.
    pub fn observe(&self, timestamp: DateTime<Utc>) {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        match *last {
            Some(prev) if prev >= timestamp => {}
            _ => *last = Some(timestamp),
        }
    }

    /// Returns the next creation timestamp.
    pub fn next(&self) -> DateTime<Utc> {
        let now = truncate_to_millis(Utc::now());
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());

        let timestamp = match *last {
            Some(prev) if now <= prev => prev + Duration::milliseconds(1),
            _ => now,
        };
        *last = Some(timestamp);
        timestamp
    }
}

fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ts.timestamp_millis()).unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generates_canonical_id() {
        let id = HabitId::new();
        let canonical = id.to_string();

        assert_eq!(canonical.len(), 32);
        assert!(HabitId::is_canonical(&canonical));
    }

    #[test]
    fn test_new_ids_are_distinct() {
        assert_ne!(HabitId::new(), HabitId::new());
    }

    #[test]
    fn test_parse_valid_canonical_id() {
        let canonical = "550e8400e29b41d4a716446655440000";
        let id = HabitId::parse(canonical).expect("canonical id should parse");
        assert_eq!(id.to_string(), canonical);
    }

    #[test]
    fn test_parse_rejects_hyphenated_id() {
        let result = HabitId::parse("550e8400-e29b-41d4-a716-446655440000");
        match result {
            Err(UuidError::InvalidInput(msg)) => {
                assert!(msg.contains("32 lowercase hex characters"));
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_parse_rejects_uppercase_and_wrong_length() {
        assert!(HabitId::parse("550E8400E29B41D4A716446655440000").is_err());
        assert!(HabitId::parse("550e8400e29b41d4a71644665544000").is_err());
        assert!(HabitId::parse("550e8400e29b41d4a7164466554400000").is_err());
        assert!(HabitId::parse("").is_err());
    }

    #[test]
    fn test_sharded_dir_layout() {
        let id = HabitId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let dir = id.sharded_dir(Path::new("/data/habits"));
        assert_eq!(
            dir,
            PathBuf::from("/data/habits/55/0e/550e8400e29b41d4a716446655440000")
        );
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let id = HabitId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"550e8400e29b41d4a716446655440000\"");

        let back: HabitId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<HabitId>("\"not-an-id\"").is_err());
    }

    #[test]
    fn test_clock_is_strictly_increasing() {
        let clock = CreationClock::new();
        let mut prev = clock.next();
        for _ in 0..50 {
            let next = clock.next();
            assert!(next > prev, "{next} should be after {prev}");
            prev = next;
        }
    }

    #[test]
    fn test_clock_continues_after_observed_future_timestamp() {
        let clock = CreationClock::new();
        let future = truncate_to_millis(Utc::now()) + Duration::hours(1);
        clock.observe(future);

        assert_eq!(clock.next(), future + Duration::milliseconds(1));
    }

    #[test]
    fn test_clock_has_millisecond_precision() {
        let ts = CreationClock::new().next();
        assert_eq!(ts.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
