//! Constants used throughout the habit core crate.

/// Default directory for the file-backed store when no explicit directory is configured.
pub const DEFAULT_HABIT_DATA_DIR: &str = "habit_data";

/// Directory under the data directory that holds habit documents.
pub const HABITS_DIR_NAME: &str = "habits";

/// Filename of a single habit document inside its sharded directory.
pub const HABIT_DOCUMENT_FILENAME: &str = "habit.json";

/// Temporary filename used while a document is being rewritten.
pub const HABIT_DOCUMENT_TMP_FILENAME: &str = "habit.json.tmp";

/// Default number of snapshots buffered per real-time subscriber.
pub const DEFAULT_FANOUT_CAPACITY: usize = 16;
