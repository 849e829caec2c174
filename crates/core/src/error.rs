use habit_uuid::HabitId;

#[derive(Debug, thiserror::Error)]
pub enum HabitError {
    #[error("habit validation failed: {0}")]
    Validation(String),
    #[error("habit not found: {0}")]
    NotFound(HabitId),
    #[error("invalid habit id: {0}")]
    InvalidId(#[from] habit_uuid::UuidError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write habit file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read habit file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to remove habit file: {0}")]
    FileRemove(std::io::Error),
    #[error("failed to serialize habit: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize habit: {0}")]
    Deserialization(serde_json::Error),
    #[error("habit store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type HabitResult<T> = std::result::Result<T, HabitError>;
