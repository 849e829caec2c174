use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("websocket error: {0}")]
    WebSocket(#[from] Box<tokio_tungstenite::tungstenite::Error>),
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid habit id: {0}")]
    InvalidId(String),
    #[error("habit {0} is not in the local cache")]
    UnknownHabit(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(e))
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
