use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("malformed message: {0}")]
    MalformedMessage(#[from] serde_json::Error),

    #[error("unrecognized message type: {0}")]
    UnrecognizedMessage(String),

    #[error("api error: status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("missing access token")]
    MissingToken,
}

impl ClientError {
    /// Returns whether the failed operation can be retried as-is
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::WebSocket(_))
    }
}
