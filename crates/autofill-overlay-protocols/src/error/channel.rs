//! Messaging channel errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel disconnected")]
    Disconnected,

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Connection failed for port {0}")]
    ConnectionFailed(String),

    #[error("Invalid response to {command}: {message}")]
    InvalidResponse { command: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
