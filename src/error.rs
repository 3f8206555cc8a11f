use thiserror::Error;

/// Unified error type for the chat relay
#[derive(Error, Debug)]
pub enum ChatError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Message codec errors
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    // Connection errors
    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Send timed out")]
    SendTimeout,

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for chat relay operations
pub type Result<T> = std::result::Result<T, ChatError>;

impl ChatError {
    /// Whether this error is local to a single connection rather than the
    /// whole process. Per-connection errors never abort the relay.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            ChatError::Decode(_)
                | ChatError::ConnectionClosed
                | ChatError::Transport(_)
                | ChatError::SendTimeout
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_classification() {
        assert!(ChatError::ConnectionClosed.is_connection_error());
        assert!(ChatError::Transport("reset".to_string()).is_connection_error());
        assert!(ChatError::SendTimeout.is_connection_error());

        assert!(!ChatError::InvalidConfig("bad".to_string()).is_connection_error());
        assert!(!ChatError::Internal("bad".to_string()).is_connection_error());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ChatError::InvalidConfig("CHAT_PORT must be a valid port number".to_string())
                .to_string(),
            "Invalid configuration: CHAT_PORT must be a valid port number"
        );
        assert_eq!(ChatError::SendTimeout.to_string(), "Send timed out");
    }

    #[test]
    fn test_decode_error_from_serde() {
        let err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: ChatError = err.into();
        assert!(matches!(err, ChatError::Decode(_)));
        assert!(err.is_connection_error());
    }
}
