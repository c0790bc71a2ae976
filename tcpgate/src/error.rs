//! エラー型定義
//!
//! 統一エラー型（thiserror使用）

use thiserror::Error;

/// Endpoint validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// Service name is empty
    #[error("Endpoint name must not be empty")]
    EmptyName,

    /// Host address is empty
    #[error("Endpoint address must not be empty")]
    EmptyAddress,

    /// Port is not an integer in 1..=65535
    #[error("Invalid port: '{value}'")]
    InvalidPort {
        /// Raw port value as it was supplied
        value: String,
    },
}

/// tcpgate error type
#[derive(Debug, Error)]
pub enum GateError {
    /// Endpoint validation error
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Logging initialization error
    #[error("Logging error: {0}")]
    Logging(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_port_message_contains_value() {
        let err = EndpointError::InvalidPort {
            value: "http".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid port: 'http'");
    }

    #[test]
    fn test_endpoint_error_is_transparent() {
        let err: GateError = EndpointError::EmptyAddress.into();
        assert_eq!(err.to_string(), "Endpoint address must not be empty");
    }
}
