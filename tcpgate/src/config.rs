//! Configuration management
//!
//! Provides the wait configuration consumed by the coordinator, plus helper
//! functions for reading environment variables with fallback to deprecated
//! variable names.

use crate::error::GateError;
use crate::prober::DEFAULT_CONNECT_TIMEOUT;
use std::time::Duration;

/// Default total time to wait for all endpoints
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Timing knobs for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Total time to wait for every endpoint to accept a connection.
    pub timeout: Duration,
    /// Timeout of a single connect attempt.
    pub connect_timeout: Duration,
    /// Pause between a failed attempt and the next one.
    pub retry_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            retry_interval: Duration::ZERO,
        }
    }
}

impl WaitConfig {
    /// Build a configuration, rejecting zero timeouts.
    pub fn new(
        timeout: Duration,
        connect_timeout: Duration,
        retry_interval: Duration,
    ) -> Result<Self, GateError> {
        if timeout.is_zero() {
            return Err(GateError::Config("timeout must be at least 1 second".into()));
        }
        if connect_timeout.is_zero() {
            return Err(GateError::Config(
                "connect timeout must be at least 1 millisecond".into(),
            ));
        }
        Ok(Self {
            timeout,
            connect_timeout,
            retry_interval,
        })
    }
}

/// Get an environment variable with fallback to a deprecated name
///
/// If the new variable name is set, returns its value.
/// If only the old (deprecated) variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Example
/// ```
/// use tcpgate::config::get_env_with_fallback;
///
/// let level = get_env_with_fallback("TCPGATE_LOG_LEVEL", "LOG_LEVEL");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}
