//! ロギング初期化ユーティリティ

use crate::config::get_env_with_fallback_or;
use crate::error::GateError;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Default filter when no log level is configured
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Install the global tracing subscriber.
///
/// Output goes to stderr so the gated process keeps stdout to itself. The
/// filter is read from `TCPGATE_LOG_LEVEL` (legacy: `LOG_LEVEL`) and accepts
/// full `EnvFilter` directives such as `tcpgate=debug`.
pub fn init() -> Result<(), GateError> {
    let level = get_env_with_fallback_or("TCPGATE_LOG_LEVEL", "LOG_LEVEL", DEFAULT_LOG_LEVEL);
    let filter = build_filter(&level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init()
        .map_err(|e| GateError::Logging(e.to_string()))
}

fn build_filter(level: &str) -> Result<EnvFilter, GateError> {
    EnvFilter::try_new(level)
        .map_err(|e| GateError::Logging(format!("invalid log filter '{}': {}", level, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_levels_and_directives() {
        assert!(build_filter("info").is_ok());
        assert!(build_filter("tcpgate=debug,warn").is_ok());
    }

    #[test]
    fn test_build_filter_rejects_garbage() {
        assert!(matches!(
            build_filter("tcpgate=notalevel"),
            Err(GateError::Logging(_))
        ));
    }
}
