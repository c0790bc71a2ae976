//! CLI module for tcpgate
//!
//! コマンドライン引数を解析し、待機処理を実行します。

use crate::config::WaitConfig;
use crate::coordinator::{wait_for_endpoints, RunOutcome};
use crate::discovery::discover_from_env;
use clap::Parser;
use std::time::Duration;
use tracing::info;

/// Wait for TCP services to accept connections before starting a dependent process
#[derive(Parser, Debug, Clone)]
#[command(name = "tcpgate")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"SERVICES:
    Every pair of <NAME>_TCP_ADDR / <NAME>_TCP_PORT environment variables is
    treated as a service to wait for. Entries with an invalid port are skipped.

ENVIRONMENT VARIABLES:
    TCPGATE_TIMEOUT             Total timeout in seconds (default: 60)
    TCPGATE_CONNECT_TIMEOUT_MS  Per-attempt connect timeout (default: 1000)
    TCPGATE_RETRY_INTERVAL_MS   Pause between attempts (default: 0)
    TCPGATE_LOG_LEVEL           Log level (default: info)

EXIT STATUS:
    0  all services are up
    1  one or more services timed out
    2  invalid configuration
"#)]
pub struct Cli {
    /// Time to wait for all services to be up (seconds)
    #[arg(short, long, default_value = "60", env = "TCPGATE_TIMEOUT")]
    pub timeout: u64,

    /// Timeout of a single connect attempt (milliseconds)
    #[arg(long, default_value = "1000", env = "TCPGATE_CONNECT_TIMEOUT_MS")]
    pub connect_timeout_ms: u64,

    /// Pause between failed connect attempts (milliseconds)
    #[arg(long, default_value = "0", env = "TCPGATE_RETRY_INTERVAL_MS")]
    pub retry_interval_ms: u64,
}

impl Cli {
    /// Convert the parsed arguments into a [`WaitConfig`].
    pub fn wait_config(&self) -> Result<WaitConfig, crate::error::GateError> {
        WaitConfig::new(
            Duration::from_secs(self.timeout),
            Duration::from_millis(self.connect_timeout_ms),
            Duration::from_millis(self.retry_interval_ms),
        )
    }
}

/// Discover services from the environment and wait for them.
pub async fn execute(cli: &Cli) -> Result<RunOutcome, anyhow::Error> {
    let config = cli.wait_config()?;

    let endpoints = discover_from_env();
    let names: Vec<String> = endpoints.iter().map(ToString::to_string).collect();
    info!(count = endpoints.len(), services = ?names, "Services");

    Ok(wait_for_endpoints(endpoints, config).await)
}
