//! エンドポイントプローバー
//!
//! 1エンドポイントに対してTCP接続を繰り返し試行し、
//! 接続成功またはキャンセルシグナル検知で終了する。

use crate::endpoint::Endpoint;
use crate::signal::CancellationSignal;
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{info, trace, warn};

/// Default per-attempt connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// Terminal result of a single prober.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A connection was accepted
    Up,
    /// The deadline passed and the most recent attempt failed
    TimedOut {
        /// Error of the last connect attempt
        last_error: String,
    },
}

impl ProbeOutcome {
    /// Returns true for [`ProbeOutcome::Up`].
    pub fn is_up(&self) -> bool {
        matches!(self, ProbeOutcome::Up)
    }
}

/// Connect retry loop for one endpoint.
#[derive(Debug, Clone)]
pub struct Prober {
    endpoint: Endpoint,
    connect_timeout: Duration,
    retry_interval: Duration,
}

impl Prober {
    /// Create a prober with the default connect timeout and immediate retries.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            retry_interval: Duration::ZERO,
        }
    }

    /// Set the per-attempt connect timeout
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Set the pause between a failed attempt and the next one
    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    /// Target endpoint
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Run the retry loop until the endpoint is up or the signal is observed.
    ///
    /// The signal is only consulted after a failed attempt, so there is always
    /// at least one attempt and a successful last attempt wins over cancellation.
    pub async fn run(&self, signal: &CancellationSignal) -> ProbeOutcome {
        let target = self.endpoint.address_and_port();
        let mut attempts: u64 = 0;

        loop {
            attempts += 1;
            let err = match self.attempt(&target).await {
                Ok(()) => {
                    info!(
                        endpoint_name = %self.endpoint.name(),
                        address = %target,
                        attempts,
                        "Service is up"
                    );
                    return ProbeOutcome::Up;
                }
                Err(err) => err,
            };

            if signal.is_set() {
                warn!(
                    endpoint_name = %self.endpoint.name(),
                    address = %target,
                    attempts,
                    error = %err,
                    "Service timed out"
                );
                return ProbeOutcome::TimedOut {
                    last_error: err.to_string(),
                };
            }

            trace!(
                endpoint_name = %self.endpoint.name(),
                attempts,
                error = %err,
                "Connect attempt failed, retrying"
            );

            if !self.retry_interval.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(self.retry_interval) => {}
                    _ = signal.wait() => {}
                }
            }
        }
    }

    /// Single connect attempt; the connection is closed right away on success.
    async fn attempt(&self, target: &str) -> io::Result<()> {
        match timeout(self.connect_timeout, TcpStream::connect(target)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                Ok(())
            }
            Ok(Err(err)) => Err(err),
            Err(_) => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("connect timed out after {:?}", self.connect_timeout),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::net::TcpListener;

    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        port
    }

    #[tokio::test]
    async fn test_up_on_open_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let prober = Prober::new(Endpoint::new("WEB", "127.0.0.1", port).unwrap());

        let outcome = prober.run(&CancellationSignal::new()).await;
        assert_eq!(outcome, ProbeOutcome::Up);
    }

    #[tokio::test]
    async fn test_success_wins_over_set_signal() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let prober = Prober::new(Endpoint::new("WEB", "127.0.0.1", port).unwrap());

        let signal = CancellationSignal::new();
        signal.set();

        assert!(prober.run(&signal).await.is_up());
    }

    #[tokio::test]
    async fn test_single_attempt_when_already_cancelled() {
        let port = closed_port().await;
        let prober = Prober::new(Endpoint::new("DB", "127.0.0.1", port).unwrap());

        let signal = CancellationSignal::new();
        signal.set();

        let outcome = prober.run(&signal).await;
        assert!(matches!(outcome, ProbeOutcome::TimedOut { .. }));
    }

    #[tokio::test]
    async fn test_terminates_after_cancellation() {
        let port = closed_port().await;
        let connect_timeout = Duration::from_millis(200);
        let prober = Prober::new(Endpoint::new("DB", "127.0.0.1", port).unwrap())
            .with_connect_timeout(connect_timeout);

        let signal = CancellationSignal::new();
        let canceller = signal.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            canceller.set();
        });

        let start = Instant::now();
        let outcome = prober.run(&signal).await;
        let elapsed = start.elapsed();

        assert!(!outcome.is_up());
        assert!(
            elapsed < Duration::from_millis(300) + connect_timeout + Duration::from_millis(500),
            "prober took too long after cancellation: {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn test_becomes_up_after_retries() {
        let port = closed_port().await;
        let prober = Prober::new(Endpoint::new("CACHE", "127.0.0.1", port).unwrap())
            .with_retry_interval(Duration::from_millis(20));

        let server = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            let listener = TcpListener::bind(("127.0.0.1", port)).await.unwrap();
            // Keep listening until the prober has connected.
            let _ = listener.accept().await;
        });

        let signal = CancellationSignal::new();
        let outcome = tokio::time::timeout(Duration::from_secs(5), prober.run(&signal))
            .await
            .expect("prober should finish once the listener is up");
        assert!(outcome.is_up());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_retry_pause_ends_on_signal() {
        let port = closed_port().await;
        let prober = Prober::new(Endpoint::new("DB", "127.0.0.1", port).unwrap())
            .with_retry_interval(Duration::from_secs(30));

        let signal = CancellationSignal::new();
        let canceller = signal.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.set();
        });

        let outcome = tokio::time::timeout(Duration::from_secs(5), prober.run(&signal))
            .await
            .expect("retry pause should be cut short by the signal");
        assert!(!outcome.is_up());
    }
}
