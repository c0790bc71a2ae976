//! 待機コーディネーター
//!
//! 全エンドポイントのプローバーを並列起動し、デッドラインタイマーの状態から
//! 全体の結果（全サービス起動 / タイムアウト）を決定する。

use crate::config::WaitConfig;
use crate::deadline::DeadlineTimer;
use crate::endpoint::Endpoint;
use crate::prober::Prober;
use crate::signal::CancellationSignal;
use std::fmt;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// Aggregate result of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every endpoint accepted a connection before the deadline
    AllUp,
    /// The deadline elapsed while waiting for one or more endpoints
    TimedOut,
}

impl RunOutcome {
    /// Process exit status for this outcome
    pub fn exit_code(self) -> i32 {
        match self {
            RunOutcome::AllUp => 0,
            RunOutcome::TimedOut => 1,
        }
    }

    /// Returns true for [`RunOutcome::AllUp`].
    pub fn is_success(self) -> bool {
        self == RunOutcome::AllUp
    }
}

/// Aggregate outcome plus prober counts of a run
///
/// Counts only; which endpoint failed is left to the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Resolved outcome
    pub outcome: RunOutcome,
    /// Probers that connected
    pub up: usize,
    /// Probers that gave up after the deadline (or whose task failed)
    pub timed_out: usize,
}

/// Lifecycle phases of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Spawning probers
    Collecting,
    /// Probers active, deadline armed
    Running,
    /// Waiting for every prober to finish
    Joining,
    /// Querying the deadline timer
    Resolving,
    /// Terminal
    Done(RunOutcome),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Collecting => f.write_str("collecting"),
            Phase::Running => f.write_str("running"),
            Phase::Joining => f.write_str("joining"),
            Phase::Resolving => f.write_str("resolving"),
            Phase::Done(RunOutcome::AllUp) => f.write_str("done(success)"),
            Phase::Done(RunOutcome::TimedOut) => f.write_str("done(timeout)"),
        }
    }
}

/// Fans out one prober per endpoint and resolves the aggregate outcome.
#[derive(Debug, Clone)]
pub struct Coordinator {
    endpoints: Vec<Endpoint>,
    config: WaitConfig,
}

impl Coordinator {
    /// Create a coordinator for the given endpoints
    pub fn new(endpoints: Vec<Endpoint>, config: WaitConfig) -> Self {
        Self { endpoints, config }
    }

    /// Endpoints this coordinator waits for
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Wait for every endpoint and resolve the outcome.
    ///
    /// Never returns early: all probers are joined before the deadline timer is
    /// consulted, even if some of them have already timed out.
    pub async fn run(&self) -> RunOutcome {
        self.run_summary().await.outcome
    }

    /// Like [`Coordinator::run`], but also returns how many probers connected.
    ///
    /// Dropping the returned future aborts every prober still running.
    pub async fn run_summary(&self) -> RunSummary {
        enter(Phase::Collecting);

        let signal = CancellationSignal::new();
        let mut probers = JoinSet::new();

        for endpoint in &self.endpoints {
            let prober = Prober::new(endpoint.clone())
                .with_connect_timeout(self.config.connect_timeout)
                .with_retry_interval(self.config.retry_interval);
            let signal = signal.clone();
            probers.spawn(async move {
                let outcome = prober.run(&signal).await;
                (prober.endpoint().name().to_string(), outcome)
            });
        }

        let timer = DeadlineTimer::arm(self.config.timeout, signal);
        enter(Phase::Running);

        enter(Phase::Joining);
        let mut up = 0;
        let mut timed_out = 0;
        while let Some(joined) = probers.join_next().await {
            match joined {
                Ok((_, outcome)) if outcome.is_up() => up += 1,
                Ok((name, _)) => {
                    timed_out += 1;
                    debug!(endpoint_name = %name, "Prober finished without connecting");
                }
                Err(e) => {
                    error!("Prober task join error: {}", e);
                    timed_out += 1;
                }
            }
        }
        debug!(up, timed_out, "All probers finished");

        enter(Phase::Resolving);
        // The timer may still fire between the join above and this disarm, which
        // reports a timeout although every prober succeeded. This window is
        // accepted; the endpoints were at the edge of the deadline anyway.
        let outcome = if timer.disarm() {
            RunOutcome::AllUp
        } else {
            RunOutcome::TimedOut
        };

        enter(Phase::Done(outcome));
        RunSummary {
            outcome,
            up,
            timed_out,
        }
    }
}

fn enter(phase: Phase) {
    debug!(phase = %phase, "Coordinator phase");
}

/// Wait for `endpoints` and log the final outcome.
///
/// This is the library-level counterpart of the `tcpgate` binary.
pub async fn wait_for_endpoints(endpoints: Vec<Endpoint>, config: WaitConfig) -> RunOutcome {
    let coordinator = Coordinator::new(endpoints, config);
    let outcome = coordinator.run().await;

    match outcome {
        RunOutcome::AllUp => info!("All services are up!"),
        RunOutcome::TimedOut => error!(
            timeout_secs = config.timeout.as_secs(),
            "One or more services timed out after {} second(s)",
            config.timeout.as_secs()
        ),
    }

    outcome
}
