//! 运行轮询：等待 Assistant run 到达终态。
//!
//! # Run Completion Poller
//!
//! Runs execute asynchronously upstream. [`wait_for_completion`] polls a run
//! until it reaches a terminal state, the deadline passes, or the caller
//! cancels. `requires_action` is reported as an error because this provider
//! never submits tool outputs.

use crate::types::run::{Run, RunStatus};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(600);

/// Anything that can report the current state of a run.
#[async_trait]
pub trait RunStatusSource: Send + Sync {
    async fn fetch_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollOptions {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_RUN_TIMEOUT,
        }
    }
}

/// Poll `run_id` until it completes.
///
/// Returns the completed run, or:
/// - [`Error::RunFailed`] for `failed`, `cancelled`, `expired` and `incomplete`;
/// - [`Error::RunRequiresAction`] for `requires_action`;
/// - [`Error::UnknownRunStatus`] for statuses this crate does not know;
/// - [`Error::RunTimeout`] once `timeout` has elapsed since the first poll;
/// - [`Error::Cancelled`] if `cancel` fires, checked before every poll and
///   raced against both the fetch and the sleep.
pub async fn wait_for_completion<S>(
    source: &S,
    thread_id: &str,
    run_id: &str,
    opts: PollOptions,
    cancel: &CancellationToken,
) -> Result<Run>
where
    S: RunStatusSource + ?Sized,
{
    let start = Instant::now();
    let mut polls: u32 = 0;
    let mut last_status = RunStatus::Queued;

    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled {
                operation: "run polling",
            });
        }

        let elapsed = start.elapsed();
        if polls > 0 && elapsed >= opts.timeout {
            warn!(
                run_id,
                thread_id,
                polls,
                last_status = %last_status,
                "run did not reach a terminal state before the deadline"
            );
            return Err(Error::RunTimeout {
                run_id: run_id.to_string(),
                timeout: opts.timeout,
                last_status,
            });
        }

        let run = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(Error::Cancelled { operation: "run polling" });
            }
            res = source.fetch_run(thread_id, run_id) => res?,
        };
        polls += 1;
        debug!(run_id, thread_id, polls, status = %run.status, "polled run");

        match &run.status {
            RunStatus::Completed => {
                info!(run_id, thread_id, polls, "run completed");
                return Ok(run);
            }
            RunStatus::Failed | RunStatus::Cancelled | RunStatus::Expired | RunStatus::Incomplete => {
                return Err(Error::RunFailed {
                    run_id: run_id.to_string(),
                    status: run.status.clone(),
                    reason: run.failure_reason(),
                });
            }
            RunStatus::RequiresAction => {
                return Err(Error::RunRequiresAction {
                    run_id: run_id.to_string(),
                });
            }
            status if status.is_pending() => {}
            other => {
                return Err(Error::UnknownRunStatus {
                    run_id: run_id.to_string(),
                    status: other.as_str().to_string(),
                });
            }
        }
        last_status = run.status;

        let remaining = opts.timeout.saturating_sub(start.elapsed());
        let pause = opts.interval.min(remaining);
        tokio::select! {
            _ = cancel.cancelled() => {
                return Err(Error::Cancelled { operation: "run polling" });
            }
            _ = tokio::time::sleep(pause) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Replays a fixed status sequence, repeating the last entry forever.
    struct ScriptedRun {
        statuses: Mutex<VecDeque<&'static str>>,
        polls: AtomicU32,
    }

    impl ScriptedRun {
        fn new(statuses: &[&'static str]) -> Self {
            Self {
                statuses: Mutex::new(statuses.iter().copied().collect()),
                polls: AtomicU32::new(0),
            }
        }

        fn polls(&self) -> u32 {
            self.polls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RunStatusSource for ScriptedRun {
        async fn fetch_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            let status = {
                let mut q = self.statuses.lock().unwrap();
                if q.len() > 1 {
                    q.pop_front().unwrap()
                } else {
                    *q.front().unwrap()
                }
            };
            let mut run = serde_json::json!({
                "id": run_id,
                "thread_id": thread_id,
                "assistant_id": "asst_1",
                "status": status,
            });
            if status == "failed" {
                run["last_error"] = serde_json::json!({"code": "server_error", "message": "boom"});
            }
            Ok(serde_json::from_value(run).unwrap())
        }
    }

    fn opts() -> PollOptions {
        PollOptions::new(Duration::from_secs(5), Duration::from_secs(60))
    }

    #[tokio::test(start_paused = true)]
    async fn test_completes_after_three_polls() {
        let source = ScriptedRun::new(&["queued", "in_progress", "completed"]);
        let cancel = CancellationToken::new();
        let start = Instant::now();

        let run = wait_for_completion(&source, "thread_1", "run_1", opts(), &cancel)
            .await
            .unwrap();

        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(source.polls(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_after_two_polls_carries_reason() {
        let source = ScriptedRun::new(&["in_progress", "failed"]);
        let cancel = CancellationToken::new();

        let err = wait_for_completion(&source, "thread_1", "run_1", opts(), &cancel)
            .await
            .unwrap_err();

        assert_eq!(source.polls(), 2);
        match err {
            Error::RunFailed { status, reason, .. } => {
                assert_eq!(status, RunStatus::Failed);
                assert!(reason.contains("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_terminal_times_out() {
        let source = ScriptedRun::new(&["queued", "in_progress"]);
        let cancel = CancellationToken::new();
        let start = Instant::now();
        let opts = PollOptions::new(Duration::from_secs(5), Duration::from_secs(12));

        let err = wait_for_completion(&source, "thread_1", "run_1", opts, &cancel)
            .await
            .unwrap_err();

        match err {
            Error::RunTimeout { last_status, timeout, .. } => {
                assert_eq!(last_status, RunStatus::InProgress);
                assert_eq!(timeout, Duration::from_secs(12));
            }
            other => panic!("unexpected error: {other}"),
        }
        // Polls at 0s, 5s and 10s, then a 2s sleep up to the deadline.
        assert_eq!(source.polls(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(12));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_sleep_is_not_a_timeout() {
        let source = ScriptedRun::new(&["in_progress"]);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(7)).await;
            trigger.cancel();
        });

        let err = wait_for_completion(&source, "thread_1", "run_1", opts(), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled { .. }), "{err}");
        assert_eq!(source.polls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_cancelled_never_polls() {
        let source = ScriptedRun::new(&["completed"]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = wait_for_completion(&source, "thread_1", "run_1", opts(), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled { .. }));
        assert_eq!(source.polls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_requires_action_and_unknown_are_errors() {
        let cancel = CancellationToken::new();

        let source = ScriptedRun::new(&["queued", "requires_action"]);
        let err = wait_for_completion(&source, "thread_1", "run_1", opts(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RunRequiresAction { .. }));
        assert!(err.to_string().contains("not supported"));

        let source = ScriptedRun::new(&["paused"]);
        let err = wait_for_completion(&source, "thread_1", "run_1", opts(), &cancel)
            .await
            .unwrap_err();
        match err {
            Error::UnknownRunStatus { status, .. } => assert_eq!(status, "paused"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelling_keeps_polling() {
        let source = ScriptedRun::new(&["cancelling", "cancelled"]);
        let cancel = CancellationToken::new();

        let err = wait_for_completion(&source, "thread_1", "run_1", opts(), &cancel)
            .await
            .unwrap_err();

        assert_eq!(source.polls(), 2);
        assert!(matches!(
            err,
            Error::RunFailed {
                status: RunStatus::Cancelled,
                ..
            }
        ));
    }
}
