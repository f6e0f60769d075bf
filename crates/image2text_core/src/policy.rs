use std::time::Duration;

use crate::{AttemptOutcome, RetryCause, WorkflowOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(60),
            backoff_step: Duration::from_millis(2000),
        }
    }
}

/// What the retry loop does after an attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryDecision {
    Finish(WorkflowOutcome),
    Retry {
        next_attempt: u32,
        delay: Duration,
        cause: RetryCause,
    },
}

impl RetryPolicy {
    /// Delay awaited before `attempt` (1-based). Linear: the n-th retry waits n steps.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt.saturating_sub(1)
    }

    /// A policy never allows fewer than one attempt.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    pub fn decide(&self, attempt: u32, outcome: AttemptOutcome) -> RetryDecision {
        match outcome {
            AttemptOutcome::Success(result) => RetryDecision::Finish(Ok(result)),
            AttemptOutcome::TerminalFailure(failure) => RetryDecision::Finish(Err(failure)),
            AttemptOutcome::RetryableFailure(cause) if attempt >= self.attempts() => {
                RetryDecision::Finish(Err(cause.into_failure()))
            }
            AttemptOutcome::RetryableFailure(cause) => {
                let next_attempt = attempt + 1;
                RetryDecision::Retry {
                    next_attempt,
                    delay: self.delay_before(next_attempt),
                    cause,
                }
            }
        }
    }
}
