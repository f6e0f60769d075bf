use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use image2text_core::{
    interpret, interpret_transport_failure, AttemptOutcome, OperationRequest, RetryDecision,
    RetryPolicy, WorkflowOutcome,
};

use crate::{EngineEvent, Transport};

/// Waits between attempts. Tests swap in a recorder.
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Receives retry-loop progress as it happens.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Runs a request through a [`Transport`] under a [`RetryPolicy`].
///
/// Attempts are strictly sequential: attempt `n + 1` is only sent after the
/// outcome of attempt `n` is known and the backoff delay has elapsed. Each
/// attempt re-sends the same request, so the backend may see duplicates.
pub struct RetryingTransport<T, S = TokioSleeper> {
    transport: T,
    sleeper: S,
}

impl<T: Transport> RetryingTransport<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            sleeper: TokioSleeper,
        }
    }
}

impl<T: Transport, S: Sleeper> RetryingTransport<T, S> {
    pub fn with_sleeper(transport: T, sleeper: S) -> Self {
        Self { transport, sleeper }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// One HTTP roundtrip, interpreted.
    pub async fn attempt(&self, request: &OperationRequest, timeout: Duration) -> AttemptOutcome {
        let kind = request.kind();
        match self.transport.send(request, timeout).await {
            Ok(response) => {
                engine_debug!(
                    "{} answered status={} body_len={}",
                    kind.endpoint(),
                    response.status,
                    response.body.len()
                );
                interpret(kind, response.status, &response.body)
            }
            Err(err) => {
                engine_debug!("{} transport error: {}", kind.endpoint(), err);
                interpret_transport_failure(err.kind, &err.message)
            }
        }
    }

    pub async fn send(
        &self,
        request: &OperationRequest,
        policy: &RetryPolicy,
        sink: &dyn EventSink,
    ) -> WorkflowOutcome {
        let endpoint = request.kind().endpoint();
        let mut attempt = 1;
        let mut delay = Duration::ZERO;

        loop {
            if !delay.is_zero() {
                self.sleeper.sleep(delay).await;
            }
            sink.emit(EngineEvent::AttemptStarted { attempt, delay });
            engine_info!(
                "{} attempt {}/{} after {}ms",
                endpoint,
                attempt,
                policy.attempts(),
                delay.as_millis()
            );

            let outcome = self.attempt(request, policy.attempt_timeout).await;
            match policy.decide(attempt, outcome) {
                RetryDecision::Finish(outcome) => {
                    match &outcome {
                        Ok(_) => engine_info!("{} succeeded on attempt {}", endpoint, attempt),
                        Err(failure) => {
                            engine_warn!("{} failed on attempt {}: {}", endpoint, attempt, failure)
                        }
                    }
                    return outcome;
                }
                RetryDecision::Retry {
                    next_attempt,
                    delay: next_delay,
                    cause,
                } => {
                    engine_warn!(
                        "{} attempt {} failed ({}), retrying in {}ms",
                        endpoint,
                        attempt,
                        cause,
                        next_delay.as_millis()
                    );
                    sink.emit(EngineEvent::RetryScheduled {
                        failed_attempt: attempt,
                        delay: next_delay,
                        cause,
                    });
                    attempt = next_attempt;
                    delay = next_delay;
                }
            }
        }
    }
}
