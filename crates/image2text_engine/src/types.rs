use std::time::Duration;

use image2text_core::{RetryCause, TransportFailure};
use thiserror::Error;

/// Status and body of an HTTP response, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// No usable response was obtained for an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportFailure,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Progress reported by the retry loop while a workflow is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Attempt `attempt` is about to be sent, after waiting `delay`.
    AttemptStarted { attempt: u32, delay: Duration },
    RetryScheduled {
        failed_attempt: u32,
        delay: Duration,
        cause: RetryCause,
    },
}
