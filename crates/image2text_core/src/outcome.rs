use std::fmt;

use serde_json::{Map, Value};

/// Closed set of failure classes a workflow can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RechargeRequired,
    Generic,
    Network,
    MalformedResponse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::RechargeRequired => write!(f, "recharge required"),
            ErrorKind::Generic => write!(f, "generic error"),
            ErrorKind::Network => write!(f, "network error"),
            ErrorKind::MalformedResponse => write!(f, "malformed response"),
        }
    }
}

/// A terminal failure with a message fit for direct display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Things the user can do about it. Only quota exhaustion has any.
    pub fn suggestions(&self) -> &'static [&'static str] {
        match self.kind {
            ErrorKind::RechargeRequired => &[
                "Wait a moment, the balance may be topped up soon",
                "Come back later and try again",
                "Grab a coffee while the service recovers",
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// What a successful response carried.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    Postcard {
        postcard_image: String,
        text: Option<String>,
        original_image: Option<String>,
    },
    Resized(Map<String, Value>),
    Poetry {
        comment: Option<String>,
        svg: Option<String>,
    },
}

/// Transport-level failure classes, as seen by the pure core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Connect,
    Network,
    BodyTooLarge,
    InvalidRequest,
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Timeout => write!(f, "timeout"),
            TransportFailure::Connect => write!(f, "connection failed"),
            TransportFailure::Network => write!(f, "network error"),
            TransportFailure::BodyTooLarge => write!(f, "response body too large"),
            TransportFailure::InvalidRequest => write!(f, "invalid request"),
        }
    }
}

/// Why an attempt may be worth repeating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryCause {
    Transport {
        failure: TransportFailure,
        detail: String,
    },
    ServerError {
        status: u16,
        message: String,
    },
}

impl RetryCause {
    /// The failure reported when no attempts remain.
    pub fn into_failure(self) -> Failure {
        match self {
            RetryCause::Transport { .. } => Failure::new(
                ErrorKind::Network,
                "Network error, please try again later",
            ),
            RetryCause::ServerError { message, .. } => Failure::new(ErrorKind::Generic, message),
        }
    }
}

impl fmt::Display for RetryCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryCause::Transport { failure, detail } => write!(f, "{failure}: {detail}"),
            RetryCause::ServerError { status, message } => {
                write!(f, "server error {status}: {message}")
            }
        }
    }
}

/// Result of a single HTTP attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Success(GenerationResult),
    RetryableFailure(RetryCause),
    TerminalFailure(Failure),
}

/// Final result of a workflow after all attempts.
pub type WorkflowOutcome = Result<GenerationResult, Failure>;
