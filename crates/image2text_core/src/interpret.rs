//! Maps raw HTTP responses onto attempt outcomes.
//!
//! 5xx statuses are reported as retryable here; the retry policy decides when
//! they become terminal. Everything else is final on the first attempt.

use serde_json::Value;

use crate::{
    AttemptOutcome, ErrorKind, Failure, GenerationResult, OperationKind, RetryCause,
    TransportFailure,
};

const RECHARGE_MARKER: &str = "recharge";

pub fn interpret(kind: OperationKind, status: u16, body: &[u8]) -> AttemptOutcome {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();

    if (500..600).contains(&status) {
        let message = parsed
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| format!("Server error (HTTP {status})"));
        return AttemptOutcome::RetryableFailure(RetryCause::ServerError { status, message });
    }

    if (200..300).contains(&status) {
        let Some(body) = parsed else {
            return malformed("The service returned a response that is not JSON");
        };
        if let Some(failure) = reported_failure(kind, &body) {
            return AttemptOutcome::TerminalFailure(failure);
        }
        return match extract_result(kind, &body) {
            Some(result) => AttemptOutcome::Success(result),
            None => malformed(missing_field_message(kind)),
        };
    }

    let failure = match parsed {
        Some(body) if is_recharge(&body) => recharge_failure(&body),
        Some(body) => Failure::new(
            ErrorKind::Generic,
            error_message(&body).unwrap_or_else(|| kind.failure_message().to_string()),
        ),
        None => Failure::new(
            ErrorKind::Generic,
            format!("{} (HTTP {status})", kind.failure_message()),
        ),
    };
    AttemptOutcome::TerminalFailure(failure)
}

/// No response was obtained for the attempt.
pub fn interpret_transport_failure(failure: TransportFailure, detail: &str) -> AttemptOutcome {
    match failure {
        TransportFailure::BodyTooLarge => malformed("The service response was too large"),
        TransportFailure::InvalidRequest => AttemptOutcome::TerminalFailure(Failure::new(
            ErrorKind::Generic,
            format!("The request could not be sent: {detail}"),
        )),
        TransportFailure::Timeout | TransportFailure::Connect | TransportFailure::Network => {
            AttemptOutcome::RetryableFailure(RetryCause::Transport {
                failure,
                detail: detail.to_string(),
            })
        }
    }
}

/// A 2xx body may still carry an `error` field. Only a truthy value counts:
/// `""`, `false`, `0` and `null` leave the result intact.
fn reported_failure(kind: OperationKind, body: &Value) -> Option<Failure> {
    if !body.get("error").is_some_and(is_truthy) {
        return None;
    }
    if is_recharge(body) {
        return Some(recharge_failure(body));
    }
    Some(Failure::new(
        ErrorKind::Generic,
        error_message(body).unwrap_or_else(|| kind.failure_message().to_string()),
    ))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn is_recharge(body: &Value) -> bool {
    body.get("type").and_then(Value::as_str) == Some(RECHARGE_MARKER)
}

fn recharge_failure(body: &Value) -> Failure {
    Failure::new(
        ErrorKind::RechargeRequired,
        error_message(body).unwrap_or_else(|| "The service has run out of credit".to_string()),
    )
}

/// `error` wins over `detail`. FastAPI validation errors put a list in `detail`.
fn error_message(body: &Value) -> Option<String> {
    ["error", "detail"].iter().find_map(|key| match body.get(*key) {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.clone()),
        Some(Value::Null) | Some(Value::String(_)) | None => None,
        Some(other) => Some(other.to_string()),
    })
}

fn extract_result(kind: OperationKind, body: &Value) -> Option<GenerationResult> {
    match kind {
        OperationKind::ImageGenerate { .. } => {
            let postcard_image = non_empty_str(body, "postcard_image")?;
            Some(GenerationResult::Postcard {
                postcard_image,
                text: non_empty_str(body, "text"),
                original_image: non_empty_str(body, "original_image"),
            })
        }
        OperationKind::ImageResize { .. } => body.as_object().cloned().map(GenerationResult::Resized),
        OperationKind::PoetryGenerate => {
            let comment = non_empty_str(body, "comment");
            let svg = non_empty_str(body, "svg");
            if comment.is_none() && svg.is_none() {
                return None;
            }
            Some(GenerationResult::Poetry { comment, svg })
        }
    }
}

fn non_empty_str(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

fn missing_field_message(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::ImageGenerate { .. } => "The service response has no postcard image",
        OperationKind::ImageResize { .. } => "The service response has no image metadata",
        OperationKind::PoetryGenerate => "The service response has no poem",
    }
}

fn malformed(message: &str) -> AttemptOutcome {
    AttemptOutcome::TerminalFailure(Failure::new(ErrorKind::MalformedResponse, message))
}
