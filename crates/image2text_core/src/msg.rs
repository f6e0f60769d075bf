use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked or dropped a file.
    FileSelected(crate::UploadCandidate),
    /// User edited the poetry text box.
    TextChanged(String),
    /// User clicked the generate/resize button. `model` is the selector value at click time.
    SubmitClicked {
        kind: crate::OperationKind,
        model: crate::ModelName,
    },
    /// User clicked the retry button on a failed workflow.
    RetryClicked { model: crate::ModelName },
    /// User dismissed a finished workflow.
    ResetClicked,
    /// Validator verdict for the submission in `Validating`.
    ValidationFinished(Result<(), crate::RejectReason>),
    /// Engine started an HTTP attempt (1-based).
    AttemptStarted { attempt: u32 },
    /// Engine will retry after a transient failure.
    RetryScheduled {
        failed_attempt: u32,
        delay: Duration,
        cause: crate::RetryCause,
    },
    /// Engine gave its final answer for the submission.
    WorkflowFinished(crate::WorkflowOutcome),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
