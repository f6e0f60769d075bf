#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run the validator over the pending input and report back with `ValidationFinished`.
    Validate {
        kind: crate::OperationKind,
        input: crate::SubmissionInput,
    },
    /// Send the request through the retrying transport.
    Dispatch {
        request: crate::OperationRequest,
        policy: crate::RetryPolicy,
    },
    /// Show a transient notice (toast) to the user.
    ShowNotice(String),
}
