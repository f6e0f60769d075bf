//! Image2text core: pure workflow state machine, validation and response interpretation.
mod effect;
mod interpret;
mod msg;
mod outcome;
mod policy;
mod request;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use interpret::{interpret, interpret_transport_failure};
pub use msg::Msg;
pub use outcome::{
    AttemptOutcome, ErrorKind, Failure, GenerationResult, RetryCause, TransportFailure,
    WorkflowOutcome,
};
pub use policy::{RetryDecision, RetryPolicy};
pub use request::{
    build_request, ModelName, OperationKind, OperationRequest, PoetryBody, SubmissionInput,
    WorkflowType,
};
pub use state::{AppState, WorkflowState};
pub use update::update;
pub use validate::{
    validate, validate_dimensions, validate_submission, validate_text, RejectReason,
    UploadCandidate, ALLOWED_MIME_TYPES, MAX_UPLOAD_BYTES,
};
pub use view_model::WorkflowView;
