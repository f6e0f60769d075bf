use crate::view_model::WorkflowView;
use crate::{
    Failure, GenerationResult, ModelName, OperationKind, RetryPolicy, SubmissionInput,
    UploadCandidate,
};

/// Lifecycle of the current submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Validating,
    Submitting(u32),
    Succeeded(GenerationResult),
    Failed(Failure),
}

impl WorkflowState {
    /// Validating or submitting: a new submission must be refused.
    pub fn is_busy(&self) -> bool {
        matches!(self, WorkflowState::Validating | WorkflowState::Submitting(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Succeeded(_) | WorkflowState::Failed(_))
    }
}

/// A submission accepted for validation. The model is the one selected at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingSubmission {
    pub(crate) kind: OperationKind,
    pub(crate) model: ModelName,
    pub(crate) input: SubmissionInput,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    workflow: WorkflowState,
    file: Option<UploadCandidate>,
    text: String,
    pending: Option<PendingSubmission>,
    last_kind: Option<OperationKind>,
    policy: RetryPolicy,
    notice: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn workflow(&self) -> &WorkflowState {
        &self.workflow
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn view(&self) -> WorkflowView {
        let attempt = match self.workflow {
            WorkflowState::Submitting(attempt) => Some(attempt),
            _ => None,
        };
        WorkflowView {
            workflow: self.workflow.clone(),
            attempt,
            max_attempts: self.policy.attempts(),
            file_name: self.file.as_ref().map(|file| file.file_name.clone()),
            text_len: self.text.chars().count(),
            notice: self.notice.clone(),
            can_submit: !self.workflow.is_busy(),
            can_retry: matches!(self.workflow, WorkflowState::Failed(_)) && self.last_kind.is_some(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn file(&self) -> Option<&UploadCandidate> {
        self.file.as_ref()
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn last_kind(&self) -> Option<OperationKind> {
        self.last_kind
    }

    pub(crate) fn set_file(&mut self, file: UploadCandidate) {
        self.file = Some(file);
        self.mark_dirty();
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
        self.mark_dirty();
    }

    pub(crate) fn reset_to_idle(&mut self) {
        self.workflow = WorkflowState::Idle;
        self.pending = None;
        self.notice = None;
        self.mark_dirty();
    }

    pub(crate) fn begin_validation(&mut self, pending: PendingSubmission) {
        self.last_kind = Some(pending.kind);
        self.pending = Some(pending);
        self.workflow = WorkflowState::Validating;
        self.notice = None;
        self.mark_dirty();
    }

    pub(crate) fn take_pending(&mut self) -> Option<PendingSubmission> {
        self.pending.take()
    }

    pub(crate) fn set_submitting(&mut self, attempt: u32) {
        self.workflow = WorkflowState::Submitting(attempt);
        self.mark_dirty();
    }

    pub(crate) fn succeed(&mut self, result: GenerationResult) {
        self.workflow = WorkflowState::Succeeded(result);
        // The uploaded file is consumed by a successful submission.
        self.file = None;
        self.notice = None;
        self.mark_dirty();
    }

    pub(crate) fn fail(&mut self, failure: Failure) {
        self.workflow = WorkflowState::Failed(failure);
        self.pending = None;
        self.notice = None;
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
