use crate::WorkflowState;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowView {
    pub workflow: WorkflowState,
    pub attempt: Option<u32>,
    pub max_attempts: u32,
    pub file_name: Option<String>,
    pub text_len: usize,
    pub notice: Option<String>,
    pub can_submit: bool,
    pub can_retry: bool,
    pub dirty: bool,
}
