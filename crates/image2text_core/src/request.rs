use std::fmt;

use serde::{Deserialize, Serialize};

use crate::UploadCandidate;

/// Generation model chosen by the user. Copied into each request at build time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelName(String);

impl ModelName {
    pub const DEFAULT: &'static str = "deepseek";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ModelName {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Copywriting style of the postcard workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowType {
    #[default]
    Mood,
    Sarcastic,
}

impl WorkflowType {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowType::Mood => "mood",
            WorkflowType::Sarcastic => "sarcastic",
        }
    }
}

/// What the user asked for, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    ImageGenerate { workflow_type: WorkflowType },
    ImageResize { width: u32, height: u32 },
    PoetryGenerate,
}

impl OperationKind {
    pub fn needs_file(self) -> bool {
        !matches!(self, OperationKind::PoetryGenerate)
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            OperationKind::ImageGenerate { .. } => "process-image",
            OperationKind::ImageResize { .. } => "resize-image",
            OperationKind::PoetryGenerate => "process-poetry",
        }
    }

    /// Fallback message when a failed response carries none.
    pub fn failure_message(self) -> &'static str {
        match self {
            OperationKind::ImageResize { .. } => "Resize failed, please try again",
            OperationKind::ImageGenerate { .. } | OperationKind::PoetryGenerate => {
                "Generation failed, please try again"
            }
        }
    }
}

/// Payload the operation runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionInput {
    File(UploadCandidate),
    Text(String),
}

/// JSON body of a poetry request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoetryBody<'a> {
    pub text: &'a str,
    pub model: &'a str,
}

/// A fully built request. Retries re-send a clone of the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    ImageGenerate {
        file: UploadCandidate,
        workflow_type: WorkflowType,
        model: ModelName,
    },
    ImageResize {
        file: UploadCandidate,
        width: u32,
        height: u32,
    },
    PoetryGenerate {
        text: String,
        model: ModelName,
    },
}

impl OperationRequest {
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationRequest::ImageGenerate { workflow_type, .. } => OperationKind::ImageGenerate {
                workflow_type: *workflow_type,
            },
            OperationRequest::ImageResize { width, height, .. } => OperationKind::ImageResize {
                width: *width,
                height: *height,
            },
            OperationRequest::PoetryGenerate { .. } => OperationKind::PoetryGenerate,
        }
    }
}

/// Assembles the request for `kind`.
///
/// # Panics
///
/// Panics when `input` does not match `kind` (a file operation given text,
/// or poetry given a file). Callers pick the input from `kind`, so this is a
/// programming error rather than a runtime condition.
pub fn build_request(
    kind: OperationKind,
    input: SubmissionInput,
    current_model: &ModelName,
) -> OperationRequest {
    match (kind, input) {
        (OperationKind::ImageGenerate { workflow_type }, SubmissionInput::File(file)) => {
            OperationRequest::ImageGenerate {
                file,
                workflow_type,
                model: current_model.clone(),
            }
        }
        (OperationKind::ImageResize { width, height }, SubmissionInput::File(file)) => {
            OperationRequest::ImageResize {
                file,
                width,
                height,
            }
        }
        (OperationKind::PoetryGenerate, SubmissionInput::Text(text)) => {
            OperationRequest::PoetryGenerate {
                text,
                model: current_model.clone(),
            }
        }
        (kind, _) => unreachable!("input does not match operation {kind:?}"),
    }
}
