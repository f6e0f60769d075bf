use std::fmt;

use bytes::Bytes;

use crate::{OperationKind, SubmissionInput};

/// Largest file the service accepts, in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// MIME types the service can decode.
pub const ALLOWED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// A file picked by the user, ready to be validated and uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub file_name: String,
    pub bytes: Bytes,
    pub declared_size: u64,
    pub declared_type: String,
}

impl UploadCandidate {
    /// Builds a candidate whose declared size matches the byte length.
    pub fn new(
        file_name: impl Into<String>,
        declared_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            file_name: file_name.into(),
            declared_size: bytes.len() as u64,
            declared_type: declared_type.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Size,
    Type,
    Empty,
    Dimensions,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::Size => "size",
            RejectReason::Type => "type",
            RejectReason::Empty => "empty",
            RejectReason::Dimensions => "dimensions",
        }
    }

    /// Message shown to the user when a submission is rejected.
    pub fn message(self) -> &'static str {
        match self {
            RejectReason::Size => "Image must not exceed 5 MB",
            RejectReason::Type => "Please upload a JPG, PNG, GIF or WEBP image",
            RejectReason::Empty => "Please enter some text first",
            RejectReason::Dimensions => "Width and height must be at least 1 pixel",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks size first, then type.
pub fn validate(file: &UploadCandidate) -> Result<(), RejectReason> {
    if file.declared_size > MAX_UPLOAD_BYTES {
        return Err(RejectReason::Size);
    }
    let declared = file.declared_type.trim();
    if !ALLOWED_MIME_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(declared))
    {
        return Err(RejectReason::Type);
    }
    Ok(())
}

pub fn validate_text(text: &str) -> Result<(), RejectReason> {
    if text.trim().is_empty() {
        Err(RejectReason::Empty)
    } else {
        Ok(())
    }
}

pub fn validate_dimensions(width: u32, height: u32) -> Result<(), RejectReason> {
    if width == 0 || height == 0 {
        Err(RejectReason::Dimensions)
    } else {
        Ok(())
    }
}

/// Validates whatever the operation is about to send.
pub fn validate_submission(kind: OperationKind, input: &SubmissionInput) -> Result<(), RejectReason> {
    match input {
        SubmissionInput::File(file) => {
            validate(file)?;
            if let OperationKind::ImageResize { width, height } = kind {
                validate_dimensions(width, height)?;
            }
            Ok(())
        }
        SubmissionInput::Text(text) => validate_text(text),
    }
}
