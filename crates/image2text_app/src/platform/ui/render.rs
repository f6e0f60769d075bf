use image2text_core::{GenerationResult, WorkflowState, WorkflowView};

/// Lines describing `view`. Empty when there is nothing worth printing.
pub fn render(view: &WorkflowView) -> Vec<String> {
    let mut lines = Vec::new();
    match &view.workflow {
        WorkflowState::Idle => {
            if let Some(notice) = &view.notice {
                lines.push(format!("! {notice}"));
            }
        }
        WorkflowState::Validating => {
            let subject = view.file_name.as_deref().unwrap_or("input");
            lines.push(format!("Checking {subject}..."));
        }
        WorkflowState::Submitting(attempt) => {
            if let Some(notice) = &view.notice {
                lines.push(format!("! {notice}"));
            }
            lines.push(format!(
                "Submitting (attempt {attempt}/{})...",
                view.max_attempts
            ));
        }
        WorkflowState::Succeeded(result) => render_result(result, &mut lines),
        WorkflowState::Failed(failure) => {
            lines.push(format!("Error: {}", failure.message));
            let suggestions = failure.suggestions();
            if !suggestions.is_empty() {
                lines.push("Suggestions:".to_string());
                lines.extend(suggestions.iter().map(|tip| format!("  - {tip}")));
            }
        }
    }
    lines
}

fn render_result(result: &GenerationResult, lines: &mut Vec<String>) {
    match result {
        GenerationResult::Postcard {
            postcard_image,
            text,
            original_image,
        } => {
            lines.push(format!("Postcard: {postcard_image}"));
            if let Some(text) = text {
                lines.push(format!("Text: {text}"));
            }
            if let Some(original) = original_image {
                lines.push(format!("Original: {original}"));
            }
        }
        GenerationResult::Resized(metadata) => {
            lines.push("Resized:".to_string());
            for (key, value) in metadata {
                let value = match value.as_str() {
                    Some(text) => text.to_string(),
                    None => value.to_string(),
                };
                lines.push(format!("  {key}: {value}"));
            }
        }
        GenerationResult::Poetry { comment, svg } => {
            if let Some(comment) = comment {
                lines.push(format!("Comment: {comment}"));
            }
            if let Some(svg) = svg {
                lines.push(svg.clone());
            }
        }
    }
}
