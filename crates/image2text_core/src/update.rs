use crate::state::PendingSubmission;
use crate::{
    build_request, AppState, Effect, ErrorKind, Failure, ModelName, Msg, OperationKind,
    SubmissionInput, WorkflowState,
};

const NEED_FILE_NOTICE: &str = "Please upload an image first";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected(file) => {
            // The in-flight request owns its own copy; a new pick waits until it is done.
            if state.workflow().is_busy() {
                return (state, Vec::new());
            }
            state.set_file(file);
            state.reset_to_idle();
            Vec::new()
        }
        Msg::TextChanged(text) => {
            state.set_text(text);
            if state.workflow().is_terminal() {
                state.reset_to_idle();
            }
            Vec::new()
        }
        Msg::SubmitClicked { kind, model } => {
            if *state.workflow() != WorkflowState::Idle {
                return (state, Vec::new());
            }
            submit(&mut state, kind, model)
        }
        Msg::RetryClicked { model } => {
            let failed = matches!(state.workflow(), WorkflowState::Failed(_));
            match state.last_kind() {
                Some(kind) if failed => {
                    state.reset_to_idle();
                    submit(&mut state, kind, model)
                }
                _ => Vec::new(),
            }
        }
        Msg::ResetClicked => {
            if state.workflow().is_terminal() {
                state.reset_to_idle();
            }
            Vec::new()
        }
        Msg::ValidationFinished(verdict) => {
            if *state.workflow() != WorkflowState::Validating {
                return (state, Vec::new());
            }
            let Some(pending) = state.take_pending() else {
                return (state, Vec::new());
            };
            match verdict {
                Err(reason) => {
                    state.fail(Failure::new(ErrorKind::Generic, reason.message()));
                    Vec::new()
                }
                Ok(()) => {
                    let request = build_request(pending.kind, pending.input, &pending.model);
                    state.set_submitting(1);
                    vec![Effect::Dispatch {
                        request,
                        policy: state.policy(),
                    }]
                }
            }
        }
        Msg::AttemptStarted { attempt } => {
            if matches!(state.workflow(), WorkflowState::Submitting(_)) {
                state.set_submitting(attempt);
            }
            Vec::new()
        }
        Msg::RetryScheduled {
            failed_attempt,
            delay,
            cause,
        } => {
            if matches!(state.workflow(), WorkflowState::Submitting(_)) {
                state.set_notice(Some(format!(
                    "Attempt {failed_attempt} failed ({cause}), retrying in {}s",
                    delay.as_secs_f32()
                )));
            }
            Vec::new()
        }
        Msg::WorkflowFinished(outcome) => {
            if !matches!(state.workflow(), WorkflowState::Submitting(_)) {
                return (state, Vec::new());
            }
            match outcome {
                Ok(result) => state.succeed(result),
                Err(failure) => state.fail(failure),
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit(state: &mut AppState, kind: OperationKind, model: ModelName) -> Vec<Effect> {
    let input = if kind.needs_file() {
        match state.file() {
            Some(file) => SubmissionInput::File(file.clone()),
            None => {
                state.set_notice(Some(NEED_FILE_NOTICE.to_string()));
                return vec![Effect::ShowNotice(NEED_FILE_NOTICE.to_string())];
            }
        }
    } else {
        SubmissionInput::Text(state.text().to_string())
    };

    state.begin_validation(PendingSubmission {
        kind,
        model,
        input: input.clone(),
    });
    vec![Effect::Validate { kind, input }]
}
