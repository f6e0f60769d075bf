//! Workflow controller: owns the state machine and runs its effects.
//!
//! UI layers feed discrete [`Msg`] values through [`WorkflowController::dispatch`]
//! and observe every state change through [`WorkflowController::subscribe`].
//! The controller holds no UI state and never lets an error escape: every
//! dispatch resolves to a [`WorkflowState`].

use std::collections::VecDeque;
use std::sync::{mpsc, Mutex, MutexGuard};

use engine_logging::{engine_debug, engine_info, engine_warn};
use image2text_core::{
    update, validate_submission, AppState, Effect, Msg, RetryPolicy, WorkflowState, WorkflowView,
};

use crate::{EngineEvent, EventSink, RetryingTransport, Sleeper, TokioSleeper, Transport};

pub struct WorkflowController<T, S = TokioSleeper> {
    state: Mutex<AppState>,
    transport: RetryingTransport<T, S>,
    subscribers: Mutex<Vec<mpsc::Sender<WorkflowView>>>,
}

impl<T: Transport, S: Sleeper> WorkflowController<T, S> {
    pub fn new(transport: RetryingTransport<T, S>, policy: RetryPolicy) -> Self {
        Self {
            state: Mutex::new(AppState::with_policy(policy)),
            transport,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Every state change is sent as a fresh view. Dropped receivers are pruned.
    pub fn subscribe(&self) -> mpsc::Receiver<WorkflowView> {
        let (tx, rx) = mpsc::channel();
        lock(&self.subscribers).push(tx);
        rx
    }

    pub fn view(&self) -> WorkflowView {
        lock(&self.state).view()
    }

    pub fn workflow(&self) -> WorkflowState {
        lock(&self.state).workflow().clone()
    }

    pub fn transport(&self) -> &RetryingTransport<T, S> {
        &self.transport
    }

    /// Applies `msg` and runs the resulting effects to completion.
    ///
    /// A submit message resolves only once the workflow reaches a terminal
    /// state. Messages that arrive meanwhile (for example a second submit)
    /// are applied immediately and, being no-ops while submitting, return
    /// the current state.
    pub async fn dispatch(&self, msg: Msg) -> WorkflowState {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            for effect in self.apply(msg) {
                match effect {
                    Effect::Validate { kind, input } => {
                        let verdict = validate_submission(kind, &input);
                        if let Err(reason) = verdict {
                            engine_info!("Submission rejected: {}", reason);
                        }
                        inbox.push_back(Msg::ValidationFinished(verdict));
                    }
                    Effect::Dispatch { request, policy } => {
                        let sink = ControllerSink { controller: self };
                        let outcome = self.transport.send(&request, &policy, &sink).await;
                        inbox.push_back(Msg::WorkflowFinished(outcome));
                    }
                    Effect::ShowNotice(notice) => {
                        engine_debug!("Notice: {}", notice);
                    }
                }
            }
        }
        self.workflow()
    }

    fn apply(&self, msg: Msg) -> Vec<Effect> {
        let (view, effects) = {
            let mut guard = lock(&self.state);
            let state = std::mem::take(&mut *guard);
            let (mut state, effects) = update(state, msg);
            let view = state.consume_dirty().then(|| state.view());
            *guard = state;
            (view, effects)
        };

        if let Some(view) = view {
            self.notify(view);
        }
        effects
    }

    fn notify(&self, view: WorkflowView) {
        let mut subscribers = lock(&self.subscribers);
        subscribers.retain(|tx| tx.send(view.clone()).is_ok());
    }
}

/// Feeds retry-loop progress back into the state machine.
struct ControllerSink<'a, T, S> {
    controller: &'a WorkflowController<T, S>,
}

impl<T: Transport, S: Sleeper> EventSink for ControllerSink<'_, T, S> {
    fn emit(&self, event: EngineEvent) {
        let msg = match event {
            EngineEvent::AttemptStarted { attempt, .. } => Msg::AttemptStarted { attempt },
            EngineEvent::RetryScheduled {
                failed_attempt,
                delay,
                cause,
            } => Msg::RetryScheduled {
                failed_attempt,
                delay,
                cause,
            },
        };
        let effects = self.controller.apply(msg);
        if !effects.is_empty() {
            engine_warn!("Ignoring {} effects raised by engine progress", effects.len());
        }
    }
}

/// A panic while holding the lock must not wedge the controller.
fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
