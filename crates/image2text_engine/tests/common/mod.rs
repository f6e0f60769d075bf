#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use image2text_core::{OperationRequest, TransportFailure, UploadCandidate};
use image2text_engine::{EngineEvent, EventSink, RawResponse, Sleeper, Transport, TransportError};

pub const POSTCARD_BODY: &str =
    r#"{"postcard_image":"https://img.example/postcard.png","text":"a quiet harbour"}"#;

pub fn photo() -> UploadCandidate {
    UploadCandidate::new("harbour.jpg", "image/jpeg", vec![0xFFu8, 0xD8, 0xFF, 0xE0])
}

pub fn ok(body: &str) -> Result<RawResponse, TransportError> {
    Ok(RawResponse::new(200, body.as_bytes()))
}

pub fn status(code: u16, body: &str) -> Result<RawResponse, TransportError> {
    Ok(RawResponse::new(code, body.as_bytes()))
}

pub fn connection_reset() -> Result<RawResponse, TransportError> {
    Err(TransportError::new(
        TransportFailure::Network,
        "connection reset by peer",
    ))
}

/// Replays canned responses in order and records what it was asked to send.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    requests: Mutex<Vec<OperationRequest>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<RawResponse, TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<OperationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        request: &OperationRequest,
        _timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.script.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(TransportError::new(
                TransportFailure::Network,
                "script exhausted",
            ))
        })
    }
}

/// Records requested delays and returns immediately.
#[derive(Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

#[derive(Default)]
pub struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}
