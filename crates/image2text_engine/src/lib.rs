//! Image2text engine: HTTP transport, retry loop and workflow controller.
mod controller;
mod persist;
mod retry;
mod transport;
mod types;

pub use controller::WorkflowController;
pub use persist::{AtomicFileWriter, PersistError};
pub use retry::{EventSink, RetryingTransport, Sleeper, TokioSleeper};
pub use transport::{CredentialsMode, ReqwestTransport, Transport, TransportSettings};
pub use types::{EngineEvent, RawResponse, TransportError};
