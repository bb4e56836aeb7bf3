use std::fmt;

use crate::events::WireEvent;

/// Signals from the upload transport while the request body is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferSignal {
    /// Monotonically non-decreasing byte progress in [0, 100].
    Percent(u8),
    /// The request body has been fully handed to the transport; byte
    /// progress is no longer meaningful.
    BodyFlushed,
}

/// Everything the engine reports back to the update loop.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Transfer(TransferSignal),
    LaunchFailed { message: String },
    JobAccepted { job_id: String },
    Stream(WireEvent),
    StreamInterrupted { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for TransportError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportErrorKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::InvalidUrl => write!(f, "invalid url"),
            TransportErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::Network => write!(f, "network error"),
        }
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(TransportErrorKind::Timeout, err.to_string());
    }
    TransportError::new(TransportErrorKind::Network, err.to_string())
}
