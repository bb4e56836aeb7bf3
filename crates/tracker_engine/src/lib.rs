//! Tracker engine: upload transport, stream consumer, and job control.
mod controller;
mod directory;
mod events;
mod launch;
mod sse;
mod stream;
mod types;
mod upload;

pub use controller::{LaunchRequest, TrackerCommand, TrackerHandle};
pub use directory::{Customer, DirectoryClient, DirectoryError};
pub use events::{decode_event, DecodeError, WireEvent};
pub use launch::{extract_job_id, launch_job, LaunchError};
pub use sse::SseDecoder;
pub use stream::{open_stream, StreamHandle, StreamSettings};
pub use types::{EngineEvent, TransferSignal, TransportError, TransportErrorKind};
pub use upload::{
    ChannelTransferSink, ReqwestUploader, TransferSink, UploadPayload, UploadSettings, Uploader,
};
