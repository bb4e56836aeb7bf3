//! Pumps engine events into the core update loop and executes the
//! effects that come back out.

use tracker_core::{Effect, JobEvent, Msg};
use tracker_engine::{
    EngineEvent, LaunchRequest, StreamSettings, TrackerHandle, TransferSignal, UploadSettings,
    WireEvent,
};
use tracker_logging::tracker_info;

pub struct EffectRunner {
    handle: TrackerHandle,
    base_url: String,
    file_bytes: Vec<u8>,
    uploaded_by: Option<String>,
}

impl EffectRunner {
    pub fn new(base_url: String, file_bytes: Vec<u8>, uploaded_by: Option<String>) -> Self {
        Self {
            handle: TrackerHandle::new(UploadSettings::default(), StreamSettings::default()),
            base_url,
            file_bytes,
            uploaded_by,
        }
    }

    pub fn execute(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::BeginUpload {
                    customer,
                    file,
                    server_name,
                } => {
                    tracker_info!("launching ingestion file={file} customer={customer}");
                    self.handle.launch(LaunchRequest {
                        base_url: self.base_url.clone(),
                        customer,
                        file_name: file,
                        bytes: self.file_bytes.clone(),
                        server_name,
                        uploaded_by: self.uploaded_by.clone(),
                    });
                }
                Effect::OpenStream { .. } => {
                    // No-op: the controller opens the stream itself as soon
                    // as the server hands back the job id.
                }
                Effect::CloseStream => {
                    self.handle.stop();
                }
            }
        }
    }

    pub fn try_recv(&self) -> Option<Msg> {
        self.handle.try_recv().map(to_msg)
    }
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Transfer(TransferSignal::Percent(percent)) => {
            Msg::TransferProgress { percent }
        }
        EngineEvent::Transfer(TransferSignal::BodyFlushed) => Msg::TransferFlushed,
        EngineEvent::LaunchFailed { message } => Msg::LaunchFailed { message },
        EngineEvent::JobAccepted { job_id } => Msg::JobAccepted { job_id },
        EngineEvent::Stream(event) => Msg::StreamEvent(to_job_event(event)),
        EngineEvent::StreamInterrupted { message } => Msg::StreamInterrupted { message },
    }
}

fn to_job_event(event: WireEvent) -> JobEvent {
    match event {
        WireEvent::JobStarted => JobEvent::JobStarted,
        WireEvent::BatchSummary { total } => JobEvent::BatchSummary { total },
        WireEvent::FileFound {
            file,
            ordinal,
            total,
        } => JobEvent::FileFound {
            file,
            ordinal,
            total,
        },
        WireEvent::LabelResolved { file, display_name } => {
            JobEvent::LabelResolved { file, display_name }
        }
        WireEvent::FileStarted { file, display_name } => {
            JobEvent::FileStarted { file, display_name }
        }
        WireEvent::FileCompleted {
            file,
            display_name,
            run_id,
            metrics,
        } => JobEvent::FileCompleted {
            file,
            display_name,
            correlation_id: run_id,
            // The payload is opaque to the tracker; carry it as text.
            metrics: metrics
                .as_ref()
                .and_then(|value| serde_json::to_string(value).ok()),
        },
        WireEvent::Error { message, file } => JobEvent::Error { message, file },
        WireEvent::JobCompleted {
            total,
            success,
            failed,
        } => JobEvent::JobCompleted {
            total,
            success,
            failed,
        },
    }
}
