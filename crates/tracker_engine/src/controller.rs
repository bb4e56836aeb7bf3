use std::sync::{mpsc, Arc};
use std::thread;

use tracker_logging::{tracker_info, tracker_warn};

use crate::launch::launch_job;
use crate::stream::{open_stream, StreamHandle, StreamSettings};
use crate::types::{EngineEvent, TransferSignal};
use crate::upload::{ReqwestUploader, TransferSink, UploadPayload, UploadSettings, Uploader};

/// Everything needed to start one ingestion run.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub base_url: String,
    pub customer: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub server_name: Option<String>,
    pub uploaded_by: Option<String>,
}

pub enum TrackerCommand {
    Launch(LaunchRequest),
    Stop,
}

/// Handle to the background job controller. Commands go in over a channel;
/// engine events come back out for the update loop to drain.
///
/// The controller owns at most one live stream handle. A new launch or an
/// explicit stop drops the previous handle before anything else happens,
/// so no two listeners ever feed the shared state concurrently.
pub struct TrackerHandle {
    cmd_tx: mpsc::Sender<TrackerCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl TrackerHandle {
    pub fn new(upload_settings: UploadSettings, stream_settings: StreamSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<TrackerCommand>();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();
        let uploader = Arc::new(ReqwestUploader::new(upload_settings));

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    let _ = event_tx.send(EngineEvent::LaunchFailed {
                        message: format!("failed to start async runtime: {err}"),
                    });
                    return;
                }
            };
            let mut active_stream: Option<StreamHandle> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    TrackerCommand::Launch(request) => {
                        // Closing the previous job's stream comes first.
                        drop(active_stream.take());
                        active_stream = runtime.block_on(handle_launch(
                            uploader.as_ref(),
                            &stream_settings,
                            request,
                            event_tx.clone(),
                        ));
                    }
                    TrackerCommand::Stop => {
                        tracker_info!("detaching stream listener on user stop");
                        drop(active_stream.take());
                    }
                }
            }
            drop(active_stream);
        });

        Self { cmd_tx, event_rx }
    }

    pub fn launch(&self, request: LaunchRequest) {
        let _ = self.cmd_tx.send(TrackerCommand::Launch(request));
    }

    pub fn stop(&self) {
        let _ = self.cmd_tx.send(TrackerCommand::Stop);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

struct EventTransferSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl TransferSink for EventTransferSink {
    fn emit(&self, signal: TransferSignal) {
        let _ = self.tx.send(EngineEvent::Transfer(signal));
    }
}

/// Upload, resolve the job id, then open the job's stream. Returns the
/// stream handle to be owned by the controller loop.
async fn handle_launch(
    uploader: &dyn Uploader,
    stream_settings: &StreamSettings,
    request: LaunchRequest,
    event_tx: mpsc::Sender<EngineEvent>,
) -> Option<StreamHandle> {
    let url = format!(
        "{}/ingest/batch",
        request.base_url.trim_end_matches('/')
    );

    let mut fields = vec![("customer_name".to_string(), request.customer.clone())];
    if let Some(server) = &request.server_name {
        fields.push(("server_name".to_string(), server.clone()));
    }
    if let Some(user) = &request.uploaded_by {
        fields.push(("uploaded_by".to_string(), user.clone()));
    }

    let payload = UploadPayload {
        file_name: request.file_name.clone(),
        bytes: request.bytes,
        fields,
    };

    let sink = Arc::new(EventTransferSink {
        tx: event_tx.clone(),
    });

    match launch_job(uploader, &url, payload, sink).await {
        Ok(job_id) => {
            tracker_info!(
                "job accepted job_id={job_id} file={} customer={}",
                request.file_name,
                request.customer
            );
            let _ = event_tx.send(EngineEvent::JobAccepted {
                job_id: job_id.clone(),
            });
            Some(open_stream(
                stream_settings,
                &request.base_url,
                &job_id,
                event_tx,
            ))
        }
        Err(err) => {
            tracker_warn!("launch failed: {err}");
            let _ = event_tx.send(EngineEvent::LaunchFailed {
                message: err.to_string(),
            });
            None
        }
    }
}
