use std::sync::mpsc;
use std::time::Duration;

use futures_util::StreamExt;
use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

use crate::events::{decode_event, WireEvent};
use crate::sse::SseDecoder;
use crate::types::EngineEvent;

#[derive(Debug, Clone)]
pub struct StreamSettings {
    pub connect_timeout: Duration,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Owner of one live stream task. Dropping the handle aborts the reader,
/// which is the only teardown path: construction on job start, drop on
/// explicit stop, replacement, or controller teardown.
pub struct StreamHandle {
    task: tokio::task::JoinHandle<()>,
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Open the push stream for one job and pump decoded events into `tx`.
/// Must be called from within a tokio runtime.
///
/// There is no reconnection and no replay: the event schema carries no
/// sequence numbers or resume tokens, so a dropped connection is only
/// recoverable by relaunching the whole job. A transport failure or a
/// premature end of stream is reported as `StreamInterrupted`; whether
/// that is fatal is the state machine's call.
pub fn open_stream(
    settings: &StreamSettings,
    base_url: &str,
    job_id: &str,
    tx: mpsc::Sender<EngineEvent>,
) -> StreamHandle {
    let url = format!("{}/ingest/jobs/{}/events", base_url.trim_end_matches('/'), job_id);
    let connect_timeout = settings.connect_timeout;
    let job = job_id.to_string();

    let task = tokio::spawn(async move {
        tracker_info!("opening event stream job_id={job} url={url}");
        if let Err(message) = consume(connect_timeout, &url, &tx).await {
            let _ = tx.send(EngineEvent::StreamInterrupted { message });
        }
    });

    StreamHandle { task }
}

async fn consume(
    connect_timeout: Duration,
    url: &str,
    tx: &mpsc::Sender<EngineEvent>,
) -> Result<(), String> {
    let client = reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        // Deliberately no request timeout: the stream stays open for as
        // long as the job runs, and no timeout governs it.
        .build()
        .map_err(|err| err.to_string())?;

    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "text/event-stream")
        .send()
        .await
        .map_err(|err| err.to_string())?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("stream endpoint returned {status}"));
    }

    let mut decoder = SseDecoder::new();
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|err| err.to_string())?;
        for payload in decoder.push(&chunk) {
            match decode_event(&payload) {
                Ok(Some(event)) => {
                    let is_terminal = matches!(event, WireEvent::JobCompleted { .. });
                    tracker_debug!("stream event: {event:?}");
                    let _ = tx.send(EngineEvent::Stream(event));
                    if is_terminal {
                        // job_completed closes the stream; stop reading.
                        return Ok(());
                    }
                }
                Ok(None) => {}
                Err(err) => tracker_warn!("dropping undecodable stream payload: {err}"),
            }
        }
    }

    // Server closed the stream without a terminal event.
    Err("stream ended before job completion".to_string())
}
