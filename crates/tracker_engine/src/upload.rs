use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::types::{map_reqwest_error, TransferSignal, TransportError, TransportErrorKind};

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Size of the slices handed to the transport; progress is reported
    /// once per slice.
    pub chunk_bytes: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            chunk_bytes: 64 * 1024,
        }
    }
}

/// One multipart launch request: the export file plus its run context.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Plain form fields (customer_name, server_name, uploaded_by, ...).
    pub fields: Vec<(String, String)>,
}

/// Receives transfer signals while the request body is in flight.
pub trait TransferSink: Send + Sync {
    fn emit(&self, signal: TransferSignal);
}

pub struct ChannelTransferSink {
    tx: std::sync::mpsc::Sender<TransferSignal>,
}

impl ChannelTransferSink {
    pub fn new(tx: std::sync::mpsc::Sender<TransferSignal>) -> Self {
        Self { tx }
    }
}

impl TransferSink for ChannelTransferSink {
    fn emit(&self, signal: TransferSignal) {
        let _ = self.tx.send(signal);
    }
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    /// Send the payload to `url`. Resolves with the parsed response body
    /// (None when absent or unparseable) once the server replies 2xx.
    async fn upload(
        &self,
        url: &str,
        payload: UploadPayload,
        sink: Arc<dyn TransferSink>,
    ) -> Result<Option<Value>, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    settings: UploadSettings,
}

impl ReqwestUploader {
    pub fn new(settings: UploadSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, TransportError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| TransportError::new(TransportErrorKind::Network, err.to_string()))
    }

    /// Wrap the file bytes in a stream that reports progress as each slice
    /// is pulled by the transport. Percentages are non-decreasing and end
    /// at 100 by construction.
    fn progress_body(
        &self,
        bytes: Vec<u8>,
        sink: Arc<dyn TransferSink>,
    ) -> (reqwest::Body, u64) {
        let total = bytes.len() as u64;
        let chunk = self.settings.chunk_bytes.max(1);
        let data = Bytes::from(bytes);

        if total == 0 {
            // Nothing to stream; the body is flushed the moment it is built.
            sink.emit(TransferSignal::Percent(100));
            return (reqwest::Body::from(Bytes::new()), 0);
        }

        let ranges: Vec<(usize, usize)> = (0..data.len())
            .step_by(chunk)
            .map(|start| (start, (start + chunk).min(data.len())))
            .collect();
        let stream = futures_util::stream::iter(ranges.into_iter().map(move |(start, end)| {
            let percent = (end as u64 * 100 / total) as u8;
            sink.emit(TransferSignal::Percent(percent));
            Ok::<Bytes, std::io::Error>(data.slice(start..end))
        }));

        (reqwest::Body::wrap_stream(stream), total)
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn upload(
        &self,
        url: &str,
        payload: UploadPayload,
        sink: Arc<dyn TransferSink>,
    ) -> Result<Option<Value>, TransportError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| TransportError::new(TransportErrorKind::InvalidUrl, err.to_string()))?;
        let client = self.build_client()?;

        sink.emit(TransferSignal::Percent(0));
        let (body, length) = self.progress_body(payload.bytes, sink.clone());
        let mut form = Form::new();
        for (name, value) in payload.fields {
            form = form.text(name, value);
        }
        let part = Part::stream_with_length(body, length)
            .file_name(payload.file_name)
            .mime_str("application/octet-stream")
            .map_err(|err| TransportError::new(TransportErrorKind::Network, err.to_string()))?;
        form = form.part("file", part);

        let response = client
            .post(parsed)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        // The response arriving means the request body was fully flushed;
        // from here on the server does work it does not report through
        // this channel.
        sink.emit(TransferSignal::BodyFlushed);

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<Value>().await.ok());
        }

        let text = response.text().await.unwrap_or_default();
        let message = extract_error_detail(&text).unwrap_or(text);
        Err(TransportError::new(
            TransportErrorKind::HttpStatus(status.as_u16()),
            message,
        ))
    }
}

/// Pull the structured `detail` field out of an error body, falling back
/// to the raw text when there is none.
fn extract_error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}
