use std::sync::Arc;

use serde_json::Value;

use crate::types::TransportError;
use crate::upload::{TransferSink, UploadPayload, Uploader};

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The upload succeeded but the response carried no usable job id.
    /// That is a server-contract violation; no stream is opened.
    #[error("launch response carried no job id")]
    MissingJobId,
}

/// Pull the opaque job identifier out of a launch response body.
pub fn extract_job_id(body: Option<&Value>) -> Option<String> {
    let id = body?.get("job_id")?;
    match id {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        // Tolerate numeric ids; they are opaque to us either way.
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Perform the launch upload and resolve the job id.
pub async fn launch_job(
    uploader: &dyn Uploader,
    url: &str,
    payload: UploadPayload,
    sink: Arc<dyn TransferSink>,
) -> Result<String, LaunchError> {
    let body = uploader.upload(url, payload, sink).await?;
    extract_job_id(body.as_ref()).ok_or(LaunchError::MissingJobId)
}
