#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the multipart upload for a new run.
    BeginUpload {
        customer: String,
        file: String,
        server_name: Option<String>,
    },
    /// Open the push stream for an accepted job. The controller must close
    /// any previously open stream first; at most one live listener may
    /// feed the tracker at any time.
    OpenStream { job_id: crate::JobId },
    /// Detach the local stream listener. Does not cancel server-side work.
    CloseStream,
}
