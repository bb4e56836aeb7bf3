#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked the customer the upload belongs to.
    CustomerSelected(String),
    /// User chose the export file to ingest.
    FileChosen(String),
    /// Optional server-name override for exports without a host line.
    ServerOverride(String),
    /// User triggered a new ingestion run.
    LaunchClicked,
    /// User detached from the running job; server-side work continues.
    StopClicked,
    /// Byte progress from the upload transport, in [0, 100].
    TransferProgress { percent: u8 },
    /// Request body fully flushed; byte progress is no longer meaningful.
    TransferFlushed,
    /// Launch failed before any stream was opened.
    LaunchFailed { message: String },
    /// Server accepted the upload and issued a job identifier.
    JobAccepted { job_id: crate::JobId },
    /// One decoded event from the per-job push stream.
    StreamEvent(crate::JobEvent),
    /// The stream failed or ended before the job completed.
    StreamInterrupted { message: String },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
