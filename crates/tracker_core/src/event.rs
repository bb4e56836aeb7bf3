/// One decoded message from the per-job push stream.
///
/// Events are unordered across files; within a single file the server is
/// assumed to emit found -> started -> (completed | error) in that relative
/// order, but the registry tolerates duplication and reordering anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    /// Stream is live; carries no other state.
    JobStarted,
    /// Expected file count for a multi-file batch. Absent entirely for a
    /// single non-archive upload.
    BatchSummary { total: u64 },
    /// A file was discovered in the batch, with its discovery ordinal.
    FileFound {
        file: String,
        ordinal: u64,
        total: Option<u64>,
    },
    /// Human-readable label resolved for a file; does not alter status.
    LabelResolved { file: String, display_name: String },
    /// Server began processing a file.
    FileStarted {
        file: String,
        display_name: Option<String>,
    },
    /// Server finished a file successfully.
    FileCompleted {
        file: String,
        display_name: Option<String>,
        correlation_id: Option<String>,
        /// Opaque result payload, pre-rendered as compact JSON text.
        metrics: Option<String>,
    },
    /// A failure. With `file` set it is localized to one record; without,
    /// it is a job-level error surfaced directly to the user.
    Error { message: String, file: Option<String> },
    /// Terminal. Server-reported counts are authoritative over any
    /// client-accumulated tally.
    JobCompleted { total: u64, success: u64, failed: u64 },
}
