use crate::{FileStatus, Phase, StatusCounts, TrackerState};

/// Derived, render-ready snapshot of one job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobViewModel {
    pub phase: Phase,
    /// Byte progress while uploading; `None` once the body is flushed.
    pub upload_percent: Option<u8>,
    pub job_id: Option<String>,
    /// True between `job_started` and the stream's terminal event.
    pub stream_active: bool,
    pub expected_total: Option<u64>,
    pub counts: StatusCounts,
    pub files: Vec<FileRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub key: String,
    /// Resolved label: display name when reported, key otherwise.
    pub label: String,
    pub status: FileStatus,
    pub ordinal: Option<u64>,
    pub correlation_id: Option<String>,
    pub metrics: Option<String>,
    pub message: Option<String>,
}

/// Aggregates are derived by scanning the registry at render time, except
/// at completion, when the server-reported totals are authoritative.
pub(crate) fn build_view(state: &TrackerState) -> JobViewModel {
    let mut counts = state.registry.counts();
    if state.phase == Phase::Done {
        counts.done = state.success_count;
        counts.failed = state.failed_count;
    }

    let files = state
        .registry
        .ordered()
        .into_iter()
        .map(|record| FileRowView {
            key: record.key.clone(),
            label: record
                .display_name
                .clone()
                .unwrap_or_else(|| record.key.clone()),
            status: record.status,
            ordinal: record.ordinal,
            correlation_id: record.correlation_id.clone(),
            metrics: record.metrics.clone(),
            message: record.message.clone(),
        })
        .collect();

    JobViewModel {
        phase: state.phase,
        upload_percent: state.upload_percent,
        job_id: state.job_id.clone(),
        stream_active: state.stream_active,
        expected_total: state.expected_total,
        counts,
        files,
    }
}
