//! Plain-text rendering of the job view model.

use tracker_core::{FileStatus, JobViewModel, Notice, Phase, Severity};

pub fn phase_line(view: &JobViewModel) -> String {
    match view.phase {
        Phase::Idle => "idle".to_string(),
        Phase::Uploading => match view.upload_percent {
            Some(percent) => format!("uploading {percent}%"),
            None => "uploading".to_string(),
        },
        Phase::Processing => {
            let seen = view.counts.done + view.counts.failed;
            match view.expected_total {
                Some(total) => format!("processing {seen}/{total} files"),
                None => "processing".to_string(),
            }
        }
        Phase::Done => format!(
            "done: {} succeeded, {} failed",
            view.counts.done, view.counts.failed
        ),
        Phase::Error => "error".to_string(),
    }
}

pub fn file_lines(view: &JobViewModel) -> Vec<String> {
    view.files
        .iter()
        .map(|row| {
            let status = match row.status {
                FileStatus::Pending => "pending",
                FileStatus::Processing => "processing",
                FileStatus::Done => "done",
                FileStatus::Error => "error",
            };
            let mut line = format!("  [{status:>10}] {}", row.label);
            if let Some(run) = &row.correlation_id {
                line.push_str(&format!(" (run {run})"));
            }
            if let Some(message) = &row.message {
                line.push_str(&format!(" - {message}"));
            }
            line
        })
        .collect()
}

pub fn notice_line(notice: &Notice) -> String {
    let tag = match notice.severity {
        Severity::Info => "info",
        Severity::Warning => "warning",
        Severity::Error => "error",
    };
    format!("{tag}: {}", notice.message)
}
