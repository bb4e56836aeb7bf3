use std::sync::Once;

use pretty_assertions::assert_eq;
use tracker_core::{
    update, Effect, FileStatus, JobEvent, Msg, Phase, Severity, TrackerState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(tracker_logging::initialize_for_tests);
}

/// A job already accepted by the server, stream about to deliver.
fn processing_state() -> TrackerState {
    let state = TrackerState::new();
    let (state, _) = update(state, Msg::CustomerSelected("acme".to_string()));
    let (state, _) = update(state, Msg::FileChosen("export.zip".to_string()));
    let (state, _) = update(state, Msg::LaunchClicked);
    let (state, _) = update(state, Msg::TransferFlushed);
    let (state, _) = update(
        state,
        Msg::JobAccepted {
            job_id: "j-1".to_string(),
        },
    );
    state
}

fn apply(state: TrackerState, event: JobEvent) -> TrackerState {
    let (state, _) = update(state, Msg::StreamEvent(event));
    state
}

fn found(file: &str, ordinal: u64) -> JobEvent {
    JobEvent::FileFound {
        file: file.to_string(),
        ordinal,
        total: None,
    }
}

fn started(file: &str) -> JobEvent {
    JobEvent::FileStarted {
        file: file.to_string(),
        display_name: None,
    }
}

fn completed(file: &str) -> JobEvent {
    JobEvent::FileCompleted {
        file: file.to_string(),
        display_name: None,
        correlation_id: Some(format!("run-{file}")),
        metrics: None,
    }
}

#[test]
fn batch_of_three_completes_cleanly() {
    init_logging();
    let mut state = processing_state();
    state = apply(state, JobEvent::JobStarted);
    assert!(state.view().stream_active);
    state = apply(state, JobEvent::BatchSummary { total: 3 });
    for (i, file) in ["a.json", "b.json", "c.json"].iter().enumerate() {
        state = apply(state, found(file, i as u64));
    }
    for file in ["b.json", "a.json", "c.json"] {
        state = apply(state, started(file));
        state = apply(state, completed(file));
    }
    let (state, effects) = update(
        state,
        Msg::StreamEvent(JobEvent::JobCompleted {
            total: 3,
            success: 3,
            failed: 0,
        }),
    );

    assert_eq!(effects, vec![Effect::CloseStream]);
    let view = state.view();
    assert_eq!(view.phase, Phase::Done);
    assert!(!view.stream_active);
    assert_eq!(view.expected_total, Some(3));
    assert_eq!(view.counts.done, 3);
    assert_eq!(view.counts.failed, 0);
}

#[test]
fn duplicated_and_reordered_events_stay_idempotent() {
    init_logging();
    let mut state = processing_state();
    // Completion arrives before discovery, then everything repeats.
    state = apply(state, completed("a.json"));
    state = apply(state, found("a.json", 0));
    state = apply(state, started("a.json"));
    state = apply(state, found("a.json", 0));
    state = apply(state, completed("a.json"));

    let record = state.registry().get("a.json").unwrap();
    assert_eq!(record.status, FileStatus::Done);
    assert_eq!(record.ordinal, Some(0));
    assert_eq!(state.view().counts.done, 1);
    assert_eq!(state.registry().len(), 1);
}

#[test]
fn single_file_upload_without_batch_summary() {
    init_logging();
    let mut state = processing_state();
    state = apply(state, JobEvent::JobStarted);
    state = apply(state, completed("export.json"));
    let (state, _) = update(
        state,
        Msg::StreamEvent(JobEvent::JobCompleted {
            total: 1,
            success: 1,
            failed: 0,
        }),
    );

    let view = state.view();
    assert_eq!(view.phase, Phase::Done);
    assert_eq!(view.expected_total, Some(1));
    assert_eq!(view.counts.done, 1);
    assert_eq!(view.counts.failed, 0);
}

#[test]
fn keyed_error_marks_only_that_file() {
    init_logging();
    let mut state = processing_state();
    state = apply(state, found("X.json", 0));
    state = apply(state, found("Y.json", 1));
    state = apply(
        state,
        JobEvent::Error {
            message: "bad schema".to_string(),
            file: Some("X.json".to_string()),
        },
    );

    let bad = state.registry().get("X.json").unwrap();
    assert_eq!(bad.status, FileStatus::Error);
    assert_eq!(bad.message.as_deref(), Some("bad schema"));
    let sibling = state.registry().get("Y.json").unwrap();
    assert_eq!(sibling.status, FileStatus::Pending);
    assert!(sibling.message.is_none());
    assert_eq!(state.view().counts.failed, 1);
}

#[test]
fn keyless_error_is_surfaced_globally_without_phase_change() {
    init_logging();
    let state = processing_state();
    let (mut state, effects) = update(
        state,
        Msg::StreamEvent(JobEvent::Error {
            message: "worker restarted".to_string(),
            file: None,
        }),
    );

    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Processing);
    let notices = state.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Error);
}

#[test]
fn stream_failure_freezes_state_against_late_events() {
    init_logging();
    let mut state = processing_state();
    state = apply(state, found("a.json", 0));
    let (state, effects) = update(
        state,
        Msg::StreamInterrupted {
            message: "connection reset".to_string(),
        },
    );
    assert_eq!(effects, vec![Effect::CloseStream]);
    assert_eq!(state.phase(), Phase::Error);

    // Synthetically delivered late/duplicate messages must not mutate.
    let frozen = state.clone();
    let state = apply(state, completed("a.json"));
    let (state, effects) = update(
        state,
        Msg::StreamEvent(JobEvent::JobCompleted {
            total: 1,
            success: 1,
            failed: 0,
        }),
    );
    assert!(effects.is_empty());
    let (state, _) = update(state, Msg::TransferProgress { percent: 99 });

    assert_eq!(state.view(), frozen.view());
}

#[test]
fn relaunch_clears_all_prior_records() {
    init_logging();
    let mut state = processing_state();
    state = apply(state, found("a.json", 0));
    state = apply(state, completed("a.json"));
    state = apply(
        state,
        JobEvent::Error {
            message: "bad".to_string(),
            file: Some("b.json".to_string()),
        },
    );
    assert_eq!(state.registry().len(), 2);

    let (state, effects) = update(state, Msg::LaunchClicked);
    assert_eq!(effects.len(), 1);
    let view = state.view();
    assert_eq!(view.phase, Phase::Uploading);
    assert!(view.files.is_empty());
    assert_eq!(view.counts.done, 0);
    assert_eq!(view.counts.failed, 0);
    assert_eq!(view.job_id, None);
    assert_eq!(view.expected_total, None);
}

#[test]
fn path_spellings_resolve_to_one_record() {
    init_logging();
    let mut state = processing_state();
    state = apply(state, found("dir/sub/A.json", 0));
    state = apply(state, completed("A.json"));

    assert_eq!(state.registry().len(), 1);
    let record = state.registry().get("A.json").unwrap();
    assert_eq!(record.status, FileStatus::Done);
    assert_eq!(record.ordinal, Some(0));
}

#[test]
fn server_counts_override_local_tally() {
    init_logging();
    let mut state = processing_state();
    state = apply(state, found("a.json", 0));
    state = apply(state, completed("a.json"));
    // Server retried files we never saw discrete events for.
    let (mut state, _) = update(
        state,
        Msg::StreamEvent(JobEvent::JobCompleted {
            total: 4,
            success: 3,
            failed: 1,
        }),
    );

    let view = state.view();
    assert_eq!(view.expected_total, Some(4));
    assert_eq!(view.counts.done, 3);
    assert_eq!(view.counts.failed, 1);
    // A partial success is a warning, not a hard failure.
    let notices = state.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Warning);
}

#[test]
fn label_resolution_never_touches_status() {
    init_logging();
    let mut state = processing_state();
    state = apply(state, found("a.json", 0));
    state = apply(state, completed("a.json"));
    state = apply(
        state,
        JobEvent::LabelResolved {
            file: "a.json".to_string(),
            display_name: "Server A repository".to_string(),
        },
    );

    let record = state.registry().get("a.json").unwrap();
    assert_eq!(record.status, FileStatus::Done);
    assert_eq!(record.display_name.as_deref(), Some("Server A repository"));
    let view = state.view();
    assert_eq!(view.files[0].label, "Server A repository");
}

#[test]
fn error_never_regresses_a_completed_file() {
    init_logging();
    let mut state = processing_state();
    state = apply(state, completed("a.json"));
    state = apply(
        state,
        JobEvent::Error {
            message: "late failure".to_string(),
            file: Some("a.json".to_string()),
        },
    );

    let record = state.registry().get("a.json").unwrap();
    assert_eq!(record.status, FileStatus::Done);
    assert_eq!(state.view().counts.failed, 0);
}

#[test]
fn file_found_total_seeds_expected_total() {
    init_logging();
    let mut state = processing_state();
    state = apply(
        state,
        JobEvent::FileFound {
            file: "a.json".to_string(),
            ordinal: 0,
            total: Some(5),
        },
    );
    assert_eq!(state.view().expected_total, Some(5));

    // An explicit batch summary still overwrites the seeded value.
    state = apply(state, JobEvent::BatchSummary { total: 6 });
    assert_eq!(state.view().expected_total, Some(6));
}

#[test]
fn rows_keep_discovery_order_despite_completion_order() {
    init_logging();
    let mut state = processing_state();
    state = apply(state, found("late.json", 2));
    state = apply(state, found("first.json", 0));
    state = apply(state, found("mid.json", 1));
    state = apply(state, completed("late.json"));
    state = apply(state, completed("first.json"));

    let view = state.view();
    let keys: Vec<&str> = view.files.iter().map(|row| row.key.as_str()).collect();
    assert_eq!(keys, vec!["first.json", "mid.json", "late.json"]);
}
