use crate::{Effect, FileStatus, JobEvent, Msg, Notice, Phase, TrackerState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: TrackerState, msg: Msg) -> (TrackerState, Vec<Effect>) {
    let effects = match msg {
        Msg::CustomerSelected(customer) => {
            state.customer = Some(customer);
            state.mark_dirty();
            Vec::new()
        }
        Msg::FileChosen(file) => {
            state.chosen_file = Some(file);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ServerOverride(server) => {
            state.server_override = Some(server);
            state.mark_dirty();
            Vec::new()
        }
        Msg::LaunchClicked => launch(&mut state),
        Msg::StopClicked => {
            // Detach only; server-side work is fire-and-forget.
            vec![Effect::CloseStream]
        }
        Msg::TransferProgress { percent } => {
            if state.phase == Phase::Uploading {
                let clamped = percent.min(100);
                let current = state.upload_percent.unwrap_or(0);
                if clamped > current {
                    state.upload_percent = Some(clamped);
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::TransferFlushed => {
            if state.phase == Phase::Uploading {
                state.phase = Phase::Processing;
                state.upload_percent = None;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::LaunchFailed { message } => {
            if !state.phase.is_terminal() {
                state.phase = Phase::Error;
                state.upload_percent = None;
                state.push_notice(Notice::error(format!("upload failed: {message}")));
            }
            Vec::new()
        }
        Msg::JobAccepted { job_id } => {
            if state.phase.is_terminal() {
                Vec::new()
            } else {
                state.phase = Phase::Processing;
                state.upload_percent = None;
                state.job_id = Some(job_id.clone());
                state.mark_dirty();
                vec![Effect::OpenStream { job_id }]
            }
        }
        Msg::StreamEvent(event) => {
            if state.phase.is_terminal() {
                Vec::new()
            } else {
                apply_event(&mut state, event)
            }
        }
        Msg::StreamInterrupted { message } => {
            if state.phase.is_terminal() {
                Vec::new()
            } else {
                state.phase = Phase::Error;
                state.stream_active = false;
                state.push_notice(Notice::error(format!("processing stream lost: {message}")));
                vec![Effect::CloseStream]
            }
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Precondition checks happen here, locally, before any network call.
fn launch(state: &mut TrackerState) -> Vec<Effect> {
    let Some(customer) = state.customer.clone() else {
        state.push_notice(Notice::error("select a customer before uploading"));
        return Vec::new();
    };
    let Some(file) = state.chosen_file.clone() else {
        state.push_notice(Notice::error("choose a file before uploading"));
        return Vec::new();
    };

    // Discard all state from any prior job so stale records never pollute
    // the new run's counts.
    state.reset_job();
    state.phase = Phase::Uploading;
    state.upload_percent = Some(0);

    vec![Effect::BeginUpload {
        customer,
        file,
        server_name: state.server_override.clone(),
    }]
}

fn apply_event(state: &mut TrackerState, event: JobEvent) -> Vec<Effect> {
    match event {
        JobEvent::JobStarted => {
            state.stream_active = true;
            state.mark_dirty();
            Vec::new()
        }
        JobEvent::BatchSummary { total } => {
            state.expected_total = Some(total);
            state.mark_dirty();
            Vec::new()
        }
        JobEvent::FileFound {
            file,
            ordinal,
            total,
        } => {
            let record = state.registry.upsert(&file);
            if record.ordinal.is_none() {
                record.ordinal = Some(ordinal);
            }
            if state.expected_total.is_none() {
                state.expected_total = total;
            }
            state.mark_dirty();
            Vec::new()
        }
        JobEvent::LabelResolved { file, display_name } => {
            state.registry.upsert(&file).display_name = Some(display_name);
            state.mark_dirty();
            Vec::new()
        }
        JobEvent::FileStarted { file, display_name } => {
            let record = state.registry.upsert(&file);
            if let Some(name) = display_name {
                record.display_name = Some(name);
            }
            record.advance(FileStatus::Processing);
            state.mark_dirty();
            Vec::new()
        }
        JobEvent::FileCompleted {
            file,
            display_name,
            correlation_id,
            metrics,
        } => {
            let record = state.registry.upsert(&file);
            if let Some(name) = display_name {
                record.display_name = Some(name);
            }
            // Increment only on an actual transition so duplicate
            // completion events stay idempotent.
            if record.advance(FileStatus::Done) {
                record.correlation_id = correlation_id;
                record.metrics = metrics;
                state.success_count += 1;
            }
            state.mark_dirty();
            Vec::new()
        }
        JobEvent::Error { message, file } => {
            match file {
                Some(file) => {
                    let record = state.registry.upsert(&file);
                    if record.advance(FileStatus::Error) {
                        record.message = Some(message);
                        state.failed_count += 1;
                    }
                    state.mark_dirty();
                }
                // No attribution to a single file: surface globally. The
                // job stays recoverable if job_completed still arrives.
                None => state.push_notice(Notice::error(message)),
            }
            Vec::new()
        }
        JobEvent::JobCompleted {
            total,
            success,
            failed,
        } => {
            // Server counts win: server-side retries or skips may not all
            // have produced discrete per-file events.
            state.expected_total = Some(total);
            state.success_count = success;
            state.failed_count = failed;
            state.phase = Phase::Done;
            state.stream_active = false;
            if failed > 0 {
                state.push_notice(Notice::warning(format!(
                    "ingestion finished: {success} of {total} files succeeded, {failed} failed"
                )));
            } else {
                state.push_notice(Notice::info(format!(
                    "ingestion finished: all {total} files succeeded"
                )));
            }
            vec![Effect::CloseStream]
        }
    }
}
