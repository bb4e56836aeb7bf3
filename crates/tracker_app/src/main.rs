mod args;
mod logging;
mod render;
mod runner;

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use chrono::Utc;
use tracker_core::{update, Msg, Phase, TrackerState};
use tracker_logging::tracker_error;

use crate::runner::EffectRunner;

fn main() -> ExitCode {
    logging::initialize();

    let args = match args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let bytes = match std::fs::read(&args.file) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracker_error!("cannot read {}: {err}", args.file);
            return ExitCode::FAILURE;
        }
    };
    let file_name = Path::new(&args.file)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.clone());

    let runner = EffectRunner::new(args.base_url.clone(), bytes, args.uploaded_by.clone());

    let mut state = TrackerState::new();
    let mut inbox = vec![
        Msg::CustomerSelected(args.customer.clone()),
        Msg::FileChosen(file_name),
    ];
    if let Some(server) = args.server_name.clone() {
        inbox.push(Msg::ServerOverride(server));
    }
    inbox.push(Msg::LaunchClicked);

    let mut last_phase_line = String::new();
    loop {
        while let Some(msg) = runner.try_recv() {
            inbox.push(msg);
        }
        let had_input = !inbox.is_empty();
        for msg in inbox.drain(..) {
            let (next, effects) = update(std::mem::take(&mut state), msg);
            state = next;
            runner.execute(effects);
        }

        if had_input && state.consume_dirty() {
            let view = state.view();
            let line = render::phase_line(&view);
            if line != last_phase_line {
                println!("{line}");
                last_phase_line = line;
            }
            if view.phase.is_terminal() {
                for file_line in render::file_lines(&view) {
                    println!("{file_line}");
                }
            }
        }
        for notice in state.drain_notices() {
            println!("{}", render::notice_line(&notice));
        }

        match state.phase() {
            Phase::Done => {
                println!("finished at {}", Utc::now().to_rfc3339());
                return ExitCode::SUCCESS;
            }
            Phase::Error => {
                println!("failed at {}", Utc::now().to_rfc3339());
                return ExitCode::FAILURE;
            }
            _ => std::thread::sleep(Duration::from_millis(20)),
        }
    }
}
