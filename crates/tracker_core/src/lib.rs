//! Tracker core: pure state machine for batch ingestion jobs.
mod effect;
mod event;
mod msg;
mod notice;
mod registry;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use event::JobEvent;
pub use msg::Msg;
pub use notice::{Notice, Severity};
pub use registry::{normalize_file_key, FileRecord, FileRegistry, FileStatus, StatusCounts};
pub use state::{JobId, Phase, TrackerState};
pub use update::update;
pub use view_model::{FileRowView, JobViewModel};
