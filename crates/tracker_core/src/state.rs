use std::collections::VecDeque;

use crate::view_model::build_view;
use crate::{FileRegistry, JobViewModel, Notice};

/// Opaque, server-issued job identifier.
pub type JobId = String;

/// Coarse overall job progress, distinct from any single file's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    Processing,
    Done,
    Error,
}

impl Phase {
    /// After `job_completed` or a stream failure no further event may
    /// mutate the tracker.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackerState {
    pub(crate) customer: Option<String>,
    pub(crate) chosen_file: Option<String>,
    pub(crate) server_override: Option<String>,
    pub(crate) phase: Phase,
    pub(crate) upload_percent: Option<u8>,
    pub(crate) job_id: Option<JobId>,
    pub(crate) expected_total: Option<u64>,
    pub(crate) success_count: u64,
    pub(crate) failed_count: u64,
    pub(crate) stream_active: bool,
    pub(crate) registry: FileRegistry,
    pub(crate) notices: VecDeque<Notice>,
    dirty: bool,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> JobViewModel {
        build_view(self)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    /// Returns whether the state changed since the last call, clearing the
    /// flag. The presentation layer uses this to coalesce rendering.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Hand queued notifications to the presentation layer.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn push_notice(&mut self, notice: Notice) {
        self.notices.push_back(notice);
        self.dirty = true;
    }

    /// Discard everything belonging to a prior run so two runs' records
    /// never mix. Launch context (customer, file) is kept.
    pub(crate) fn reset_job(&mut self) {
        self.phase = Phase::Idle;
        self.upload_percent = None;
        self.job_id = None;
        self.expected_total = None;
        self.success_count = 0;
        self.failed_count = 0;
        self.stream_active = false;
        self.registry.clear();
        self.dirty = true;
    }
}
