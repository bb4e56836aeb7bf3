use std::collections::BTreeMap;

/// Per-file lifecycle status. The order of variants is the only legal
/// progression; `Done` and `Error` are both terminal and neither may
/// overwrite the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileStatus {
    #[default]
    Pending,
    Processing,
    Done,
    Error,
}

impl FileStatus {
    fn rank(self) -> u8 {
        match self {
            FileStatus::Pending => 0,
            FileStatus::Processing => 1,
            FileStatus::Done | FileStatus::Error => 2,
        }
    }
}

/// One file's progress within a job. Created lazily on first reference by
/// any event; never deleted within the job's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub key: String,
    pub display_name: Option<String>,
    pub status: FileStatus,
    /// Discovery order, assigned at `file_found`; first assignment wins.
    pub ordinal: Option<u64>,
    pub correlation_id: Option<String>,
    pub metrics: Option<String>,
    pub message: Option<String>,
}

impl FileRecord {
    fn new(key: String) -> Self {
        Self {
            key,
            display_name: None,
            status: FileStatus::Pending,
            ordinal: None,
            correlation_id: None,
            metrics: None,
            message: None,
        }
    }

    /// Monotonic status transition. Returns true when the status actually
    /// advanced, so callers can gate counter increments on it.
    pub fn advance(&mut self, status: FileStatus) -> bool {
        if status.rank() > self.status.rank() {
            self.status = status;
            true
        } else {
            false
        }
    }
}

/// Aggregate counts derived by scanning the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub pending: u64,
    pub processing: u64,
    pub done: u64,
    pub failed: u64,
}

/// Strip any path prefix from a raw filename so events referencing the
/// same logical file under different path spellings collapse to one key.
pub fn normalize_file_key(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed)
        .to_string()
}

/// Keyed, idempotently-updated map of per-file state. The single source of
/// truth for everything displayed per file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileRegistry {
    files: BTreeMap<String, FileRecord>,
}

impl FileRegistry {
    /// Upsert by raw (possibly path-prefixed) filename.
    pub fn upsert(&mut self, raw_key: &str) -> &mut FileRecord {
        let key = normalize_file_key(raw_key);
        self.files
            .entry(key.clone())
            .or_insert_with(|| FileRecord::new(key))
    }

    pub fn get(&self, raw_key: &str) -> Option<&FileRecord> {
        self.files.get(&normalize_file_key(raw_key))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for record in self.files.values() {
            match record.status {
                FileStatus::Pending => counts.pending += 1,
                FileStatus::Processing => counts.processing += 1,
                FileStatus::Done => counts.done += 1,
                FileStatus::Error => counts.failed += 1,
            }
        }
        counts
    }

    /// Records in display order: discovery ordinal first, filename as the
    /// tie-break. Keeps the visible list stable even though completion
    /// events legitimately arrive out of discovery order.
    pub fn ordered(&self) -> Vec<&FileRecord> {
        let mut rows: Vec<&FileRecord> = self.files.values().collect();
        rows.sort_by(|a, b| {
            let a_ord = a.ordinal.unwrap_or(u64::MAX);
            let b_ord = b.ordinal.unwrap_or(u64::MAX);
            a_ord.cmp(&b_ord).then_with(|| a.key.cmp(&b.key))
        });
        rows
    }
}
