use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::model::{DATA_FILE, ProjectRecord, Session};

use super::capability::{FsCapability, FsError};

/// Default quiet period between the last edit and its flush.
pub const DEFAULT_QUIET: Duration = Duration::from_millis(500);

/// Debounced per-record persistence scheduler.
///
/// Holds at most one pending deadline per record key. Every new edit cancels
/// and reschedules that record's flush (last-write-wins, not throttling);
/// deadlines for different records are fully independent.
#[derive(Debug)]
pub struct SaveScheduler {
    quiet: Duration,
    pending: HashMap<String, Instant>,
}

impl SaveScheduler {
    pub fn new(quiet: Duration) -> SaveScheduler {
        SaveScheduler {
            quiet,
            pending: HashMap::new(),
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Record an edit: (re)schedule the record's flush for now + quiet.
    pub fn note_edit(&mut self, key: &str) {
        self.note_edit_at(key, Instant::now());
    }

    /// As `note_edit`, with an explicit clock.
    pub fn note_edit_at(&mut self, key: &str, now: Instant) {
        self.pending.insert(key.to_string(), now + self.quiet);
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.contains_key(key)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Remove and return the keys whose quiet period has elapsed, in stable
    /// order.
    pub fn due_keys(&mut self, now: Instant) -> Vec<String> {
        let mut due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, _)| key.clone())
            .collect();
        due.sort();
        for key in &due {
            self.pending.remove(key);
        }
        due
    }
}

impl Default for SaveScheduler {
    fn default() -> Self {
        SaveScheduler::new(DEFAULT_QUIET)
    }
}

/// Serialize the record's full current payload and write it back to the
/// backing file. Returns Ok(false) without writing when nothing changed
/// since the last successful flush.
pub fn flush_record(fs: &dyn FsCapability, record: &mut ProjectRecord) -> Result<bool, FsError> {
    let content = record.data.to_tab_json();
    if content == record.clean_payload {
        return Ok(false);
    }
    fs.write_file(&record.dir, DATA_FILE, &content)?;
    record.clean_payload = content;
    Ok(true)
}

/// Flush every record whose quiet period has elapsed. A failed flush yields
/// a user-visible status string and is not retried; the next edit
/// reschedules it naturally.
pub fn flush_due(
    sched: &mut SaveScheduler,
    session: &mut Session,
    fs: &dyn FsCapability,
    now: Instant,
) -> Vec<String> {
    let mut statuses = Vec::new();
    for key in sched.due_keys(now) {
        let Some(index) = session.find_by_key(&key) else {
            continue; // record disappeared in a rescan; nothing to save
        };
        if let Some(record) = session.record_mut(index) {
            if let Err(e) = flush_record(fs, record) {
                eprintln!("diagnostic: flush of {} failed: {}", key, e);
                statuses.push(format!("Unable to save project.json for {}", record.folder));
            }
        }
    }
    statuses
}
