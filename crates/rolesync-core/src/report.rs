use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::roles::MappingFailure;

// ---------------------------------------------------------------------------
// Per-entry outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    Applied,
    SkippedInvalidMapping(MappingFailure),
    DirectoryFailure { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryOutcome {
    pub member_number: String,
    pub discord_id: String,
    #[serde(flatten)]
    pub status: EntryStatus,
}

// ---------------------------------------------------------------------------
// RunReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AbortReason {
    SourceUnavailable { message: String },
    DirectoryFailure {
        member_number: String,
        message: String,
    },
}

/// Summary of one batch run. `run()` always returns a report; failures
/// surface here and in the narration, never as an `Err`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub dry_run: bool,
    /// Entries loaded by the peek, after row-level validation.
    pub peeked: usize,
    pub outcomes: Vec<EntryOutcome>,
    /// Member numbers that completed processing this run, in peek order.
    /// Populated in dry-run too; `committed` records whether the processed
    /// markers were actually written.
    pub commit_set: Vec<String>,
    pub committed: bool,
    pub aborted: Option<AbortReason>,
}

impl RunReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            dry_run,
            peeked: 0,
            outcomes: Vec::new(),
            commit_set: Vec::new(),
            committed: false,
            aborted: None,
        }
    }

    /// Entries that completed processing (applied, or simulated in dry-run).
    pub fn processed(&self) -> usize {
        self.commit_set.len()
    }

    /// Member numbers whose directory apply failed.
    pub fn failed_member_numbers(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, EntryStatus::DirectoryFailure { .. }))
            .map(|o| o.member_number.as_str())
            .collect()
    }
}
