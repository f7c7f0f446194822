//! Student role assignment.
//!
//! Same batch shape as member reconciliation, with two deliberate
//! differences: every entry gets the one fixed student role (no mapping
//! step), and a directory failure is recorded while the loop continues. The
//! batch report lists every member number that still needs manual follow-up.
//! The student source is a peek-only window; nothing is written back.

use std::sync::Arc;

use crate::gateway::{RoleDirectory, StudentSource};
use crate::narrate::Narrator;
use crate::report::{AbortReason, EntryOutcome, EntryStatus, RunReport};

pub struct StudentSyncService<S, D> {
    source: S,
    directory: D,
    narrator: Arc<dyn Narrator>,
}

impl<S: StudentSource, D: RoleDirectory> StudentSyncService<S, D> {
    pub fn new(source: S, directory: D, narrator: Arc<dyn Narrator>) -> Self {
        Self {
            source,
            directory,
            narrator,
        }
    }

    pub async fn run(&self, start_row: u32, batch_size: usize) -> RunReport {
        let mut report = RunReport::new(false);

        let queue = match self.source.peek(start_row, batch_size).await {
            Ok(queue) => queue,
            Err(err) => {
                self.narrator
                    .fatal("Unable to access student assignment data. Exiting...");
                report.aborted = Some(AbortReason::SourceUnavailable {
                    message: err.to_string(),
                });
                return report;
            }
        };

        report.peeked = queue.len();
        self.narrator.info(&format!(
            "Booting up. Starting student assignment, loaded {} entries from row {}.",
            queue.len(),
            start_row
        ));

        let mut failed: Vec<String> = Vec::new();

        for entry in &queue {
            self.narrator.info(&format!(
                "Processing: <@{}> | {} {}",
                entry.discord_id, entry.member_number, entry.name
            ));
            self.narrator
                .info(&format!("Distributing roles for <@{}>...", entry.discord_id));

            match self.directory.assign_student_role(&entry.discord_id).await {
                Ok(()) => {
                    self.narrator
                        .info(&format!("Roles distributed for <@{}>", entry.discord_id));
                    report.commit_set.push(entry.member_number.clone());
                    report.outcomes.push(EntryOutcome {
                        member_number: entry.member_number.clone(),
                        discord_id: entry.discord_id.clone(),
                        status: EntryStatus::Applied,
                    });
                }
                Err(err) => {
                    self.narrator
                        .error(&format!("Error distributing roles: {err}"));
                    failed.push(entry.member_number.clone());
                    report.outcomes.push(EntryOutcome {
                        member_number: entry.member_number.clone(),
                        discord_id: entry.discord_id.clone(),
                        status: EntryStatus::DirectoryFailure {
                            message: err.to_string(),
                        },
                    });
                }
            }
        }

        let failed_list = if failed.is_empty() {
            "None".to_string()
        } else {
            failed.join(" ")
        };
        self.narrator.info(&format!(
            "Batch finished. Here are the unprocessed member numbers: {failed_list}"
        ));

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::StudentEntry;
    use crate::gateway::fakes::{FakeDirectory, FakeStudentSource};
    use crate::narrate::{BufferNarrator, Level};
    use crate::report::EntryStatus;

    fn entry(n: u32) -> StudentEntry {
        StudentEntry {
            member_number: format!("2601000{n}"),
            name: format!("Student {n}"),
            discord_id: format!("{n}{n}{n}"),
        }
    }

    #[tokio::test]
    async fn grants_student_role_to_every_entry() {
        let source = FakeStudentSource {
            rows: (1..=3).map(entry).collect(),
            fail: false,
        };
        let directory = FakeDirectory::new();
        let narrator = BufferNarrator::new();
        let svc = StudentSyncService::new(source, directory.clone(), narrator.clone());

        let report = svc.run(1, 10).await;

        assert_eq!(report.peeked, 3);
        assert_eq!(directory.calls(), vec!["111", "222", "333"]);
        assert!(directory.roles_of("222").contains("student"));
        assert!(narrator.contains(Level::Info, "unprocessed member numbers: None"));
    }

    #[tokio::test]
    async fn failure_is_recorded_and_loop_continues() {
        let source = FakeStudentSource {
            rows: (1..=5).map(entry).collect(),
            fail: false,
        };
        let directory = FakeDirectory::failing_for("333");
        let narrator = BufferNarrator::new();
        let svc = StudentSyncService::new(source, directory.clone(), narrator.clone());

        let report = svc.run(1, 10).await;

        // All five attempted, only the third failed.
        assert_eq!(directory.calls(), vec!["111", "222", "333", "444", "555"]);
        assert_eq!(report.failed_member_numbers(), vec!["26010003"]);
        assert!(report.aborted.is_none());
        assert!(narrator.contains(Level::Info, "unprocessed member numbers: 26010003"));
        assert_eq!(
            report
                .outcomes
                .iter()
                .filter(|o| matches!(o.status, EntryStatus::Applied))
                .count(),
            4
        );
    }

    #[tokio::test]
    async fn start_row_addresses_the_window() {
        let source = FakeStudentSource {
            rows: (1..=5).map(entry).collect(),
            fail: false,
        };
        let directory = FakeDirectory::new();
        let narrator = BufferNarrator::new();
        let svc = StudentSyncService::new(source, directory.clone(), narrator.clone());

        let report = svc.run(3, 2).await;

        assert_eq!(report.peeked, 2);
        assert_eq!(directory.calls(), vec!["333", "444"]);
    }

    #[tokio::test]
    async fn peek_failure_aborts_without_directory_calls() {
        let source = FakeStudentSource {
            rows: vec![entry(1)],
            fail: true,
        };
        let directory = FakeDirectory::new();
        let narrator = BufferNarrator::new();
        let svc = StudentSyncService::new(source, directory.clone(), narrator.clone());

        let report = svc.run(1, 10).await;

        assert!(report.aborted.is_some());
        assert!(directory.calls().is_empty());
        assert!(narrator.contains(Level::Fatal, "student assignment data"));
    }
}
