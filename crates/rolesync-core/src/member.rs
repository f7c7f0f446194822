//! Member reconciliation.
//!
//! Drives one batch: peek pending registrations, map each entry to its role
//! set, apply through the directory, then mark the successful rows processed.
//! A directory failure aborts the whole batch (a directory-service error is
//! treated as systemic, not per-row), but rows that already succeeded are
//! still committed so they are not re-applied on the next run.

use std::sync::Arc;

use crate::gateway::{RegistrationSource, RoleDirectory};
use crate::narrate::Narrator;
use crate::report::{AbortReason, EntryOutcome, EntryStatus, RunReport};
use crate::roles::map_roles;

pub struct MemberSyncService<S, D> {
    source: S,
    directory: D,
    narrator: Arc<dyn Narrator>,
}

impl<S: RegistrationSource, D: RoleDirectory> MemberSyncService<S, D> {
    pub fn new(source: S, directory: D, narrator: Arc<dyn Narrator>) -> Self {
        Self {
            source,
            directory,
            narrator,
        }
    }

    /// Run one batch of up to `batch_size` entries. In dry-run the full
    /// decision logic and narration run, but no directory call and no commit
    /// is made.
    pub async fn run(&mut self, batch_size: usize, dry_run: bool) -> RunReport {
        let mut report = RunReport::new(dry_run);

        let queue = match self.source.peek_unprocessed(batch_size).await {
            Ok(queue) => queue,
            Err(err) => {
                self.narrator
                    .fatal("Unable to access registration data. Exiting...");
                report.aborted = Some(AbortReason::SourceUnavailable {
                    message: err.to_string(),
                });
                return report;
            }
        };

        report.peeked = queue.len();
        let tag = if dry_run { "[DRY RUN] " } else { "" };
        self.narrator.info(&format!(
            "{tag}Booting up. Starting verification process, loaded {} unprocessed entries.",
            queue.len()
        ));

        for entry in &queue {
            self.narrator.info(&format!(
                "Processing: <@{}> | {} {} from {}",
                entry.discord_id, entry.member_number, entry.name, entry.region
            ));
            self.narrator.info("Parsing roles...");

            let assignment = match map_roles(&entry.region, &entry.member_number) {
                Ok(assignment) => assignment,
                Err(failure) => {
                    let mut msg = String::from("Roles could not be parsed: ");
                    if failure.region_failed {
                        msg.push_str(&format!(
                            "Region \"{}\" could not be parsed. ",
                            entry.region
                        ));
                    }
                    if failure.cohort_failed {
                        msg.push_str(&format!(
                            "Member number \"{}\" could not be parsed into a cohort.",
                            entry.member_number
                        ));
                    }
                    self.narrator.error(msg.trim_end());
                    self.narrator
                        .error(&format!("Skipping <@{}>...", entry.discord_id));
                    report.outcomes.push(EntryOutcome {
                        member_number: entry.member_number.clone(),
                        discord_id: entry.discord_id.clone(),
                        status: EntryStatus::SkippedInvalidMapping(failure),
                    });
                    continue;
                }
            };

            if !dry_run {
                self.narrator
                    .info(&format!("Distributing roles for <@{}>...", entry.discord_id));
                match self
                    .directory
                    .assign_member_roles(&entry.discord_id, &assignment)
                    .await
                {
                    Ok(()) => {
                        self.narrator
                            .info(&format!("Roles distributed for <@{}>", entry.discord_id));
                    }
                    Err(err) => {
                        self.narrator
                            .error(&format!("Error distributing roles: {err}"));
                        self.narrator.error("Aborting process due to failure...");
                        report.outcomes.push(EntryOutcome {
                            member_number: entry.member_number.clone(),
                            discord_id: entry.discord_id.clone(),
                            status: EntryStatus::DirectoryFailure {
                                message: err.to_string(),
                            },
                        });
                        report.aborted = Some(AbortReason::DirectoryFailure {
                            member_number: entry.member_number.clone(),
                            message: err.to_string(),
                        });
                        break;
                    }
                }
            } else {
                self.narrator.info(&format!(
                    "Would distribute {} / {} roles for <@{}>",
                    assignment.cohort, assignment.region, entry.discord_id
                ));
            }

            report.commit_set.push(entry.member_number.clone());
            report.outcomes.push(EntryOutcome {
                member_number: entry.member_number.clone(),
                discord_id: entry.discord_id.clone(),
                status: EntryStatus::Applied,
            });
        }

        self.narrator.info(&format!(
            "Batch finished. Processed: {}.",
            report.commit_set.len()
        ));

        if !dry_run && !report.commit_set.is_empty() {
            match self.source.mark_processed(&report.commit_set).await {
                Ok(()) => report.committed = true,
                Err(err) => {
                    // Roles are already granted; the rows stay pending and the
                    // grants are idempotent on the next run.
                    self.narrator
                        .error(&format!("Failed to mark processed rows: {err}"));
                }
            }
        }

        report
    }
}
