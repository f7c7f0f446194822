//! Capability traits for the external collaborators.
//!
//! Production implementations bind to the spreadsheet and Discord REST
//! clients; tests use in-memory fakes.

use async_trait::async_trait;

use crate::entry::{RegistrationEntry, StudentEntry};
use crate::error::Result;
use crate::roles::RoleAssignment;

/// Source of pending registration rows.
///
/// `peek_unprocessed` buffers, per member number, the sheet location needed
/// to mark that row done; the buffer has single-batch lifetime and is
/// rebuilt by every peek. `&mut self` makes that per-instance state explicit.
#[async_trait]
pub trait RegistrationSource: Send + Sync {
    /// Read up to `limit` pending entries, in sheet row order. Malformed and
    /// already-processed rows are dropped silently.
    async fn peek_unprocessed(&mut self, limit: usize) -> Result<Vec<RegistrationEntry>>;

    /// Write the processed marker for each member number seen in the last
    /// peek. Numbers not present in the last peek's buffer are silently
    /// ignored.
    async fn mark_processed(&mut self, member_numbers: &[String]) -> Result<()>;
}

/// Source of student-role assignment rows. Peek-only: the window is
/// addressed explicitly by start row, and this pipeline writes nothing back.
#[async_trait]
pub trait StudentSource: Send + Sync {
    async fn peek(&self, start_row: u32, limit: usize) -> Result<Vec<StudentEntry>>;
}

/// Applies role grants to a directory identity.
///
/// Every underlying grant/revoke must be safe to repeat: a failed run may be
/// re-invoked and re-apply roles for identities that already hold them.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Full member distribution: revoke the visitor role, grant the member,
    /// newcomer, cohort, and region roles.
    async fn assign_member_roles(
        &self,
        discord_id: &str,
        assignment: &RoleAssignment,
    ) -> Result<()>;

    /// Grant the single student role.
    async fn assign_student_role(&self, discord_id: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// In-memory fakes
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use crate::error::SyncError;
    use std::collections::{BTreeSet, HashMap};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    /// Backing store shared between a test and its `FakeRegistrationSource`,
    /// persisting processed markers across source instances the way the
    /// spreadsheet does across runs.
    pub(crate) struct FakeRegistrationStore {
        pub rows: Mutex<Vec<(RegistrationEntry, bool)>>,
        pub marked: Mutex<Vec<Vec<String>>>,
        fail_peek: AtomicBool,
    }

    impl FakeRegistrationStore {
        pub fn with_entries(entries: Vec<RegistrationEntry>) -> Arc<Self> {
            Arc::new(Self {
                rows: Mutex::new(entries.into_iter().map(|e| (e, false)).collect()),
                marked: Mutex::new(Vec::new()),
                fail_peek: AtomicBool::new(false),
            })
        }

        pub fn fail_peek(&self) {
            self.fail_peek.store(true, Ordering::SeqCst);
        }

        pub fn reset_processed(&self) {
            for (_, processed) in self.rows.lock().unwrap().iter_mut() {
                *processed = false;
            }
        }
    }

    pub(crate) struct FakeRegistrationSource {
        store: Arc<FakeRegistrationStore>,
        last_peek: Vec<String>,
    }

    impl FakeRegistrationSource {
        pub fn new(store: Arc<FakeRegistrationStore>) -> Self {
            Self {
                store,
                last_peek: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl RegistrationSource for FakeRegistrationSource {
        async fn peek_unprocessed(&mut self, limit: usize) -> Result<Vec<RegistrationEntry>> {
            if self.store.fail_peek.load(Ordering::SeqCst) {
                return Err(SyncError::SourceAccess("transport failure".to_string()));
            }
            let rows = self.store.rows.lock().unwrap();
            let entries: Vec<RegistrationEntry> = rows
                .iter()
                .filter(|(_, processed)| !processed)
                .take(limit)
                .map(|(entry, _)| entry.clone())
                .collect();
            self.last_peek = entries.iter().map(|e| e.member_number.clone()).collect();
            Ok(entries)
        }

        async fn mark_processed(&mut self, member_numbers: &[String]) -> Result<()> {
            self.store.marked.lock().unwrap().push(member_numbers.to_vec());
            let mut rows = self.store.rows.lock().unwrap();
            for number in member_numbers {
                if !self.last_peek.contains(number) {
                    continue;
                }
                for (entry, processed) in rows.iter_mut() {
                    if &entry.member_number == number {
                        *processed = true;
                    }
                }
            }
            Ok(())
        }
    }

    pub(crate) struct FakeStudentSource {
        pub rows: Vec<StudentEntry>,
        pub fail: bool,
    }

    #[async_trait]
    impl StudentSource for FakeStudentSource {
        async fn peek(&self, start_row: u32, limit: usize) -> Result<Vec<StudentEntry>> {
            if self.fail {
                return Err(SyncError::SourceAccess("transport failure".to_string()));
            }
            Ok(self
                .rows
                .iter()
                .skip(start_row.saturating_sub(1) as usize)
                .take(limit)
                .cloned()
                .collect())
        }
    }

    /// Role state per identity, so tests can assert end-state idempotence.
    pub(crate) struct FakeDirectory {
        calls: Mutex<Vec<String>>,
        roles: Mutex<HashMap<String, BTreeSet<String>>>,
        fail_for: Option<String>,
    }

    impl FakeDirectory {
        pub fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                roles: Mutex::new(HashMap::new()),
                fail_for: None,
            })
        }

        pub fn failing_for(discord_id: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                roles: Mutex::new(HashMap::new()),
                fail_for: Some(discord_id.to_string()),
            })
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn roles_of(&self, discord_id: &str) -> BTreeSet<String> {
            self.roles
                .lock()
                .unwrap()
                .get(discord_id)
                .cloned()
                .unwrap_or_default()
        }

        fn check(&self, discord_id: &str) -> Result<()> {
            // Record the attempt even when it fails.
            self.calls.lock().unwrap().push(discord_id.to_string());
            if self.fail_for.as_deref() == Some(discord_id) {
                return Err(SyncError::DirectoryApply {
                    identity: discord_id.to_string(),
                    message: "simulated outage".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RoleDirectory for Arc<FakeDirectory> {
        async fn assign_member_roles(
            &self,
            discord_id: &str,
            assignment: &RoleAssignment,
        ) -> Result<()> {
            self.check(discord_id)?;
            let mut roles = self.roles.lock().unwrap();
            let held = roles.entry(discord_id.to_string()).or_default();
            held.remove("visitor");
            held.insert("member".to_string());
            held.insert("newcomer".to_string());
            held.insert(assignment.cohort.as_str().to_string());
            held.insert(assignment.region.as_str().to_string());
            Ok(())
        }

        async fn assign_student_role(&self, discord_id: &str) -> Result<()> {
            self.check(discord_id)?;
            self.roles
                .lock()
                .unwrap()
                .entry(discord_id.to_string())
                .or_default()
                .insert("student".to_string());
            Ok(())
        }
    }
}
