use ed25519_dalek::VerifyingKey;
use tokio::sync::mpsc;

/// One queued batch run. A single worker (owned by the binary) drains these
/// sequentially, so overlapping commands never produce concurrent runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunRequest {
    VerifyMembers { batch_size: usize, dry_run: bool },
    VerifyStudents { start_row: u32, batch_size: usize },
}

#[derive(Clone)]
pub struct AppState {
    pub verifying_key: VerifyingKey,
    pub runs: mpsc::Sender<RunRequest>,
}

impl AppState {
    pub fn new(verifying_key: VerifyingKey, runs: mpsc::Sender<RunRequest>) -> Self {
        Self {
            verifying_key,
            runs,
        }
    }
}
