//! Sheet-backed implementations of the core source gateways.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use rolesync_core::entry::{RegistrationEntry, StudentEntry};
use rolesync_core::gateway::{RegistrationSource, StudentSource};
use rolesync_core::{Result as CoreResult, SyncError};

use crate::client::SheetsClient;
use crate::types::ValueRangeWrite;

/// Written to the marker column when a row has been fully processed.
pub const PROCESSED_MARKER: &str = "TRUE";

/// Column E holds the processed marker; entry cells are A-D.
const MARKER_COLUMN: char = 'E';

// ---------------------------------------------------------------------------
// SheetRegistrationSource
// ---------------------------------------------------------------------------

/// Registration rows from a fixed window at the top of the sheet.
///
/// `commit_cells` maps member number to the absolute sheet row of the last
/// peek, so `mark_processed` knows where to write markers. The buffer lives
/// for exactly one batch: every peek rebuilds it. Duplicate member numbers
/// within one window overwrite each other, last row wins.
pub struct SheetRegistrationSource {
    client: Arc<SheetsClient>,
    spreadsheet_id: String,
    sheet: String,
    first_row: u32,
    commit_cells: HashMap<String, u32>,
}

impl SheetRegistrationSource {
    pub fn new(
        client: Arc<SheetsClient>,
        spreadsheet_id: impl Into<String>,
        sheet: impl Into<String>,
        first_row: u32,
    ) -> Self {
        Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
            sheet: sheet.into(),
            first_row,
            commit_cells: HashMap::new(),
        }
    }

    fn window_range(&self, limit: usize) -> String {
        let last = self.first_row + limit.saturating_sub(1) as u32;
        format!(
            "'{}'!A{}:{}{}",
            self.sheet, self.first_row, MARKER_COLUMN, last
        )
    }
}

#[async_trait]
impl RegistrationSource for SheetRegistrationSource {
    async fn peek_unprocessed(&mut self, limit: usize) -> CoreResult<Vec<RegistrationEntry>> {
        // Every peek invalidates the previous batch's buffer.
        self.commit_cells.clear();
        if limit == 0 {
            return Ok(Vec::new());
        }

        let rows = self
            .client
            .get_values(&self.spreadsheet_id, &self.window_range(limit))
            .await
            .map_err(|e| SyncError::SourceAccess(e.to_string()))?;

        let mut entries = Vec::new();
        for (idx, row) in rows.iter().enumerate() {
            let sheet_row = self.first_row + idx as u32;
            if row.get(4).is_some_and(|cell| !cell.is_empty()) {
                continue;
            }
            let Some(entry) = RegistrationEntry::from_row(row) else {
                continue;
            };
            self.commit_cells.insert(entry.member_number.clone(), sheet_row);
            entries.push(entry);
        }
        tracing::debug!(
            peeked = entries.len(),
            window = rows.len(),
            "peeked registration window"
        );
        Ok(entries)
    }

    async fn mark_processed(&mut self, member_numbers: &[String]) -> CoreResult<()> {
        let data: Vec<ValueRangeWrite> = member_numbers
            .iter()
            .filter_map(|number| self.commit_cells.get(number))
            .map(|row| ValueRangeWrite {
                range: format!("'{}'!{}{}", self.sheet, MARKER_COLUMN, row),
                values: vec![vec![PROCESSED_MARKER.to_string()]],
            })
            .collect();

        if data.is_empty() {
            return Ok(());
        }
        self.client
            .batch_update_values(&self.spreadsheet_id, data)
            .await
            .map_err(|e| SyncError::SourceAccess(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// SheetStudentSource
// ---------------------------------------------------------------------------

/// Student rows from an operator-addressed window; read-only.
pub struct SheetStudentSource {
    client: Arc<SheetsClient>,
    spreadsheet_id: String,
    sheet: String,
}

impl SheetStudentSource {
    pub fn new(
        client: Arc<SheetsClient>,
        spreadsheet_id: impl Into<String>,
        sheet: impl Into<String>,
    ) -> Self {
        Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
            sheet: sheet.into(),
        }
    }
}

#[async_trait]
impl StudentSource for SheetStudentSource {
    async fn peek(&self, start_row: u32, limit: usize) -> CoreResult<Vec<StudentEntry>> {
        if start_row == 0 || limit == 0 {
            return Ok(Vec::new());
        }
        let last = start_row + limit.saturating_sub(1) as u32;
        let range = format!("'{}'!A{start_row}:C{last}", self.sheet);
        let rows = self
            .client
            .get_values(&self.spreadsheet_id, &range)
            .await
            .map_err(|e| SyncError::SourceAccess(e.to_string()))?;
        Ok(rows
            .iter()
            .filter_map(|row| StudentEntry::from_row(row))
            .collect())
    }
}
