use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RegistrationEntry
// ---------------------------------------------------------------------------

/// One pending re-registration row, decoded from the registration sheet.
///
/// Column layout: `A=name, B=member number, C=discord id, D=region label`,
/// with the processed marker in column E (never part of the entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationEntry {
    pub name: String,
    pub member_number: String,
    pub discord_id: String,
    pub region: String,
}

impl RegistrationEntry {
    /// Decode a raw sheet row. Returns `None` if the row is short or any
    /// required cell is empty; the row is dropped, never partially kept.
    pub fn from_row(row: &[String]) -> Option<Self> {
        let [name, member_number, discord_id, region] = required(row)?;
        Some(Self {
            name,
            member_number,
            discord_id,
            region,
        })
    }
}

// ---------------------------------------------------------------------------
// StudentEntry
// ---------------------------------------------------------------------------

/// One row from the student-assignment sheet.
///
/// Column layout: `A=member number, B=name, C=discord id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentEntry {
    pub member_number: String,
    pub name: String,
    pub discord_id: String,
}

impl StudentEntry {
    pub fn from_row(row: &[String]) -> Option<Self> {
        let [member_number, name, discord_id] = required(row)?;
        Some(Self {
            member_number,
            name,
            discord_id,
        })
    }
}

/// First `N` cells of a row, all non-empty. No trimming: upstream text is
/// taken verbatim.
fn required<const N: usize>(row: &[String]) -> Option<[String; N]> {
    if row.len() < N {
        return None;
    }
    if row[..N].iter().any(|cell| cell.is_empty()) {
        return None;
    }
    let mut out: [String; N] = std::array::from_fn(|_| String::new());
    out.clone_from_slice(&row[..N]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn registration_row_decodes() {
        let entry =
            RegistrationEntry::from_row(&row(&["Ada", "24010001", "111", "BINUS @Kemanggisan"]))
                .unwrap();
        assert_eq!(entry.name, "Ada");
        assert_eq!(entry.member_number, "24010001");
        assert_eq!(entry.discord_id, "111");
        assert_eq!(entry.region, "BINUS @Kemanggisan");
    }

    #[test]
    fn registration_row_tolerates_trailing_cells() {
        // The processed-marker column may be present on already-touched rows.
        let entry = RegistrationEntry::from_row(&row(&[
            "Ada",
            "24010001",
            "111",
            "BINUS @Kemanggisan",
            "TRUE",
        ]));
        assert!(entry.is_some());
    }

    #[test]
    fn registration_row_rejects_empty_cell() {
        assert!(RegistrationEntry::from_row(&row(&["Ada", "", "111", "BINUS @Kemanggisan"]))
            .is_none());
    }

    #[test]
    fn registration_row_rejects_short_row() {
        assert!(RegistrationEntry::from_row(&row(&["Ada", "24010001", "111"])).is_none());
    }

    #[test]
    fn registration_row_keeps_whitespace_verbatim() {
        // No trimming: a whitespace-only cell counts as present.
        let entry =
            RegistrationEntry::from_row(&row(&["Ada", "24010001", "111", " "])).unwrap();
        assert_eq!(entry.region, " ");
    }

    #[test]
    fn student_row_decodes_in_sheet_order() {
        let entry = StudentEntry::from_row(&row(&["24010001", "Ada", "111"])).unwrap();
        assert_eq!(entry.member_number, "24010001");
        assert_eq!(entry.name, "Ada");
        assert_eq!(entry.discord_id, "111");
    }

    #[test]
    fn student_row_rejects_missing_discord_id() {
        assert!(StudentEntry::from_row(&row(&["24010001", "Ada"])).is_none());
        assert!(StudentEntry::from_row(&row(&["24010001", "Ada", ""])).is_none());
    }
}
