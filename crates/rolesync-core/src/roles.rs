use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// Canonical campus affiliation. The free-text labels come from the
/// registration form and must match `from_label` byte-for-byte: the table
/// mirrors upstream text exactly, with no trimming or case-folding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Kemanggisan,
    AlamSutera,
    Bandung,
    Malang,
    Semarang,
    Senayan,
    Bekasi,
    Online,
}

impl Region {
    pub fn all() -> &'static [Region] {
        &[
            Region::Kemanggisan,
            Region::AlamSutera,
            Region::Bandung,
            Region::Malang,
            Region::Semarang,
            Region::Senayan,
            Region::Bekasi,
            Region::Online,
        ]
    }

    /// Exact-match lookup of the upstream form label.
    pub fn from_label(label: &str) -> Option<Region> {
        match label {
            "BINUS @Kemanggisan" => Some(Region::Kemanggisan),
            "BINUS @Alam Sutera" => Some(Region::AlamSutera),
            "BINUS @Bandung" => Some(Region::Bandung),
            "BINUS @Malang" => Some(Region::Malang),
            "BINUS @Semarang" => Some(Region::Semarang),
            "BINUS @Senayan" => Some(Region::Senayan),
            "BINUS @Bekasi" => Some(Region::Bekasi),
            "BINUS @Online Learning" => Some(Region::Online),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Region::Kemanggisan => "Kemanggisan",
            Region::AlamSutera => "AlamSutera",
            Region::Bandung => "Bandung",
            Region::Malang => "Malang",
            Region::Semarang => "Semarang",
            Region::Senayan => "Senayan",
            Region::Bekasi => "Bekasi",
            Region::Online => "Online",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Cohort
// ---------------------------------------------------------------------------

/// Year-group classification, derived from the first two digits of the
/// member number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cohort {
    B24,
    B25,
    B26,
    B27,
}

impl Cohort {
    pub fn all() -> &'static [Cohort] {
        &[Cohort::B24, Cohort::B25, Cohort::B26, Cohort::B27]
    }

    /// Derive the cohort from a member number's 2-digit prefix. Any other
    /// prefix (out of range, non-numeric, too short) is unsupported.
    pub fn from_member_number(member_number: &str) -> Option<Cohort> {
        match member_number.get(..2) {
            Some("24") => Some(Cohort::B24),
            Some("25") => Some(Cohort::B25),
            Some("26") => Some(Cohort::B26),
            Some("27") => Some(Cohort::B27),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Cohort::B24 => "B24",
            Cohort::B25 => "B25",
            Cohort::B26 => "B26",
            Cohort::B27 => "B27",
        }
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RoleAssignment / mapping
// ---------------------------------------------------------------------------

/// The target role set for one verified member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub cohort: Cohort,
    pub region: Region,
}

/// Which sub-fields failed to map. Both flags can be set at once; callers
/// must report every reason, not just the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingFailure {
    pub region_failed: bool,
    pub cohort_failed: bool,
}

/// Map a validated entry's free-text fields to a canonical role assignment.
/// Pure; region and cohort resolution run independently.
pub fn map_roles(
    region_label: &str,
    member_number: &str,
) -> std::result::Result<RoleAssignment, MappingFailure> {
    let region = Region::from_label(region_label);
    let cohort = Cohort::from_member_number(member_number);

    match (cohort, region) {
        (Some(cohort), Some(region)) => Ok(RoleAssignment { cohort, region }),
        _ => Err(MappingFailure {
            region_failed: region.is_none(),
            cohort_failed: cohort.is_none(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_region_and_cohort() {
        let assignment = map_roles("BINUS @Kemanggisan", "24010001").unwrap();
        assert_eq!(assignment.region, Region::Kemanggisan);
        assert_eq!(assignment.cohort, Cohort::B24);
    }

    #[test]
    fn region_failure_is_independent_of_cohort() {
        let failure = map_roles("Unknown City", "24010001").unwrap_err();
        assert!(failure.region_failed);
        assert!(!failure.cohort_failed);
    }

    #[test]
    fn cohort_failure_is_independent_of_region() {
        let failure = map_roles("BINUS @Bandung", "99999999").unwrap_err();
        assert!(!failure.region_failed);
        assert!(failure.cohort_failed);
    }

    #[test]
    fn both_failures_reported_together() {
        let failure = map_roles("Unknown City", "99123456").unwrap_err();
        assert!(failure.region_failed);
        assert!(failure.cohort_failed);
    }

    #[test]
    fn label_match_is_exact() {
        // Leading/trailing whitespace and case differences do not resolve.
        assert!(Region::from_label(" BINUS @Kemanggisan").is_none());
        assert!(Region::from_label("binus @kemanggisan").is_none());
        assert!(Region::from_label("Kemanggisan").is_none());
    }

    #[test]
    fn cohort_prefix_must_be_supported() {
        assert_eq!(Cohort::from_member_number("27123456"), Some(Cohort::B27));
        assert!(Cohort::from_member_number("23123456").is_none());
        assert!(Cohort::from_member_number("9").is_none());
        assert!(Cohort::from_member_number("ab123456").is_none());
    }
}
