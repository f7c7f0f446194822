use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Result, SyncError};
use crate::roles::{Cohort, Region};

// ---------------------------------------------------------------------------
// DiscordConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    pub guild_id: String,
    pub application_id: String,
    /// Channel that receives the run narration.
    pub log_channel_id: String,
}

// ---------------------------------------------------------------------------
// SheetsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    pub registration_spreadsheet_id: String,
    #[serde(default = "default_registration_sheet")]
    pub registration_sheet: String,
    /// First data row of the registration sheet (1-based; row 1 is the header).
    #[serde(default = "default_first_data_row")]
    pub registration_first_row: u32,
    pub student_spreadsheet_id: String,
    #[serde(default = "default_student_sheet")]
    pub student_sheet: String,
}

fn default_registration_sheet() -> String {
    "Form Responses 1".to_string()
}

fn default_first_data_row() -> u32 {
    2
}

fn default_student_sheet() -> String {
    "Student to Assign to".to_string()
}

// ---------------------------------------------------------------------------
// RoleTable
// ---------------------------------------------------------------------------

/// Discord role ids for every role the two pipelines may grant or revoke.
/// Loaded once at startup and passed by reference; the services never read
/// ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleTable {
    pub visitor: String,
    pub member: String,
    pub newcomer: String,
    pub student: String,
    pub cohorts: HashMap<Cohort, String>,
    pub regions: HashMap<Region, String>,
}

impl RoleTable {
    pub fn cohort_role(&self, cohort: Cohort) -> Option<&str> {
        self.cohorts.get(&cohort).map(String::as_str)
    }

    pub fn region_role(&self, region: Region) -> Option<&str> {
        self.regions.get(&region).map(String::as_str)
    }

    /// Collect every problem, not just the first: a run must never discover a
    /// missing role id halfway through a batch.
    fn validate(&self, problems: &mut Vec<String>) {
        for (name, id) in [
            ("roles.visitor", &self.visitor),
            ("roles.member", &self.member),
            ("roles.newcomer", &self.newcomer),
            ("roles.student", &self.student),
        ] {
            if id.is_empty() {
                problems.push(format!("{name} is empty"));
            }
        }
        for cohort in Cohort::all() {
            match self.cohorts.get(cohort) {
                None => problems.push(format!("roles.cohorts is missing {cohort}")),
                Some(id) if id.is_empty() => {
                    problems.push(format!("roles.cohorts.{cohort} is empty"));
                }
                Some(_) => {}
            }
        }
        for region in Region::all() {
            match self.regions.get(region) {
                None => problems.push(format!("roles.regions is missing {region}")),
                Some(id) if id.is_empty() => {
                    problems.push(format!("roles.regions.{region} is empty"));
                }
                Some(_) => {}
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub discord: DiscordConfig,
    pub sheets: SheetsConfig,
    pub roles: RoleTable,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SyncError::ConfigNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Validate the loaded config. Returns every problem found; startup must
    /// be refused if any are present.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (name, id) in [
            ("discord.guild_id", &self.discord.guild_id),
            ("discord.application_id", &self.discord.application_id),
            ("discord.log_channel_id", &self.discord.log_channel_id),
            (
                "sheets.registration_spreadsheet_id",
                &self.sheets.registration_spreadsheet_id,
            ),
            (
                "sheets.student_spreadsheet_id",
                &self.sheets.student_spreadsheet_id,
            ),
        ] {
            if id.is_empty() {
                problems.push(format!("{name} is empty"));
            }
        }
        if self.sheets.registration_first_row == 0 {
            problems.push("sheets.registration_first_row must be 1-based".to_string());
        }
        self.roles.validate(&mut problems);
        problems
    }
}

// ---------------------------------------------------------------------------
// Secrets
// ---------------------------------------------------------------------------

/// Credentials for the Sheets values API: either a pre-issued bearer token
/// (operator-supplied, short-lived) or an OAuth client with a refresh token.
#[derive(Debug, Clone)]
pub enum SheetsAuth {
    Static { token: String },
    OAuth(OAuthCredentials),
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

/// Secrets come from the environment only, never the config file.
#[derive(Debug, Clone)]
pub struct Secrets {
    pub bot_token: String,
    /// Hex-encoded Ed25519 public key for interaction signature checks.
    pub public_key: String,
    pub sheets: SheetsAuth,
}

impl Secrets {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Testable core of `from_env`. Missing variables are collected and
    /// reported together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut get = |name: &str| match lookup(name) {
            Some(value) if !value.is_empty() => Some(value),
            _ => {
                missing.push(name.to_string());
                None
            }
        };

        let bot_token = get("ROLESYNC_BOT_TOKEN");
        let public_key = get("ROLESYNC_PUBLIC_KEY");

        // A static token takes precedence over the OAuth blob.
        let sheets = if let Some(token) = lookup("ROLESYNC_SHEETS_TOKEN").filter(|t| !t.is_empty())
        {
            Some(SheetsAuth::Static { token })
        } else {
            match get("ROLESYNC_SHEETS_OAUTH_64") {
                Some(blob) => decode_oauth_blob(&blob).map(SheetsAuth::OAuth).map(Some)?,
                None => None,
            }
        };

        if !missing.is_empty() {
            return Err(SyncError::MissingEnv(missing.join(", ")));
        }

        Ok(Self {
            bot_token: bot_token.unwrap_or_default(),
            public_key: public_key.unwrap_or_default(),
            sheets: sheets.unwrap_or(SheetsAuth::Static {
                token: String::new(),
            }),
        })
    }
}

fn decode_oauth_blob(blob: &str) -> Result<OAuthCredentials> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(blob)
        .map_err(|e| SyncError::InvalidConfig(format!("ROLESYNC_SHEETS_OAUTH_64: {e}")))?;
    Ok(serde_json::from_slice(&bytes)?)
}
