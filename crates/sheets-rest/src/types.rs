//! Wire types for the Sheets v4 values API.

use serde::{Deserialize, Serialize};

/// Response of `values.get`. Cells are formatted values; anything non-string
/// (unlikely under `FORMATTED_VALUE` rendering) is stringified.
#[derive(Debug, Clone, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

impl ValueRange {
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.values
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| match cell {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValueRangeWrite {
    pub range: String,
    pub values: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateValuesRequest {
    pub value_input_option: String,
    pub data: Vec<ValueRangeWrite>,
}

/// Response of the OAuth token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}
