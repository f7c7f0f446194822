use rolesync_core::config::SheetsAuth;

use crate::auth::TokenSource;
use crate::error::{Result, SheetsError};
use crate::types::{BatchUpdateValuesRequest, ValueRange, ValueRangeWrite};

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

#[derive(Debug)]
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: String,
    token: TokenSource,
}

impl SheetsClient {
    pub fn new(auth: SheetsAuth) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: SHEETS_BASE_URL.to_string(),
            token: TokenSource::new(auth),
        }
    }

    /// Point the client at a different API host (tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_token_source(mut self, token: TokenSource) -> Self {
        self.token = token;
        self
    }

    /// `values.get` — read one A1 range, rows outer, cells inner.
    pub async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let bearer = self.token.bearer(&self.http).await?;
        let url = format!(
            "{}/v4/spreadsheets/{spreadsheet_id}/values/{range}",
            self.base_url
        );
        let response = self.http.get(url).bearer_auth(bearer).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                body,
            });
        }
        let range: ValueRange = response.json().await?;
        Ok(range.into_rows())
    }

    /// `values.batchUpdate` — write several ranges in one call, raw input.
    pub async fn batch_update_values(
        &self,
        spreadsheet_id: &str,
        data: Vec<ValueRangeWrite>,
    ) -> Result<()> {
        let bearer = self.token.bearer(&self.http).await?;
        let url = format!(
            "{}/v4/spreadsheets/{spreadsheet_id}/values:batchUpdate",
            self.base_url
        );
        let request = BatchUpdateValuesRequest {
            value_input_option: "RAW".to_string(),
            data,
        };
        let response = self
            .http
            .post(url)
            .bearer_auth(bearer)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
