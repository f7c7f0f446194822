use std::time::{Duration, Instant};

use rolesync_core::config::{OAuthCredentials, SheetsAuth};
use tokio::sync::Mutex;

use crate::error::{Result, SheetsError};
use crate::types::TokenResponse;

const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Refresh a little before Google's stated expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Bearer-token source for the values API: either a pre-issued static token
/// or the OAuth refresh-token flow, cached in memory until near expiry.
#[derive(Debug)]
pub struct TokenSource {
    auth: SheetsAuth,
    token_url: String,
    cache: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(auth: SheetsAuth) -> Self {
        Self {
            auth,
            token_url: GOOGLE_TOKEN_URL.to_string(),
            cache: Mutex::new(None),
        }
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub async fn bearer(&self, http: &reqwest::Client) -> Result<String> {
        let creds = match &self.auth {
            SheetsAuth::Static { token } => return Ok(token.clone()),
            SheetsAuth::OAuth(creds) => creds,
        };

        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.token.clone());
            }
        }

        let token = self.exchange(http, creds).await?;
        let bearer = token.access_token.clone();
        *cache = Some(CachedToken {
            token: token.access_token,
            expires_at: Instant::now()
                + Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN),
        });
        Ok(bearer)
    }

    async fn exchange(
        &self,
        http: &reqwest::Client,
        creds: &OAuthCredentials,
    ) -> Result<TokenResponse> {
        let response = http
            .post(&self.token_url)
            .form(&[
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
                ("refresh_token", creds.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::TokenExchange(format!("{status}: {body}")));
        }
        Ok(response.json().await?)
    }
}
