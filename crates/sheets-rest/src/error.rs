use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("token exchange failed: {0}")]
    TokenExchange(String),
}

pub type Result<T> = std::result::Result<T, SheetsError>;
