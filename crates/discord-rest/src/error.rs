use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Discord API returned {status}: {body}")]
    Api { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, DiscordError>;
