use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("source access failed: {0}")]
    SourceAccess(String),

    #[error("directory apply failed for <@{identity}>: {message}")]
    DirectoryApply { identity: String, message: String },

    #[error("config file not found: {0}")]
    ConfigNotFound(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("missing environment variables: {0}")]
    MissingEnv(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
