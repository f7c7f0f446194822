pub mod auth;
pub mod client;
pub mod error;
pub mod source;
pub mod types;

pub use auth::TokenSource;
pub use client::SheetsClient;
pub use error::{Result, SheetsError};
pub use source::{SheetRegistrationSource, SheetStudentSource};
