pub mod config;
pub mod entry;
pub mod error;
pub mod gateway;
pub mod member;
pub mod narrate;
pub mod report;
pub mod roles;
pub mod student;

pub use error::{Result, SyncError};
