pub mod client;
pub mod commands;
pub mod directory;
pub mod error;
pub mod notify;
pub mod types;

pub use client::DiscordClient;
pub use directory::MemberRoleDirectory;
pub use error::{DiscordError, Result};
pub use notify::{channel_narrator, ChannelNarrator};
