//! Discord-channel narration sink.
//!
//! Narration must never block or fail a run, so the sink only enqueues; a
//! writer task drains the queue and posts to the log channel. Delivery
//! failures are logged locally and dropped.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use rolesync_core::narrate::{Level, Narrator};

use crate::client::DiscordClient;

pub struct ChannelNarrator {
    tx: mpsc::UnboundedSender<(Level, String)>,
}

impl Narrator for ChannelNarrator {
    fn narrate(&self, level: Level, message: &str) {
        // Writer gone means shutdown; nothing useful to do with the message.
        let _ = self.tx.send((level, message.to_string()));
    }
}

/// Build the sink and spawn its writer task. The task ends when every
/// narrator handle is dropped.
pub fn channel_narrator(
    client: Arc<DiscordClient>,
    channel_id: impl Into<String>,
) -> (ChannelNarrator, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<(Level, String)>();
    let channel_id = channel_id.into();

    let handle = tokio::spawn(async move {
        while let Some((level, message)) = rx.recv().await {
            let text = match level {
                Level::Info => message,
                Level::Error => format!("**error** {message}"),
                Level::Fatal => format!("**fatal** {message}"),
            };
            if let Err(err) = client.create_message(&channel_id, &text).await {
                tracing::warn!("dropping log channel message: {err}");
            }
        }
    });

    (ChannelNarrator { tx }, handle)
}
