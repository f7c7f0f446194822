use serde_json::json;

use crate::error::{DiscordError, Result};
use crate::types::CommandDefinition;

const DISCORD_BASE_URL: &str = "https://discord.com/api/v10";

#[derive(Debug)]
pub struct DiscordClient {
    http: reqwest::Client,
    base_url: String,
    bot_token: String,
}

impl DiscordClient {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DISCORD_BASE_URL.to_string(),
            bot_token: bot_token.into(),
        }
    }

    /// Point the client at a different API host (tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn auth(&self) -> String {
        format!("Bot {}", self.bot_token)
    }

    /// Grant one role. Idempotent: granting a role the member already holds
    /// succeeds with no change.
    pub async fn add_guild_member_role(
        &self,
        guild_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> Result<()> {
        let url = format!(
            "{}/guilds/{guild_id}/members/{user_id}/roles/{role_id}",
            self.base_url
        );
        let response = self
            .http
            .put(url)
            .header("Authorization", self.auth())
            .send()
            .await?;
        check_status(response).await
    }

    /// Revoke one role. Idempotent like the grant.
    pub async fn remove_guild_member_role(
        &self,
        guild_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> Result<()> {
        let url = format!(
            "{}/guilds/{guild_id}/members/{user_id}/roles/{role_id}",
            self.base_url
        );
        let response = self
            .http
            .delete(url)
            .header("Authorization", self.auth())
            .send()
            .await?;
        check_status(response).await
    }

    /// Post a plain message to a channel.
    pub async fn create_message(&self, channel_id: &str, content: &str) -> Result<()> {
        let url = format!("{}/channels/{channel_id}/messages", self.base_url);
        let response = self
            .http
            .post(url)
            .header("Authorization", self.auth())
            .json(&json!({ "content": content }))
            .send()
            .await?;
        check_status(response).await
    }

    /// Replace the guild's application command set wholesale. Re-running at
    /// startup converges to the same registration.
    pub async fn bulk_overwrite_guild_commands(
        &self,
        application_id: &str,
        guild_id: &str,
        commands: &[CommandDefinition],
    ) -> Result<()> {
        let url = format!(
            "{}/applications/{application_id}/guilds/{guild_id}/commands",
            self.base_url
        );
        let response = self
            .http
            .put(url)
            .header("Authorization", self.auth())
            .json(commands)
            .send()
            .await?;
        check_status(response).await
    }
}

async fn check_status(response: reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(DiscordError::Api {
        status: status.as_u16(),
        body,
    })
}
