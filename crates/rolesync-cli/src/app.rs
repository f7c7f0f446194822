//! Wiring: load config and secrets, build clients, assemble services.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::task::JoinHandle;

use discord_rest::{channel_narrator, DiscordClient, MemberRoleDirectory};
use rolesync_core::config::{Config, Secrets};
use rolesync_core::member::MemberSyncService;
use rolesync_core::narrate::{CompositeNarrator, Narrator, TracingNarrator};
use rolesync_core::student::StudentSyncService;
use sheets_rest::{SheetRegistrationSource, SheetStudentSource, SheetsClient};

#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub secrets: Secrets,
    pub discord: Arc<DiscordClient>,
    pub sheets: Arc<SheetsClient>,
}

impl App {
    /// Load and validate everything needed to run. Any missing config value
    /// or environment variable refuses startup with the full list of
    /// problems.
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let config = Config::load(config_path)
            .with_context(|| format!("loading {}", config_path.display()))?;
        let problems = config.validate();
        if !problems.is_empty() {
            anyhow::bail!("invalid config:\n  - {}", problems.join("\n  - "));
        }
        let secrets = Secrets::from_env()?;

        let discord = Arc::new(DiscordClient::new(secrets.bot_token.clone()));
        let sheets = Arc::new(SheetsClient::new(secrets.sheets.clone()));

        Ok(Self {
            config,
            secrets,
            discord,
            sheets,
        })
    }

    /// Composite narration: console via tracing plus the guild log channel.
    /// The writer task ends once every narrator handle is dropped; await it
    /// to flush pending channel messages.
    pub fn narrator(&self) -> (Arc<dyn Narrator>, JoinHandle<()>) {
        let (channel, writer) =
            channel_narrator(self.discord.clone(), self.config.discord.log_channel_id.clone());
        let narrator = CompositeNarrator::new(vec![
            Arc::new(TracingNarrator) as Arc<dyn Narrator>,
            Arc::new(channel) as Arc<dyn Narrator>,
        ]);
        (Arc::new(narrator), writer)
    }

    pub fn member_service(
        &self,
        narrator: Arc<dyn Narrator>,
    ) -> MemberSyncService<SheetRegistrationSource, MemberRoleDirectory> {
        let source = SheetRegistrationSource::new(
            self.sheets.clone(),
            self.config.sheets.registration_spreadsheet_id.clone(),
            self.config.sheets.registration_sheet.clone(),
            self.config.sheets.registration_first_row,
        );
        let directory = MemberRoleDirectory::new(
            self.discord.clone(),
            self.config.discord.guild_id.clone(),
            self.config.roles.clone(),
        );
        MemberSyncService::new(source, directory, narrator)
    }

    pub fn student_service(
        &self,
        narrator: Arc<dyn Narrator>,
    ) -> StudentSyncService<SheetStudentSource, MemberRoleDirectory> {
        let source = SheetStudentSource::new(
            self.sheets.clone(),
            self.config.sheets.student_spreadsheet_id.clone(),
            self.config.sheets.student_sheet.clone(),
        );
        let directory = MemberRoleDirectory::new(
            self.discord.clone(),
            self.config.discord.guild_id.clone(),
            self.config.roles.clone(),
        );
        StudentSyncService::new(source, directory, narrator)
    }
}
