use std::path::Path;

use tokio::sync::mpsc;

use crate::app::App;
use rolesync_server::state::{AppState, RunRequest};
use rolesync_server::verify::parse_public_key;

/// Bring up the interactions endpoint and the single batch worker.
///
/// Queue capacity is one: a command arriving while a run is in flight is
/// turned away at the trigger, keeping runs strictly sequential.
pub async fn run(config_path: &Path, addr: &str) -> anyhow::Result<()> {
    let app = App::load(config_path)?;
    let verifying_key = parse_public_key(&app.secrets.public_key)?;

    // Converge the guild's command registrations on every boot.
    app.discord
        .bulk_overwrite_guild_commands(
            &app.config.discord.application_id,
            &app.config.discord.guild_id,
            &discord_rest::commands::definitions(),
        )
        .await?;
    tracing::info!("slash commands registered");

    let (runs_tx, mut runs_rx) = mpsc::channel::<RunRequest>(1);
    let (narrator, _writer) = app.narrator();

    let worker = tokio::spawn(async move {
        while let Some(request) = runs_rx.recv().await {
            match request {
                RunRequest::VerifyMembers {
                    batch_size,
                    dry_run,
                } => {
                    let mut service = app.member_service(narrator.clone());
                    let report = service.run(batch_size, dry_run).await;
                    tracing::info!(
                        run_id = %report.run_id,
                        processed = report.processed(),
                        peeked = report.peeked,
                        dry_run,
                        "member batch complete"
                    );
                }
                RunRequest::VerifyStudents {
                    start_row,
                    batch_size,
                } => {
                    let service = app.student_service(narrator.clone());
                    let report = service.run(start_row, batch_size).await;
                    tracing::info!(
                        run_id = %report.run_id,
                        processed = report.processed(),
                        failed = report.failed_member_numbers().len(),
                        "student batch complete"
                    );
                }
            }
        }
    });

    let state = AppState::new(verifying_key, runs_tx);
    let result = rolesync_server::serve(state, addr).await;
    worker.abort();
    result
}
