use std::path::Path;

use crate::app::App;

/// One-shot command registration, for rollouts without a full `serve` boot.
pub async fn run(config_path: &Path) -> anyhow::Result<()> {
    let app = App::load(config_path)?;
    let definitions = discord_rest::commands::definitions();
    app.discord
        .bulk_overwrite_guild_commands(
            &app.config.discord.application_id,
            &app.config.discord.guild_id,
            &definitions,
        )
        .await?;
    for definition in &definitions {
        println!("registered /{}", definition.name);
    }
    Ok(())
}
