use std::path::Path;

use clap::Subcommand;

use crate::output::print_json;
use rolesync_core::config::Config;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Validate the config for missing or empty values
    Validate,
}

pub fn run(config_path: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Validate => validate(config_path, json),
    }
}

fn validate(config_path: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;
    let problems = config.validate();

    if json {
        print_json(&serde_json::json!({
            "valid": problems.is_empty(),
            "problems": problems,
        }))?;
    } else if problems.is_empty() {
        println!("config ok");
    } else {
        for problem in &problems {
            println!("problem: {problem}");
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} config problem(s)", problems.len())
    }
}
