mod app;
mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rolesync",
    about = "Synchronize spreadsheet membership records with Discord guild roles",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to the YAML config file
    #[arg(long, global = true, env = "ROLESYNC_CONFIG", default_value = "rolesync.yaml")]
    config: PathBuf,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Discord interactions endpoint
    Serve {
        /// Listen address
        #[arg(long, default_value = "0.0.0.0:3141")]
        addr: String,
    },

    /// Run one member reconciliation batch
    VerifyMembers {
        /// How many pending rows to attempt this run
        #[arg(long, default_value_t = 5)]
        batch_size: usize,

        /// Dry runs narrate every decision but write nothing
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        dry_run: bool,
    },

    /// Grant the student role to one window of the student sheet
    VerifyStudents {
        /// First sheet row of the window (1-based)
        #[arg(long)]
        start_row: u32,

        /// How many rows to attempt this run
        #[arg(long, default_value_t = 5)]
        batch_size: usize,
    },

    /// Overwrite the guild's slash-command registrations
    RegisterCommands,

    /// Inspect the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Config { .. } => tracing::Level::WARN,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Serve { addr } => cmd::serve::run(&cli.config, &addr).await,
        Commands::VerifyMembers {
            batch_size,
            dry_run,
        } => cmd::verify::members(&cli.config, batch_size, dry_run, cli.json).await,
        Commands::VerifyStudents {
            start_row,
            batch_size,
        } => cmd::verify::students(&cli.config, start_row, batch_size, cli.json).await,
        Commands::RegisterCommands => cmd::register::run(&cli.config).await,
        Commands::Config { subcommand } => cmd::config::run(&cli.config, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
