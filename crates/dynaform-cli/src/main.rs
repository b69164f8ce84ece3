mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "dynaform")]
#[command(version, about = "dynaform CLI - check form schemas and replay form interactions", long_about = None)]
struct Cli {
    /// Form configuration file (default: ./dynaform.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a schema strictly and list every issue
    Check {
        /// Schema file (.json or .toml)
        schema: PathBuf,
    },

    /// Build a form and apply a script of UI actions, printing events as JSON lines
    Replay {
        /// Schema file (.json or .toml)
        schema: PathBuf,

        /// JSON array of actions
        script: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check { schema } => {
            commands::check::execute(&schema)?;
        }
        Commands::Replay { schema, script } => {
            commands::replay::execute(&schema, &script, config)?;
        }
    }

    Ok(())
}
