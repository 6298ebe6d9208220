//! ballotbox CLI
//!
//! Command-line interface for ballotbox - create, vote on and manage polls
//! stored by a remote Poll Service.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ballotbox_core::{Config, HttpPollService, PollStore};

mod commands;
mod editor;
mod output;

use commands::poll::EditArgs;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "ballot")]
#[command(about = "ballotbox - create, vote on and manage polls")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file (overrides BALLOTBOX_CONFIG)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all polls with their results
    #[command(alias = "ls")]
    List,
    /// Show one poll with its results
    Show {
        /// Poll ID (full ID or prefix)
        poll: String,
    },
    /// Create a new poll (opens $EDITOR when no question or options are given)
    #[command(alias = "add")]
    Create {
        /// The poll question
        #[arg(short = 'Q', long)]
        question: Option<String>,
        /// An option (repeat for each option, at least 2)
        #[arg(short, long = "option", value_name = "TEXT")]
        option: Vec<String>,
    },
    /// Edit a poll (opens $EDITOR when no changes are given)
    Edit {
        /// Poll ID (full ID or prefix)
        poll: String,
        /// New question
        #[arg(short = 'Q', long)]
        question: Option<String>,
        /// Replace the text of option N (1-based)
        #[arg(short, long, value_name = "N=TEXT")]
        set: Vec<String>,
        /// Append an option
        #[arg(short, long, value_name = "TEXT")]
        add: Vec<String>,
        /// Remove option N (1-based; options 1 and 2 are always kept)
        #[arg(short, long, value_name = "N")]
        remove: Vec<usize>,
    },
    /// Vote for an option
    Vote {
        /// Poll ID (full ID or prefix)
        poll: String,
        /// Option ID or option text
        option: String,
    },
    /// Delete a poll
    #[command(alias = "rm")]
    Delete {
        /// Poll ID (full ID or prefix)
        poll: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (base_url, timeout_secs, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't talk to the Poll Service
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config);

    let service = HttpPollService::new(&config).map_err(commands::explain)?;
    let mut store = PollStore::new(service);

    // Every command starts from the server's current list
    store
        .refresh()
        .await
        .map_err(commands::explain)
        .context("Failed to load polls")?;

    match cli.command {
        Commands::List => commands::poll::list(&store, &output),
        Commands::Show { poll } => commands::poll::show(&store, &poll, &output),
        Commands::Create { question, option } => {
            commands::poll::create(&mut store, question, option, &output).await
        }
        Commands::Edit {
            poll,
            question,
            set,
            add,
            remove,
        } => {
            let args = EditArgs {
                question,
                set,
                add,
                remove,
            };
            commands::poll::edit(&mut store, &poll, args, &output).await
        }
        Commands::Vote { poll, option } => {
            commands::poll::vote(&mut store, &poll, &option, &output).await
        }
        Commands::Delete { poll, yes } => {
            commands::poll::delete(&mut store, &poll, yes, &output).await
        }
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging
///
/// Only initializes if BALLOTBOX_LOG is set (e.g. `BALLOTBOX_LOG=debug`).
/// Logs to config.log_file when set, otherwise to stderr.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("BALLOTBOX_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "ballotbox_core={},ballotbox_cli={}",
        log_level, log_level
    ));

    match config.log_file {
        Some(ref log_path) => {
            let log_file = match File::create(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
                    return;
                }
            };

            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(log_file)
                .try_init();

            info!("Logging to {:?}", log_path);
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
