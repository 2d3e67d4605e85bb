use clap::{ArgAction, Parser, Subcommand};
use commands::{apply, config, movies, onboard, prefs};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reelpick")]
#[command(about = "Reelpick - Tell the recommender which movies you love, hate, and want to see")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Use this directory for config.toml and credentials.toml
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Also write logs to this file (rotated daily)
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List random movies from the catalogue
    Movies {
        /// How many movies to request (defaults to feed.initial_batch)
        #[arg(long)]
        amount: Option<u32>,
    },
    /// Search the catalogue
    Search {
        /// Search term (an empty term lists random movies)
        term: String,
    },
    /// Show your saved movie preferences
    Prefs,
    /// Toggle preferences non-interactively and submit them
    #[command(long_about = "Load your saved preferences, apply toggles in the order given, and submit the result. Each toggle is KIND:ID where KIND is one of like, dislike, watched, watchlist, rewatch, block. Refused toggles are reported and skipped.")]
    Apply {
        /// Toggles to apply, e.g. like:603 watchlist:27205
        #[arg(required = true, value_name = "KIND:ID")]
        toggles: Vec<apply::ToggleArg>,

        /// Show the resulting preferences without submitting
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
    },
    /// Interactive onboarding: browse, search, rate, submit
    Onboard,
    /// Manage configuration and the backend session
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the session cookie)
    Show,

    /// Write a default config file
    Init {
        /// Backend base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },

    /// Change the backend base URL
    SetUrl {
        base_url: String,
    },

    /// Store the backend session cookie (prompts when not given)
    Session {
        /// Value of the `sessionid` cookie from a logged-in browser
        #[arg(long, conflicts_with = "clear")]
        session_id: Option<String>,

        /// Forget the stored session
        #[arg(long, action = ArgAction::SetTrue)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging_with_file(cli.verbose, cli.quiet, cli.log_file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let config_dir = cli.config_dir.as_deref();

    match cli.command {
        Commands::Movies { amount } => movies::run_movies(config_dir, amount, &output).await,
        Commands::Search { term } => movies::run_search(config_dir, &term, &output).await,
        Commands::Prefs => prefs::run_prefs(config_dir, &output).await,
        Commands::Apply { toggles, dry_run } => apply::run_apply(config_dir, toggles, dry_run, &output).await,
        Commands::Onboard => onboard::run_onboard(config_dir, &output).await,
        Commands::Config { cmd } => config::run_config(config_dir, cmd, &output),
    }
}
