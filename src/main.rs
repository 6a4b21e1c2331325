mod config;
mod editor;
mod handoff;
mod host;
mod launcher;
mod level;
mod marker;
mod open;
mod relaunch;
mod resolve;
mod startup;

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::marker::MarkerStore;

#[derive(Parser)]
#[command(
    name = "editor-launch",
    version,
    about = "Open Rhythm Doctor levels in the level editor"
)]
struct Cli {
    /// Log every resolution step
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the pending or given level in the editor, relaunching via Steam if needed
    Open {
        /// Game arguments; the first existing .rdlevel/.rdzip/.zip is opened
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<OsString>,
    },
    /// Report whether a path is an openable level and what kind it is
    Check {
        /// Candidate path
        path: PathBuf,
    },
    /// Inspect the launch marker left for a relaunch
    Marker {
        #[command(subcommand)]
        command: MarkerCommands,
    },
    /// Manage the settings file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum MarkerCommands {
    /// Print the pending level without consuming it
    Show,
    /// Delete the pending level
    Clear,
    /// Print where the marker file lives
    Path,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print where the settings file lives
    Path,
    /// Write a default settings file
    Init,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("EDITOR_LAUNCH_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    tracing::debug!("editor-launch v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match (config::load(), &cli.command) {
        (Ok(config), _) => config,
        // A broken settings file must not strand a pending launch.
        (Err(err), Commands::Open { .. }) => {
            tracing::warn!("Using default settings: {err:#}");
            Config::default()
        }
        (Err(err), _) => return Err(err),
    };
    let store = MarkerStore::in_dir(&config.data_dir());

    match cli.command {
        Commands::Open { args } => open::run(args, &config),
        Commands::Check { path } => {
            level::check(&path);
            Ok(())
        }
        Commands::Marker { command } => match command {
            MarkerCommands::Show => marker::show(&store),
            MarkerCommands::Clear => marker::clear(&store),
            MarkerCommands::Path => {
                println!("{}", store.path().display());
                Ok(())
            }
        },
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                println!("{}", config::config_path().display());
                Ok(())
            }
            ConfigCommands::Init => {
                let path = config::config_path();
                config::init_at(&path)?;
                eprintln!("Created {}", path.display());
                Ok(())
            }
        },
    }
}
