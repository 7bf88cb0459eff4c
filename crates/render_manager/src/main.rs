//! Render Manager command-line interface
//!
//! Reports render layer sync status from disk or from farm job snapshots.

use anyhow::Result;
use clap::{Parser, Subcommand};
use render_manager_logging::{init_logging, LogConfig};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "render-manager", version, about = "Render layer status for compositing scenes")]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Latest render layers on disk and their scene status
    Layers {
        /// Render root holding the RND_* layer folders
        root: PathBuf,

        /// Scene state JSON to compare against
        #[arg(long)]
        scene: Option<PathBuf>,

        /// List every non-empty version instead of the latest only
        #[arg(long)]
        all_versions: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render farm job snapshots
    Farm {
        #[command(subcommand)]
        action: cli::farm::FarmAction,
    },

    /// Every farm version of one layer in a snapshot
    Versions {
        /// Snapshot file written by `farm collect`
        snapshot: PathBuf,

        /// Layer name, e.g. RND_BG_TECH
        layer: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check names against the render layer naming convention
    Classify {
        /// Names to check
        #[arg(required = true)]
        names: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved paths and settings
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn command_wants_json(command: &Commands) -> bool {
    match command {
        Commands::Layers { json, .. }
        | Commands::Versions { json, .. }
        | Commands::Classify { json, .. }
        | Commands::Config { json } => *json,
        Commands::Farm { action } => action.wants_json(),
    }
}

fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Layers {
            root,
            scene,
            all_versions,
            json,
        } => cli::layers::run(cli::layers::LayersArgs {
            root,
            scene,
            all_versions,
            json,
        }),
        Commands::Farm { action } => cli::farm::run(action),
        Commands::Versions {
            snapshot,
            layer,
            json,
        } => cli::versions::run(cli::versions::VersionsArgs {
            snapshot,
            layer,
            json,
        }),
        Commands::Classify { names, json } => {
            cli::classify::run(cli::classify::ClassifyArgs { names, json })
        }
        Commands::Config { json } => cli::config::run(cli::config::ConfigArgs { json }),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_mode = command_wants_json(&cli.command);

    // Logs always go to the file and stderr, so stdout stays clean for JSON.
    if let Err(err) = init_logging(LogConfig {
        app_name: "render-manager",
        verbose: cli.verbose,
    }) {
        eprintln!("Warning: failed to initialize logging: {:#}", err);
    }

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json_mode {
                cli::error::print_json_error(&err);
            } else {
                eprintln!("{:?}", err);
            }
            ExitCode::from(1)
        }
    }
}
