//! Deep note CLI - generate and play THX-style deep note graphs
//!
//! This binary validates run configurations, generates graph descriptions,
//! and drives the external renderer that plays them.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use deepnote_cli::commands;
use deepnote_cli::input::ConfigArgs;
use deepnote_cli::logging;

/// Deep note - procedural THX-style signal graph generator
#[derive(Parser)]
#[command(name = "deepnote")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a graph, send it to the renderer and wait for playback
    Play {
        #[command(flatten)]
        config: ConfigArgs,

        /// Directory the graph file is written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Record the graph in memory instead of starting the renderer
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate a graph and write it to disk
    Generate {
        #[command(flatten)]
        config: ConfigArgs,

        /// Directory the graph file is written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Also print the graph JSON to stdout
        #[arg(long)]
        print: bool,
    },

    /// Validate a configuration without generating anything
    Validate {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// List the available variants
    Variants {
        /// Describe what each variant builds
        #[arg(long)]
        describe: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Play {
            config,
            out_dir,
            dry_run,
        } => commands::play::run(&config, &out_dir, dry_run),
        Commands::Generate {
            config,
            out_dir,
            print,
        } => commands::generate::run(&config, &out_dir, print),
        Commands::Validate { config } => commands::validate::run(&config),
        Commands::Variants { describe } => commands::variants::run(describe),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
