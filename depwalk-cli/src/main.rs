//! depwalk CLI - dependency graphs from file corpora.
//!
//! Indexes files into logical units, extracts the dependencies between them
//! and exports the transitively reduced graph for visualization.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod naming;

use commands::build::BuildArgs;
use config::{base_dir, DepwalkConfig, ExportFormat, DEFAULT_CONFIG_FILE};

/// Build dependency graphs from file corpora.
#[derive(Parser)]
#[command(name = "depwalk")]
#[command(author, version)]
#[command(about = "Build dependency graphs from file corpora")]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  depwalk build                      Walk using ./depwalk.toml, print DOT
  depwalk build -o deps.dot          Write the reduced graph to a file
  depwalk --format json build        Export JSON instead of DOT
  depwalk path any config            Does 'any' depend on 'config'?
  depwalk files mpl                  Which files make up 'mpl'?")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file
    #[arg(short, long, global = true, env = "DEPWALK_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Export format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<ExportFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the corpus and export the dependency graph
    #[command(visible_alias = "b")]
    Build {
        /// Output file (default: [export].output, else stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export the full graph instead of its transitive reduction
        #[arg(long)]
        no_reduce: bool,
    },

    /// Check whether one vertex depends on another, directly or not
    Path {
        /// Dependent vertex
        from: String,

        /// Dependency vertex
        to: String,
    },

    /// List the indexed files that make up a vertex
    Files {
        /// Vertex to list
        vertex: String,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let config = DepwalkConfig::load(&cli.config)?;
    let base = base_dir(&cli.config);

    match cli.command {
        Commands::Build { output, no_reduce } => {
            let args = BuildArgs {
                format: cli.format,
                output,
                no_reduce,
                quiet: cli.quiet,
            };
            commands::build::run(&config, &base, args)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Path { from, to } => {
            let reachable = commands::path::run(&config, &base, &from, &to)?;
            Ok(if reachable {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Commands::Files { vertex } => {
            commands::files::run(&config, &base, &vertex)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
