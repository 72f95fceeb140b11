mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use unibuild_lib::consts::CONFIG_FILENAME;

/// unibuild - Build a Rust library and its UniFFI bindings for every Android target
#[derive(Parser)]
#[command(name = "unibuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Increase verbosity (-v info, -vv debug); also forwarded to cargo
  #[arg(short, long, action = ArgAction::Count, global = true)]
  verbose: u8,

  /// Only print errors
  #[arg(short, long, global = true, conflicts_with = "verbose")]
  quiet: bool,

  /// Path to the configuration file
  #[arg(short, long, global = true, default_value = CONFIG_FILENAME)]
  config: PathBuf,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run tasks and their dependencies (default: wire every variant)
  Build {
    /// Task names to run, e.g. buildNativeArm64Release
    tasks: Vec<String>,

    /// Wire only the given variant (repeatable)
    #[arg(long = "variant", value_name = "NAME")]
    variants: Vec<String>,

    /// Run tasks even when they are up to date
    #[arg(short, long)]
    force: bool,

    /// Maximum number of tasks to run at once
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,
  },

  /// List tasks in execution order
  Tasks {
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// List known targets and mark the active ones
  Targets,

  /// Remove generated outputs and incremental state
  Clean,
}

fn init_tracing(verbose: u8, quiet: bool) {
  let default = if quiet {
    "error"
  } else {
    match verbose {
      0 => "warn",
      1 => "info",
      _ => "debug",
    }
  };

  // RUST_LOG takes precedence over the flags.
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose, cli.quiet);

  match cli.command {
    Commands::Build {
      tasks,
      variants,
      force,
      jobs,
    } => cmd::cmd_build(&cli.config, &tasks, &variants, force, jobs),
    Commands::Tasks { json } => cmd::cmd_tasks(&cli.config, json),
    Commands::Targets => cmd::cmd_targets(&cli.config),
    Commands::Clean => cmd::cmd_clean(&cli.config),
  }
}
