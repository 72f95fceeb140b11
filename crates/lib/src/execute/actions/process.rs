//! External process invocation.
//!
//! Child output is streamed straight to the console; only the exit status
//! decides success.

use std::path::Path;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

/// Diagnostic level forwarded to child processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
  #[default]
  Quiet,
  Info,
  Debug,
}

impl Verbosity {
  /// Verbosity matching the currently installed subscriber's max level.
  pub fn current() -> Self {
    Self::from_level(LevelFilter::current())
  }

  pub fn from_level(level: LevelFilter) -> Self {
    if level >= LevelFilter::DEBUG {
      Self::Debug
    } else if level >= LevelFilter::INFO {
      Self::Info
    } else {
      Self::Quiet
    }
  }

  /// Flag appended to toolchain invocations.
  pub fn flag(&self) -> Option<&'static str> {
    match self {
      Self::Quiet => None,
      Self::Info => Some("-v"),
      Self::Debug => Some("-vv"),
    }
  }
}

#[derive(Debug, Error)]
pub enum ProcessError {
  #[error("failed to start {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  #[error("command failed with exit code {}: {command}", code.map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string()))]
  Failed { command: String, code: Option<i32> },
}

/// Run `program` with `args` in `working_dir`, appending the verbosity flag.
///
/// A nonzero exit is returned as [`ProcessError::Failed`]. The child is
/// killed if the returned future is dropped before it exits.
pub async fn run(working_dir: &Path, program: &str, args: &[String], verbosity: Verbosity) -> Result<(), ProcessError> {
  let mut argv: Vec<&str> = args.iter().map(String::as_str).collect();
  if let Some(flag) = verbosity.flag() {
    argv.push(flag);
  }

  let command_line = format!("{} {}", program, argv.join(" "));
  info!(cmd = %command_line, cwd = %working_dir.display(), "running command");

  let status = Command::new(program)
    .args(&argv)
    .current_dir(working_dir)
    .stdin(Stdio::null())
    .stdout(Stdio::inherit())
    .stderr(Stdio::inherit())
    .kill_on_drop(true)
    .status()
    .await
    .map_err(|source| ProcessError::Spawn {
      program: program.to_string(),
      source,
    })?;

  if !status.success() {
    return Err(ProcessError::Failed {
      command: command_line,
      code: status.code(),
    });
  }

  debug!(cmd = %command_line, "command succeeded");
  Ok(())
}
