//! Implementation of the `unibuild build` command.
//!
//! Resolves the requested tasks, runs them with their dependencies, and
//! prints one line per task followed by a summary.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, ensure};
use tokio::sync::mpsc;
use tracing::debug;

use unibuild_lib::execute::{SessionResult, TaskEvent, TaskState};

use super::load_session;
use crate::output::{format_duration, print_error, print_info, print_success, print_task_state, print_warning};

/// Execute the build command.
///
/// With no tasks and no variants every variant is wired. Exits with status 1
/// when any task failed or was blocked, and 130 when interrupted.
pub fn cmd_build(config: &Path, tasks: &[String], variants: &[String], force: bool, jobs: Option<usize>) -> Result<()> {
  let session = load_session(config)?;

  let mut requested = session.resolve_task_names(tasks)?;
  requested.extend(session.variant_tasks(variants)?);

  let (tx, mut rx) = mpsc::unbounded_channel::<TaskEvent>();
  let mut exec_config = session.execute_config(force, Some(tx));
  if let Some(jobs) = jobs {
    ensure!(jobs > 0, "--jobs must be at least 1");
    exec_config.parallelism = jobs;
  }
  debug!(requested = requested.len(), parallelism = exec_config.parallelism, "starting build");

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let start = Instant::now();

  let outcome = rt.block_on(async {
    let printer = tokio::spawn(async move {
      while let Some(event) = rx.recv().await {
        if event.state.is_terminal() {
          print_task_state(&event.id.name(), event.state);
        }
      }
    });

    // Dropping the session future on Ctrl-C kills running toolchain processes.
    let outcome = tokio::select! {
      result = session.run(&requested, &exec_config) => Some(result),
      _ = tokio::signal::ctrl_c() => None,
    };

    drop(exec_config);
    let _ = printer.await;
    outcome
  });

  let Some(result) = outcome else {
    print_warning("Interrupted; unfinished tasks will run again next time");
    std::process::exit(130);
  };
  let result = result.context("Build failed")?;

  print_summary(&result, start.elapsed());

  if !result.is_success() {
    std::process::exit(1);
  }
  Ok(())
}

fn print_summary(result: &SessionResult, elapsed: std::time::Duration) {
  println!();

  for (id, err) in &result.failed {
    print_error(&format!("{} failed: {}", id, err));
  }
  for (id, dep) in &result.blocked {
    print_warning(&format!("{} not run: dependency {} did not succeed", id, dep));
  }

  let summary = format!(
    "{} succeeded, {} up-to-date, {} failed, {} blocked in {}",
    result.count(TaskState::Succeeded),
    result.count(TaskState::Skipped),
    result.failed.len(),
    result.blocked.len(),
    format_duration(elapsed)
  );

  if result.is_success() {
    print_success(&summary);
  } else {
    print_info(&summary);
  }
}
