//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output including colored status
//! messages, per-task result lines, durations, and Unicode symbols.

use std::time::Duration;

use anyhow::Context;
use owo_colors::{OwoColorize, Stream};
use unibuild_lib::execute::TaskState;

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
  pub const SKIP: &str = "-";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Symbol shown in front of a task in its final state.
pub fn state_symbol(state: TaskState) -> &'static str {
  match state {
    TaskState::Succeeded => symbols::SUCCESS,
    TaskState::Failed => symbols::ERROR,
    TaskState::Blocked => symbols::WARNING,
    TaskState::Skipped => symbols::SKIP,
    TaskState::Pending | TaskState::Running => symbols::ARROW,
  }
}

/// One line per finished task, e.g. `✓ buildNativeArm64Debug`.
pub fn print_task_state(name: &str, state: TaskState) {
  let symbol = state_symbol(state);
  match state {
    TaskState::Succeeded => println!("{} {}", symbol.if_supports_color(Stream::Stdout, |s| s.green()), name),
    TaskState::Skipped => println!(
      "{} {} {}",
      symbol.if_supports_color(Stream::Stdout, |s| s.dimmed()),
      name,
      "(up-to-date)".if_supports_color(Stream::Stdout, |s| s.dimmed())
    ),
    TaskState::Failed => println!("{} {}", symbol.if_supports_color(Stream::Stdout, |s| s.red()), name),
    TaskState::Blocked => println!(
      "{} {} {}",
      symbol.if_supports_color(Stream::Stdout, |s| s.yellow()),
      name,
      "(blocked)".if_supports_color(Stream::Stdout, |s| s.yellow())
    ),
    TaskState::Pending | TaskState::Running => {}
  }
}
