//! Implementation of the `unibuild tasks` command.

use std::path::Path;

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use unibuild_lib::task::{TaskId, TaskNode};

use super::load_session;
use crate::output::{print_json, print_stat};

#[derive(Serialize)]
struct TaskEntry {
  name: String,
  group: String,
  description: String,
  depends_on: Vec<String>,
  output: String,
}

impl From<&TaskNode> for TaskEntry {
  fn from(node: &TaskNode) -> Self {
    Self {
      name: node.name(),
      group: node.group.clone(),
      description: node.description.clone(),
      depends_on: node.depends_on.iter().map(TaskId::name).collect(),
      output: node.output.display().to_string(),
    }
  }
}

/// List every task in an order where dependencies come first.
pub fn cmd_tasks(config: &Path, json: bool) -> Result<()> {
  let session = load_session(config)?;
  let entries: Vec<TaskEntry> = session.graph().topological().into_iter().map(TaskEntry::from).collect();

  if json {
    return print_json(&entries);
  }

  for entry in &entries {
    println!(
      "{} {}",
      entry.name.if_supports_color(Stream::Stdout, |s| s.bold()),
      format!("({})", entry.group).if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
    println!("  {}", entry.description);
    if !entry.depends_on.is_empty() {
      print_stat("depends on", &entry.depends_on.join(", "));
    }
  }

  Ok(())
}
