use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::profile::Profile;
use crate::target::Target;

use super::TaskId;

/// A declared input of a task.
///
/// Files and directories are fingerprinted by content; properties by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskInput {
  File { path: PathBuf },
  Dir { path: PathBuf },
  Property { name: String, value: String },
}

impl TaskInput {
  pub fn file(path: impl Into<PathBuf>) -> Self {
    Self::File { path: path.into() }
  }

  pub fn dir(path: impl Into<PathBuf>) -> Self {
    Self::Dir { path: path.into() }
  }

  pub fn property(name: &str, value: impl ToString) -> Self {
    Self::Property {
      name: name.to_string(),
      value: value.to_string(),
    }
  }

  /// Filesystem path of this input, if it is one.
  pub fn path(&self) -> Option<&Path> {
    match self {
      Self::File { path } | Self::Dir { path } => Some(path),
      Self::Property { .. } => None,
    }
  }
}

/// What a task does when it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TaskAction {
  /// `cargo build --lib` for the host into a private target dir, then copy
  /// the produced library into the task output.
  BuildHostLibrary {
    manifest_dir: PathBuf,
    library_name: String,
    profile: Profile,
    intermediate_dir: PathBuf,
  },
  /// `cargo run --bin <bindgen> -- generate ...` against a built library.
  GenerateBindings {
    manifest_dir: PathBuf,
    bin_name: String,
    language: String,
    library: PathBuf,
    config_file: PathBuf,
  },
  /// `cargo ndk -t <abi> -o <output> build` for one target and profile.
  BuildNative {
    manifest_dir: PathBuf,
    target: Target,
    profile: Profile,
  },
  /// Synchronize the task output with another task's output directory.
  Copy { from: PathBuf },
}

/// A unit of work in the build graph.
///
/// A node's output is fully determined by its declared inputs and its id;
/// nodes are built once during assembly and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNode {
  pub id: TaskId,
  pub group: String,
  pub description: String,
  pub inputs: Vec<TaskInput>,
  pub output: PathBuf,
  pub action: TaskAction,
  pub depends_on: BTreeSet<TaskId>,
}

impl TaskNode {
  pub fn name(&self) -> String {
    self.id.name()
  }

  /// Declared filesystem inputs.
  pub fn input_paths(&self) -> impl Iterator<Item = &Path> {
    self.inputs.iter().filter_map(TaskInput::path)
  }
}
