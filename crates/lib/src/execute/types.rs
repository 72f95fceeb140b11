//! Types for task execution.
//!
//! This module defines the error types, per-task states, the session result
//! and the configuration for running a task graph.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use crate::graph::GraphError;
use crate::task::TaskId;
use crate::util::hash::HashError;

use super::actions::{CopyError, ProcessError, Verbosity};
use super::fingerprint::FingerprintError;

/// Errors that can occur while running tasks.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// The toolchain or bindgen process failed.
  #[error(transparent)]
  Process(#[from] ProcessError),

  /// The toolchain succeeded but the library is not at the expected path.
  #[error("built library not found at {path}; does the library name match the [lib] section of Cargo.toml?")]
  ArtifactNotFound { path: PathBuf },

  /// Synchronizing a variant destination failed.
  #[error("copy failed: {0}")]
  Copy(#[from] CopyError),

  /// A declared input does not exist.
  #[error("task '{task}' is missing input {path}")]
  MissingInput { task: String, path: PathBuf },

  /// The action succeeded but left no output behind.
  #[error("task '{task}' did not produce its output {path}")]
  MissingOutput { task: String, path: PathBuf },

  #[error("io error at {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("fingerprint error: {0}")]
  Hash(#[from] HashError),

  #[error(transparent)]
  Fingerprint(#[from] FingerprintError),

  #[error(transparent)]
  Graph(#[from] GraphError),

  /// A task's worker panicked or was aborted.
  #[error("task worker failed: {0}")]
  Panicked(String),
}

/// Lifecycle state of a task within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskState {
  Pending,
  /// Inputs and output unchanged since the last successful run.
  Skipped,
  Running,
  Succeeded,
  Failed,
  /// Never started because a dependency failed.
  Blocked,
}

impl TaskState {
  pub fn is_terminal(&self) -> bool {
    !matches!(self, Self::Pending | Self::Running)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Skipped => "up-to-date",
      Self::Running => "running",
      Self::Succeeded => "succeeded",
      Self::Failed => "failed",
      Self::Blocked => "blocked",
    }
  }
}

impl std::fmt::Display for TaskState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A state change reported while a session runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEvent {
  pub id: TaskId,
  pub state: TaskState,
}

/// Outcome of running a selection of tasks.
#[derive(Debug, Default)]
pub struct SessionResult {
  /// Final state of every selected task.
  pub states: BTreeMap<TaskId, TaskState>,
  /// Tasks whose action changed something on disk.
  pub did_work: BTreeSet<TaskId>,
  /// Tasks that failed, with their error.
  pub failed: BTreeMap<TaskId, ExecuteError>,
  /// Blocked tasks and the failed or blocked dependency that stopped them.
  pub blocked: BTreeMap<TaskId, TaskId>,
}

impl SessionResult {
  pub fn state(&self, id: &TaskId) -> Option<TaskState> {
    self.states.get(id).copied()
  }

  pub fn is_success(&self) -> bool {
    self.failed.is_empty() && self.blocked.is_empty()
  }

  /// Number of tasks that ended in `state`.
  pub fn count(&self, state: TaskState) -> usize {
    self.states.values().filter(|s| **s == state).count()
  }
}

/// Configuration for running a task graph.
#[derive(Debug, Clone)]
pub struct ExecuteConfig {
  /// Maximum number of tasks running at once.
  pub parallelism: usize,
  /// Program used for every toolchain invocation.
  pub toolchain: String,
  pub verbosity: Verbosity,
  /// Run every selected task even when it is up to date.
  pub force: bool,
  /// Directory holding the fingerprint store.
  pub state_dir: PathBuf,
  /// Receives task state changes as they happen.
  pub events: Option<UnboundedSender<TaskEvent>>,
}

impl ExecuteConfig {
  pub fn new(toolchain: impl Into<String>, state_dir: impl Into<PathBuf>) -> Self {
    Self {
      parallelism: std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4),
      toolchain: toolchain.into(),
      verbosity: Verbosity::current(),
      force: false,
      state_dir: state_dir.into(),
      events: None,
    }
  }

  pub(crate) fn emit(&self, id: &TaskId, state: TaskState) {
    if let Some(events) = &self.events {
      // A dropped receiver only means nobody is listening.
      let _ = events.send(TaskEvent { id: id.clone(), state });
    }
  }
}
