//! A loaded configuration together with its assembled task graph.
//!
//! This is the entry point used by the CLI: load `unibuild.toml`, pick the
//! tasks to run by name or by variant, and execute them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::config::{Config, ConfigError};
use crate::execute::{self, ExecuteConfig, ExecuteError, SessionResult, TaskEvent, Verbosity};
use crate::graph::{GraphError, TaskGraph, assemble};
use crate::task::TaskId;

#[derive(Debug, Error)]
pub enum SessionError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Graph(#[from] GraphError),

  #[error(transparent)]
  Execute(#[from] ExecuteError),

  #[error("unknown variant '{name}' (configured: {known})")]
  UnknownVariant { name: String, known: String },

  #[error("failed to remove {path}: {source}")]
  Clean {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

#[derive(Debug, Clone)]
pub struct Session {
  config: Config,
  graph: TaskGraph,
}

impl Session {
  /// Load a configuration file and assemble its task graph.
  pub fn load(path: &Path) -> Result<Self, SessionError> {
    Self::new(Config::load(path)?)
  }

  /// Validate `config` and assemble its task graph.
  pub fn new(config: Config) -> Result<Self, SessionError> {
    config.validate()?;
    let graph = assemble(&config)?;
    debug!(tasks = graph.len(), "session ready");
    Ok(Self { config, graph })
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn graph(&self) -> &TaskGraph {
    &self.graph
  }

  /// Every variant wiring task, which together pull in the whole graph.
  pub fn default_tasks(&self) -> Vec<TaskId> {
    self.graph.ids().filter(|id| id.is_copy()).cloned().collect()
  }

  /// The wiring tasks of the named variants.
  pub fn variant_tasks(&self, names: &[String]) -> Result<Vec<TaskId>, SessionError> {
    let mut ids = Vec::new();
    for name in names {
      if self.config.variant(name).is_none() {
        let known: Vec<&str> = self.config.variants.iter().map(|v| v.name.as_str()).collect();
        return Err(SessionError::UnknownVariant {
          name: name.clone(),
          known: known.join(", "),
        });
      }
      ids.extend(
        self
          .graph
          .ids()
          .filter(|id| id.variant() == Some(name.as_str()))
          .cloned(),
      );
    }
    Ok(ids)
  }

  /// Look tasks up by display name.
  pub fn resolve_task_names(&self, names: &[String]) -> Result<Vec<TaskId>, SessionError> {
    names
      .iter()
      .map(|name| {
        self
          .graph
          .get_by_name(name)
          .map(|node| node.id.clone())
          .ok_or_else(|| SessionError::from(GraphError::UnknownTask(name.clone())))
      })
      .collect()
  }

  /// Execution settings derived from the configuration.
  pub fn execute_config(&self, force: bool, events: Option<UnboundedSender<TaskEvent>>) -> ExecuteConfig {
    ExecuteConfig {
      parallelism: self.config.parallelism,
      toolchain: self.config.toolchain.clone(),
      verbosity: Verbosity::current(),
      force,
      state_dir: self.config.layout().state_dir(),
      events,
    }
  }

  /// Run `requested` (or every wiring task when empty) plus dependencies.
  pub async fn run(&self, requested: &[TaskId], config: &ExecuteConfig) -> Result<SessionResult, SessionError> {
    let requested = if requested.is_empty() {
      self.default_tasks()
    } else {
      requested.to_vec()
    };
    Ok(execute::execute(&self.graph, &requested, config).await?)
  }

  /// Remove every task output, the host build's private target dir and the
  /// fingerprint store. Returns the paths that existed and were removed.
  pub fn clean(&self) -> Result<Vec<PathBuf>, SessionError> {
    let layout = self.config.layout();
    let mut paths: Vec<PathBuf> = self.graph.topological().into_iter().map(|n| n.output.clone()).collect();
    paths.push(layout.host_intermediate_dir());
    paths.push(layout.state_dir());

    let mut removed = Vec::new();
    for path in paths {
      let result = if path.is_dir() {
        fs::remove_dir_all(&path)
      } else if path.exists() {
        fs::remove_file(&path)
      } else {
        continue;
      };
      result.map_err(|source| SessionError::Clean {
        path: path.clone(),
        source,
      })?;
      info!(path = %path.display(), "removed");
      removed.push(path);
    }
    Ok(removed)
  }
}
