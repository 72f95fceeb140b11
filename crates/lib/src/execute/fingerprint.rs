//! Persistent fingerprints for up-to-date checks.
//!
//! # Storage Layout
//!
//! ```text
//! {build_dir}/.unibuild/
//! └── fingerprints.json   # task name -> input and output fingerprints
//! ```
//!
//! A task is up to date when the fingerprint of its declared inputs matches
//! the one recorded at its last successful run and its output still hashes to
//! the recorded value.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::task::{TaskInput, TaskNode};
use crate::util::hash::{ContentHash, Fingerprinter, HashError, Hashable, hash_path};

/// Current version of the fingerprint file format.
pub const STORE_VERSION: u32 = 1;

const STORE_FILENAME: &str = "fingerprints.json";

#[derive(Debug, Error)]
pub enum FingerprintError {
  #[error("failed to read fingerprints {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write fingerprints {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to serialize fingerprints: {0}")]
  Serialize(#[from] serde_json::Error),

  #[error(transparent)]
  Hash(#[from] HashError),
}

/// Fingerprints recorded after a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
  pub inputs: ContentHash,
  pub output: ContentHash,
}

impl Fingerprint {
  /// Whether this recording still describes `node` with the given inputs.
  pub fn matches(&self, node: &TaskNode, inputs: &ContentHash) -> Result<bool, FingerprintError> {
    if self.inputs != *inputs || !node.output.exists() {
      return Ok(false);
    }
    Ok(hash_path(&node.output)? == self.output)
  }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
  version: u32,
  tasks: BTreeMap<String, Fingerprint>,
}

/// Fingerprints of every task that has run successfully, keyed by task name.
#[derive(Debug)]
pub struct FingerprintStore {
  path: PathBuf,
  tasks: BTreeMap<String, Fingerprint>,
}

impl FingerprintStore {
  /// Load the store from `state_dir`.
  ///
  /// A missing file yields an empty store. An unreadable format is logged
  /// and discarded, which makes every task run again.
  pub fn load(state_dir: &Path) -> Result<Self, FingerprintError> {
    let path = state_dir.join(STORE_FILENAME);

    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Ok(Self {
          path,
          tasks: BTreeMap::new(),
        });
      }
      Err(source) => return Err(FingerprintError::Read { path, source }),
    };

    let tasks = match serde_json::from_str::<StoreFile>(&content) {
      Ok(file) if file.version == STORE_VERSION => file.tasks,
      Ok(file) => {
        warn!(path = %path.display(), version = file.version, "unsupported fingerprint store version, starting fresh");
        BTreeMap::new()
      }
      Err(e) => {
        warn!(path = %path.display(), error = %e, "corrupt fingerprint store, starting fresh");
        BTreeMap::new()
      }
    };

    debug!(path = %path.display(), tasks = tasks.len(), "loaded fingerprints");
    Ok(Self { path, tasks })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn len(&self) -> usize {
    self.tasks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }

  pub fn get(&self, task: &str) -> Option<&Fingerprint> {
    self.tasks.get(task)
  }

  pub fn record(&mut self, task: String, fingerprint: Fingerprint) {
    self.tasks.insert(task, fingerprint);
  }

  pub fn forget(&mut self, task: &str) {
    self.tasks.remove(task);
  }

  /// Write the store atomically (temp file, then rename).
  pub fn save(&self) -> Result<(), FingerprintError> {
    let Some(dir) = self.path.parent() else {
      return Ok(());
    };
    fs::create_dir_all(dir).map_err(|source| FingerprintError::Write {
      path: dir.to_path_buf(),
      source,
    })?;

    let file = StoreFile {
      version: STORE_VERSION,
      tasks: self.tasks.clone(),
    };
    let content = serde_json::to_string_pretty(&file)?;

    let temp_path = self.path.with_extension("json.tmp");
    fs::write(&temp_path, &content).map_err(|source| FingerprintError::Write {
      path: temp_path.clone(),
      source,
    })?;
    fs::rename(&temp_path, &self.path).map_err(|source| FingerprintError::Write {
      path: self.path.clone(),
      source,
    })?;

    Ok(())
  }
}

/// Fingerprint of everything a task's result depends on: its identity, its
/// action parameters, and the content or value of each declared input.
pub fn input_fingerprint(node: &TaskNode) -> Result<ContentHash, FingerprintError> {
  let mut fp = Fingerprinter::new();
  fp.field("task", &node.id.cache_key()?.0);
  fp.field("action", &serde_json::to_string(&node.action)?);

  for input in &node.inputs {
    match input {
      TaskInput::File { path } | TaskInput::Dir { path } => {
        let label = format!("path:{}", path.display());
        fp.field(&label, &hash_path(path)?.0);
      }
      TaskInput::Property { name, value } => {
        fp.field(&format!("prop:{}", name), value);
      }
    }
  }

  Ok(fp.finish())
}

/// Fingerprint of a task's output as it is on disk now.
pub fn output_fingerprint(node: &TaskNode) -> Result<ContentHash, FingerprintError> {
  Ok(hash_path(&node.output)?)
}
