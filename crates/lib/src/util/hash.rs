//! Hashing utilities for task identity and incremental builds.
//!
//! This module provides:
//! - `CacheKey`: a truncated hash identifying a task across sessions
//! - `ContentHash`: a full 64-character hash of file or directory content
//! - `hash_path()`: content hash of a file or a directory tree
//! - `Fingerprinter`: incremental hasher for combining several inputs

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::consts::OBJ_HASH_PREFIX_LEN;

/// A stable key identifying a task, derived from its structured identity.
///
/// The key is a 20-character truncated SHA-256 of the JSON-serialized value,
/// so it only changes when the identity itself changes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CacheKey(pub String);

impl std::fmt::Display for CacheKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

pub trait Hashable: Serialize {
  fn cache_key(&self) -> Result<CacheKey, serde_json::Error> {
    let serialized = serde_json::to_string(self)?;
    let full = hash_bytes(serialized.as_bytes());
    Ok(CacheKey(full.0[..OBJ_HASH_PREFIX_LEN].to_string()))
  }
}

/// A full 64-character SHA-256 hash of some content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Error while hashing files or directories.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
  #[error("failed to walk directory: {message}")]
  WalkDir { message: String },

  #[error("failed to read file {path}: {message}")]
  ReadFile { path: String, message: String },

  #[error("failed to read symlink {path}: {message}")]
  ReadSymlink { path: String, message: String },

  #[error("path does not exist: {0}")]
  Missing(String),
}

/// Hash a file or a directory, whichever `path` is.
pub fn hash_path(path: &Path) -> Result<ContentHash, HashError> {
  if path.is_dir() {
    hash_directory(path)
  } else if path.is_file() {
    hash_file(path)
  } else {
    Err(HashError::Missing(path.display().to_string()))
  }
}

/// Compute a deterministic hash of a directory's contents.
///
/// File contents, relative paths and symlink targets participate; timestamps
/// and permissions do not. Entries are visited in sorted order.
pub fn hash_directory(path: &Path) -> Result<ContentHash, HashError> {
  let mut hasher = Sha256::new();

  for entry in WalkDir::new(path).sort_by_file_name() {
    let entry = entry.map_err(|e| HashError::WalkDir { message: e.to_string() })?;
    let entry_path = entry.path();

    let rel_path = entry_path
      .strip_prefix(path)
      .unwrap_or(entry_path)
      .to_string_lossy()
      .replace('\\', "/");

    if rel_path.is_empty() {
      continue;
    }

    let file_type = entry.file_type();
    let line = if file_type.is_file() {
      format!("F:{}:{}", rel_path, hash_file(entry_path)?)
    } else if file_type.is_dir() {
      format!("D:{}", rel_path)
    } else if file_type.is_symlink() {
      let target = fs::read_link(entry_path).map_err(|e| HashError::ReadSymlink {
        path: entry_path.display().to_string(),
        message: e.to_string(),
      })?;
      format!("L:{}:{}", rel_path, hash_bytes(target.to_string_lossy().as_bytes()))
    } else {
      continue;
    };

    hasher.update(line.as_bytes());
    hasher.update(b"\n");
  }

  Ok(ContentHash(format!("{:x}", hasher.finalize())))
}

/// Hash a file's contents.
pub fn hash_file(path: &Path) -> Result<ContentHash, HashError> {
  let read_err = |e: std::io::Error| HashError::ReadFile {
    path: path.display().to_string(),
    message: e.to_string(),
  };

  let mut file = fs::File::open(path).map_err(read_err)?;
  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];

  loop {
    let bytes_read = file.read(&mut buffer).map_err(read_err)?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(ContentHash(format!("{:x}", hasher.finalize())))
}

/// Hash arbitrary bytes.
pub fn hash_bytes(data: &[u8]) -> ContentHash {
  let mut hasher = Sha256::new();
  hasher.update(data);
  ContentHash(format!("{:x}", hasher.finalize()))
}

/// Combines labelled values into a single content hash.
///
/// Each value is written with its label so that reordering or moving a value
/// between labels changes the result.
#[derive(Default)]
pub struct Fingerprinter {
  hasher: Sha256,
}

impl Fingerprinter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn field(&mut self, label: &str, value: &str) -> &mut Self {
    self.hasher.update(label.as_bytes());
    self.hasher.update(b"=");
    self.hasher.update(value.as_bytes());
    self.hasher.update(b"\n");
    self
  }

  pub fn finish(self) -> ContentHash {
    ContentHash(format!("{:x}", self.hasher.finalize()))
  }
}
