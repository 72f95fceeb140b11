//! Directory synchronization for variant wiring.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum CopyError {
  #[error("copy source {0} is not a directory")]
  SourceNotDirectory(PathBuf),

  #[error("failed to walk {path}: {message}")]
  Walk { path: PathBuf, message: String },

  #[error("failed to {op} {path}: {source}")]
  Io {
    op: &'static str,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

fn io_err(op: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> CopyError {
  let path = path.to_path_buf();
  move |source| CopyError::Io { op, path, source }
}

/// Make `into` an exact copy of `from`.
///
/// Files whose content already matches are left untouched, files missing
/// from `from` are removed from `into`. Returns whether anything changed.
pub fn sync_dir(from: &Path, into: &Path) -> Result<bool, CopyError> {
  if !from.is_dir() {
    return Err(CopyError::SourceNotDirectory(from.to_path_buf()));
  }

  let mut changed = false;
  if !into.is_dir() {
    fs::create_dir_all(into).map_err(io_err("create", into))?;
    changed = true;
  }

  let mut wanted: HashSet<PathBuf> = HashSet::new();

  for entry in WalkDir::new(from).min_depth(1).sort_by_file_name() {
    let entry = entry.map_err(|e| CopyError::Walk {
      path: from.to_path_buf(),
      message: e.to_string(),
    })?;
    let rel = entry.path().strip_prefix(from).unwrap_or(entry.path()).to_path_buf();
    let dest = into.join(&rel);

    if entry.file_type().is_dir() {
      if dest.is_file() {
        fs::remove_file(&dest).map_err(io_err("remove", &dest))?;
      }
      if !dest.is_dir() {
        fs::create_dir_all(&dest).map_err(io_err("create", &dest))?;
        changed = true;
      }
    } else {
      if dest.is_dir() {
        fs::remove_dir_all(&dest).map_err(io_err("remove", &dest))?;
      }
      if !same_content(entry.path(), &dest)? {
        trace!(file = %rel.display(), "copying");
        fs::copy(entry.path(), &dest).map_err(io_err("copy", entry.path()))?;
        changed = true;
      }
    }

    wanted.insert(rel);
  }

  // Deepest paths first so directories are empty when removed.
  let mut stale: Vec<(PathBuf, bool)> = Vec::new();
  for entry in WalkDir::new(into).min_depth(1).contents_first(true) {
    let entry = entry.map_err(|e| CopyError::Walk {
      path: into.to_path_buf(),
      message: e.to_string(),
    })?;
    let rel = entry.path().strip_prefix(into).unwrap_or(entry.path());
    if !wanted.contains(rel) {
      stale.push((entry.path().to_path_buf(), entry.file_type().is_dir()));
    }
  }

  for (path, is_dir) in stale {
    debug!(path = %path.display(), "removing stale file");
    if is_dir {
      fs::remove_dir(&path).map_err(io_err("remove", &path))?;
    } else {
      fs::remove_file(&path).map_err(io_err("remove", &path))?;
    }
    changed = true;
  }

  Ok(changed)
}

fn same_content(source: &Path, dest: &Path) -> Result<bool, CopyError> {
  let Ok(dest_meta) = fs::metadata(dest) else {
    return Ok(false);
  };
  let source_meta = fs::metadata(source).map_err(io_err("read", source))?;
  if !dest_meta.is_file() || dest_meta.len() != source_meta.len() {
    return Ok(false);
  }

  let a = fs::read(source).map_err(io_err("read", source))?;
  let b = fs::read(dest).map_err(io_err("read", dest))?;
  Ok(a == b)
}
