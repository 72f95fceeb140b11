//! Foreign-language binding generation through the bindgen binary.

use std::fs;
use std::path::Path;

use super::process::{self, Verbosity};
use crate::execute::types::ExecuteError;

/// Arguments for `cargo run --bin <bin> -- generate ...`.
pub fn bindgen_args(bin_name: &str, language: &str, library: &Path, out_dir: &Path, config_file: &Path) -> Vec<String> {
  [
    "run",
    "--bin",
    bin_name,
    "--",
    "generate",
    "--language",
    language,
    "--no-format",
    "--library",
  ]
  .into_iter()
  .map(str::to_string)
  .chain([
    library.display().to_string(),
    "--out-dir".to_string(),
    out_dir.display().to_string(),
    "--config".to_string(),
    config_file.display().to_string(),
  ])
  .collect()
}

/// Generate bindings for `library` into `out_dir`.
///
/// `out_dir` is emptied first so files from earlier runs do not survive.
/// Runs without verbosity flags regardless of the log level.
pub async fn generate(
  toolchain: &str,
  manifest_dir: &Path,
  bin_name: &str,
  language: &str,
  library: &Path,
  config_file: &Path,
  out_dir: &Path,
) -> Result<(), ExecuteError> {
  let io_err = |source: std::io::Error| ExecuteError::Io {
    path: out_dir.to_path_buf(),
    source,
  };
  if out_dir.exists() {
    fs::remove_dir_all(out_dir).map_err(io_err)?;
  }
  fs::create_dir_all(out_dir).map_err(io_err)?;

  let args = bindgen_args(bin_name, language, library, out_dir, config_file);
  process::run(manifest_dir, toolchain, &args, Verbosity::Quiet).await?;
  Ok(())
}
