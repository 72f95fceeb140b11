//! Toolchain invocations for the host and cross-compiled builds.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::artifact;
use crate::consts::CROSS_FRONT_END;
use crate::profile::Profile;
use crate::target::Target;

use super::process::{self, Verbosity};
use crate::execute::types::ExecuteError;

/// Arguments for `cargo build --lib` into a private target directory.
pub fn host_build_args(profile: Profile, intermediate_dir: &Path) -> Vec<String> {
  vec![
    "build".to_string(),
    "--lib".to_string(),
    "--profile".to_string(),
    profile.cargo_profile_name().to_string(),
    "--target-dir".to_string(),
    intermediate_dir.display().to_string(),
  ]
}

/// Arguments for `cargo ndk -t <abi> -o <output> build [--release]`.
pub fn native_build_args(target: Target, profile: Profile, output_dir: &Path) -> Vec<String> {
  let mut args = vec![
    CROSS_FRONT_END.to_string(),
    "-t".to_string(),
    target.abi().to_string(),
    "-o".to_string(),
    output_dir.display().to_string(),
    "build".to_string(),
  ];
  if profile.is_release() {
    args.push("--release".to_string());
  }
  args
}

/// Build the library for the host and copy it into `output_dir`.
///
/// Fails with [`ExecuteError::ArtifactNotFound`] when the toolchain succeeded
/// but the library is not where the naming convention says it should be.
pub async fn build_host_library(
  toolchain: &str,
  verbosity: Verbosity,
  manifest_dir: &Path,
  library_name: &str,
  profile: Profile,
  intermediate_dir: &Path,
  output_dir: &Path,
) -> Result<(), ExecuteError> {
  let args = host_build_args(profile, intermediate_dir);
  process::run(manifest_dir, toolchain, &args, verbosity).await?;

  let built = artifact::locate(intermediate_dir, profile, library_name);
  if !built.is_file() {
    return Err(ExecuteError::ArtifactNotFound { path: built });
  }

  let Some(file_name) = built.file_name() else {
    return Err(ExecuteError::ArtifactNotFound { path: built });
  };
  let dest = output_dir.join(file_name);

  fs::create_dir_all(output_dir).map_err(|source| ExecuteError::Io {
    path: output_dir.to_path_buf(),
    source,
  })?;
  fs::copy(&built, &dest).map_err(|source| ExecuteError::Io {
    path: dest.clone(),
    source,
  })?;

  debug!(from = %built.display(), to = %dest.display(), "copied host library");
  Ok(())
}

/// Cross-compile for one target; the front-end lays out `{output}/{abi}/`.
pub async fn build_native(
  toolchain: &str,
  verbosity: Verbosity,
  manifest_dir: &Path,
  target: Target,
  profile: Profile,
  output_dir: &Path,
) -> Result<(), ExecuteError> {
  fs::create_dir_all(output_dir).map_err(|source| ExecuteError::Io {
    path: output_dir.to_path_buf(),
    source,
  })?;

  let args = native_build_args(target, profile, output_dir);
  process::run(manifest_dir, toolchain, &args, verbosity).await?;
  Ok(())
}
