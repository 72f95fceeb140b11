//! Action execution module.
//!
//! Dispatches a task's [`TaskAction`] to the toolchain invocation or file
//! operation that implements it.

pub mod bindgen;
pub mod cargo;
pub mod copy;
pub mod process;

use std::path::Path;

use crate::execute::types::{ExecuteConfig, ExecuteError};
use crate::task::TaskAction;

pub use copy::{CopyError, sync_dir};
pub use process::{ProcessError, Verbosity};

/// Execute a single task action writing into `output`.
///
/// Returns whether the action did any work. Toolchain invocations always
/// count as work; a copy only does when the destination changed.
pub async fn execute_action(action: &TaskAction, output: &Path, config: &ExecuteConfig) -> Result<bool, ExecuteError> {
  match action {
    TaskAction::BuildHostLibrary {
      manifest_dir,
      library_name,
      profile,
      intermediate_dir,
    } => {
      cargo::build_host_library(
        &config.toolchain,
        config.verbosity,
        manifest_dir,
        library_name,
        *profile,
        intermediate_dir,
        output,
      )
      .await?;
      Ok(true)
    }

    TaskAction::GenerateBindings {
      manifest_dir,
      bin_name,
      language,
      library,
      config_file,
    } => {
      bindgen::generate(
        &config.toolchain,
        manifest_dir,
        bin_name,
        language,
        library,
        config_file,
        output,
      )
      .await?;
      Ok(true)
    }

    TaskAction::BuildNative {
      manifest_dir,
      target,
      profile,
    } => {
      cargo::build_native(&config.toolchain, config.verbosity, manifest_dir, *target, *profile, output).await?;
      Ok(true)
    }

    TaskAction::Copy { from } => {
      let from = from.clone();
      let into = output.to_path_buf();
      tokio::task::spawn_blocking(move || sync_dir(&from, &into))
        .await
        .map_err(|e| ExecuteError::Panicked(e.to_string()))?
        .map_err(ExecuteError::from)
    }
  }
}
