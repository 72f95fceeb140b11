//! Graph assembly and variant wiring.
//!
//! Assembly is driven by a fixed template, never by user-supplied edges:
//! host build -> bindgen -> per-variant bindings copy, and
//! native build (target, profile) -> per-variant native copy.

pub mod assembly;
pub mod dag;
pub mod variant;

use std::path::PathBuf;

use thiserror::Error;

pub use assembly::assemble;
pub use dag::TaskGraph;
pub use variant::Variant;

#[derive(Debug, Error)]
pub enum GraphError {
  #[error("two different tasks are named '{0}'")]
  DuplicateTaskName(String),

  #[error("outputs of tasks '{first}' and '{second}' overlap at {path}")]
  OverlappingOutputs {
    path: PathBuf,
    first: String,
    second: String,
  },

  #[error("task '{task}' depends on unknown task '{dependency}'")]
  UnknownDependency { task: String, dependency: String },

  #[error("unknown task '{0}'")]
  UnknownTask(String),

  #[error("dependency cycle detected")]
  CycleDetected,
}
