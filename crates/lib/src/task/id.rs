//! Structured task identity.
//!
//! Display names and cache keys are both derived from [`TaskId`], so two
//! assemblies of the same configuration always agree on both.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::profile::Profile;
use crate::target::{Target, capitalize, task_suffix};
use crate::util::hash::Hashable;

/// Identity of a task instance in the build graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskId {
  /// Debug build of the library for the host, consumed by the binding generator.
  BuildHostLibrary,
  /// Binding generation against the host library.
  GenerateBindings,
  /// Cross-compiled build for one ABI and profile.
  BuildNative { target: Target, profile: Profile },
  /// Copies generated bindings into a variant's source root.
  CopyBindings { variant: String },
  /// Copies one ABI's native libraries into a variant's library root.
  CopyNativeLibrary { target: Target, variant: String },
}

impl Hashable for TaskId {}

impl TaskId {
  /// Human-readable, deterministic task name.
  pub fn name(&self) -> String {
    match self {
      Self::BuildHostLibrary => "buildHostLibraryWithDebugSymbols".to_string(),
      Self::GenerateBindings => "generateUniffiBindings".to_string(),
      Self::BuildNative { target, profile } => format!("buildNative{}", task_suffix(*target, *profile)),
      Self::CopyBindings { variant } => format!("copyBindings{}", capitalize(variant)),
      Self::CopyNativeLibrary { target, variant } => {
        format!("copyNativeLibrary{}{}", capitalize(target.arch()), capitalize(variant))
      }
    }
  }

  /// The ABI target this task is parameterized by, if any.
  pub fn target(&self) -> Option<Target> {
    match self {
      Self::BuildNative { target, .. } | Self::CopyNativeLibrary { target, .. } => Some(*target),
      _ => None,
    }
  }

  /// The variant this task wires outputs into, if any.
  pub fn variant(&self) -> Option<&str> {
    match self {
      Self::CopyBindings { variant } | Self::CopyNativeLibrary { variant, .. } => Some(variant),
      _ => None,
    }
  }

  pub fn is_copy(&self) -> bool {
    matches!(self, Self::CopyBindings { .. } | Self::CopyNativeLibrary { .. })
  }
}

impl fmt::Display for TaskId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}
