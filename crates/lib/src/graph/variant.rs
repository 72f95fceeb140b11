use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::profile::Profile;
use crate::target::Target;

/// A named build configuration and the places its generated artifacts go.
///
/// Variants are supplied by configuration and are read-only to assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
  pub name: String,
  pub build_type: String,
  /// Root receiving the generated binding sources.
  pub bindings_dir: PathBuf,
  /// Parent of the per-architecture native library roots.
  pub native_libs_dir: PathBuf,
}

impl Variant {
  /// Profile selected by this variant's build type.
  pub fn profile(&self) -> Profile {
    Profile::from_build_type(&self.build_type)
  }

  /// Library root for one architecture.
  ///
  /// Each architecture gets its own root so copies for different ABIs never
  /// write into the same tree.
  pub fn native_libs_dir_for(&self, target: Target) -> PathBuf {
    self.native_libs_dir.join(target.arch())
  }
}
