//! Locations of task outputs inside the build directory.
//!
//! ```text
//! {build_dir}/
//! ├── .unibuild/fingerprints.json          # incremental state
//! ├── uniffi/host-target/                  # private cargo target dir of the host build
//! ├── uniffi/target/                       # host library (debug, for bindgen only)
//! └── generated/
//!     ├── uniffi/bindings/                 # generated sources
//!     ├── uniffi/native/{arch}{Profile}/   # cargo ndk output, one per target and profile
//!     ├── source/uniffi/{variant}/         # default variant binding root
//!     └── jniLibs/{variant}/{arch}/        # default variant library roots
//! ```

use std::path::{Path, PathBuf};

use crate::consts::STATE_DIRNAME;
use crate::profile::Profile;
use crate::target::{Target, variant_dir_name};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
  build_dir: PathBuf,
}

impl Layout {
  pub fn new(build_dir: impl Into<PathBuf>) -> Self {
    Self {
      build_dir: build_dir.into(),
    }
  }

  pub fn build_dir(&self) -> &Path {
    &self.build_dir
  }

  /// Output of the host library build.
  pub fn host_library_dir(&self) -> PathBuf {
    self.build_dir.join("uniffi").join("target")
  }

  /// Cargo target dir reserved for the host library build.
  ///
  /// Kept apart from the cross-compiled builds so they never contend for
  /// the same cargo lock or overwrite each other's artifacts.
  pub fn host_intermediate_dir(&self) -> PathBuf {
    self.build_dir.join("uniffi").join("host-target")
  }

  pub fn bindings_dir(&self) -> PathBuf {
    self.build_dir.join("generated").join("uniffi").join("bindings")
  }

  pub fn native_dir(&self, target: Target, profile: Profile) -> PathBuf {
    self
      .build_dir
      .join("generated")
      .join("uniffi")
      .join("native")
      .join(variant_dir_name(target, profile))
  }

  pub fn variant_bindings_dir(&self, variant: &str) -> PathBuf {
    self.build_dir.join("generated").join("source").join("uniffi").join(variant)
  }

  pub fn variant_native_libs_dir(&self, variant: &str) -> PathBuf {
    self.build_dir.join("generated").join("jniLibs").join(variant)
  }

  pub fn state_dir(&self) -> PathBuf {
    self.build_dir.join(STATE_DIRNAME)
  }
}
