//! Locating shared libraries produced by the toolchain.

use std::path::{Path, PathBuf};

use crate::platform::shared_library_name;
use crate::profile::Profile;

/// Expected location of a shared library built by `cargo build --target-dir root_dir`.
///
/// Returns `root_dir/<profile dir>/<platform library file name>`.
pub fn locate(root_dir: &Path, profile: Profile, library_name: &str) -> PathBuf {
  root_dir
    .join(profile.output_directory_name())
    .join(shared_library_name(library_name))
}
