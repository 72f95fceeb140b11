//! Build profiles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A toolchain build profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
  Debug,
  Release,
}

impl Profile {
  pub const ALL: [Profile; 2] = [Profile::Debug, Profile::Release];

  /// Profile name understood by `cargo build --profile`.
  pub fn cargo_profile_name(&self) -> &'static str {
    match self {
      Self::Debug => "dev",
      Self::Release => "release",
    }
  }

  /// Subdirectory of the target dir where the toolchain places artifacts.
  pub fn output_directory_name(&self) -> &'static str {
    match self {
      Self::Debug => "debug",
      Self::Release => "release",
    }
  }

  /// Capitalized name used when composing task names.
  pub fn flavor_name(&self) -> &'static str {
    match self {
      Self::Debug => "Debug",
      Self::Release => "Release",
    }
  }

  pub fn is_release(&self) -> bool {
    matches!(self, Self::Release)
  }

  /// Maps a variant's build type to a profile.
  ///
  /// Only `release` selects [`Profile::Release`]; every other build type
  /// builds with the debug profile.
  pub fn from_build_type(build_type: &str) -> Self {
    if build_type.eq_ignore_ascii_case("release") {
      Self::Release
    } else {
      Self::Debug
    }
  }
}

impl fmt::Display for Profile {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.output_directory_name())
  }
}
