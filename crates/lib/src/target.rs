//! The closed set of Android ABI targets and the active target matrix.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::profile::Profile;

/// An Android ABI the cross-compilation front-end can build for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Target {
  Arm64,
  Arm,
  X86,
  X86_64,
}

impl Target {
  /// All targets in canonical order.
  pub const ALL: [Target; 4] = [Target::Arm64, Target::Arm, Target::X86, Target::X86_64];

  /// ABI identifier passed to `cargo ndk -t`.
  pub fn abi(&self) -> &'static str {
    match self {
      Self::Arm64 => "arm64-v8a",
      Self::Arm => "armeabi-v7a",
      Self::X86 => "x86",
      Self::X86_64 => "x86_64",
    }
  }

  /// Short architecture name used in task and directory names.
  pub fn arch(&self) -> &'static str {
    match self {
      Self::Arm64 => "arm64",
      Self::Arm => "arm",
      Self::X86 => "x86",
      Self::X86_64 => "x86_64",
    }
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.arch())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown target '{0}' (expected one of: arm64, arm, x86, x86_64 or their ABI names)")]
pub struct UnknownTarget(pub String);

impl FromStr for Target {
  type Err = UnknownTarget;

  /// Accepts either the architecture name or the ABI name.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let lower = s.trim().to_ascii_lowercase();
    Target::ALL
      .into_iter()
      .find(|t| t.arch() == lower || t.abi() == lower)
      .ok_or_else(|| UnknownTarget(s.to_string()))
  }
}

impl TryFrom<String> for Target {
  type Error = UnknownTarget;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<Target> for String {
  fn from(target: Target) -> Self {
    target.arch().to_string()
  }
}

/// Resolves the active target matrix.
///
/// `None` or an empty list selects every known target. Otherwise the
/// configured targets are deduplicated and returned in canonical order.
pub fn resolve_targets(configured: Option<&[Target]>) -> Vec<Target> {
  match configured {
    Some(targets) if !targets.is_empty() => Target::ALL.into_iter().filter(|t| targets.contains(t)).collect(),
    _ => Target::ALL.to_vec(),
  }
}

/// Canonical, collision-free suffix for tasks parameterized by target and profile.
///
/// `task_suffix(Target::Arm64, Profile::Debug) == "Arm64Debug"`.
pub fn task_suffix(target: Target, profile: Profile) -> String {
  format!("{}{}", capitalize(target.arch()), profile.flavor_name())
}

/// Lower-camel form of [`task_suffix`], used for output directory names.
pub fn variant_dir_name(target: Target, profile: Profile) -> String {
  format!("{}{}", target.arch(), profile.flavor_name())
}

pub(crate) fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}
