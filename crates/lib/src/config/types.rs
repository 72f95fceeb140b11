use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::target::Target;

/// Configuration as written in `unibuild.toml`, before defaults are applied.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
  pub manifest_dir: PathBuf,
  pub library_name: String,
  pub uniffi_config: Option<PathBuf>,
  pub targets: Option<Vec<Target>>,
  pub build_dir: Option<PathBuf>,
  pub bindgen_bin: Option<String>,
  pub language: Option<String>,
  pub toolchain: Option<String>,
  pub parallelism: Option<usize>,
  #[serde(default)]
  pub variants: Vec<RawVariant>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawVariant {
  pub name: String,
  /// Defaults to the variant name.
  pub build_type: Option<String>,
  pub bindings_dir: Option<PathBuf>,
  pub native_libs_dir: Option<PathBuf>,
}

impl RawVariant {
  /// The `debug` and `release` variants used when none are configured.
  pub fn defaults() -> Vec<Self> {
    ["debug", "release"]
      .into_iter()
      .map(|name| Self {
        name: name.to_string(),
        build_type: None,
        bindings_dir: None,
        native_libs_dir: None,
      })
      .collect()
  }
}

/// Errors found while loading or validating configuration.
///
/// All of these are reported before any subprocess runs.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid config: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("library_name must not be empty")]
  EmptyLibraryName,

  #[error("invalid variant name '{0}': use letters, digits, '-' or '_'")]
  InvalidVariantName(String),

  #[error("duplicate variant '{0}'")]
  DuplicateVariant(String),

  #[error("parallelism must be at least 1")]
  ZeroParallelism,

  #[error("cargo manifest not found: {0}")]
  ManifestNotFound(PathBuf),

  #[error("source directory not found: {0}")]
  SourceDirNotFound(PathBuf),
}
