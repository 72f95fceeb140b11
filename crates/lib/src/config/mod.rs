//! Configuration file (`unibuild.toml`) loading and validation.
//!
//! ```toml
//! manifest_dir = "native"
//! library_name = "iroh_ffi"
//! uniffi_config = "uniffi.toml"
//! targets = ["arm64", "x86_64"]
//!
//! [[variants]]
//! name = "debug"
//!
//! [[variants]]
//! name = "release"
//! build_type = "release"
//! ```
//!
//! Relative paths are resolved against the directory containing the file.

pub mod types;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::{
  DEFAULT_BINDGEN_BIN, DEFAULT_BUILD_DIR, DEFAULT_LANGUAGE, DEFAULT_TOOLCHAIN, DEFAULT_UNIFFI_CONFIG,
  MANIFEST_FILENAME, SOURCE_DIRNAME, TOOLCHAIN_ENV,
};
use crate::graph::Variant;
use crate::layout::Layout;
use crate::target::{Target, resolve_targets};

pub use types::{ConfigError, RawConfig, RawVariant};

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Directory containing the native package's `Cargo.toml`.
  pub manifest_dir: PathBuf,
  /// Library name from the `[lib]` section of the manifest.
  pub library_name: String,
  pub uniffi_config: PathBuf,
  /// Active target matrix, in canonical order.
  pub targets: Vec<Target>,
  pub build_dir: PathBuf,
  pub bindgen_bin: String,
  pub language: String,
  /// Toolchain program; `UNIBUILD_CARGO` takes precedence over the file.
  pub toolchain: String,
  pub parallelism: usize,
  pub variants: Vec<Variant>,
}

impl Config {
  /// Load and resolve a configuration file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let base_dir = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
      _ => PathBuf::from("."),
    };
    let base_dir = dunce::canonicalize(&base_dir).unwrap_or(base_dir);

    debug!(path = %path.display(), base = %base_dir.display(), "loading config");
    Self::from_toml(&content, &base_dir)
  }

  /// Parse configuration text, resolving relative paths against `base_dir`.
  pub fn from_toml(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
    let raw: RawConfig = toml::from_str(content)?;
    Self::resolve(raw, base_dir)
  }

  /// Apply defaults and validate the raw configuration.
  pub fn resolve(raw: RawConfig, base_dir: &Path) -> Result<Self, ConfigError> {
    let library_name = raw.library_name.trim().to_string();
    if library_name.is_empty() {
      return Err(ConfigError::EmptyLibraryName);
    }

    let manifest_dir = base_dir.join(&raw.manifest_dir);
    let uniffi_config = match raw.uniffi_config {
      Some(path) => base_dir.join(path),
      None => manifest_dir.join(DEFAULT_UNIFFI_CONFIG),
    };
    let build_dir = base_dir.join(raw.build_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_DIR)));
    let layout = Layout::new(&build_dir);

    let parallelism = match raw.parallelism {
      Some(0) => return Err(ConfigError::ZeroParallelism),
      Some(n) => n,
      None => default_parallelism(),
    };

    let toolchain = std::env::var(TOOLCHAIN_ENV)
      .ok()
      .filter(|v| !v.is_empty())
      .or(raw.toolchain)
      .unwrap_or_else(|| DEFAULT_TOOLCHAIN.to_string());

    let raw_variants = if raw.variants.is_empty() {
      RawVariant::defaults()
    } else {
      raw.variants
    };

    let mut seen = HashSet::new();
    let mut variants = Vec::with_capacity(raw_variants.len());
    for rv in raw_variants {
      validate_variant_name(&rv.name)?;
      // Task names capitalize the variant, so `debug` and `Debug` would collide.
      if !seen.insert(rv.name.to_ascii_lowercase()) {
        return Err(ConfigError::DuplicateVariant(rv.name));
      }

      let bindings_dir = match rv.bindings_dir {
        Some(dir) => base_dir.join(dir),
        None => layout.variant_bindings_dir(&rv.name),
      };
      let native_libs_dir = match rv.native_libs_dir {
        Some(dir) => base_dir.join(dir),
        None => layout.variant_native_libs_dir(&rv.name),
      };

      variants.push(Variant {
        build_type: rv.build_type.unwrap_or_else(|| rv.name.clone()),
        name: rv.name,
        bindings_dir,
        native_libs_dir,
      });
    }

    Ok(Self {
      manifest_dir,
      library_name,
      uniffi_config,
      targets: resolve_targets(raw.targets.as_deref()),
      build_dir,
      bindgen_bin: raw.bindgen_bin.unwrap_or_else(|| DEFAULT_BINDGEN_BIN.to_string()),
      language: raw.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
      toolchain,
      parallelism,
      variants,
    })
  }

  pub fn layout(&self) -> Layout {
    Layout::new(&self.build_dir)
  }

  pub fn manifest_path(&self) -> PathBuf {
    self.manifest_dir.join(MANIFEST_FILENAME)
  }

  pub fn source_dir(&self) -> PathBuf {
    self.manifest_dir.join(SOURCE_DIRNAME)
  }

  pub fn variant(&self, name: &str) -> Option<&Variant> {
    self.variants.iter().find(|v| v.name == name)
  }

  /// Check that the native package can be located.
  ///
  /// Runs before any subprocess so a misconfigured package fails fast.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let manifest = self.manifest_path();
    if !manifest.is_file() {
      return Err(ConfigError::ManifestNotFound(manifest));
    }
    let source = self.source_dir();
    if !source.is_dir() {
      return Err(ConfigError::SourceDirNotFound(source));
    }
    Ok(())
  }
}

fn validate_variant_name(name: &str) -> Result<(), ConfigError> {
  let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
  if valid {
    Ok(())
  } else {
    Err(ConfigError::InvalidVariantName(name.to_string()))
  }
}

fn default_parallelism() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}
