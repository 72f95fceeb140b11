//! Constants shared across the crate.

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILENAME: &str = "unibuild.toml";

/// Group label attached to every task this crate registers.
pub const TASK_GROUP: &str = "uniffi";

/// Environment variable overriding the toolchain program (`cargo`).
pub const TOOLCHAIN_ENV: &str = "UNIBUILD_CARGO";

/// Default toolchain program.
pub const DEFAULT_TOOLCHAIN: &str = "cargo";

/// Subcommand of the toolchain that drives Android cross-compilation.
pub const CROSS_FRONT_END: &str = "ndk";

/// Default name of the binding generator binary inside the native package.
pub const DEFAULT_BINDGEN_BIN: &str = "uniffi-bindgen";

/// Default target language for generated bindings.
pub const DEFAULT_LANGUAGE: &str = "kotlin";

/// Default build directory, relative to the configuration file.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Name of the manifest file inside the manifest directory.
pub const MANIFEST_FILENAME: &str = "Cargo.toml";

/// Name of the source tree inside the manifest directory.
pub const SOURCE_DIRNAME: &str = "src";

/// Default UniFFI configuration file inside the manifest directory.
pub const DEFAULT_UNIFFI_CONFIG: &str = "uniffi.toml";

/// Directory (inside the build directory) holding orchestrator state.
pub const STATE_DIRNAME: &str = ".unibuild";

/// Length of the truncated hash used for task cache keys.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;
