//! Shared test helpers for CLI integration tests.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated test environment.
///
/// Each test gets its own project directory with a native package skeleton,
/// a `unibuild.toml` and a fake toolchain that logs every invocation.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create from a config fixture.
  pub fn from_fixture(name: &str) -> Self {
    let env = Self {
      temp: TempDir::new().unwrap(),
    };
    env.write_file("unibuild.toml", &fixture_content(name));
    env.write_file("native/Cargo.toml", "[package]\nname = \"demo\"\n\n[lib]\nname = \"demo_ffi\"\n");
    env.write_file("native/src/lib.rs", "uniffi::setup_scaffolding!();\n");
    env.write_file("native/uniffi.toml", "[bindings.kotlin]\n");

    let toolchain = env.toolchain_path();
    env.write_file("fake-cargo", &fixture_content("fake-cargo.sh"));
    std::fs::set_permissions(&toolchain, std::fs::Permissions::from_mode(0o755)).unwrap();
    env
  }

  pub fn root(&self) -> PathBuf {
    self.temp.path().to_path_buf()
  }

  pub fn path(&self, relative: &str) -> PathBuf {
    self.root().join(relative)
  }

  /// Write a file relative to the project directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  fn toolchain_path(&self) -> PathBuf {
    self.path("fake-cargo")
  }

  /// Toolchain invocations so far, one line each.
  pub fn calls(&self) -> Vec<String> {
    std::fs::read_to_string(self.path("calls.log"))
      .map(|log| log.lines().map(str::to_string).collect())
      .unwrap_or_default()
  }

  /// Get a pre-configured Command for the unibuild binary.
  ///
  /// Runs in the project directory with `UNIBUILD_CARGO` pointing at the
  /// fake toolchain and `FAKE_CARGO_LOG` collecting its invocations.
  pub fn unibuild_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("unibuild");
    cmd.current_dir(self.root());
    cmd.env("UNIBUILD_CARGO", self.toolchain_path());
    cmd.env("FAKE_CARGO_LOG", self.path("calls.log"));
    cmd.env_remove("FAKE_CARGO_FAIL_HOST");
    cmd.env_remove("FAKE_CARGO_FAIL_ABI");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
