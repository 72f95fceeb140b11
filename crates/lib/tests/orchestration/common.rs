//! Shared helpers for orchestration tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use unibuild_lib::Session;
use unibuild_lib::execute::{SessionResult, Verbosity};
use unibuild_lib::platform::shared_library_name;
use unibuild_lib::task::TaskId;

pub const LIBRARY: &str = "demo_ffi";

/// Behavior of the fake `cargo` script.
#[derive(Debug, Default, Clone)]
pub struct FakeToolchain {
  /// `cargo build` exits nonzero.
  pub fail_host: bool,
  /// `cargo ndk` exits nonzero for this ABI.
  pub fail_abi: Option<&'static str>,
  /// `cargo build` succeeds but writes the library under another name.
  pub misname_host_library: bool,
  /// `cargo ndk` for this ABI waits until the path exists before building.
  pub ndk_waits_for: Option<(&'static str, PathBuf)>,
}

/// A project directory with a native package, a config file and a fake
/// toolchain that logs every invocation.
pub struct Project {
  _temp: TempDir,
  pub root: PathBuf,
}

impl Project {
  /// Create a project for `targets` (a TOML list) plus extra config lines.
  pub fn new(targets: &str, extra: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let root = dunce::canonicalize(temp.path()).unwrap();
    let project = Self { _temp: temp, root };

    project.write("native/Cargo.toml", "[package]\nname = \"demo\"\n\n[lib]\nname = \"demo_ffi\"\n");
    project.write("native/src/lib.rs", "uniffi::setup_scaffolding!();\n");
    project.write("native/uniffi.toml", "[bindings.kotlin]\n");
    project.install_toolchain(&FakeToolchain::default());
    project.write(
      "unibuild.toml",
      &format!(
        "manifest_dir = \"native\"\nlibrary_name = \"{}\"\ntoolchain = \"{}\"\ntargets = {}\nparallelism = 4\n{}",
        LIBRARY,
        project.toolchain_path().display(),
        targets,
        extra
      ),
    );
    project
  }

  pub fn path(&self, relative: &str) -> PathBuf {
    self.root.join(relative)
  }

  pub fn write(&self, relative: &str, content: &str) {
    let path = self.path(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
  }

  pub fn read(&self, relative: &str) -> String {
    fs::read_to_string(self.path(relative)).unwrap_or_else(|e| panic!("failed to read {}: {}", relative, e))
  }

  fn toolchain_path(&self) -> PathBuf {
    self.path("fake-cargo")
  }

  /// Replace the fake toolchain script.
  pub fn install_toolchain(&self, fake: &FakeToolchain) {
    let path = self.toolchain_path();
    fs::write(&path, fake_script(fake, &self.path("calls.log"))).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
  }

  pub fn session(&self) -> Session {
    Session::load(&self.path("unibuild.toml")).unwrap()
  }

  /// Run `tasks` (or every wiring task when empty).
  pub async fn build_with(&self, tasks: &[TaskId], force: bool) -> SessionResult {
    let session = self.session();
    let mut config = session.execute_config(force, None);
    config.verbosity = Verbosity::Quiet;
    session.run(tasks, &config).await.unwrap()
  }

  pub async fn build(&self) -> SessionResult {
    self.build_with(&[], false).await
  }

  /// Toolchain invocations so far, one line each.
  pub fn calls(&self) -> Vec<String> {
    match fs::read_to_string(self.path("calls.log")) {
      Ok(log) => log.lines().map(str::to_string).collect(),
      Err(_) => Vec::new(),
    }
  }

  pub fn calls_starting_with(&self, prefix: &str) -> usize {
    self.calls().iter().filter(|c| c.starts_with(prefix)).count()
  }
}

pub fn task(session: &Session, name: &str) -> TaskId {
  session
    .graph()
    .get_by_name(name)
    .unwrap_or_else(|| panic!("no task named {}", name))
    .id
    .clone()
}

fn fake_script(fake: &FakeToolchain, log: &Path) -> String {
  let host_body = if fake.fail_host {
    "echo 'error: could not compile `demo`' >&2\n    exit 101".to_string()
  } else {
    let file = if fake.misname_host_library {
      "wrong-name.bin".to_string()
    } else {
      shared_library_name(LIBRARY)
    };
    format!("mkdir -p \"$6/debug\" && printf 'host' > \"$6/debug/{}\"", file)
  };
  let fail_abi = fake.fail_abi.unwrap_or("none");
  let (wait_abi, wait_path) = match &fake.ndk_waits_for {
    Some((abi, path)) => (*abi, path.display().to_string()),
    None => ("none", String::new()),
  };

  format!(
    r#"#!/bin/sh
echo "$*" >> "{log}"
case "$1" in
  build)
    {host_body}
    ;;
  ndk)
    if [ "$3" = "{fail_abi}" ]; then
      echo "error: linking failed for $3" >&2
      exit 1
    fi
    if [ "$3" = "{wait_abi}" ]; then
      i=0
      while [ ! -e "{wait_path}" ]; do
        i=$((i + 1))
        if [ "$i" -gt 100 ]; then
          echo "timed out waiting for {wait_path}" >&2
          exit 1
        fi
        sleep 0.1
      done
    fi
    mkdir -p "$5/$3" && printf 'native %s' "$3" > "$5/$3/lib{lib}.so"
    ;;
  run)
    mkdir -p "${{12}}" && printf 'package uniffi.{lib}\n' > "${{12}}/{lib}.kt"
    ;;
  *)
    echo "unexpected invocation: $*" >&2
    exit 2
    ;;
esac
"#,
    log = log.display(),
    host_body = host_body,
    fail_abi = fail_abi,
    wait_abi = wait_abi,
    wait_path = wait_path,
    lib = LIBRARY,
  )
}
