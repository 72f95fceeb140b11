use unibuild_lib::execute::{ExecuteError, TaskState};
use unibuild_lib::graph::GraphError;
use unibuild_lib::platform::shared_library_name;
use unibuild_lib::{Session, SessionError};

use super::common::{FakeToolchain, LIBRARY, Project, task};

const DEBUG_ONLY: &str = "[[variants]]\nname = \"debug\"\n";

#[tokio::test]
async fn full_build_wires_every_variant() {
  let project = Project::new("[\"arm64\", \"x86_64\"]", "");

  let result = project.build().await;

  assert!(result.is_success(), "failed: {:?}", result.failed);
  assert!(result.states.values().all(|s| *s == TaskState::Succeeded));

  for variant in ["debug", "release"] {
    let kotlin = format!("build/generated/source/uniffi/{}/{}.kt", variant, LIBRARY);
    assert_eq!(project.read(&kotlin), format!("package uniffi.{}\n", LIBRARY));

    for (arch, abi) in [("arm64", "arm64-v8a"), ("x86_64", "x86_64")] {
      let lib = format!("build/generated/jniLibs/{}/{}/{}/lib{}.so", variant, arch, abi, LIBRARY);
      assert_eq!(project.read(&lib), format!("native {}", abi));
    }
  }

  let host = format!("build/uniffi/target/{}", shared_library_name(LIBRARY));
  assert_eq!(project.read(&host), "host");

  assert_eq!(project.calls_starting_with("build --lib --profile dev"), 1);
  assert_eq!(project.calls_starting_with("run --bin uniffi-bindgen"), 1);
  assert_eq!(project.calls_starting_with("ndk "), 4);
  assert_eq!(project.calls_starting_with("ndk -t x86_64"), 2);
  assert_eq!(
    project
      .calls()
      .iter()
      .filter(|c| c.starts_with("ndk ") && c.ends_with("--release"))
      .count(),
    2
  );
}

#[tokio::test]
async fn only_profiles_in_use_are_built() {
  let project = Project::new("[\"arm\", \"x86\"]", DEBUG_ONLY);

  let result = project.build().await;

  assert!(result.is_success());
  assert_eq!(project.calls_starting_with("ndk "), 2);
  assert!(project.calls().iter().all(|c| !c.contains("--release")));
  assert!(
    project
      .path("build/generated/jniLibs/debug/arm/armeabi-v7a")
      .join(format!("lib{}.so", LIBRARY))
      .is_file()
  );
}

#[tokio::test]
async fn failing_target_blocks_only_its_copy() {
  let project = Project::new("[\"arm64\", \"x86_64\"]", DEBUG_ONLY);
  project.install_toolchain(&FakeToolchain {
    fail_abi: Some("x86_64"),
    ..Default::default()
  });
  let session = project.session();

  let result = project.build().await;

  assert!(!result.is_success());
  let failed_build = task(&session, "buildNativeX86_64Debug");
  assert_eq!(result.state(&failed_build), Some(TaskState::Failed));
  assert!(matches!(
    result.failed.get(&failed_build),
    Some(ExecuteError::Process(_))
  ));
  assert_eq!(
    result.blocked.get(&task(&session, "copyNativeLibraryX86_64Debug")),
    Some(&failed_build)
  );
  assert_eq!(result.blocked.len(), 1);

  assert_eq!(
    result.state(&task(&session, "copyNativeLibraryArm64Debug")),
    Some(TaskState::Succeeded)
  );
  assert_eq!(
    result.state(&task(&session, "copyBindingsDebug")),
    Some(TaskState::Succeeded)
  );
  assert!(!project.path("build/generated/jniLibs/debug/x86_64").exists());
}

#[tokio::test]
async fn copies_start_while_other_builds_are_running() {
  let project = Project::new("[\"arm64\", \"x86_64\"]", DEBUG_ONLY);
  let copied = project.path(&format!("build/generated/jniLibs/debug/arm64/arm64-v8a/lib{}.so", LIBRARY));
  project.install_toolchain(&FakeToolchain {
    ndk_waits_for: Some(("x86_64", copied.clone())),
    ..Default::default()
  });

  let result = project.build().await;

  assert!(result.is_success(), "failed: {:?}", result.failed);
  assert!(copied.is_file());
  assert!(
    project
      .path(&format!("build/generated/jniLibs/debug/x86_64/x86_64/lib{}.so", LIBRARY))
      .is_file()
  );
}

#[tokio::test]
async fn host_failure_blocks_binding_generation() {
  let project = Project::new("[\"arm64\"]", DEBUG_ONLY);
  project.install_toolchain(&FakeToolchain {
    fail_host: true,
    ..Default::default()
  });
  let session = project.session();

  let result = project.build().await;

  let host = task(&session, "buildHostLibraryWithDebugSymbols");
  let bindgen = task(&session, "generateUniffiBindings");
  assert_eq!(result.state(&host), Some(TaskState::Failed));
  assert_eq!(result.blocked.get(&bindgen), Some(&host));
  assert_eq!(result.blocked.get(&task(&session, "copyBindingsDebug")), Some(&bindgen));
  assert_eq!(
    result.state(&task(&session, "copyNativeLibraryArm64Debug")),
    Some(TaskState::Succeeded)
  );
  assert_eq!(project.calls_starting_with("run "), 0);
}

#[tokio::test]
async fn misnamed_library_is_reported() {
  let project = Project::new("[\"arm64\"]", DEBUG_ONLY);
  project.install_toolchain(&FakeToolchain {
    misname_host_library: true,
    ..Default::default()
  });
  let session = project.session();

  let result = project.build().await;

  let host = task(&session, "buildHostLibraryWithDebugSymbols");
  let err = result.failed.get(&host).expect("host build should fail");
  assert!(matches!(err, ExecuteError::ArtifactNotFound { .. }));
  assert!(err.to_string().contains(&shared_library_name(LIBRARY)));
}

#[tokio::test]
async fn requested_task_runs_with_its_dependencies_only() {
  let project = Project::new("[\"arm64\"]", "");
  let session = project.session();
  let bindgen = task(&session, "generateUniffiBindings");

  let result = project.build_with(&[bindgen.clone()], false).await;

  let ran: Vec<String> = result.states.keys().map(|id| id.name()).collect();
  assert_eq!(ran, vec!["buildHostLibraryWithDebugSymbols", "generateUniffiBindings"]);
  assert_eq!(project.calls_starting_with("ndk "), 0);
  assert!(project.path("build/generated/uniffi/bindings").is_dir());
}

#[tokio::test]
async fn custom_variant_destinations_are_used() {
  let project = Project::new(
    "[\"arm64\"]",
    "[[variants]]\nname = \"staging\"\nbuild_type = \"release\"\nbindings_dir = \"app/src/staging/kotlin\"\nnative_libs_dir = \"app/src/staging/jniLibs\"\n",
  );

  let result = project.build().await;

  assert!(result.is_success());
  assert!(project.path(&format!("app/src/staging/kotlin/{}.kt", LIBRARY)).is_file());
  assert!(
    project
      .path(&format!("app/src/staging/jniLibs/arm64/arm64-v8a/lib{}.so", LIBRARY))
      .is_file()
  );
  assert_eq!(project.calls_starting_with("ndk -t arm64-v8a -o"), 1);
  assert!(project.calls().iter().any(|c| c.ends_with("build --release")));
}

#[test]
fn nested_variant_destinations_fail_before_building() {
  let project = Project::new(
    "[\"arm64\"]",
    "[[variants]]\nname = \"debug\"\nbindings_dir = \"gen\"\nnative_libs_dir = \"gen\"\n",
  );

  let err = Session::load(&project.path("unibuild.toml")).unwrap_err();

  assert!(matches!(
    err,
    SessionError::Graph(GraphError::OverlappingOutputs { .. })
  ));
  assert!(project.calls().is_empty());
  assert!(!project.path("gen").exists());
}

#[tokio::test]
async fn clean_removes_generated_outputs() {
  let project = Project::new("[\"arm64\"]", DEBUG_ONLY);
  project.build().await;

  let removed = project.session().clean().unwrap();

  assert!(!removed.is_empty());
  assert!(!project.path("build/generated").join("uniffi/bindings").exists());
  assert!(!project.path("build/uniffi/host-target").exists());
  assert!(!project.path("build/.unibuild").exists());

  let again = project.build().await;
  assert_eq!(again.count(TaskState::Succeeded), again.states.len());
}
