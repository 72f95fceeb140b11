use unibuild_lib::execute::TaskState;

use super::common::{FakeToolchain, LIBRARY, Project, task};

const DEBUG_ONLY: &str = "[[variants]]\nname = \"debug\"\n";

#[tokio::test]
async fn second_run_is_up_to_date() {
  let project = Project::new("[\"arm64\", \"x86\"]", "");
  assert!(project.build().await.is_success());
  let calls = project.calls().len();

  let result = project.build().await;

  assert!(result.is_success());
  assert!(result.states.values().all(|s| *s == TaskState::Skipped));
  assert!(result.did_work.is_empty());
  assert_eq!(project.calls().len(), calls);
}

#[tokio::test]
async fn source_change_reruns_builds_but_not_unchanged_copies() {
  let project = Project::new("[\"arm64\"]", DEBUG_ONLY);
  project.build().await;
  let session = project.session();

  project.write("native/src/lib.rs", "uniffi::setup_scaffolding!();\npub fn added() {}\n");
  let result = project.build().await;

  assert!(result.is_success());
  for name in ["buildHostLibraryWithDebugSymbols", "buildNativeArm64Debug"] {
    assert_eq!(result.state(&task(&session, name)), Some(TaskState::Succeeded), "{}", name);
  }
  // The fake toolchain produces identical artifacts, so nothing downstream changed.
  for name in ["generateUniffiBindings", "copyBindingsDebug", "copyNativeLibraryArm64Debug"] {
    assert_eq!(result.state(&task(&session, name)), Some(TaskState::Skipped), "{}", name);
  }
}

#[tokio::test]
async fn stray_destination_files_are_removed() {
  let project = Project::new("[\"arm64\"]", DEBUG_ONLY);
  project.build().await;
  let session = project.session();
  project.write("build/generated/jniLibs/debug/arm64/arm64-v8a/libstale.so", "old");

  let result = project.build().await;

  let copy = task(&session, "copyNativeLibraryArm64Debug");
  assert_eq!(result.state(&copy), Some(TaskState::Succeeded));
  assert!(result.did_work.contains(&copy));
  assert_eq!(result.did_work.len(), 1);
  assert!(!project.path("build/generated/jniLibs/debug/arm64/arm64-v8a/libstale.so").exists());
  assert!(
    project
      .path(&format!("build/generated/jniLibs/debug/arm64/arm64-v8a/lib{}.so", LIBRARY))
      .is_file()
  );
}

#[tokio::test]
async fn fixed_failure_reruns_only_what_failed() {
  let project = Project::new("[\"arm64\", \"x86\"]", DEBUG_ONLY);
  project.install_toolchain(&FakeToolchain {
    fail_abi: Some("x86"),
    ..Default::default()
  });
  assert!(!project.build().await.is_success());
  let session = project.session();

  project.install_toolchain(&FakeToolchain::default());
  let result = project.build().await;

  assert!(result.is_success());
  for name in ["buildNativeX86Debug", "copyNativeLibraryX86Debug"] {
    assert_eq!(result.state(&task(&session, name)), Some(TaskState::Succeeded), "{}", name);
  }
  for name in ["buildNativeArm64Debug", "copyNativeLibraryArm64Debug", "generateUniffiBindings"] {
    assert_eq!(result.state(&task(&session, name)), Some(TaskState::Skipped), "{}", name);
  }
}

#[tokio::test]
async fn force_reruns_every_task() {
  let project = Project::new("[\"arm64\"]", DEBUG_ONLY);
  project.build().await;
  let before = project.calls().len();

  let result = project.build_with(&[], true).await;

  assert!(result.is_success());
  assert_eq!(result.count(TaskState::Succeeded), result.states.len());
  assert_eq!(project.calls().len(), before * 2);
  // Identical content means the copies had nothing to change.
  assert!(result.did_work.iter().all(|id| !id.is_copy()));
}

#[tokio::test]
async fn deleted_output_is_rebuilt() {
  let project = Project::new("[\"arm64\"]", DEBUG_ONLY);
  project.build().await;
  let session = project.session();
  std::fs::remove_dir_all(project.path("build/generated/uniffi/bindings")).unwrap();

  let result = project.build().await;

  assert_eq!(
    result.state(&task(&session, "generateUniffiBindings")),
    Some(TaskState::Succeeded)
  );
  assert_eq!(
    result.state(&task(&session, "buildHostLibraryWithDebugSymbols")),
    Some(TaskState::Skipped)
  );
}

#[tokio::test]
async fn stray_generated_bindings_do_not_reach_variants() {
  let project = Project::new("[\"arm64\"]", DEBUG_ONLY);
  project.build().await;
  let session = project.session();
  project.write("build/generated/uniffi/bindings/Stale.kt", "class Stale");

  let result = project.build().await;

  assert!(result.is_success());
  assert_eq!(
    result.state(&task(&session, "generateUniffiBindings")),
    Some(TaskState::Succeeded)
  );
  assert!(!project.path("build/generated/uniffi/bindings/Stale.kt").exists());
  assert!(!project.path("build/generated/source/uniffi/debug/Stale.kt").exists());
  assert!(
    project
      .path(&format!("build/generated/source/uniffi/debug/{}.kt", LIBRARY))
      .is_file()
  );
}
