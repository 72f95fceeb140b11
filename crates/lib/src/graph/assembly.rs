//! Builds the task graph for a configuration.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use tracing::debug;

use crate::config::Config;
use crate::consts::TASK_GROUP;
use crate::platform::shared_library_name;
use crate::profile::Profile;
use crate::target::Target;
use crate::task::{TaskAction, TaskId, TaskInput, TaskNode};

use super::{GraphError, TaskGraph, Variant};

/// Assemble the task graph for every configured variant.
///
/// One host build and one binding generation task are always created. Native
/// builds are created once per (target, profile) pair that some variant
/// needs, and shared between variants with the same profile. Running this
/// twice on the same configuration yields identical task ids and names.
pub fn assemble(config: &Config) -> Result<TaskGraph, GraphError> {
  let mut builder = Builder::new(config);

  builder.host_library();
  builder.bindings();

  for variant in &config.variants {
    builder.wire_variant(variant);
  }

  debug!(tasks = builder.nodes.len(), variants = config.variants.len(), "assembled task graph");
  TaskGraph::from_tasks(builder.nodes.into_values())
}

struct Builder<'a> {
  config: &'a Config,
  nodes: BTreeMap<TaskId, TaskNode>,
}

impl<'a> Builder<'a> {
  fn new(config: &'a Config) -> Self {
    Self {
      config,
      nodes: BTreeMap::new(),
    }
  }

  /// Insert a node unless one with the same id already exists.
  fn reuse_or_insert(&mut self, id: TaskId, create: impl FnOnce(&Config, TaskId) -> TaskNode) -> TaskId {
    if !self.nodes.contains_key(&id) {
      let node = create(self.config, id.clone());
      self.nodes.insert(id.clone(), node);
    }
    id
  }

  fn host_library(&mut self) -> TaskId {
    self.reuse_or_insert(TaskId::BuildHostLibrary, |config, id| {
      let layout = config.layout();
      let profile = Profile::Debug;

      TaskNode {
        id,
        group: TASK_GROUP.to_string(),
        description: "Build native library in debug mode for the host target for consumption by UniFFI".to_string(),
        inputs: vec![
          TaskInput::file(config.manifest_path()),
          TaskInput::dir(config.source_dir()),
          TaskInput::property("library_name", &config.library_name),
          TaskInput::property("profile", profile.cargo_profile_name()),
        ],
        output: layout.host_library_dir(),
        action: TaskAction::BuildHostLibrary {
          manifest_dir: config.manifest_dir.clone(),
          library_name: config.library_name.clone(),
          profile,
          intermediate_dir: layout.host_intermediate_dir(),
        },
        depends_on: BTreeSet::new(),
      }
    })
  }

  fn bindings(&mut self) -> TaskId {
    let host = self.host_library();

    self.reuse_or_insert(TaskId::GenerateBindings, |config, id| {
      let layout = config.layout();
      let library = layout
        .host_library_dir()
        .join(shared_library_name(&config.library_name));

      TaskNode {
        id,
        group: TASK_GROUP.to_string(),
        description: "Generate bindings to the native library using UniFFI".to_string(),
        inputs: vec![
          TaskInput::file(config.manifest_path()),
          TaskInput::file(&library),
          TaskInput::file(&config.uniffi_config),
          TaskInput::property("bin_name", &config.bindgen_bin),
          TaskInput::property("language", &config.language),
        ],
        output: layout.bindings_dir(),
        action: TaskAction::GenerateBindings {
          manifest_dir: config.manifest_dir.clone(),
          bin_name: config.bindgen_bin.clone(),
          language: config.language.clone(),
          library,
          config_file: config.uniffi_config.clone(),
        },
        depends_on: BTreeSet::from([host]),
      }
    })
  }

  fn native(&mut self, target: Target, profile: Profile) -> TaskId {
    self.reuse_or_insert(TaskId::BuildNative { target, profile }, |config, id| TaskNode {
      id,
      group: TASK_GROUP.to_string(),
      description: format!(
        "Build native library in {} mode for {}",
        profile.output_directory_name(),
        target.arch()
      ),
      inputs: vec![
        TaskInput::file(config.manifest_path()),
        TaskInput::dir(config.source_dir()),
        TaskInput::property("abi", target.abi()),
        TaskInput::property("profile", profile.cargo_profile_name()),
      ],
      output: config.layout().native_dir(target, profile),
      action: TaskAction::BuildNative {
        manifest_dir: config.manifest_dir.clone(),
        target,
        profile,
      },
      depends_on: BTreeSet::new(),
    })
  }

  fn wire_variant(&mut self, variant: &Variant) {
    let config = self.config;
    let layout = config.layout();
    let profile = variant.profile();

    let bindings = self.bindings();
    self.reuse_or_insert(
      TaskId::CopyBindings {
        variant: variant.name.clone(),
      },
      |_, id| {
        copy_node(
          id,
          format!("Copy generated bindings into variant '{}'", variant.name),
          layout.bindings_dir(),
          variant.bindings_dir.clone(),
          bindings,
        )
      },
    );

    for &target in &config.targets {
      let native = self.native(target, profile);
      let native_dir = layout.native_dir(target, profile);
      self.reuse_or_insert(
        TaskId::CopyNativeLibrary {
          target,
          variant: variant.name.clone(),
        },
        |_, id| {
          copy_node(
            id,
            format!("Copy {} native libraries into variant '{}'", target.arch(), variant.name),
            native_dir,
            variant.native_libs_dir_for(target),
            native,
          )
        },
      );
    }
  }
}

fn copy_node(
  id: TaskId,
  description: String,
  from: PathBuf,
  into: PathBuf,
  producer: TaskId,
) -> TaskNode {
  TaskNode {
    id,
    group: TASK_GROUP.to_string(),
    description,
    inputs: vec![TaskInput::dir(&from)],
    output: into,
    action: TaskAction::Copy { from },
    depends_on: BTreeSet::from([producer]),
  }
}
