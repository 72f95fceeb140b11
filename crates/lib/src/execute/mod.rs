//! Task execution module.
//!
//! Runs a selection of tasks from a [`TaskGraph`]:
//! - a task starts as soon as its selected dependencies have finished
//! - parallel execution of independent tasks, bounded by a semaphore
//! - up-to-date checks against persisted fingerprints
//! - failure propagation: dependents of a failed task are blocked, unrelated
//!   tasks keep running

pub mod actions;
pub mod fingerprint;
pub mod types;

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::graph::{GraphError, TaskGraph};
use crate::task::{TaskId, TaskNode};

use fingerprint::{Fingerprint, FingerprintStore, input_fingerprint, output_fingerprint};

pub use actions::{ProcessError, Verbosity};
pub use types::{ExecuteConfig, ExecuteError, SessionResult, TaskEvent, TaskState};

/// How a task that did not fail finished.
#[derive(Debug)]
enum Completion {
  UpToDate,
  Ran { did_work: bool, fingerprint: Fingerprint },
}

/// Run the requested tasks and everything they depend on.
///
/// Task failures do not make this return `Err`; they are reported in the
/// [`SessionResult`]. An `Err` means the session could not start, e.g. an
/// unknown task was requested or the fingerprint store is unreadable.
///
/// Dropping the returned future aborts running tasks and kills their child
/// processes. Fingerprints are only recorded for tasks that finished.
pub async fn execute(
  graph: &TaskGraph,
  requested: &[TaskId],
  config: &ExecuteConfig,
) -> Result<SessionResult, ExecuteError> {
  let selection = graph.with_dependencies(requested)?;
  let mut store = FingerprintStore::load(&config.state_dir)?;

  info!(
    tasks = selection.len(),
    recorded = store.len(),
    parallelism = config.parallelism,
    force = config.force,
    "starting task execution"
  );

  let mut result = SessionResult::default();
  let semaphore = Arc::new(Semaphore::new(config.parallelism.max(1)));

  // Number of selected dependencies each task is still waiting for.
  let mut waiting: HashMap<TaskId, usize> = HashMap::new();
  let mut queue: VecDeque<TaskId> = VecDeque::new();
  for id in &selection {
    result.states.insert(id.clone(), TaskState::Pending);
    let deps = graph
      .dependencies(id)
      .into_iter()
      .filter(|dep| selection.contains(dep))
      .count();
    if deps == 0 {
      queue.push_back(id.clone());
    } else {
      waiting.insert(id.clone(), deps);
    }
  }

  let mut join_set = JoinSet::new();
  let mut running: HashSet<TaskId> = HashSet::new();

  loop {
    while let Some(id) = queue.pop_front() {
      let stopped_dep = graph
        .dependencies(&id)
        .into_iter()
        .find(|dep| result.failed.contains_key(dep) || result.blocked.contains_key(dep));

      if let Some(dep) = stopped_dep {
        warn!(task = %id, failed_dep = %dep, "blocked by failed dependency");
        result.states.insert(id.clone(), TaskState::Blocked);
        config.emit(&id, TaskState::Blocked);
        queue.extend(release_dependents(graph, &selection, &mut waiting, &id));
        result.blocked.insert(id, dep);
        continue;
      }

      let Some(node) = graph.get(&id).cloned() else {
        let err = ExecuteError::from(GraphError::UnknownTask(id.name()));
        record_outcome(&mut result, &mut store, config, id.clone(), Err(err));
        queue.extend(release_dependents(graph, &selection, &mut waiting, &id));
        continue;
      };
      let recorded = if config.force {
        None
      } else {
        store.get(&node.name()).cloned()
      };
      let config = config.clone();
      let semaphore = semaphore.clone();

      debug!(task = %id, "scheduling task");
      running.insert(id);
      join_set.spawn(async move {
        let id = node.id.clone();
        let outcome = run_task(node, recorded, &config, semaphore).await;
        (id, outcome)
      });
    }

    let Some(joined) = join_set.join_next().await else {
      break;
    };

    let mut finished = Vec::new();
    match joined {
      Ok((id, outcome)) => {
        running.remove(&id);
        record_outcome(&mut result, &mut store, config, id.clone(), outcome);
        finished.push(id);
      }
      Err(e) => error!(error = %e, "task worker panicked"),
    }

    // Workers that panicked never reported back.
    if join_set.is_empty() {
      for id in std::mem::take(&mut running) {
        let err = ExecuteError::Panicked(format!("worker for '{}' exited without a result", id));
        record_outcome(&mut result, &mut store, config, id.clone(), Err(err));
        finished.push(id);
      }
    }

    if let Err(e) = store.save() {
      warn!(path = %store.path().display(), error = %e, "failed to save fingerprints");
    }

    for id in &finished {
      queue.extend(release_dependents(graph, &selection, &mut waiting, id));
    }
  }

  info!(
    succeeded = result.count(TaskState::Succeeded),
    up_to_date = result.count(TaskState::Skipped),
    failed = result.failed.len(),
    blocked = result.blocked.len(),
    "task execution complete"
  );

  Ok(result)
}

/// Mark `finished` as done for its selected dependents and return the ones
/// that have no unfinished dependencies left, in id order.
fn release_dependents(
  graph: &TaskGraph,
  selection: &BTreeSet<TaskId>,
  waiting: &mut HashMap<TaskId, usize>,
  finished: &TaskId,
) -> Vec<TaskId> {
  let mut ready = Vec::new();
  for dependent in graph.dependents(finished) {
    if !selection.contains(&dependent) {
      continue;
    }
    if let Some(count) = waiting.get_mut(&dependent) {
      *count = count.saturating_sub(1);
      if *count == 0 {
        waiting.remove(&dependent);
        ready.push(dependent);
      }
    }
  }
  ready
}

fn record_outcome(
  result: &mut SessionResult,
  store: &mut FingerprintStore,
  config: &ExecuteConfig,
  id: TaskId,
  outcome: Result<Completion, ExecuteError>,
) {
  let name = id.name();
  let state = match outcome {
    Ok(Completion::UpToDate) => {
      info!(task = %name, "up to date");
      TaskState::Skipped
    }
    Ok(Completion::Ran { did_work, fingerprint }) => {
      info!(task = %name, did_work, "task succeeded");
      store.record(name, fingerprint);
      if did_work {
        result.did_work.insert(id.clone());
      }
      TaskState::Succeeded
    }
    Err(e) => {
      error!(task = %name, error = %e, "task failed");
      store.forget(&name);
      result.failed.insert(id.clone(), e);
      TaskState::Failed
    }
  };

  config.emit(&id, state);
  result.states.insert(id, state);
}

/// Run a single task: check inputs, skip if up to date, run its action and
/// fingerprint the result.
async fn run_task(
  node: TaskNode,
  recorded: Option<Fingerprint>,
  config: &ExecuteConfig,
  semaphore: Arc<Semaphore>,
) -> Result<Completion, ExecuteError> {
  let _permit = semaphore
    .acquire_owned()
    .await
    .map_err(|e| ExecuteError::Panicked(e.to_string()))?;

  for path in node.input_paths() {
    if !path.exists() {
      return Err(ExecuteError::MissingInput {
        task: node.name(),
        path: path.to_path_buf(),
      });
    }
  }

  let inputs = input_fingerprint(&node)?;
  if let Some(recorded) = &recorded
    && recorded.matches(&node, &inputs)?
  {
    return Ok(Completion::UpToDate);
  }

  config.emit(&node.id, TaskState::Running);
  info!(task = %node.name(), "running task");
  let start = Instant::now();

  let did_work = actions::execute_action(&node.action, &node.output, config).await?;

  if !node.output.exists() {
    return Err(ExecuteError::MissingOutput {
      task: node.name(),
      path: node.output.clone(),
    });
  }

  let fingerprint = Fingerprint {
    inputs,
    output: output_fingerprint(&node)?,
  };

  debug!(task = %node.name(), elapsed_ms = start.elapsed().as_millis() as u64, "action finished");
  Ok(Completion::Ran { did_work, fingerprint })
}
