//! Task graph with dependency queries and parallel execution waves.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::PathBuf;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::task::{TaskId, TaskNode};

use super::GraphError;

/// A directed acyclic graph of tasks.
///
/// Edges run from producer to consumer. The graph is validated on
/// construction: every dependency must exist, names and outputs must be
/// unique, and there must be no cycle.
#[derive(Debug, Clone)]
pub struct TaskGraph {
  graph: DiGraph<TaskId, ()>,
  indices: HashMap<TaskId, NodeIndex>,
  tasks: BTreeMap<TaskId, TaskNode>,
}

impl TaskGraph {
  /// Build a graph from fully constructed task nodes.
  pub fn from_tasks(nodes: impl IntoIterator<Item = TaskNode>) -> Result<Self, GraphError> {
    let mut graph = DiGraph::new();
    let mut indices = HashMap::new();
    let mut tasks = BTreeMap::new();
    let mut names: HashMap<String, TaskId> = HashMap::new();
    let mut outputs: Vec<(PathBuf, TaskId)> = Vec::new();

    for node in nodes {
      if let Some(existing) = names.insert(node.name(), node.id.clone())
        && existing != node.id
      {
        return Err(GraphError::DuplicateTaskName(node.name()));
      }
      if tasks.contains_key(&node.id) {
        continue;
      }
      // Copy tasks prune their destination, so a nested output would be wiped.
      if let Some((path, existing)) = outputs
        .iter()
        .find(|(path, _)| path.starts_with(&node.output) || node.output.starts_with(path))
      {
        return Err(GraphError::OverlappingOutputs {
          path: path.clone(),
          first: existing.name(),
          second: node.name(),
        });
      }
      outputs.push((node.output.clone(), node.id.clone()));

      let idx = graph.add_node(node.id.clone());
      indices.insert(node.id.clone(), idx);
      tasks.insert(node.id.clone(), node);
    }

    for node in tasks.values() {
      let dependent = indices[&node.id];
      for dep in &node.depends_on {
        let producer = indices.get(dep).ok_or_else(|| GraphError::UnknownDependency {
          task: node.name(),
          dependency: dep.name(),
        })?;
        graph.add_edge(*producer, dependent, ());
      }
    }

    let dag = Self { graph, indices, tasks };
    toposort(&dag.graph, None).map_err(|_| GraphError::CycleDetected)?;
    Ok(dag)
  }

  pub fn len(&self) -> usize {
    self.tasks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }

  pub fn contains(&self, id: &TaskId) -> bool {
    self.tasks.contains_key(id)
  }

  pub fn get(&self, id: &TaskId) -> Option<&TaskNode> {
    self.tasks.get(id)
  }

  pub fn get_by_name(&self, name: &str) -> Option<&TaskNode> {
    self.tasks.values().find(|node| node.name() == name)
  }

  /// All task ids, ordered by id.
  pub fn ids(&self) -> impl Iterator<Item = &TaskId> {
    self.tasks.keys()
  }

  /// Task names, sorted.
  pub fn names(&self) -> Vec<String> {
    let mut names: Vec<String> = self.tasks.values().map(TaskNode::name).collect();
    names.sort();
    names
  }

  /// All edges as `(consumer, producer)` pairs, sorted.
  pub fn edges(&self) -> Vec<(TaskId, TaskId)> {
    let mut edges: Vec<(TaskId, TaskId)> = self
      .graph
      .edge_indices()
      .filter_map(|e| self.graph.edge_endpoints(e))
      .map(|(producer, consumer)| (self.graph[consumer].clone(), self.graph[producer].clone()))
      .collect();
    edges.sort();
    edges
  }

  /// Tasks in an order where producers come before consumers.
  ///
  /// Ties are broken by id so the order is stable across runs.
  pub fn topological(&self) -> Vec<&TaskNode> {
    self
      .waves(&self.tasks.keys().cloned().collect())
      .into_iter()
      .flatten()
      .filter_map(|id| self.tasks.get(&id))
      .collect()
  }

  /// Direct producers of a task.
  pub fn dependencies(&self, id: &TaskId) -> Vec<TaskId> {
    self.neighbors(id, Direction::Incoming)
  }

  /// Direct consumers of a task.
  pub fn dependents(&self, id: &TaskId) -> Vec<TaskId> {
    self.neighbors(id, Direction::Outgoing)
  }

  fn neighbors(&self, id: &TaskId, direction: Direction) -> Vec<TaskId> {
    let Some(&idx) = self.indices.get(id) else {
      return Vec::new();
    };

    let mut ids: Vec<TaskId> = self
      .graph
      .neighbors_directed(idx, direction)
      .map(|n| self.graph[n].clone())
      .collect();
    ids.sort();
    ids
  }

  /// The requested tasks plus everything they transitively depend on.
  pub fn with_dependencies(&self, requested: &[TaskId]) -> Result<BTreeSet<TaskId>, GraphError> {
    let mut selected = BTreeSet::new();
    let mut stack = Vec::new();

    for id in requested {
      let idx = self
        .indices
        .get(id)
        .ok_or_else(|| GraphError::UnknownTask(id.name()))?;
      stack.push(*idx);
    }

    while let Some(idx) = stack.pop() {
      if selected.insert(self.graph[idx].clone()) {
        stack.extend(self.graph.neighbors_directed(idx, Direction::Incoming));
      }
    }

    Ok(selected)
  }

  /// Group the selected tasks into waves that can run in parallel.
  ///
  /// Every task's selected producers are in earlier waves. Producers outside
  /// the selection are ignored. Each wave is sorted by id.
  pub fn waves(&self, selection: &BTreeSet<TaskId>) -> Vec<Vec<TaskId>> {
    // Kahn's algorithm, one level at a time
    let mut in_degree: HashMap<NodeIndex, usize> = HashMap::new();
    let mut remaining: HashSet<NodeIndex> = HashSet::new();

    for id in selection {
      if let Some(&idx) = self.indices.get(id) {
        remaining.insert(idx);
      }
    }

    for &idx in &remaining {
      let degree = self
        .graph
        .neighbors_directed(idx, Direction::Incoming)
        .filter(|p| remaining.contains(p))
        .count();
      in_degree.insert(idx, degree);
    }

    let mut waves = Vec::new();

    while !remaining.is_empty() {
      let ready: Vec<NodeIndex> = remaining.iter().filter(|idx| in_degree[*idx] == 0).copied().collect();

      // The graph was verified acyclic on construction.
      if ready.is_empty() {
        break;
      }

      for &idx in &ready {
        remaining.remove(&idx);
        for consumer in self.graph.neighbors_directed(idx, Direction::Outgoing) {
          if let Some(deg) = in_degree.get_mut(&consumer) {
            *deg = deg.saturating_sub(1);
          }
        }
      }

      let mut wave: Vec<TaskId> = ready.into_iter().map(|idx| self.graph[idx].clone()).collect();
      wave.sort();
      waves.push(wave);
    }

    waves
  }
}
