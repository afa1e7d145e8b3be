//! Id-indexed arena over a set of tasks.
//!
//! # Responsibility
//! - Answer parent/child/ancestor questions without live object links.
//! - Detect parent assignments that would create a cycle.
//!
//! # Invariants
//! - Edges are `parent_task_id` references only; a missing parent id is
//!   treated as a root (dangling references do not panic).
//! - Child lists keep the input order of the tasks they were built from.

use crate::model::task::{Task, TaskId};
use std::collections::{HashMap, HashSet};

/// Read-only tree view built from a task snapshot.
#[derive(Debug, Clone, Default)]
pub struct TaskTree {
    nodes: HashMap<TaskId, Task>,
    children: HashMap<TaskId, Vec<TaskId>>,
    roots: Vec<TaskId>,
}

impl TaskTree {
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let tasks: Vec<Task> = tasks.into_iter().collect();
        let ids: HashSet<TaskId> = tasks.iter().map(|task| task.id).collect();

        let mut tree = Self::default();
        for task in &tasks {
            match task.parent_task_id.filter(|parent| ids.contains(parent)) {
                Some(parent) => tree.children.entry(parent).or_default().push(task.id),
                None => tree.roots.push(task.id),
            }
        }
        tree.nodes = tasks.into_iter().map(|task| (task.id, task)).collect();
        tree
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.nodes.get(&id)
    }

    /// Tasks without a (known) parent.
    pub fn roots(&self) -> &[TaskId] {
        &self.roots
    }

    pub fn children(&self, id: TaskId) -> &[TaskId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Parent chain from the direct parent upward.
    ///
    /// Stops at the first repeated id so corrupt data cannot loop forever.
    pub fn ancestors(&self, id: TaskId) -> Vec<TaskId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = self.nodes.get(&id).and_then(|task| task.parent_task_id);
        while let Some(parent) = current {
            if !seen.insert(parent) || !self.nodes.contains_key(&parent) {
                break;
            }
            chain.push(parent);
            current = self.nodes[&parent].parent_task_id;
        }
        chain
    }

    /// All tasks below `id`, depth-first.
    pub fn descendants(&self, id: TaskId) -> Vec<TaskId> {
        let mut result = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut stack: Vec<TaskId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            if !seen.insert(next) {
                continue;
            }
            result.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        result
    }

    /// Returns whether making `parent` the parent of `node` closes a loop.
    pub fn would_create_cycle(&self, node: TaskId, parent: TaskId) -> bool {
        node == parent || self.ancestors(parent).contains(&node)
    }

    /// Depth a child of `parent` should get; root-level nodes are `1`.
    pub fn child_hierarchy(&self, parent: Option<TaskId>) -> i64 {
        match parent.and_then(|id| self.nodes.get(&id)) {
            Some(task) => task.hierarchy.unwrap_or(1) + 1,
            None => 1,
        }
    }
}
