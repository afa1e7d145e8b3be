//! Task use-case service.
//!
//! # Responsibility
//! - Enforce cross-record task invariants above the repository layer.
//! - Persist manual reorder swaps and status changes.
//! - Own the single-slot undo-delete flow.
//!
//! # Invariants
//! - A parent task must be active when linked and share the mind map.
//! - Parent assignment must not create a cycle.
//! - New tasks get `reversed_order = max + 1` so they show at the top.
//! - At most one deleted task is pending undo; everything else deleted is
//!   purged, including rows left over when a previous service went away.

use crate::listing::ordering::{key_after, sort_for_display, swap_reversed_order};
use crate::listing::status_filter::{filter_by_mind_map, filter_by_status};
use crate::model::mind_map::MindMapId;
use crate::model::task::{Task, TaskId, TaskStatus};
use crate::model::task_tree::TaskTree;
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::repo::{EntityKind, RepoError};
use crate::service::undo::{UndoOutcome, UndoSlot, DEFAULT_UNDO_WINDOW};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Errors from task service operations.
#[derive(Debug)]
pub enum TaskServiceError {
    TaskNotFound(TaskId),
    /// Parent id does not name an active task.
    ParentNotFound(TaskId),
    ParentInOtherMindMap { task: TaskId, parent: TaskId },
    CycleDetected { task: TaskId, parent: TaskId },
    Repo(RepoError),
}

impl TaskServiceError {
    /// Stable code used in structured log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TaskNotFound(_) => "task_not_found",
            Self::ParentNotFound(_) => "parent_not_found",
            Self::ParentInOtherMindMap { .. } => "parent_other_mind_map",
            Self::CycleDetected { .. } => "cycle_detected",
            Self::Repo(err) => err.code(),
        }
    }
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "parent task not found: {id}"),
            Self::ParentInOtherMindMap { task, parent } => write!(
                f,
                "parent task {parent} belongs to a different mind map than task {task}"
            ),
            Self::CycleDetected { task, parent } => {
                write!(f, "parent {parent} would create a cycle under task {task}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                kind: EntityKind::Task,
                id,
            } => Self::TaskNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task service facade over a repository implementation.
pub struct TaskService<R: TaskRepository> {
    repo: R,
    undo: UndoSlot,
}

impl<R: TaskRepository> TaskService<R> {
    /// Builds the service. Rows left soft-deleted by an earlier session are
    /// purged first; the new undo slot starts empty.
    pub fn try_new(repo: R) -> TaskServiceResult<Self> {
        Self::with_undo_window(repo, DEFAULT_UNDO_WINDOW)
    }

    pub fn with_undo_window(repo: R, window: Duration) -> TaskServiceResult<Self> {
        let purged = repo
            .purge_deleted()
            .inspect_err(|err| log_repo_failure("task_purge_stale", err))?;
        if purged > 0 {
            info!("event=task_purge_stale module=task_service status=ok count={purged}");
        }
        Ok(Self {
            repo,
            undo: UndoSlot::new(window),
        })
    }

    /// Persists a new task and returns the stored record.
    ///
    /// The caller's `reversed_order` is replaced so the task lands on top.
    /// A child with no `hierarchy` gets its parent's depth plus one.
    pub fn create_task(&self, mut task: Task) -> TaskServiceResult<Task> {
        let tree = self.tree_for(task.mind_map_id)?;
        self.check_parent(&task, &tree)?;
        if task.hierarchy.is_none() && task.parent_task_id.is_some() {
            task.hierarchy = Some(tree.child_hierarchy(task.parent_task_id));
        }
        task.reversed_order = key_after(self.repo.max_reversed_order()?);

        let id = self
            .repo
            .create_task(&task)
            .inspect_err(|err| log_repo_failure("task_create", err))?;
        info!("event=task_create module=task_service status=ok task_id={id}");
        self.require_task(id)
    }

    /// Full-record update ("last write wins").
    ///
    /// The parent link is only re-checked when it or the mind map changed,
    /// so a parent pending undo does not block edits to its children.
    pub fn update_task(&self, task: &Task) -> TaskServiceResult<Task> {
        let stored = self.require_task(task.id)?;
        let relinked = stored.parent_task_id != task.parent_task_id
            || stored.mind_map_id != task.mind_map_id;
        if relinked {
            let tree = self.tree_for(task.mind_map_id)?;
            self.check_parent(task, &tree)?;
        }
        self.repo
            .update_task(task)
            .inspect_err(|err| log_repo_failure("task_update", err))?;
        debug!(
            "event=task_update module=task_service status=ok task_id={}",
            task.id
        );
        self.require_task(task.id)
    }

    pub fn get_task(&self, id: TaskId) -> TaskServiceResult<Option<Task>> {
        Ok(self.repo.get_task(id, false)?)
    }

    pub fn list_tasks(&self, query: &TaskListQuery) -> TaskServiceResult<Vec<Task>> {
        Ok(self.repo.list_tasks(query)?)
    }

    /// Tasks for one status tab, optionally scoped to a mind map, in display
    /// order (`reversed_order` descending).
    pub fn list_for_tab(
        &self,
        status: TaskStatus,
        mind_map_id: Option<MindMapId>,
    ) -> TaskServiceResult<Vec<Task>> {
        let all = self.repo.list_tasks(&TaskListQuery::default())?;
        let scoped = match mind_map_id {
            Some(mind_map_id) => filter_by_mind_map(mind_map_id, &all),
            None => all,
        };
        let mut displayed = filter_by_status(status, &scoped);
        sort_for_display(&mut displayed);
        Ok(displayed)
    }

    /// Swaps the sort keys of `displayed[from]` and `displayed[to]` in
    /// place and persists both.
    ///
    /// Returns `Ok(false)` and writes nothing when either index is out of
    /// range. When the write fails the keys in `displayed` are swapped back.
    pub fn reorder(
        &self,
        displayed: &mut [Task],
        from: usize,
        to: usize,
    ) -> TaskServiceResult<bool> {
        if !swap_reversed_order(displayed, from, to) {
            debug!(
                "event=task_reorder module=task_service status=ignored from={from} to={to} len={}",
                displayed.len()
            );
            return Ok(false);
        }
        if from == to {
            return Ok(true);
        }

        let orders = [
            (displayed[from].id, displayed[from].reversed_order),
            (displayed[to].id, displayed[to].reversed_order),
        ];
        if let Err(err) = self.repo.set_reversed_orders(&orders) {
            log_repo_failure("task_reorder", &err);
            swap_reversed_order(displayed, from, to);
            return Err(err.into());
        }
        debug!("event=task_reorder module=task_service status=ok from={from} to={to}");
        Ok(true)
    }

    pub fn set_status(&self, id: TaskId, status: TaskStatus) -> TaskServiceResult<Task> {
        let mut task = self.require_task(id)?;
        task.status = status;
        self.update_task(&task)
    }

    /// Checkbox toggle: `Complete` goes back to `InProgress`, anything else
    /// becomes `Complete`.
    pub fn toggle_complete(&self, id: TaskId) -> TaskServiceResult<Task> {
        let task = self.require_task(id)?;
        let next = if task.is_complete() {
            TaskStatus::InProgress
        } else {
            TaskStatus::Complete
        };
        self.set_status(id, next)
    }

    /// Hides the task and makes it the single pending-undo task.
    ///
    /// A task displaced from the undo slot is purged for good.
    pub fn delete_task(&mut self, id: TaskId) -> TaskServiceResult<Task> {
        let task = self.require_task(id)?;
        self.repo
            .soft_delete_task(id)
            .inspect_err(|err| log_repo_failure("task_delete", err))?;
        info!("event=task_delete module=task_service status=ok task_id={id}");

        if let Some(displaced) = self.undo.hold(task.clone()) {
            self.finalize_delete(displaced.id)?;
        }
        Ok(task)
    }

    pub fn pending_undo(&self) -> Option<&Task> {
        self.undo.pending()
    }

    /// Restores the pending task if the undo window is still open.
    ///
    /// Returns `None` when nothing is pending or the window has passed; an
    /// expired task is purged.
    pub fn undo_delete(&mut self) -> TaskServiceResult<Option<Task>> {
        match self.undo.take() {
            UndoOutcome::Empty => Ok(None),
            UndoOutcome::Expired(task) => {
                debug!(
                    "event=task_undo module=task_service status=expired task_id={}",
                    task.id
                );
                self.finalize_delete(task.id)?;
                Ok(None)
            }
            UndoOutcome::Restorable(task) => {
                self.repo
                    .restore_task(task.id)
                    .inspect_err(|err| log_repo_failure("task_undo", err))?;
                info!(
                    "event=task_undo module=task_service status=ok task_id={}",
                    task.id
                );
                Ok(self.repo.get_task(task.id, false)?)
            }
        }
    }

    /// Makes the pending deletion permanent (navigation away).
    pub fn clear_undo(&mut self) -> TaskServiceResult<()> {
        match self.undo.clear() {
            Some(task) => self.finalize_delete(task.id),
            None => Ok(()),
        }
    }

    fn finalize_delete(&self, id: TaskId) -> TaskServiceResult<()> {
        match self.repo.purge_task(id) {
            Ok(()) => {
                debug!("event=task_purge module=task_service status=ok task_id={id}");
                Ok(())
            }
            // Already gone, e.g. its mind map was deleted meanwhile.
            Err(RepoError::NotFound { .. }) => {
                warn!("event=task_purge module=task_service status=skipped task_id={id}");
                Ok(())
            }
            Err(err) => {
                log_repo_failure("task_purge", &err);
                Err(err.into())
            }
        }
    }

    fn require_task(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.repo
            .get_task(id, false)?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    fn tree_for(&self, mind_map_id: Option<MindMapId>) -> TaskServiceResult<TaskTree> {
        let query = TaskListQuery {
            mind_map_id,
            ..TaskListQuery::default()
        };
        Ok(TaskTree::from_tasks(self.repo.list_tasks(&query)?))
    }

    fn check_parent(&self, task: &Task, tree: &TaskTree) -> TaskServiceResult<()> {
        let Some(parent_id) = task.parent_task_id else {
            return Ok(());
        };
        let parent = self
            .repo
            .get_task(parent_id, false)?
            .ok_or(TaskServiceError::ParentNotFound(parent_id))?;
        if parent.mind_map_id != task.mind_map_id {
            return Err(TaskServiceError::ParentInOtherMindMap {
                task: task.id,
                parent: parent_id,
            });
        }
        if tree.would_create_cycle(task.id, parent_id) {
            return Err(TaskServiceError::CycleDetected {
                task: task.id,
                parent: parent_id,
            });
        }
        Ok(())
    }
}

fn log_repo_failure(event: &'static str, err: &RepoError) {
    error!(
        "event={event} module=task_service status=error error_code={} error={}",
        err.code(),
        err
    );
}
