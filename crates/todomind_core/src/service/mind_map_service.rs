//! Mind map use-case service.
//!
//! # Invariants
//! - Completion is a user-set flag. Task statuses never change it, and it
//!   never changes task statuses.
//! - Deleting a mind map removes its tasks with it.

use crate::listing::status_filter::progress_rate;
use crate::model::mind_map::{MindMap, MindMapId};
use crate::repo::mind_map_repo::MindMapRepository;
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::repo::{EntityKind, RepoError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum MindMapServiceError {
    MindMapNotFound(MindMapId),
    Repo(RepoError),
}

impl Display for MindMapServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MindMapNotFound(id) => write!(f, "mind map not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MindMapServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::MindMapNotFound(_) => None,
        }
    }
}

impl From<RepoError> for MindMapServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                kind: EntityKind::MindMap,
                id,
            } => Self::MindMapNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type MindMapServiceResult<T> = Result<T, MindMapServiceError>;

/// Mind map facade. Reads tasks for progress and cascade bookkeeping.
pub struct MindMapService<M: MindMapRepository, T: TaskRepository> {
    mind_maps: M,
    tasks: T,
}

impl<M: MindMapRepository, T: TaskRepository> MindMapService<M, T> {
    pub fn new(mind_maps: M, tasks: T) -> Self {
        Self { mind_maps, tasks }
    }

    pub fn create_mind_map(&self, mind_map: &MindMap) -> MindMapServiceResult<MindMap> {
        let id = self
            .mind_maps
            .create_mind_map(mind_map)
            .inspect_err(|err| log_repo_failure("mind_map_create", err))?;
        info!("event=mind_map_create module=mind_map_service status=ok mind_map_id={id}");
        self.require_mind_map(id)
    }

    pub fn update_mind_map(&self, mind_map: &MindMap) -> MindMapServiceResult<MindMap> {
        self.mind_maps
            .update_mind_map(mind_map)
            .inspect_err(|err| log_repo_failure("mind_map_update", err))?;
        let mut stored = self.require_mind_map(mind_map.id)?;
        // Preview is display state; keep what the caller already had.
        stored.ogp_preview = mind_map.ogp_preview.clone();
        Ok(stored)
    }

    pub fn get_mind_map(&self, id: MindMapId) -> MindMapServiceResult<Option<MindMap>> {
        Ok(self.mind_maps.get_mind_map(id)?)
    }

    /// Newest first.
    pub fn list_mind_maps(&self) -> MindMapServiceResult<Vec<MindMap>> {
        Ok(self.mind_maps.list_mind_maps()?)
    }

    pub fn set_completed(&self, id: MindMapId, is_completed: bool) -> MindMapServiceResult<MindMap> {
        let mut mind_map = self.require_mind_map(id)?;
        mind_map.is_completed = is_completed;
        self.update_mind_map(&mind_map)
    }

    /// Percentage of complete tasks in the mind map (0..=100).
    pub fn progress(&self, id: MindMapId) -> MindMapServiceResult<f32> {
        self.require_mind_map(id)?;
        let query = TaskListQuery {
            mind_map_id: Some(id),
            ..TaskListQuery::default()
        };
        let tasks = self.tasks.list_tasks(&query)?;
        Ok(progress_rate(&tasks))
    }

    /// Deletes the mind map and, by cascade, all of its tasks.
    ///
    /// Returns how many tasks went with it.
    pub fn delete_mind_map(&self, id: MindMapId) -> MindMapServiceResult<usize> {
        let query = TaskListQuery {
            mind_map_id: Some(id),
            include_deleted: true,
            ..TaskListQuery::default()
        };
        let task_count = self.tasks.list_tasks(&query)?.len();
        self.mind_maps
            .delete_mind_map(id)
            .inspect_err(|err| log_repo_failure("mind_map_delete", err))?;
        info!(
            "event=mind_map_delete module=mind_map_service status=ok mind_map_id={id} task_count={task_count}"
        );
        Ok(task_count)
    }

    fn require_mind_map(&self, id: MindMapId) -> MindMapServiceResult<MindMap> {
        self.mind_maps
            .get_mind_map(id)?
            .ok_or(MindMapServiceError::MindMapNotFound(id))
    }
}

fn log_repo_failure(event: &'static str, err: &RepoError) {
    error!(
        "event={event} module=mind_map_service status=error error_code={} error={}",
        err.code(),
        err
    );
}
