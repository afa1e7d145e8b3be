//! Editing sessions for tasks and mind maps.
//!
//! # Responsibility
//! - Hold an in-progress draft as an explicit value owned by the caller.
//! - Auto-save on navigation away and route deletes through the services.
//!
//! # Invariants
//! - A session is either `New` (never persisted) or bound to one stored id.
//! - Setters only mark the session dirty when the value actually changes.
//! - A deleted session never saves again.

use crate::model::mind_map::{MindMap, MindMapId};
use crate::model::settings::AppSettings;
use crate::model::task::{Task, TaskId, TaskStatus};
use crate::ogp::{OgpPreview, PageFetcher};
use crate::repo::mind_map_repo::MindMapRepository;
use crate::repo::task_repo::TaskRepository;
use crate::service::link_preview_service::LinkPreviewService;
use crate::service::mind_map_service::{
    MindMapService, MindMapServiceError, MindMapServiceResult,
};
use crate::service::task_service::{TaskService, TaskServiceError, TaskServiceResult};
use log::debug;
use uuid::Uuid;

/// What an editor session was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    New,
    Existing(Uuid),
}

#[derive(Debug, Clone)]
pub struct TaskEditor {
    draft: Task,
    persisted: bool,
    dirty: bool,
    deleted: bool,
}

impl TaskEditor {
    pub fn open<R: TaskRepository>(
        target: EditTarget,
        service: &TaskService<R>,
    ) -> TaskServiceResult<Self> {
        match target {
            EditTarget::New => Ok(Self::new_task()),
            EditTarget::Existing(id) => service
                .get_task(id)?
                .map(Self::edit)
                .ok_or(TaskServiceError::TaskNotFound(id)),
        }
    }

    /// Empty draft. Nothing is stored until a field is set.
    pub fn new_task() -> Self {
        Self {
            draft: Task::new(),
            persisted: false,
            dirty: false,
            deleted: false,
        }
    }

    pub fn edit(task: Task) -> Self {
        Self {
            draft: task,
            persisted: true,
            dirty: false,
            deleted: false,
        }
    }

    /// New node under `parent` in the same mind map, one level deeper and
    /// `Open`. Saved on `leave` even if untouched.
    pub fn child_of(parent: &Task) -> Self {
        let mut draft = Task::new();
        draft.mind_map_id = parent.mind_map_id;
        draft.parent_task_id = Some(parent.id);
        draft.hierarchy = Some(parent.hierarchy.unwrap_or(1) + 1);
        draft.status = TaskStatus::Open;
        Self {
            draft,
            persisted: false,
            dirty: true,
            deleted: false,
        }
    }

    pub fn draft(&self) -> &Task {
        &self.draft
    }

    pub fn id(&self) -> TaskId {
        self.draft.id
    }

    /// True when bound to a stored task.
    pub fn is_editing(&self) -> bool {
        self.persisted
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn is_auto_save_needed(&self) -> bool {
        self.dirty && !self.deleted
    }

    pub fn set_title(&mut self, title: &str) {
        let value = non_blank(title);
        self.dirty |= replace(&mut self.draft.title, value);
    }

    pub fn set_description(&mut self, description: &str) {
        let value = non_blank(description);
        self.dirty |= replace(&mut self.draft.description, value);
    }

    pub fn set_due_at(&mut self, due_at: Option<i64>) {
        self.dirty |= replace(&mut self.draft.due_at, due_at);
    }

    pub fn set_color(&mut self, color: Option<u32>) {
        self.dirty |= replace(&mut self.draft.color, color);
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.dirty |= replace(&mut self.draft.status, status);
    }

    pub fn set_mind_map(&mut self, mind_map_id: Option<MindMapId>) {
        self.dirty |= replace(&mut self.draft.mind_map_id, mind_map_id);
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.dirty |= replace(&mut self.draft.x, Some(x));
        self.dirty |= replace(&mut self.draft.y, Some(y));
    }

    /// Creates or updates the stored task from the draft.
    pub fn save<R: TaskRepository>(&mut self, service: &TaskService<R>) -> TaskServiceResult<Task> {
        if self.deleted {
            return Err(TaskServiceError::TaskNotFound(self.draft.id));
        }
        let stored = if self.persisted {
            service.update_task(&self.draft)?
        } else {
            service.create_task(self.draft.clone())?
        };
        self.draft = stored.clone();
        self.persisted = true;
        self.dirty = false;
        Ok(stored)
    }

    /// Navigation away: saves when needed, otherwise does nothing.
    pub fn leave<R: TaskRepository>(
        &mut self,
        service: &TaskService<R>,
    ) -> TaskServiceResult<Option<Task>> {
        if !self.is_auto_save_needed() {
            debug!(
                "event=editor_leave module=editor status=skipped task_id={}",
                self.draft.id
            );
            return Ok(None);
        }
        self.save(service).map(Some)
    }

    /// Deletes the stored task through the undo slot. A new draft is only
    /// discarded.
    pub fn delete<R: TaskRepository>(
        &mut self,
        service: &mut TaskService<R>,
    ) -> TaskServiceResult<Option<Task>> {
        if self.deleted {
            return Ok(None);
        }
        let removed = if self.persisted {
            Some(service.delete_task(self.draft.id)?)
        } else {
            None
        };
        self.deleted = true;
        Ok(removed)
    }
}

#[derive(Debug, Clone)]
pub struct MindMapEditor {
    draft: MindMap,
    persisted: bool,
    dirty: bool,
    deleted: bool,
}

impl MindMapEditor {
    pub fn open<M: MindMapRepository, T: TaskRepository>(
        target: EditTarget,
        service: &MindMapService<M, T>,
    ) -> MindMapServiceResult<Self> {
        match target {
            EditTarget::New => Ok(Self::new_mind_map()),
            EditTarget::Existing(id) => service
                .get_mind_map(id)?
                .map(Self::edit)
                .ok_or(MindMapServiceError::MindMapNotFound(id)),
        }
    }

    pub fn new_mind_map() -> Self {
        Self {
            draft: MindMap::new(),
            persisted: false,
            dirty: false,
            deleted: false,
        }
    }

    pub fn edit(mind_map: MindMap) -> Self {
        Self {
            draft: mind_map,
            persisted: true,
            dirty: false,
            deleted: false,
        }
    }

    pub fn draft(&self) -> &MindMap {
        &self.draft
    }

    pub fn id(&self) -> MindMapId {
        self.draft.id
    }

    pub fn is_editing(&self) -> bool {
        self.persisted
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn is_auto_save_needed(&self) -> bool {
        self.dirty && !self.deleted
    }

    pub fn set_title(&mut self, title: &str) {
        let value = non_blank(title);
        self.dirty |= replace(&mut self.draft.title, value);
    }

    pub fn set_description(&mut self, description: &str) {
        let value = non_blank(description);
        self.dirty |= replace(&mut self.draft.description, value);
    }

    pub fn set_color(&mut self, color: Option<u32>) {
        self.dirty |= replace(&mut self.draft.color, color);
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.dirty |= replace(&mut self.draft.x, x);
        self.dirty |= replace(&mut self.draft.y, y);
    }

    pub fn set_completed(&mut self, is_completed: bool) {
        self.dirty |= replace(&mut self.draft.is_completed, is_completed);
    }

    /// Resolves the link preview for the first URL in the description.
    ///
    /// Display state only; does not mark the session dirty.
    pub fn refresh_preview<F: PageFetcher>(
        &mut self,
        previews: &mut LinkPreviewService<F>,
        settings: &AppSettings,
    ) -> Option<&OgpPreview> {
        self.draft.ogp_preview = match self.draft.description.as_deref() {
            Some(text) => previews.preview_for_text(text, settings.show_ogp_preview),
            None => None,
        };
        self.draft.ogp_preview.as_ref()
    }

    pub fn save<M: MindMapRepository, T: TaskRepository>(
        &mut self,
        service: &MindMapService<M, T>,
    ) -> MindMapServiceResult<MindMap> {
        if self.deleted {
            return Err(MindMapServiceError::MindMapNotFound(self.draft.id));
        }
        let mut stored = if self.persisted {
            service.update_mind_map(&self.draft)?
        } else {
            service.create_mind_map(&self.draft)?
        };
        stored.ogp_preview = self.draft.ogp_preview.take();
        self.draft = stored.clone();
        self.persisted = true;
        self.dirty = false;
        Ok(stored)
    }

    pub fn leave<M: MindMapRepository, T: TaskRepository>(
        &mut self,
        service: &MindMapService<M, T>,
    ) -> MindMapServiceResult<Option<MindMap>> {
        if !self.is_auto_save_needed() {
            return Ok(None);
        }
        self.save(service).map(Some)
    }

    /// Deletes the stored mind map and its tasks. Returns the number of
    /// tasks removed, or `None` for a discarded new draft.
    pub fn delete<M: MindMapRepository, T: TaskRepository>(
        &mut self,
        service: &MindMapService<M, T>,
    ) -> MindMapServiceResult<Option<usize>> {
        if self.deleted {
            return Ok(None);
        }
        let removed = if self.persisted {
            Some(service.delete_mind_map(self.draft.id)?)
        } else {
            None
        };
        self.deleted = true;
        Ok(removed)
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Writes `value` into `slot`; true when it differed.
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use super::{MindMapEditor, TaskEditor};
    use crate::model::task::{Task, TaskStatus};
    use uuid::Uuid;

    #[test]
    fn setters_mark_dirty_only_on_change() {
        let mut task = Task::titled("write report");
        task.status = TaskStatus::Open;
        let mut editor = TaskEditor::edit(task);

        editor.set_title("write report");
        editor.set_status(TaskStatus::Open);
        assert!(!editor.is_auto_save_needed());

        editor.set_title("write final report");
        assert!(editor.is_auto_save_needed());
    }

    #[test]
    fn blank_text_clears_field() {
        let mut editor = TaskEditor::edit(Task::titled("x"));
        editor.set_title("   ");
        assert_eq!(editor.draft().title, None);
    }

    #[test]
    fn child_of_inherits_mind_map_and_depth() {
        let mut parent = Task::titled("parent");
        parent.mind_map_id = Some(Uuid::new_v4());
        parent.hierarchy = Some(2);

        let editor = TaskEditor::child_of(&parent);
        let draft = editor.draft();
        assert_eq!(draft.mind_map_id, parent.mind_map_id);
        assert_eq!(draft.parent_task_id, Some(parent.id));
        assert_eq!(draft.hierarchy, Some(3));
        assert_eq!(draft.status, TaskStatus::Open);
        assert!(!editor.is_editing());
        assert!(editor.is_auto_save_needed());
    }

    #[test]
    fn new_mind_map_is_clean_until_edited() {
        let mut editor = MindMapEditor::new_mind_map();
        assert!(!editor.is_auto_save_needed());
        editor.set_position(10.0, -4.5);
        assert!(editor.is_auto_save_needed());
        editor.set_completed(false);
        assert_eq!(editor.draft().x, 10.0);
    }
}
