//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record shown in lists and mind-map nodes.
//! - Own the status text encoding and its lenient decode path.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `parent_task_id` never points at the task itself.
//! - Persisted status text is the enum name (`InProgress|Open|Complete`).
//! - Unknown status text decodes to `TaskStatus::InProgress`, both from
//!   rows and from serialized records.

use crate::model::mind_map::MindMapId;
use crate::model::now_epoch_ms;
use log::error;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable task identifier.
pub type TaskId = Uuid;

/// Three fixed status buckets. No custom statuses exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    InProgress,
    Open,
    Complete,
}

impl TaskStatus {
    /// All statuses in tab order.
    pub const ALL: [TaskStatus; 3] = [Self::InProgress, Self::Open, Self::Complete];

    /// Enum-name text used for persistence.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "InProgress",
            Self::Open => "Open",
            Self::Complete => "Complete",
        }
    }

    /// Decodes persisted status text.
    ///
    /// Never fails: unknown values (corrupt rows, schema drift) fall back to
    /// `InProgress` and emit an error log line.
    pub fn decode(value: &str) -> Self {
        match value.parse() {
            Ok(status) => status,
            Err(err) => {
                error!(
                    "event=task_status_decode module=model status=fallback fallback=InProgress error={}",
                    err
                );
                Self::InProgress
            }
        }
    }
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<TaskStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    Ok(TaskStatus::decode(&text))
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::InProgress
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict status parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTaskStatus(pub String);

impl Display for UnknownTaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown task status `{}`", self.0)
    }
}

impl Error for UnknownTaskStatus {}

impl FromStr for TaskStatus {
    type Err = UnknownTaskStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "InProgress" => Ok(Self::InProgress),
            "Open" => Ok(Self::Open),
            "Complete" => Ok(Self::Complete),
            other => Err(UnknownTaskStatus(other.to_string())),
        }
    }
}

/// Validation errors for task writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Task names itself as parent.
    SelfParent(TaskId),
    /// Hierarchy depth is negative.
    NegativeHierarchy(i64),
    /// Node coordinate is NaN or infinite.
    NonFiniteCoordinate,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfParent(id) => write!(f, "task cannot be its own parent: {id}"),
            Self::NegativeHierarchy(depth) => {
                write!(f, "task hierarchy must be non-negative, got {depth}")
            }
            Self::NonFiniteCoordinate => write!(f, "task node coordinates must be finite"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Owning mind map. A task without one only shows in the task list.
    pub mind_map_id: Option<MindMapId>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Bumped on every persisted update.
    pub updated_at: i64,
    /// Unix epoch milliseconds.
    pub due_at: Option<i64>,
    /// Depth inside the mind-map tree. Root-level nodes are `1`.
    pub hierarchy: Option<i64>,
    pub parent_task_id: Option<TaskId>,
    pub position: Option<i64>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    /// Manual sort key; lists are displayed descending by this value.
    pub reversed_order: i64,
    /// ARGB color.
    pub color: Option<u32>,
    /// Deserialized through [`TaskStatus::decode`], so unknown text reads
    /// as `InProgress` here too.
    #[serde(deserialize_with = "deserialize_status")]
    pub status: TaskStatus,
}

impl Task {
    /// Creates a new task with a generated id and `InProgress` status.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates a new task with a caller-provided id.
    pub fn with_id(id: TaskId) -> Self {
        let now = now_epoch_ms();
        Self {
            id,
            mind_map_id: None,
            title: None,
            description: None,
            created_at: now,
            updated_at: now,
            due_at: None,
            hierarchy: None,
            parent_task_id: None,
            position: None,
            x: None,
            y: None,
            reversed_order: 0,
            color: None,
            status: TaskStatus::InProgress,
        }
    }

    /// Convenience builder used by list-style creation flows.
    pub fn titled(title: impl Into<String>) -> Self {
        let mut task = Self::new();
        task.title = Some(title.into());
        task
    }

    /// Validates single-record invariants.
    ///
    /// Cross-record invariants (same mind map as parent, acyclic tree) are
    /// checked by `TaskService`, which can see sibling records.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.parent_task_id == Some(self.id) {
            return Err(TaskValidationError::SelfParent(self.id));
        }
        if let Some(depth) = self.hierarchy {
            if depth < 0 {
                return Err(TaskValidationError::NegativeHierarchy(depth));
            }
        }
        let non_finite = [self.x, self.y]
            .into_iter()
            .flatten()
            .any(|value| !value.is_finite());
        if non_finite {
            return Err(TaskValidationError::NonFiniteCoordinate);
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.status == TaskStatus::Complete
    }
}

impl Default for Task {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskStatus, TaskValidationError};

    #[test]
    fn decode_accepts_enum_names() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::decode(status.as_str()), status);
        }
    }

    #[test]
    fn decode_falls_back_to_in_progress() {
        for value in ["", "open", "Done", "COMPLETE", " Open", "\u{0}"] {
            assert_eq!(TaskStatus::decode(value), TaskStatus::InProgress);
        }
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        let err = "closed".parse::<TaskStatus>().unwrap_err();
        assert!(err.to_string().contains("closed"));
    }

    #[test]
    fn validate_rejects_self_parent() {
        let mut task = Task::new();
        task.parent_task_id = Some(task.id);
        assert_eq!(task.validate(), Err(TaskValidationError::SelfParent(task.id)));
    }

    #[test]
    fn validate_rejects_nan_coordinates() {
        let mut task = Task::new();
        task.x = Some(f32::NAN);
        assert_eq!(task.validate(), Err(TaskValidationError::NonFiniteCoordinate));
    }
}
