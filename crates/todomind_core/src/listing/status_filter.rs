//! Status tab filtering and progress.

use crate::model::mind_map::MindMapId;
use crate::model::task::{Task, TaskStatus};

/// Tab shown above task lists, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTab {
    pub index: usize,
    pub status: TaskStatus,
    pub label: &'static str,
}

pub const STATUS_TABS: [StatusTab; 3] = [
    StatusTab {
        index: 0,
        status: TaskStatus::InProgress,
        label: "In Progress",
    },
    StatusTab {
        index: 1,
        status: TaskStatus::Open,
        label: "Open",
    },
    StatusTab {
        index: 2,
        status: TaskStatus::Complete,
        label: "Closed",
    },
];

impl StatusTab {
    pub fn for_status(status: TaskStatus) -> StatusTab {
        match status {
            TaskStatus::InProgress => STATUS_TABS[0],
            TaskStatus::Open => STATUS_TABS[1],
            TaskStatus::Complete => STATUS_TABS[2],
        }
    }

    pub fn at(index: usize) -> Option<StatusTab> {
        STATUS_TABS.get(index).copied()
    }
}

/// Tasks whose status equals `status`, in input order.
pub fn filter_by_status<'a>(
    status: TaskStatus,
    tasks: impl IntoIterator<Item = &'a Task>,
) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|task| task.status == status)
        .cloned()
        .collect()
}

/// Tasks owned by one mind map, in input order.
pub fn filter_by_mind_map<'a>(
    mind_map_id: MindMapId,
    tasks: impl IntoIterator<Item = &'a Task>,
) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|task| task.mind_map_id == Some(mind_map_id))
        .cloned()
        .collect()
}

/// Percentage (0..=100) of complete tasks; `0.0` for no tasks.
pub fn progress_rate(tasks: &[Task]) -> f32 {
    if tasks.is_empty() {
        return 0.0;
    }
    let complete = tasks.iter().filter(|task| task.is_complete()).count();
    complete as f32 * 100.0 / tasks.len() as f32
}
