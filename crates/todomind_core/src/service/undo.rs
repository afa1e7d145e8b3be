//! Single-slot holder for the most recently deleted task.
//!
//! # Invariants
//! - At most one task is pending undo. Holding a second one displaces the
//!   first, which the caller must then finalize.
//! - A held task is restorable only within the undo window.

use crate::model::task::Task;
use std::time::{Duration, Instant};

/// How long the "undo" affordance stays actionable after a delete.
pub const DEFAULT_UNDO_WINDOW: Duration = Duration::from_secs(4);

#[derive(Debug, Clone)]
struct PendingDelete {
    task: Task,
    deleted_at: Instant,
}

/// Result of trying to take the pending task back.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoOutcome {
    /// Still inside the window; the caller should restore it.
    Restorable(Task),
    /// Window passed; the deletion is final.
    Expired(Task),
    Empty,
}

#[derive(Debug, Clone)]
pub struct UndoSlot {
    pending: Option<PendingDelete>,
    window: Duration,
}

impl UndoSlot {
    pub fn new(window: Duration) -> Self {
        Self {
            pending: None,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Holds `task`, returning the task it displaced, if any.
    pub fn hold(&mut self, task: Task) -> Option<Task> {
        self.hold_at(task, Instant::now())
    }

    pub fn hold_at(&mut self, task: Task, deleted_at: Instant) -> Option<Task> {
        self.pending
            .replace(PendingDelete { task, deleted_at })
            .map(|displaced| displaced.task)
    }

    pub fn pending(&self) -> Option<&Task> {
        self.pending.as_ref().map(|pending| &pending.task)
    }

    pub fn take(&mut self) -> UndoOutcome {
        self.take_at(Instant::now())
    }

    /// Empties the slot and reports whether the task was still restorable
    /// at `now`.
    pub fn take_at(&mut self, now: Instant) -> UndoOutcome {
        match self.pending.take() {
            None => UndoOutcome::Empty,
            Some(pending) if now.saturating_duration_since(pending.deleted_at) <= self.window => {
                UndoOutcome::Restorable(pending.task)
            }
            Some(pending) => UndoOutcome::Expired(pending.task),
        }
    }

    /// Empties the slot without restoring.
    pub fn clear(&mut self) -> Option<Task> {
        self.pending.take().map(|pending| pending.task)
    }
}

impl Default for UndoSlot {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_WINDOW)
    }
}
