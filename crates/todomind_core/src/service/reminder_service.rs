//! Deadline reminder planning.
//!
//! # Responsibility
//! - Decide whether a task should have a pending OS reminder.
//! - Drive the host's scheduler through `ReminderScheduler`.
//!
//! # Invariants
//! - One reminder per task id; scheduling again replaces it.
//! - Complete tasks, past deadlines and disabled reminders cancel.
//! - Scheduler failures are logged and do not fail the caller.

use crate::model::now_epoch_ms;
use crate::model::settings::AppSettings;
use crate::model::task::{Task, TaskId};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderError(pub String);

impl Display for ReminderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "reminder scheduler failed: {}", self.0)
    }
}

impl Error for ReminderError {}

/// Host-provided alarm/notification scheduler keyed by task id.
pub trait ReminderScheduler {
    fn schedule(&self, task_id: TaskId, at_epoch_ms: i64) -> Result<(), ReminderError>;
    fn cancel(&self, task_id: TaskId) -> Result<(), ReminderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderPlan {
    Schedule { task_id: TaskId, at_epoch_ms: i64 },
    Cancel(TaskId),
}

/// Pure decision for one task at time `now_ms`.
pub fn plan_reminder(task: &Task, settings: &AppSettings, now_ms: i64) -> ReminderPlan {
    match task.due_at {
        Some(due) if settings.remind_task_deadline && !task.is_complete() && due > now_ms => {
            ReminderPlan::Schedule {
                task_id: task.id,
                at_epoch_ms: due,
            }
        }
        _ => ReminderPlan::Cancel(task.id),
    }
}

pub struct ReminderService<S: ReminderScheduler> {
    scheduler: S,
}

impl<S: ReminderScheduler> ReminderService<S> {
    pub fn new(scheduler: S) -> Self {
        Self { scheduler }
    }

    /// Brings the scheduler in line with `task` after it was saved.
    pub fn sync_task(&self, task: &Task, settings: &AppSettings) -> ReminderPlan {
        self.sync_task_at(task, settings, now_epoch_ms())
    }

    pub fn sync_task_at(&self, task: &Task, settings: &AppSettings, now_ms: i64) -> ReminderPlan {
        let plan = plan_reminder(task, settings, now_ms);
        let result = match plan {
            ReminderPlan::Schedule {
                task_id,
                at_epoch_ms,
            } => self.scheduler.schedule(task_id, at_epoch_ms),
            ReminderPlan::Cancel(task_id) => self.scheduler.cancel(task_id),
        };
        match result {
            Ok(()) => debug!(
                "event=reminder_sync module=reminder status=ok task_id={} plan={}",
                task.id,
                plan_name(&plan)
            ),
            Err(err) => warn!(
                "event=reminder_sync module=reminder status=error task_id={} plan={} error={}",
                task.id,
                plan_name(&plan),
                err
            ),
        }
        plan
    }

    /// Cancels the reminder of a deleted task.
    pub fn cancel_task(&self, task_id: TaskId) {
        if let Err(err) = self.scheduler.cancel(task_id) {
            warn!("event=reminder_cancel module=reminder status=error task_id={task_id} error={err}");
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

fn plan_name(plan: &ReminderPlan) -> &'static str {
    match plan {
        ReminderPlan::Schedule { .. } => "schedule",
        ReminderPlan::Cancel(_) => "cancel",
    }
}
