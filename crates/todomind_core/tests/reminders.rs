use std::cell::RefCell;
use todomind_core::{
    AppSettings, ReminderError, ReminderPlan, ReminderScheduler, ReminderService, Task, TaskId,
    TaskStatus,
};

const NOW: i64 = 1_700_000_000_000;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Schedule(TaskId, i64),
    Cancel(TaskId),
}

#[derive(Default)]
struct RecordingScheduler {
    calls: RefCell<Vec<Call>>,
    fail: bool,
}

impl ReminderScheduler for RecordingScheduler {
    fn schedule(&self, task_id: TaskId, at_epoch_ms: i64) -> Result<(), ReminderError> {
        self.calls
            .borrow_mut()
            .push(Call::Schedule(task_id, at_epoch_ms));
        if self.fail {
            return Err(ReminderError("alarm service unavailable".to_string()));
        }
        Ok(())
    }

    fn cancel(&self, task_id: TaskId) -> Result<(), ReminderError> {
        self.calls.borrow_mut().push(Call::Cancel(task_id));
        if self.fail {
            return Err(ReminderError("alarm service unavailable".to_string()));
        }
        Ok(())
    }
}

#[test]
fn due_task_is_scheduled_then_cancelled_once_complete() {
    let service = ReminderService::new(RecordingScheduler::default());
    let settings = AppSettings::default();
    let mut task = Task::titled("submit form");
    task.due_at = Some(NOW + 3_600_000);

    let plan = service.sync_task_at(&task, &settings, NOW);
    assert_eq!(
        plan,
        ReminderPlan::Schedule {
            task_id: task.id,
            at_epoch_ms: NOW + 3_600_000
        }
    );

    task.status = TaskStatus::Complete;
    service.sync_task_at(&task, &settings, NOW);

    assert_eq!(
        *service.scheduler().calls.borrow(),
        vec![
            Call::Schedule(task.id, NOW + 3_600_000),
            Call::Cancel(task.id)
        ]
    );
}

#[test]
fn disabled_reminders_cancel() {
    let service = ReminderService::new(RecordingScheduler::default());
    let settings = AppSettings {
        remind_task_deadline: false,
        ..AppSettings::default()
    };
    let mut task = Task::titled("quiet");
    task.due_at = Some(NOW + 1_000);

    assert_eq!(
        service.sync_task_at(&task, &settings, NOW),
        ReminderPlan::Cancel(task.id)
    );
}

#[test]
fn scheduler_failures_are_swallowed() {
    let service = ReminderService::new(RecordingScheduler {
        fail: true,
        ..RecordingScheduler::default()
    });
    let mut task = Task::titled("flaky");
    task.due_at = Some(NOW + 1_000);

    let plan = service.sync_task_at(&task, &AppSettings::default(), NOW);
    assert!(matches!(plan, ReminderPlan::Schedule { .. }));

    service.cancel_task(task.id);
    assert_eq!(service.scheduler().calls.borrow().len(), 2);
}
