//! In-process [`TaskScheduler`] on tokio timers.
//!
//! Tasks are keyed by a monotonically increasing id. Each live task keeps its
//! [`ActiveAlarmRecord`] next to the [`ScheduledTask`] that runs it, so
//! `active_alarms` is always an exact view of what is still pending.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use autofill_overlay_protocols::{
    ActiveAlarmRecord, AlarmCreateInfo, ScheduledTaskName, SchedulerError, TaskHandler,
    TaskIdentifier, TaskScheduler,
};
use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::timer::ScheduledTask;

type HandlerTable = Arc<Mutex<HashMap<ScheduledTaskName, TaskHandler>>>;
type TaskTable = Arc<Mutex<HashMap<u64, (ActiveAlarmRecord, ScheduledTask)>>>;

#[derive(Default)]
pub struct DefaultTaskScheduler {
    handlers: HandlerTable,
    tasks: TaskTable,
    next_id: AtomicU64,
}

fn fire(handlers: &HandlerTable, name: ScheduledTaskName) {
    let handler = handlers.lock().get(&name).cloned();
    match handler {
        Some(handler) => {
            debug!(task = %name, "Running scheduled task");
            handler();
        }
        None => warn!(task = %name, "Scheduled task fired without a handler"),
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl DefaultTaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_registered(&self, name: ScheduledTaskName) -> Result<(), SchedulerError> {
        if self.handlers.lock().contains_key(&name) {
            Ok(())
        } else {
            Err(SchedulerError::HandlerNotRegistered(name.to_string()))
        }
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Number of tasks still pending.
    pub fn pending_count(&self) -> usize {
        self.tasks.lock().len()
    }
}

#[async_trait]
impl TaskScheduler for DefaultTaskScheduler {
    fn register_task_handler(&self, name: ScheduledTaskName, handler: TaskHandler) {
        if self.handlers.lock().insert(name, handler).is_some() {
            warn!(task = %name, "Overwriting registered task handler");
        }
    }

    fn unregister_task_handler(&self, name: ScheduledTaskName) {
        self.handlers.lock().remove(&name);
    }

    async fn set_timeout(
        &self,
        name: ScheduledTaskName,
        delay: Duration,
    ) -> Result<TaskIdentifier, SchedulerError> {
        self.ensure_registered(name)?;
        let id = self.allocate_id();
        let record = ActiveAlarmRecord {
            name,
            start_time: Utc::now(),
            create_info: AlarmCreateInfo {
                delay_ms: Some(millis(delay)),
                period_ms: None,
            },
        };

        let handlers = self.handlers.clone();
        let tasks = self.tasks.clone();
        // Hold the table lock so a zero delay cannot fire before the record is stored.
        let mut table = self.tasks.lock();
        let task = ScheduledTask::after("scheduler-timeout", delay, move || {
            let finished = tasks.lock().remove(&id);
            fire(&handlers, name);
            drop(finished);
        });
        table.insert(id, (record, task));
        debug!(task = %name, id, delay_ms = millis(delay), "Timeout scheduled");

        Ok(TaskIdentifier {
            task_name: Some(name),
            timeout_id: Some(id),
            interval_id: None,
        })
    }

    async fn set_interval(
        &self,
        name: ScheduledTaskName,
        interval: Duration,
        initial_delay: Option<Duration>,
    ) -> Result<TaskIdentifier, SchedulerError> {
        self.ensure_registered(name)?;
        if interval.is_zero() {
            return Err(SchedulerError::ZeroInterval(name.to_string()));
        }
        let id = self.allocate_id();
        let initial_delay = initial_delay.unwrap_or(interval);
        let record = ActiveAlarmRecord {
            name,
            start_time: Utc::now(),
            create_info: AlarmCreateInfo {
                delay_ms: Some(millis(initial_delay)),
                period_ms: Some(millis(interval)),
            },
        };

        let handlers = self.handlers.clone();
        let task = ScheduledTask::every("scheduler-interval", initial_delay, interval, move || {
            fire(&handlers, name)
        });
        self.tasks.lock().insert(id, (record, task));
        debug!(task = %name, id, period_ms = millis(interval), "Interval scheduled");

        Ok(TaskIdentifier {
            task_name: Some(name),
            timeout_id: None,
            interval_id: Some(id),
        })
    }

    async fn clear_scheduled_task(&self, identifier: &TaskIdentifier) {
        let removed: Vec<_> = {
            let mut tasks = self.tasks.lock();
            [identifier.timeout_id, identifier.interval_id]
                .into_iter()
                .flatten()
                .filter_map(|id| tasks.remove(&id))
                .collect()
        };
        for (record, _task) in removed {
            debug!(task = %record.name, "Scheduled task cleared");
        }
    }

    fn active_alarms(&self) -> Vec<ActiveAlarmRecord> {
        let mut alarms: Vec<ActiveAlarmRecord> = self
            .tasks
            .lock()
            .values()
            .map(|(record, _)| record.clone())
            .collect();
        alarms.sort_by_key(|record| record.start_time);
        alarms
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
