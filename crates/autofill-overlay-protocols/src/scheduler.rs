//! Durable task scheduler interface.
//!
//! The overlay engine never owns long-lived alarms. Features that need them
//! (clipboard clearing, sync, session timeouts) go through [`TaskScheduler`],
//! whose implementation decides how tasks survive a process restart.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// Callback fired when a scheduled task elapses.
pub type TaskHandler = Arc<dyn Fn() + Send + Sync>;

/// Every task name a scheduler may be asked to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScheduledTaskName {
    ClearClipboardTimeout,
    SystemClearClipboardTimeout,
    ScheduleNextSyncTimeout,
    LoginStrategySessionTimeout,
    NotificationsReconnectTimeout,
    Fido2ClientAbortTimeout,
    EventUploadsInterval,
}

impl ScheduledTaskName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduledTaskName::ClearClipboardTimeout => "clearClipboardTimeout",
            ScheduledTaskName::SystemClearClipboardTimeout => "systemClearClipboardTimeout",
            ScheduledTaskName::ScheduleNextSyncTimeout => "scheduleNextSyncTimeout",
            ScheduledTaskName::LoginStrategySessionTimeout => "loginStrategySessionTimeout",
            ScheduledTaskName::NotificationsReconnectTimeout => "notificationsReconnectTimeout",
            ScheduledTaskName::Fido2ClientAbortTimeout => "fido2ClientAbortTimeout",
            ScheduledTaskName::EventUploadsInterval => "eventUploadsInterval",
        }
    }
}

impl fmt::Display for ScheduledTaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle returned by `set_timeout`/`set_interval`, used to clear the task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskIdentifier {
    pub task_name: Option<ScheduledTaskName>,
    pub timeout_id: Option<u64>,
    pub interval_id: Option<u64>,
}

/// How an alarm was created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmCreateInfo {
    pub delay_ms: Option<u64>,
    pub period_ms: Option<u64>,
}

/// Recovery ledger entry for a live task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveAlarmRecord {
    pub name: ScheduledTaskName,
    pub start_time: DateTime<Utc>,
    pub create_info: AlarmCreateInfo,
}

/// Named one-shot and recurring tasks.
///
/// Handlers are registered by name up front; scheduling looks the handler up
/// when the task fires, so a scheduler restored after a restart can re-run
/// tasks as soon as their owner re-registers.
#[async_trait]
pub trait TaskScheduler: Send + Sync {
    /// Register (or overwrite) the handler for `name`.
    fn register_task_handler(&self, name: ScheduledTaskName, handler: TaskHandler);

    fn unregister_task_handler(&self, name: ScheduledTaskName);

    async fn set_timeout(
        &self,
        name: ScheduledTaskName,
        delay: Duration,
    ) -> Result<TaskIdentifier, SchedulerError>;

    async fn set_interval(
        &self,
        name: ScheduledTaskName,
        interval: Duration,
        initial_delay: Option<Duration>,
    ) -> Result<TaskIdentifier, SchedulerError>;

    async fn clear_scheduled_task(&self, identifier: &TaskIdentifier);

    /// Snapshot of the tasks currently pending.
    fn active_alarms(&self) -> Vec<ActiveAlarmRecord>;
}
