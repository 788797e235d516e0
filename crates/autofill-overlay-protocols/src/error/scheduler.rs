//! Task scheduler errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Task handler for {0} not registered. Unable to schedule task.")]
    HandlerNotRegistered(String),

    #[error("Interval for {0} must be greater than zero.")]
    ZeroInterval(String),
}
