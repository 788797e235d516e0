//! # Autofill Overlay Protocols
//!
//! Shared definitions for the inline-menu overlay engine.
//! Contains only types and interface definitions - no behavior.
//!
//! ## Host Traits
//!
//! - [`Document`] - DOM access for one frame
//! - [`Window`] - Window-level facilities of one frame (parent/iframe messaging, media queries)
//! - [`ExtensionMessenger`] - Runtime messaging to the background process
//! - [`PortConnector`] / [`Port`] - Long-lived named channels to the background process
//! - [`FieldQualifier`] - External field-detection heuristics
//! - [`TaskScheduler`] - External durable alarm scheduler

pub mod error;
pub mod host;
pub mod message;
pub mod scheduler;
pub mod types;

pub use error::{ChannelError, DomError, SchedulerError};
pub use host::{Document, ExtensionMessenger, FieldQualifier, Port, PortConnector, Window};
pub use message::{
    ContentMessage, ContentReply, ExtensionMessage, PortCommand, PortMessage, RedirectFocusData,
    VisibilityData, WindowMessage, WindowMessageEvent,
};
pub use scheduler::{
    ActiveAlarmRecord, AlarmCreateInfo, ScheduledTaskName, TaskHandler, TaskIdentifier,
    TaskScheduler,
};
pub use types::*;
