//! # Autofill Overlay Core
//!
//! Per-frame engine behind the autofill inline menu.
//!
//! ## Components
//!
//! - [`StyleGuard`] - Guarded style writes on the menu iframe
//! - [`MutationSentinel`] - Reverts host-page tampering with the menu iframe
//! - [`InlineMenuIframe`] - Frame bridge between the background port and the menu iframe
//! - [`SubFrameLocator`] - Depth-bounded sub-frame offset resolution
//! - [`FrameSession`] - Per-frame field tracking and open/close decisions
//! - [`DefaultTaskScheduler`] - In-process implementation of the durable task scheduler
//!
//! The [`host`] module carries in-memory implementations of every host trait,
//! used by tests and by the scenario runner.

pub mod context;
pub mod host;
pub mod iframe;
pub mod scheduler;
pub mod sentinel;
pub mod session;
pub mod style_guard;
pub mod sub_frame;
pub mod timer;

pub use context::FrameContext;
pub use iframe::{InlineMenuIframe, InlineMenuIframeOptions};
pub use scheduler::DefaultTaskScheduler;
pub use sentinel::{MutationCounters, MutationSentinel, ObserverState, SentinelVerdict};
pub use session::{DomEvent, FrameSession};
pub use style_guard::StyleGuard;
pub use sub_frame::{PositioningOutcome, SubFrameLocator};
pub use timer::ScheduledTask;
