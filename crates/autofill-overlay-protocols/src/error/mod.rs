//! Error types for the overlay protocol layer.

mod channel;
mod dom;
mod scheduler;

pub use channel::*;
pub use dom::*;
pub use scheduler::*;
