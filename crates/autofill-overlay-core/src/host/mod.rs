//! In-memory host implementations.
//!
//! Each type records what the engine asked of it, so tests and the scenario
//! runner can assert on listener counts, focus calls and outbound messages.

mod memory_document;
mod memory_frame;
mod memory_port;
mod memory_window;
mod qualifier;
mod recording_messenger;

pub use memory_document::MemoryDocument;
pub use memory_frame::MemoryFrame;
pub use memory_port::{MemoryPort, MemoryPortConnector};
pub use memory_window::MemoryWindow;
pub use qualifier::ExcludedTypesQualifier;
pub use recording_messenger::RecordingMessenger;
