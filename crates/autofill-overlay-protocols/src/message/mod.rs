//! Closed message enums for every cross-context channel.
//!
//! - [`ExtensionMessage`]: content script -> background (runtime messaging)
//! - [`ContentMessage`]: background -> content script
//! - [`PortMessage`]: background -> inline menu iframe bridge (named port)
//! - [`WindowMessage`]: frame -> parent frame (`window.postMessage`)

mod content;
mod extension;
mod port;
mod window;

pub use content::*;
pub use extension::*;
pub use port::*;
pub use window::*;

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
