//! Shared value types.

mod dom;
mod field;
mod frame;
mod geometry;
mod menu;

pub use dom::*;
pub use field::*;
pub use frame::*;
pub use geometry::*;
pub use menu::*;

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
