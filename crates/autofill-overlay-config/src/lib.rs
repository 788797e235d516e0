//! # Autofill Overlay Config
//!
//! Tunables of the inline-menu overlay engine: sub-frame depth bound, tamper
//! thresholds, animation and debounce delays, and logging.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
