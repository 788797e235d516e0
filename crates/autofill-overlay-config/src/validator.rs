//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::OverlayConfig;

/// Depth above which nesting is almost certainly hostile.
const DEPTH_WARNING_THRESHOLD: u32 = 32;

/// Delays above this are reported as suspicious.
const WINDOW_WARNING_MS: u64 = 10_000;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Collapse into the first error, for callers that refuse invalid config.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &OverlayConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_sub_frame(config, &mut result);
        Self::validate_sentinel(config, &mut result);
        Self::validate_timing(config, &mut result);
        Self::validate_iframe(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_sub_frame(config: &OverlayConfig, result: &mut ValidationResult) {
        let depth = config.sub_frame.max_depth;
        if depth == 0 {
            result.add_error(ValidationError::new(
                "sub_frame.max_depth",
                "max_depth must be greater than 0",
            ));
        } else if depth > DEPTH_WARNING_THRESHOLD {
            result.add_warning(ValidationWarning::new(
                "sub_frame.max_depth",
                format!(
                    "max_depth {} is above {}, deeply nested frames are rarely legitimate",
                    depth, DEPTH_WARNING_THRESHOLD
                ),
            ));
        }
    }

    fn validate_sentinel(config: &OverlayConfig, result: &mut ValidationResult) {
        let sentinel = &config.sentinel;
        if sentinel.max_observer_iterations == 0 {
            result.add_error(ValidationError::new(
                "sentinel.max_observer_iterations",
                "max_observer_iterations must be greater than 0",
            ));
        }
        if sentinel.max_foreign_mutations == 0 {
            result.add_error(ValidationError::new(
                "sentinel.max_foreign_mutations",
                "max_foreign_mutations must be greater than 0",
            ));
        }
        Self::check_window("sentinel.counter_reset_ms", sentinel.counter_reset_ms, result);
    }

    fn validate_timing(config: &OverlayConfig, result: &mut ValidationResult) {
        let timing = &config.timing;
        let delays = [
            ("timing.fade_in_delay_ms", timing.fade_in_delay_ms),
            ("timing.aria_announce_delay_ms", timing.aria_announce_delay_ms),
            ("timing.delayed_closure_ms", timing.delayed_closure_ms),
            ("timing.list_focus_delay_ms", timing.list_focus_delay_ms),
            (
                "timing.redirect_focus_close_delay_ms",
                timing.redirect_focus_close_delay_ms,
            ),
        ];
        for (path, value) in delays {
            Self::check_window(path, value, result);
        }
    }

    fn validate_iframe(config: &OverlayConfig, result: &mut ValidationResult) {
        if config.iframe.menu_path.trim().is_empty() {
            result.add_error(ValidationError::new(
                "iframe.menu_path",
                "menu_path cannot be empty",
            ));
        }
    }

    fn validate_logging(config: &OverlayConfig, result: &mut ValidationResult) {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&config.logging.level.as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!(
                    "'{}' is not a plain level, it will be used as a filter directive",
                    config.logging.level
                ),
            ));
        }
    }

    fn check_window(path: &str, value: u64, result: &mut ValidationResult) {
        if value == 0 {
            result.add_error(ValidationError::new(path, "must be greater than 0"));
        } else if value > WINDOW_WARNING_MS {
            result.add_warning(ValidationWarning::new(
                path,
                format!("{}ms is unusually long (>{}ms)", value, WINDOW_WARNING_MS),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
