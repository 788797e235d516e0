//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::OverlayConfig;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<OverlayConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<OverlayConfig, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: OverlayConfig = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// `~/.autofill-overlay/config.toml`, if a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".autofill-overlay").join("config.toml"))
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        let mut result = content.to_string();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.autofill-overlay`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.sub_frame.max_depth, 8);
        assert_eq!(config.sentinel.max_observer_iterations, 20);
    }

    #[test]
    fn test_load_partial_section() {
        let content = r#"
            [sentinel]
            max_foreign_mutations = 4
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.sentinel.max_foreign_mutations, 4);
        assert_eq!(config.sentinel.max_observer_iterations, 20);
        assert_eq!(config.sentinel.counter_reset_ms, 2000);
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [sub_frame]
            max_depth = 3

            [timing]
            fade_in_delay_ms = 20
            delayed_closure_ms = 250

            [iframe]
            menu_path = "menu/list.html"

            [logging]
            level = "debug"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.sub_frame.max_depth, 3);
        assert_eq!(config.timing.fade_in_delay_ms, 20);
        assert_eq!(config.timing.delayed_closure_ms, 250);
        assert_eq!(config.timing.list_focus_delay_ms, 150);
        assert_eq!(config.iframe.menu_path, "menu/list.html");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_shipped_default_config_is_valid() {
        let config =
            ConfigLoader::load_str(include_str!("../../../config/default.toml")).unwrap();
        assert!(crate::ConfigValidator::validate(&config).is_valid());
        assert_eq!(config.iframe.menu_path, "overlay/menu.html");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[sub_frame]").unwrap();
        writeln!(file, "max_depth = 5").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.sub_frame.max_depth, 5);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/overlay.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("max_depth = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("OVERLAY_TEST_LOG_DIR", "/var/log/overlay");
        }
        let content = "[logging]\ndirectory = \"${OVERLAY_TEST_LOG_DIR}\"";
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.logging.directory, "/var/log/overlay");
        unsafe {
            std::env::remove_var("OVERLAY_TEST_LOG_DIR");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_OVERLAY_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(name)) if name == "NONEXISTENT_OVERLAY_VAR_12345"));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/logs");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/logs"));
    }

    #[test]
    fn test_expand_path_no_tilde() {
        assert_eq!(ConfigLoader::expand_path("/tmp/logs"), "/tmp/logs");
    }
}
