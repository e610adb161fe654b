//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse configuration from TOML text without validating it.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Read configuration from a TOML file without validating it.
///
/// Callers that apply overrides validate afterwards with [`finalize`].
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Validate a configuration that is about to be used.
pub fn finalize(config: AppConfig) -> Result<AppConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    finalize(read_config(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.store.uri, "memory://");
        assert_eq!(config.pagination.page_size, 10);
    }

    #[test]
    fn test_partial_sections() {
        let config = parse_config(
            r#"
            [store]
            uri = "file:///tmp/crisis-corner/requests.json"

            [pagination]
            page_size = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.store.uri, "file:///tmp/crisis-corner/requests.json");
        assert_eq!(config.store.timeout_ms, 5000);
        assert_eq!(config.pagination.page_size, 25);
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pagination]\npage_size = 0").unwrap();

        match load_config(file.path()) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "pagination.page_size");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pagination\npage_size = ").unwrap();
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_config(Path::new("/nonexistent/crisis-corner.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
