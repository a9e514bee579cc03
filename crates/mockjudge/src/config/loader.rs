//! Configuration file loading for mockjudge
//!
//! Handles loading and parsing configuration files using the config crate.

use std::path::Path;

use config::{Config as ConfigBuilder, File, FileFormat};

use crate::config::{Config, ConfigError};

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::ReadFile {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }

        let config = ConfigBuilder::builder()
            .add_source(File::from(path))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let config = ConfigBuilder::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeouts.compile_ms == 0 {
            return Err(ConfigError::Invalid(
                "timeouts.compile_ms must be greater than zero".to_owned(),
            ));
        }
        if self.timeouts.run_ms == 0 {
            return Err(ConfigError::Invalid(
                "timeouts.run_ms must be greater than zero".to_owned(),
            ));
        }

        for (id, toolchain) in &self.toolchains {
            let programs = [("compiler", &toolchain.compiler), ("runtime", &toolchain.runtime)];
            for (field, program) in programs {
                if program.as_deref().is_some_and(|p| p.trim().is_empty()) {
                    return Err(ConfigError::Invalid(format!(
                        "toolchain '{id}' has empty {field}"
                    )));
                }
            }
        }

        Ok(())
    }
}
