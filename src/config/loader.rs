//! Configuration Loader
//!
//! Environment-aware configuration loading. Layers, later wins:
//! 1. built-in defaults
//! 2. `config/sentinel.toml`
//! 3. `config/sentinel.{SENTINEL_ENV}.toml`
//! 4. environment variables `SENTINEL__SECTION__KEY`

use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::SentinelConfig;
use crate::error::{Result, SentinelError};

const ENV_PREFIX: &str = "SENTINEL";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the default `config/` directory
    pub fn load() -> Result<SentinelConfig> {
        Self::load_from_directory(&PathBuf::from("config"), &Self::detect_environment())
    }

    /// Load configuration from a specific directory with an explicit environment
    pub fn load_from_directory(config_dir: &Path, environment: &str) -> Result<SentinelConfig> {
        debug!(
            environment = %environment,
            config_dir = %config_dir.display(),
            "Loading sentinel configuration"
        );

        let base = config_dir.join("sentinel.toml");
        let overrides = config_dir.join(format!("sentinel.{environment}.toml"));

        let builder = Self::defaults_builder()?
            .add_source(Self::toml_source(&base).required(false))
            .add_source(Self::toml_source(&overrides).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: SentinelConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        debug!(?config, "Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from a single file, defaults filling any gaps
    pub fn from_file(path: &Path) -> Result<SentinelConfig> {
        if !path.exists() {
            return Err(SentinelError::ConfigurationError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let config: SentinelConfig = Self::defaults_builder()?
            .add_source(Self::toml_source(path))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Current environment from `SENTINEL_ENV`, then `APP_ENV`, default "development"
    pub fn detect_environment() -> String {
        env::var("SENTINEL_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
    }

    fn toml_source(path: &Path) -> config::File<config::FileSourceFile, config::FileFormat> {
        config::File::new(&path.to_string_lossy(), config::FileFormat::Toml)
    }

    fn defaults_builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = config::Config::try_from(&SentinelConfig::default())?;
        Ok(config::Config::builder().add_source(defaults))
    }
}
