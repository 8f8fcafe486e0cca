//! Configuration management for mycv-backend
//!
//! Settings are read from `config.toml` (optional), overridden by `MYCV_*`
//! environment variables, and fall back to built-in defaults.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::auth::hashing::HASH_LEN;

/// Lookup order for the configuration file (extension is resolved by `config`)
const CONFIG_PATHS: [&str; 2] = [
    "mycv-backend/config", // Container layout: /app/mycv-backend/config.toml
    "config",              // Local development: ./config.toml
];

const ENV_PREFIX: &str = "MYCV";

/// Complete application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(flatten)]
    pub startup: StartupConfig,

    #[serde(flatten)]
    pub hashing: HashingConfig,
}

/// Process-level settings, read once at startup
#[derive(Debug, Deserialize, Clone)]
pub struct StartupConfig {
    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String,

    /// Path of the JSON message store
    pub messages_file: String,

    /// Maximum accepted console line length
    pub max_input_length: usize,
}

/// Argon2id cost parameters used for every stored secret.
///
/// Signin recomputes hashes with these values, so they must stay fixed for
/// the lifetime of a user directory.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HashingConfig {
    /// Memory cost in KiB
    pub kdf_memory_kib: u32,

    /// Number of passes
    pub kdf_iterations: u32,

    /// Degree of parallelism (lanes)
    pub kdf_parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            kdf_memory_kib: argon2::Params::DEFAULT_M_COST,
            kdf_iterations: argon2::Params::DEFAULT_T_COST,
            kdf_parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl HashingConfig {
    /// Build the Argon2 parameter set, producing `HASH_LEN` bytes of output
    pub fn params(&self) -> Result<argon2::Params, argon2::Error> {
        argon2::Params::new(
            self.kdf_memory_kib,
            self.kdf_iterations,
            self.kdf_parallelism,
            Some(HASH_LEN),
        )
    }
}

impl AppConfig {
    /// Load configuration from the known config locations with environment overrides.
    ///
    /// Both locations are optional; when both exist the container path wins.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_paths(&CONFIG_PATHS)
    }

    /// Load configuration from a specific file path (missing file means defaults)
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Self::load_from_paths(&[path])
    }

    // Earlier paths take precedence over later ones
    fn load_from_paths(paths: &[&str]) -> Result<Self, ConfigError> {
        let defaults = HashingConfig::default();

        let mut builder = Config::builder()
            .set_default("log_level", "info")?
            .set_default("messages_file", "messages.json")?
            .set_default("max_input_length", 512_i64)?
            .set_default("kdf_memory_kib", i64::from(defaults.kdf_memory_kib))?
            .set_default("kdf_iterations", i64::from(defaults.kdf_iterations))?
            .set_default("kdf_parallelism", i64::from(defaults.kdf_parallelism))?;

        for path in paths.iter().rev() {
            builder = builder.add_source(File::with_name(path).required(false));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Split into process settings and hashing parameters
    pub fn split(self) -> (StartupConfig, HashingConfig) {
        (self.startup, self.hashing)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.startup.messages_file.trim().is_empty() {
            return Err(ConfigError::Message(
                "messages_file cannot be empty".into(),
            ));
        }

        if self.startup.max_input_length == 0 {
            return Err(ConfigError::Message(
                "max_input_length must be greater than 0".into(),
            ));
        }

        if let Err(e) = self.hashing.params() {
            return Err(ConfigError::Message(format!(
                "invalid key derivation parameters: {e}"
            )));
        }

        Ok(())
    }
}

impl StartupConfig {
    /// Get the message store location as PathBuf
    pub fn messages_path(&self) -> PathBuf {
        PathBuf::from(&self.messages_file)
    }
}
