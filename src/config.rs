//! Application configuration management.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config <FILE>`, or `config.toml` in the platform config
//!    directory when it exists)
//! 3. `CHOPY_*` environment variables (`CHOPY_BATCH_SIZE=5`)
//! 4. Command-line flags
//!
//! # Example file
//!
//! ```toml
//! batch_size = 10
//! max_duplicates = 100
//! min_size = 0
//! skip_hidden = true
//! base_dir = "/home/me"
//! delete_mode = "trash"
//! ```

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::actions::DeleteMode;
use crate::cli::Cli;
use crate::duplicates::{FinderConfig, DEFAULT_BATCH_SIZE, DEFAULT_MAX_DUPLICATES};
use crate::scanner::WalkerConfig;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "CHOPY_";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested file does not exist
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has the wrong shape
    #[error("Invalid configuration: {0}")]
    Extract(#[from] figment::Error),

    /// Values parsed but are out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Duplicates listed per confirmation prompt.
    pub batch_size: usize,
    /// Duplicates after which the run stops.
    pub max_duplicates: usize,
    /// Files smaller than this many bytes are ignored.
    pub min_size: u64,
    /// Follow symbolic links during the walk.
    pub follow_symlinks: bool,
    /// Skip entries whose name starts with a dot.
    pub skip_hidden: bool,
    /// Directory that relative targets resolve against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
    /// How approved duplicates are removed.
    pub delete_mode: DeleteMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_duplicates: DEFAULT_MAX_DUPLICATES,
            min_size: 0,
            follow_symlinks: false,
            skip_hidden: false,
            base_dir: None,
            delete_mode: DeleteMode::Permanent,
        }
    }
}

impl Config {
    /// Load defaults, the configuration file and the environment.
    ///
    /// An explicit `path` must exist. Without one, the platform default
    /// file is read only if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unparsable, or holds
    /// out-of-range values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) if !p.is_file() => return Err(ConfigError::NotFound(p.to_path_buf())),
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path().filter(|p| p.is_file()),
        };

        if let Some(f) = &file {
            log::debug!("Loading configuration from {}", f.display());
        }

        let config: Self = Self::layered(file.as_deref(), ENV_PREFIX).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn layered(file: Option<&Path>, env_prefix: &str) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(f) = file {
            figment = figment.merge(Toml::file(f));
        }
        figment.merge(Env::prefixed(env_prefix))
    }

    /// Default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "chopy", "chopy").map(|d| d.config_dir().join("config.toml"))
    }

    /// Apply command-line overrides on top of the loaded layers.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(n) = cli.batch_size {
            self.batch_size = n;
        }
        if let Some(n) = cli.max_duplicates {
            self.max_duplicates = n;
        }
        if let Some(n) = cli.min_size {
            self.min_size = n;
        }
        self.follow_symlinks |= cli.follow_symlinks;
        self.skip_hidden |= cli.skip_hidden;
        if cli.trash {
            self.delete_mode = DeleteMode::Trash;
        }
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero batch size or ceiling.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be at least 1".into()));
        }
        if self.max_duplicates == 0 {
            return Err(ConfigError::Invalid(
                "max_duplicates must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Resolve the scan root for a command-line target.
    ///
    /// Absolute targets are used as given; relative ones are joined onto
    /// `base_dir`, or left relative to the current directory.
    #[must_use]
    pub fn resolve_root(&self, target: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if target.is_relative() => base.join(target),
            _ => target.to_path_buf(),
        }
    }

    /// Walker settings derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        let min_size = (self.min_size > 0).then_some(self.min_size);
        WalkerConfig::new(self.follow_symlinks, self.skip_hidden, min_size)
    }

    /// Finder settings derived from this configuration.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_batch_size(self.batch_size)
            .with_max_duplicates(self.max_duplicates)
            .with_delete_mode(self.delete_mode)
            .with_walker_config(self.walker_config())
    }
}
