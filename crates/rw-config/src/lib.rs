//! Configuration management for RW navigation.
//!
//! Parses `rw.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `tree.path` supports `$VAR` and `${VAR}` references, expanded before the
//! path is resolved against the config file's directory.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override page tree file.
    pub tree_path: Option<PathBuf>,
    /// Override hover exit delay in milliseconds.
    pub hover_exit_delay_ms: Option<u64>,
    /// Override scroll margin in pixels.
    pub scroll_margin: Option<f64>,
    /// Override tooltip offset in pixels.
    pub tooltip_offset: Option<f64>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "rw.toml";

/// Default page tree filename.
const DEFAULT_TREE_FILE: &str = "nav.json";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page tree configuration (path as a relative string from TOML).
    #[serde(default)]
    tree: TreeConfigRaw,
    /// Navigation engine timing and spacing.
    pub navigation: NavigationConfig,

    /// Resolved page tree configuration (set after loading).
    #[serde(skip)]
    pub tree_resolved: TreeConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw page tree configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TreeConfigRaw {
    path: Option<String>,
}

/// Resolved page tree configuration with an absolute path.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TreeConfig {
    /// JSON file holding the page tree.
    pub path: PathBuf,
}

/// Navigation engine configuration.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavigationConfig {
    /// Delay before hover focus clears after the pointer leaves.
    pub hover_exit_delay_ms: u64,
    /// Tooltip fade-out duration.
    pub tooltip_fade_ms: u64,
    /// Margin kept between a scrolled-to entry and the viewport edge.
    pub scroll_margin: f64,
    /// Gap between the focused entry and the tooltip.
    pub tooltip_offset: f64,
    /// Highlight re-measure cadence.
    pub settle_interval_ms: u64,
    /// Highlight re-measure window.
    pub settle_window_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            hover_exit_delay_ms: 150,
            tooltip_fade_ms: 150,
            scroll_margin: 18.0,
            tooltip_offset: 12.0,
            settle_interval_ms: 16,
            settle_window_ms: 300,
        }
    }
}

impl NavigationConfig {
    /// Hover exit delay as a duration.
    #[must_use]
    pub fn hover_exit_delay(&self) -> Duration {
        Duration::from_millis(self.hover_exit_delay_ms)
    }

    /// Tooltip fade as a duration.
    #[must_use]
    pub fn tooltip_fade(&self) -> Duration {
        Duration::from_millis(self.tooltip_fade_ms)
    }

    /// Highlight re-measure cadence as a duration.
    #[must_use]
    pub fn settle_interval(&self) -> Duration {
        Duration::from_millis(self.settle_interval_ms)
    }

    /// Highlight re-measure window as a duration.
    #[must_use]
    pub fn settle_window(&self) -> Duration {
        Duration::from_millis(self.settle_window_ms)
    }

    /// Validate timing and spacing values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the settle cadence is zero or
    /// longer than its window, or a pixel value is negative or not finite.
    /// Zero hover and fade delays are accepted and take effect immediately.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.settle_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "navigation.settle_interval_ms must be greater than 0".to_owned(),
            ));
        }
        if self.settle_interval_ms > self.settle_window_ms {
            return Err(ConfigError::Validation(format!(
                "navigation.settle_interval_ms ({}) cannot exceed navigation.settle_window_ms ({})",
                self.settle_interval_ms, self.settle_window_ms
            )));
        }
        require_pixels(self.scroll_margin, "navigation.scroll_margin")?;
        require_pixels(self.tooltip_offset, "navigation.tooltip_offset")?;
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`tree.path`").
        field: String,
        /// Error message (e.g., "${`DOCS_ROOT`} not set").
        message: String,
    },
}

/// Require a pixel value to be finite and non-negative.
fn require_pixels(value: f64, field: &str) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `rw.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(tree_path) = &settings.tree_path {
            self.tree_resolved.path.clone_from(tree_path);
        }
        if let Some(delay) = settings.hover_exit_delay_ms {
            self.navigation.hover_exit_delay_ms = delay;
        }
        if let Some(margin) = settings.scroll_margin {
            self.navigation.scroll_margin = margin;
        }
        if let Some(offset) = settings.tooltip_offset {
            self.navigation.tooltip_offset = offset;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        Self::discover_config_from(std::env::current_dir().ok()?)
    }

    /// Search for config file in `start` and its parents.
    fn discover_config_from(mut current: PathBuf) -> Option<PathBuf> {
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            tree: TreeConfigRaw::default(),
            navigation: NavigationConfig::default(),
            tree_resolved: TreeConfig {
                path: base.join(DEFAULT_TREE_FILE),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tree_resolved.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation("tree.path cannot be empty".to_owned()));
        }
        self.navigation.validate()
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.tree.path {
            self.tree.path = Some(expand::expand_env(path, "tree.path")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.tree_resolved = TreeConfig {
            path: config_dir.join(self.tree.path.as_deref().unwrap_or(DEFAULT_TREE_FILE)),
        };
    }
}
