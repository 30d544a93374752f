//! `rw nav` subcommand group.

mod inspect;
mod layout;
mod replay;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand};
use rw_config::{CliSettings, Config, NavigationConfig};
use rw_nav::{EngineConfig, PageTree};

use inspect::InspectArgs;
use replay::ReplayArgs;

use crate::error::CliError;

/// Navigation engine commands.
#[derive(Subcommand)]
pub(crate) enum NavCommand {
    /// Show breadcrumbs, previous/next links and the visible sidebar for a route.
    Inspect(InspectArgs),
    /// Replay a timestamped event script and print the resulting state.
    Replay(ReplayArgs),
}

impl NavCommand {
    /// Execute the nav subcommand.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        match self {
            Self::Inspect(args) => args.execute(),
            Self::Replay(args) => args.execute(),
        }
    }
}

/// Options shared by every nav command.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Path to configuration file (default: auto-discover rw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Page tree JSON file (overrides config).
    #[arg(short, long)]
    tree: Option<PathBuf>,

    /// Hover exit delay in milliseconds (overrides config).
    #[arg(long)]
    hover_exit_delay: Option<u64>,
}

impl SourceArgs {
    /// Load configuration and the page tree it points to.
    fn load(&self) -> Result<(Config, Arc<PageTree>), CliError> {
        let cli_settings = CliSettings {
            tree_path: self.tree.clone(),
            hover_exit_delay_ms: self.hover_exit_delay,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let path = &config.tree_resolved.path;
        let json = std::fs::read_to_string(path).map_err(|e| {
            CliError::Validation(format!("Failed to read page tree {}: {e}", path.display()))
        })?;
        let tree = PageTree::from_json(&json)?;
        tracing::info!(path = %path.display(), nodes = tree.len(), "Page tree loaded");

        Ok((config, Arc::new(tree)))
    }
}

/// Map `[navigation]` settings onto the engine configuration.
fn engine_config(navigation: &NavigationConfig) -> EngineConfig {
    EngineConfig {
        hover_exit_delay: navigation.hover_exit_delay(),
        tooltip_fade: navigation.tooltip_fade(),
        scroll_margin: navigation.scroll_margin,
        tooltip_offset: navigation.tooltip_offset,
        settle_interval: navigation.settle_interval(),
        settle_window: navigation.settle_window(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_engine_config_defaults_match() {
        assert_eq!(
            engine_config(&NavigationConfig::default()),
            EngineConfig::default()
        );
    }

    #[test]
    fn test_engine_config_maps_overrides() {
        let navigation = NavigationConfig {
            hover_exit_delay_ms: 300,
            settle_window_ms: 500,
            ..NavigationConfig::default()
        };

        let config = engine_config(&navigation);

        assert_eq!(config.hover_exit_delay, Duration::from_millis(300));
        assert_eq!(config.settle_window, Duration::from_millis(500));
    }
}
