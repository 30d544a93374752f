//! `rw nav inspect` command implementation.

use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use rw_nav::{NavigationView, PageLink};

use super::layout::{self, RowLayout};
use super::{SourceArgs, engine_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav inspect command.
#[derive(Args)]
pub(crate) struct InspectArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Current route url.
    #[arg(short, long)]
    route: String,

    /// Additional folders to open before printing.
    #[arg(short, long = "expand", value_name = "TITLE")]
    expand: Vec<String>,

    /// Print the navigation snapshot as JSON.
    #[arg(long)]
    json: bool,
}

impl InspectArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (config, tree) = self.source.load()?;

        let now = Instant::now();
        let geometry = RowLayout::new(Arc::clone(&tree), f64::INFINITY, 28.0);
        let mut view = NavigationView::mount(
            tree,
            geometry,
            engine_config(&config.navigation),
            &self.route,
            now,
        );
        for title in &self.expand {
            view.expand(title, now);
        }
        layout::refresh(&mut view, now);

        if self.json {
            output.json(&view.snapshot())?;
            return Ok(());
        }

        if view.breadcrumbs().is_empty() {
            output.warning(&format!("No page matches {}", self.route));
        }
        output.highlight(&format!("Route: {}", self.route));
        output.info(&format!("Breadcrumbs: {}", view.breadcrumbs().join(" > ")));

        let snapshot = view.snapshot();
        output.info(&format!("Previous: {}", describe(snapshot.previous.as_ref())));
        output.info(&format!("Next: {}", describe(snapshot.next.as_ref())));

        output.separator();
        let current = view.breadcrumbs().last();
        for title in view.visible_sequence().titles() {
            let marker = match view.tree().find_by_title(title) {
                Some(node) if node.is_folder() && view.is_expanded(title) => "[-]",
                Some(node) if node.is_folder() => "[+]",
                _ => "   ",
            };
            let line = format!("{marker} {title}");
            if Some(title) == current {
                output.success(&line);
            } else {
                output.info(&line);
            }
        }

        Ok(())
    }
}

fn describe(link: Option<&PageLink>) -> String {
    link.map_or_else(
        || "(none)".to_owned(),
        |link| format!("{} ({})", link.title, link.url),
    )
}
