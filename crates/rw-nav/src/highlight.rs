//! Active-path indicator inside expanded folders.
//!
//! Each expanded folder draws an indicator next to the child that leads to
//! the current page. Expanding and collapsing folders animates their height,
//! so a single measurement would capture an intermediate layout; instead the
//! tracker keeps re-measuring on a short cadence until the transition has
//! had time to settle.

use std::time::{Duration, Instant};

use crate::geometry::Geometry;
use crate::timer::SettlePoll;
use crate::tree::{Node, PageTree};

/// Default re-measure cadence.
pub const DEFAULT_SETTLE_INTERVAL: Duration = Duration::from_millis(16);

/// Default re-measure window.
pub const DEFAULT_SETTLE_WINDOW: Duration = Duration::from_millis(300);

/// Indicator position for one expanded folder.
#[derive(Debug)]
pub struct HighlightTracker {
    folder: String,
    offset: Option<f64>,
    poll: SettlePoll,
}

impl HighlightTracker {
    /// Create a tracker for `folder` with no measurement yet.
    #[must_use]
    pub fn new(folder: impl Into<String>, interval: Duration, window: Duration) -> Self {
        Self {
            folder: folder.into(),
            offset: None,
            poll: SettlePoll::new(interval, window),
        }
    }

    /// Folder this tracker belongs to.
    #[must_use]
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Indicator offset from the top of the folder's container.
    ///
    /// `None` when no child of the folder is on the current path.
    #[must_use]
    pub fn offset(&self) -> Option<f64> {
        self.offset
    }

    /// Next re-measure deadline.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.poll.deadline()
    }

    /// Direct child of `folder` that is on the breadcrumb path.
    #[must_use]
    pub fn active_child<'a>(
        tree: &'a PageTree,
        folder: &str,
        breadcrumbs: &[String],
    ) -> Option<&'a Node> {
        tree.children(folder)
            .into_iter()
            .find(|child| breadcrumbs.contains(&child.title))
    }

    /// Measure the indicator now. Returns true if the offset changed.
    pub fn measure(
        &mut self,
        tree: &PageTree,
        breadcrumbs: &[String],
        geometry: &impl Geometry,
    ) -> bool {
        let offset = Self::active_child(tree, &self.folder, breadcrumbs).and_then(|child| {
            let child_rect = geometry.item_rect(&child.title)?;
            let folder_rect = geometry.folder_rect(&self.folder)?;
            Some(child_rect.top - folder_rect.top)
        });

        let changed = match (self.offset, offset) {
            (Some(old), Some(new)) => (old - new).abs() > f64::EPSILON,
            (old, new) => old.is_some() != new.is_some(),
        };
        if changed {
            tracing::trace!(folder = %self.folder, ?offset, "Highlight moved");
        }
        self.offset = offset;
        changed
    }

    /// Visibility changed: measure now and keep measuring while it settles.
    pub fn restart(
        &mut self,
        now: Instant,
        tree: &PageTree,
        breadcrumbs: &[String],
        geometry: &impl Geometry,
    ) {
        self.poll.restart(now);
        self.measure(tree, breadcrumbs, geometry);
    }

    /// Re-measure if a poll is due. Returns true if the offset changed.
    pub fn tick(
        &mut self,
        now: Instant,
        tree: &PageTree,
        breadcrumbs: &[String],
        geometry: &impl Geometry,
    ) -> bool {
        self.poll.poll(now) && self.measure(tree, breadcrumbs, geometry)
    }

    /// Stop polling.
    pub fn cancel(&mut self) {
        self.poll.cancel();
    }
}
