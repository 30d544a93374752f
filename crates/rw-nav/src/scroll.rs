//! Keeps the focused entry inside the scrollable sidebar viewport.

use crate::geometry::{Geometry, Rect};

/// Default breathing room left between the entry and the viewport edge.
pub const DEFAULT_SCROLL_MARGIN: f64 = 18.0;

/// Computes the scroll needed to reveal the focused entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollSynchronizer {
    margin: f64,
}

impl Default for ScrollSynchronizer {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_MARGIN)
    }
}

impl ScrollSynchronizer {
    /// Create a synchronizer with the given margin in pixels.
    #[must_use]
    pub fn new(margin: f64) -> Self {
        Self { margin }
    }

    /// Scroll delta that brings `element` into `viewport`.
    ///
    /// Positive values scroll down, negative up. `None` if the element is
    /// already fully visible.
    #[must_use]
    pub fn adjustment(&self, element: Rect, viewport: Rect) -> Option<f64> {
        if element.bottom() > viewport.bottom() {
            Some(element.bottom() - viewport.bottom() + self.margin)
        } else if element.top < viewport.top {
            Some(-(viewport.top - element.top + self.margin))
        } else {
            None
        }
    }

    /// Measure the entry with `title` and compute its scroll delta.
    ///
    /// `None` when either the entry or the viewport is not mounted.
    #[must_use]
    pub fn sync(&self, geometry: &impl Geometry, title: &str) -> Option<f64> {
        let element = geometry.item_rect(title)?;
        let viewport = geometry.viewport_rect()?;
        let delta = self.adjustment(element, viewport)?;
        tracing::trace!(title, delta, "Scrolling focused entry into view");
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGeometry;

    const VIEWPORT: Rect = Rect::new(100.0, 0.0, 240.0, 400.0);

    fn assert_delta(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a scroll adjustment");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_visible_element_needs_no_scroll() {
        let sync = ScrollSynchronizer::default();

        let element = Rect::new(120.0, 0.0, 200.0, 28.0);

        assert_eq!(sync.adjustment(element, VIEWPORT), None);
    }

    #[test]
    fn test_element_flush_with_edges_needs_no_scroll() {
        let sync = ScrollSynchronizer::default();

        assert_eq!(sync.adjustment(Rect::new(100.0, 0.0, 200.0, 28.0), VIEWPORT), None);
        assert_eq!(sync.adjustment(Rect::new(472.0, 0.0, 200.0, 28.0), VIEWPORT), None);
    }

    #[test]
    fn test_element_below_viewport_scrolls_down_with_margin() {
        let sync = ScrollSynchronizer::default();

        // bottom 530 vs viewport bottom 500
        let element = Rect::new(502.0, 0.0, 200.0, 28.0);

        assert_delta(sync.adjustment(element, VIEWPORT), 30.0 + 18.0);
    }

    #[test]
    fn test_element_above_viewport_scrolls_up_with_margin() {
        let sync = ScrollSynchronizer::default();

        let element = Rect::new(60.0, 0.0, 200.0, 28.0);

        assert_delta(sync.adjustment(element, VIEWPORT), -(40.0 + 18.0));
    }

    #[test]
    fn test_custom_margin() {
        let sync = ScrollSynchronizer::new(4.0);

        let element = Rect::new(490.0, 0.0, 200.0, 20.0);

        assert_delta(sync.adjustment(element, VIEWPORT), 14.0);
    }

    #[test]
    fn test_sync_without_measurements_is_noop() {
        let sync = ScrollSynchronizer::default();
        let geometry = MockGeometry::new().with_viewport(VIEWPORT);

        assert_eq!(sync.sync(&geometry, "Missing"), None);
        assert_eq!(sync.sync(&MockGeometry::new(), "Missing"), None);
    }

    #[test]
    fn test_sync_measures_item() {
        let sync = ScrollSynchronizer::default();
        let geometry = MockGeometry::new()
            .with_viewport(VIEWPORT)
            .with_item("Deep", Rect::new(600.0, 0.0, 200.0, 28.0));

        assert_delta(sync.sync(&geometry, "Deep"), 128.0 + 18.0);
    }
}
