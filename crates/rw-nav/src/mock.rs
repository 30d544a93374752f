//! Mock geometry for testing.
//!
//! Provides [`MockGeometry`] for exercising the engine with synthetic
//! rectangles instead of a real layout engine.

use std::collections::HashMap;

use crate::geometry::{Geometry, Rect, Size};

/// Synthetic layout.
///
/// Use the builder methods to place entries, then mutate with the `set_*`
/// methods between events to simulate scrolling or resizing.
///
/// # Example
///
/// ```ignore
/// use rw_nav::{MockGeometry, Rect};
///
/// let geometry = MockGeometry::new()
///     .with_viewport(Rect::new(0.0, 0.0, 240.0, 400.0))
///     .with_rows(&["A", "A1", "A2", "B"], 28.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockGeometry {
    items: HashMap<String, Rect>,
    folders: HashMap<String, Rect>,
    viewport: Option<Rect>,
    sidebar: Option<Rect>,
    tooltip: Option<Size>,
}

impl MockGeometry {
    /// Create an empty layout where nothing is mounted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewport. The sidebar container defaults to the same rect.
    #[must_use]
    pub fn with_viewport(mut self, rect: Rect) -> Self {
        self.viewport = Some(rect);
        self.sidebar.get_or_insert(rect);
        self
    }

    /// Set the sidebar container independently of the viewport.
    #[must_use]
    pub fn with_sidebar(mut self, rect: Rect) -> Self {
        self.sidebar = Some(rect);
        self
    }

    /// Set the tooltip content size.
    #[must_use]
    pub fn with_tooltip(mut self, width: f64, height: f64) -> Self {
        self.tooltip = Some(Size { width, height });
        self
    }

    /// Place a single entry.
    #[must_use]
    pub fn with_item(mut self, title: impl Into<String>, rect: Rect) -> Self {
        self.items.insert(title.into(), rect);
        self
    }

    /// Place a folder's children container.
    #[must_use]
    pub fn with_folder(mut self, title: impl Into<String>, rect: Rect) -> Self {
        self.folders.insert(title.into(), rect);
        self
    }

    /// Stack entries top to bottom starting at y = 0, 200 px wide.
    #[must_use]
    pub fn with_rows(mut self, titles: &[&str], row_height: f64) -> Self {
        let mut top = 0.0;
        for title in titles {
            self.items
                .insert((*title).to_owned(), Rect::new(top, 0.0, 200.0, row_height));
            top += row_height;
        }
        self
    }

    /// Move or add an entry.
    pub fn set_item(&mut self, title: &str, rect: Rect) {
        self.items.insert(title.to_owned(), rect);
    }

    /// Remove an entry, as if it was unmounted.
    pub fn remove_item(&mut self, title: &str) {
        self.items.remove(title);
    }

    /// Move or add a folder container.
    pub fn set_folder(&mut self, title: &str, rect: Rect) {
        self.folders.insert(title.to_owned(), rect);
    }

    /// Resize the tooltip content.
    pub fn set_tooltip(&mut self, width: f64, height: f64) {
        self.tooltip = Some(Size { width, height });
    }

    /// Shift every entry and folder vertically, as scrolling the viewport by
    /// `delta` would.
    pub fn scroll_by(&mut self, delta: f64) {
        for rect in self.items.values_mut().chain(self.folders.values_mut()) {
            rect.top -= delta;
        }
    }
}

impl Geometry for MockGeometry {
    fn item_rect(&self, title: &str) -> Option<Rect> {
        self.items.get(title).copied()
    }

    fn viewport_rect(&self) -> Option<Rect> {
        self.viewport
    }

    fn sidebar_rect(&self) -> Option<Rect> {
        self.sidebar
    }

    fn tooltip_size(&self) -> Option<Size> {
        self.tooltip
    }

    fn folder_rect(&self, title: &str) -> Option<Rect> {
        self.folders.get(title).copied()
    }
}
