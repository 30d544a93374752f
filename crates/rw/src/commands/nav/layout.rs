//! Row-based synthetic layout for running the engine outside a browser.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use rw_nav::{Geometry, NavigationView, PageTree, Rect, Size, VisibleSequence};

/// Sidebar layout where every visible entry is one fixed-height row.
///
/// Rows follow the visible sequence; scrolling shifts every row up by
/// `scroll_top`. The sidebar container coincides with the viewport.
pub(crate) struct RowLayout {
    tree: Arc<PageTree>,
    rows: Vec<String>,
    row_height: f64,
    width: f64,
    viewport_height: f64,
    scroll_top: f64,
    tooltip: Size,
}

impl RowLayout {
    pub(crate) fn new(tree: Arc<PageTree>, viewport_height: f64, row_height: f64) -> Self {
        Self {
            tree,
            rows: Vec::new(),
            row_height,
            width: 240.0,
            viewport_height,
            scroll_top: 0.0,
            tooltip: Size {
                width: 280.0,
                height: 96.0,
            },
        }
    }

    /// Re-lay rows after the visible sequence changed. Returns true if
    /// anything moved.
    pub(crate) fn sync(&mut self, visible: &VisibleSequence) -> bool {
        if self.rows == visible.titles() {
            return false;
        }
        self.rows = visible.titles().to_vec();
        self.scroll_by(0.0);
        true
    }

    /// Apply a scroll request, clamped to the scrollable range.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn scroll_by(&mut self, delta: f64) {
        let content = self.row_height * self.rows.len() as f64;
        let max = (content - self.viewport_height).max(0.0);
        self.scroll_top = (self.scroll_top + delta).clamp(0.0, max);
    }

    pub(crate) fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    #[allow(clippy::cast_precision_loss)]
    fn row_rect(&self, index: usize, rows: usize) -> Rect {
        Rect::new(
            self.row_height * index as f64 - self.scroll_top,
            0.0,
            self.width,
            self.row_height * rows as f64,
        )
    }

    fn index(&self, title: &str) -> Option<usize> {
        self.rows.iter().position(|row| row == title)
    }

    fn descendants<'a>(&'a self, title: &str, out: &mut HashSet<&'a str>) {
        for child in self.tree.children(title) {
            out.insert(&child.title);
            if child.is_folder() {
                self.descendants(&child.title, out);
            }
        }
    }
}

impl Geometry for RowLayout {
    fn item_rect(&self, title: &str) -> Option<Rect> {
        self.index(title).map(|index| self.row_rect(index, 1))
    }

    fn viewport_rect(&self) -> Option<Rect> {
        Some(Rect::new(0.0, 0.0, self.width, self.viewport_height))
    }

    fn sidebar_rect(&self) -> Option<Rect> {
        self.viewport_rect()
    }

    fn tooltip_size(&self) -> Option<Size> {
        Some(self.tooltip)
    }

    fn folder_rect(&self, title: &str) -> Option<Rect> {
        let start = self.index(title)? + 1;
        let mut descendants = HashSet::new();
        self.descendants(title, &mut descendants);

        let len = self.rows[start..]
            .iter()
            .take_while(|row| descendants.contains(row.as_str()))
            .count();
        (len > 0).then(|| self.row_rect(start, len))
    }
}

/// Re-lay rows from the view's visible sequence and report the layout
/// change to the view, as a resize observer would.
pub(crate) fn refresh(view: &mut NavigationView<RowLayout>, now: Instant) {
    let visible = view.visible_sequence().clone();
    if view.geometry_mut().sync(&visible) {
        view.layout_changed(now);
    }
}
