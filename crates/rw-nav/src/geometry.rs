//! Layout measurement abstraction.
//!
//! The engine never touches a layout engine directly. Everything it needs to
//! know about where things are on screen comes through [`Geometry`], which a
//! rendering layer implements over real DOM measurements and tests implement
//! with synthetic rectangles (see `MockGeometry` behind the `mock` feature).
//!
//! All rectangles share one coordinate space (viewport pixels, y grows down).

use serde::Serialize;

/// Axis-aligned rectangle in viewport pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
    /// Distance from the top edge.
    pub top: f64,
    /// Distance from the left edge.
    pub left: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Measured size of an element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Size {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Element whose size or position the presentation layer observes on the
/// engine's behalf.
///
/// The engine requests and releases observations through
/// [`Effect::Observe`](crate::Effect::Observe) and
/// [`Effect::Unobserve`](crate::Effect::Unobserve); the host answers with
/// calls such as `tooltip_resized`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", content = "title", rename_all = "snake_case")]
pub enum ObservedTarget {
    /// The preview tooltip's content box.
    Tooltip,
    /// The scrollable sidebar viewport.
    Viewport,
    /// The children container of an expanded folder.
    Folder(String),
}

/// Read-only layout measurements.
///
/// Every method may return `None` while the corresponding element is not
/// mounted; the engine treats that as "nothing to do".
pub trait Geometry {
    /// Bounding box of the sidebar entry with the given title.
    fn item_rect(&self, title: &str) -> Option<Rect>;

    /// Bounding box of the scrollable sidebar viewport.
    fn viewport_rect(&self) -> Option<Rect>;

    /// Bounding box of the sidebar container the tooltip is confined to.
    fn sidebar_rect(&self) -> Option<Rect>;

    /// Measured size of the tooltip content.
    fn tooltip_size(&self) -> Option<Size>;

    /// Bounding box of a folder's children container.
    fn folder_rect(&self, title: &str) -> Option<Rect>;
}
