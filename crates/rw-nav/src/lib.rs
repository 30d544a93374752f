//! Sidebar navigation state engine for RW.
//!
//! This crate provides:
//! - [`PageTree`]: Immutable page tree with title/url lookups, breadcrumbs
//!   and previous/next links
//! - [`ExpansionSet`] and [`VisibleSequence`]: Which folders are open and
//!   which entries that leaves on screen
//! - [`FocusCoordinator`] and [`handle_key`]: Hover and keyboard focus with
//!   the keyboard traversal state machine
//! - [`ScrollSynchronizer`], [`TooltipEngine`] and [`HighlightTracker`]:
//!   Geometry-derived state computed through the [`Geometry`] trait
//! - [`NavigationView`]: Owned state object tying everything together
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use std::time::Instant;
//! use rw_nav::{EngineConfig, Key, KeyPress, NavigationView, PageTree};
//! # use rw_nav::{Geometry, Rect, Size};
//! # struct Dom;
//! # impl Geometry for Dom {
//! #     fn item_rect(&self, _: &str) -> Option<Rect> { None }
//! #     fn viewport_rect(&self) -> Option<Rect> { None }
//! #     fn sidebar_rect(&self) -> Option<Rect> { None }
//! #     fn tooltip_size(&self) -> Option<Size> { None }
//! #     fn folder_rect(&self, _: &str) -> Option<Rect> { None }
//! # }
//!
//! let tree = Arc::new(PageTree::from_json(r#"[
//!     {"type": "folder", "title": "Guide", "children": [
//!         {"type": "page", "title": "Install", "url": "/install"}
//!     ]}
//! ]"#)?);
//!
//! let mut view = NavigationView::mount(tree, Dom, EngineConfig::default(), "/install", Instant::now());
//!
//! // Ctrl+0 focuses the current page
//! view.handle_key(KeyPress::ctrl(Key::Digit0), Instant::now());
//! for effect in view.drain_effects() {
//!     // apply scroll, navigation and observer requests
//! #   let _ = effect;
//! }
//! # Ok(())
//! # }
//! ```

mod expansion;
mod focus;
mod geometry;
mod highlight;
mod keyboard;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod scroll;
mod timer;
mod tooltip;
mod tree;
mod view;
mod visible;

pub use expansion::ExpansionSet;
pub use focus::{DEFAULT_HOVER_EXIT_DELAY, Focus, FocusCoordinator, FocusSource};
pub use geometry::{Geometry, ObservedTarget, Rect, Size};
pub use highlight::{DEFAULT_SETTLE_INTERVAL, DEFAULT_SETTLE_WINDOW, HighlightTracker};
pub use keyboard::{
    Key, KeyOutcome, KeyPress, Transition, TraversalContext, TraversalState, handle_key,
};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockGeometry;
pub use scroll::{DEFAULT_SCROLL_MARGIN, ScrollSynchronizer};
pub use timer::{MIN_POLL_INTERVAL, SettlePoll, Timer};
pub use tooltip::{
    ArrowEdge, DEFAULT_TOOLTIP_FADE, DEFAULT_TOOLTIP_OFFSET, Opacity, SlideDirection,
    TooltipContent, TooltipEngine, TooltipState,
};
pub use tree::{Node, NodeKind, PageInfo, PageTree, PrevNext, TreeError, TreeNode};
pub use view::{EngineConfig, Effect, NavigationSnapshot, NavigationView, PageLink};
pub use visible::VisibleSequence;
