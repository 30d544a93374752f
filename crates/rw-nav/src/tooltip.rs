//! Preview tooltip anchored to the focused entry.
//!
//! The tooltip is derived state: it follows the focus, is positioned from
//! measured rectangles, and cross-fades between entries with a slide whose
//! direction reflects the movement through the visible sequence.
//!
//! # Positioning
//!
//! The tooltip is top-aligned with the focused entry and placed `offset`
//! pixels to the right of it. When top alignment would push the tooltip's
//! bottom past the sidebar container, it is bottom-aligned instead and the
//! connector arrow moves to the bottom edge.
//!
//! # Visibility
//!
//! | Tier | Used when |
//! |---|---|
//! | 100 | an entry is focused |
//! | 50 | the route changed while the tooltip was shown |
//! | 0 | focus was lost (150 ms fade) or the sidebar scrolled (instant) |

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::geometry::Geometry;
use crate::timer::Timer;
use crate::tree::{NodeKind, PageTree};
use crate::visible::VisibleSequence;

/// Default horizontal gap between the entry and the tooltip.
pub const DEFAULT_TOOLTIP_OFFSET: f64 = 12.0;

/// Default fade-out duration after focus loss.
pub const DEFAULT_TOOLTIP_FADE: Duration = Duration::from_millis(150);

/// Opacity tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum Opacity {
    /// Not shown.
    Hidden,
    /// Shown dimmed after navigation.
    Dimmed,
    /// Fully shown.
    Visible,
}

impl Opacity {
    /// Opacity in percent.
    #[must_use]
    pub const fn percent(self) -> u8 {
        match self {
            Self::Hidden => 0,
            Self::Dimmed => 50,
            Self::Visible => 100,
        }
    }
}

impl From<Opacity> for u8 {
    fn from(opacity: Opacity) -> Self {
        opacity.percent()
    }
}

/// Edge of the tooltip carrying the connector arrow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowEdge {
    /// Tooltip top-aligned with the entry.
    Top,
    /// Tooltip bottom-aligned with the entry.
    Bottom,
}

/// Direction new content slides in from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideDirection {
    /// No previous content; appear in place.
    None,
    /// Focus moved down the sidebar; content slides upward into place.
    Up,
    /// Focus moved up the sidebar; content slides downward into place.
    Down,
}

/// What the tooltip shows for an entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TooltipContent {
    /// Page preview.
    Page {
        /// Page title.
        title: String,
        /// Page url.
        url: String,
        /// Page summary.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// Last update stamp.
        #[serde(rename = "lastUpdated", skip_serializing_if = "Option::is_none")]
        last_updated: Option<String>,
    },
    /// Folder preview.
    Folder {
        /// Folder title.
        title: String,
        /// Number of pages beneath the folder.
        #[serde(rename = "pageCount")]
        page_count: usize,
    },
}

impl TooltipContent {
    /// Build the preview for the entry with `title`.
    #[must_use]
    pub fn for_title(tree: &PageTree, title: &str) -> Option<Self> {
        let node = tree.find_by_title(title)?;
        Some(match &node.kind {
            NodeKind::Page(info) => Self::Page {
                title: node.title.clone(),
                url: info.url.clone(),
                description: info.description.clone(),
                last_updated: info.last_updated.clone(),
            },
            NodeKind::Folder => Self::Folder {
                title: node.title.clone(),
                page_count: tree.page_count(title),
            },
        })
    }

    /// Title of the previewed entry.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Page { title, .. } | Self::Folder { title, .. } => title,
        }
    }
}

/// Snapshot of the tooltip for the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipState {
    /// Content being shown.
    pub current: Option<TooltipContent>,
    /// Content fading out during a cross-fade.
    pub previous: Option<TooltipContent>,
    /// Top edge in viewport pixels.
    pub top: f64,
    /// Left edge in viewport pixels.
    pub left: f64,
    /// Edge carrying the connector arrow.
    pub arrow_edge: ArrowEdge,
    /// Opacity tier.
    pub opacity: Opacity,
    /// True while opacity changes should animate (fade-out after focus loss).
    pub fade_out: bool,
    /// Slide direction of the current cross-fade.
    pub slide: SlideDirection,
}

impl Default for TooltipState {
    fn default() -> Self {
        Self {
            current: None,
            previous: None,
            top: 0.0,
            left: 0.0,
            arrow_edge: ArrowEdge::Top,
            opacity: Opacity::Hidden,
            fade_out: false,
            slide: SlideDirection::None,
        }
    }
}

/// Keeps [`TooltipState`] in sync with focus and layout.
#[derive(Debug)]
pub struct TooltipEngine {
    state: TooltipState,
    anchor: Option<String>,
    fade: Timer,
    fade_duration: Duration,
    offset: f64,
}

impl Default for TooltipEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TOOLTIP_OFFSET, DEFAULT_TOOLTIP_FADE)
    }
}

impl TooltipEngine {
    /// Create a hidden tooltip.
    #[must_use]
    pub fn new(offset: f64, fade_duration: Duration) -> Self {
        Self {
            state: TooltipState::default(),
            anchor: None,
            fade: Timer::new(),
            fade_duration,
            offset,
        }
    }

    /// Current tooltip state.
    #[must_use]
    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    /// Title of the entry the tooltip is anchored to.
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Pending fade-out deadline.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.fade.deadline()
    }

    /// Show the tooltip for a newly focused entry.
    pub fn show(
        &mut self,
        title: &str,
        tree: &PageTree,
        visible: &VisibleSequence,
        geometry: &impl Geometry,
    ) {
        let Some(content) = TooltipContent::for_title(tree, title) else {
            tracing::warn!(title, "No tooltip content for focused entry");
            return;
        };
        self.fade.cancel();

        if self.anchor.as_deref() != Some(title) {
            self.state.slide = match self.anchor.as_deref().and_then(|prev| visible.rank(prev)) {
                Some(prev) => match visible.rank(title) {
                    Some(rank) if rank > prev => SlideDirection::Up,
                    Some(rank) if rank < prev => SlideDirection::Down,
                    _ => SlideDirection::None,
                },
                None => SlideDirection::None,
            };
            self.state.previous = self.state.current.take();
            self.anchor = Some(title.to_owned());
        }

        self.state.current = Some(content);
        self.state.opacity = Opacity::Visible;
        self.state.fade_out = false;
        self.reposition(geometry);
    }

    /// Focus was lost: fade out, releasing the content when the fade ends.
    pub fn hide(&mut self, now: Instant) {
        if self.state.current.is_none() || self.fade.is_armed() {
            return;
        }
        self.state.opacity = Opacity::Hidden;
        self.state.fade_out = true;
        self.fade.arm(now, self.fade_duration);
        tracing::trace!("Tooltip fading out");
    }

    /// Hide without animation, as on scroll.
    pub fn hide_instantly(&mut self) {
        self.fade.cancel();
        self.release();
        self.state.fade_out = false;
    }

    /// Route changed: acknowledge navigation by dimming a shown tooltip.
    pub fn dim(&mut self) {
        if self.state.opacity == Opacity::Visible {
            self.state.opacity = Opacity::Dimmed;
        }
    }

    /// Recompute the position from current measurements.
    ///
    /// Returns false if the anchor, the sidebar or the entry is not measurable.
    pub fn reposition(&mut self, geometry: &impl Geometry) -> bool {
        let Some(anchor) = self.anchor.as_deref() else {
            return false;
        };
        let (Some(element), Some(container)) =
            (geometry.item_rect(anchor), geometry.sidebar_rect())
        else {
            return false;
        };
        let height = geometry.tooltip_size().map_or(0.0, |size| size.height);

        if element.top + height > container.bottom() {
            self.state.top = element.bottom() - height;
            self.state.arrow_edge = ArrowEdge::Bottom;
        } else {
            self.state.top = element.top;
            self.state.arrow_edge = ArrowEdge::Top;
        }
        self.state.left = element.right() + self.offset;
        true
    }

    /// Finish a fade-out if due. Returns true if the content was released.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.fade.fire(now) {
            return false;
        }
        self.release();
        true
    }

    /// Cancel pending timers.
    pub fn dispose(&mut self) {
        self.fade.cancel();
    }

    fn release(&mut self) {
        self.anchor = None;
        self.state.current = None;
        self.state.previous = None;
        self.state.opacity = Opacity::Hidden;
        self.state.slide = SlideDirection::None;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::expansion::ExpansionSet;
    use crate::geometry::Rect;
    use crate::mock::MockGeometry;
    use crate::tree::TreeNode;
    use crate::tree::tests::sample_tree;

    const MS: Duration = Duration::from_millis(1);

    struct Fixture {
        tree: PageTree,
        visible: VisibleSequence,
        geometry: MockGeometry,
    }

    fn fixture() -> Fixture {
        let tree = sample_tree();
        let visible = VisibleSequence::compute(&tree, &ExpansionSet::for_route(&tree, "/a1"));
        let geometry = MockGeometry::new()
            .with_viewport(Rect::new(0.0, 0.0, 240.0, 400.0))
            .with_tooltip(280.0, 120.0)
            .with_rows(&["A", "A1", "A2", "B"], 28.0);
        Fixture {
            tree,
            visible,
            geometry,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_show_top_aligns_and_offsets_right() {
        let f = fixture();
        let mut tooltip = TooltipEngine::default();

        tooltip.show("A1", &f.tree, &f.visible, &f.geometry);

        let state = tooltip.state();
        assert!(close(state.top, 28.0));
        assert!(close(state.left, 200.0 + DEFAULT_TOOLTIP_OFFSET));
        assert_eq!(state.arrow_edge, ArrowEdge::Top);
        assert_eq!(state.opacity, Opacity::Visible);
        assert_eq!(state.slide, SlideDirection::None);
        assert_eq!(state.current.as_ref().map(TooltipContent::title), Some("A1"));
    }

    #[test]
    fn test_show_near_bottom_flips_arrow() {
        let mut f = fixture();
        f.geometry.set_item("B", Rect::new(350.0, 0.0, 200.0, 28.0));
        let mut tooltip = TooltipEngine::default();

        tooltip.show("B", &f.tree, &f.visible, &f.geometry);

        // 350 + 120 > 400: bottom-align to the entry's bottom edge (378)
        let state = tooltip.state();
        assert!(close(state.top, 378.0 - 120.0));
        assert_eq!(state.arrow_edge, ArrowEdge::Bottom);
    }

    #[test]
    fn test_resize_repositions() {
        let mut f = fixture();
        let mut tooltip = TooltipEngine::default();
        tooltip.show("A2", &f.tree, &f.visible, &f.geometry);
        assert_eq!(tooltip.state().arrow_edge, ArrowEdge::Top);

        f.geometry.set_tooltip(280.0, 380.0);
        assert!(tooltip.reposition(&f.geometry));

        assert_eq!(tooltip.state().arrow_edge, ArrowEdge::Bottom);
        assert!(close(tooltip.state().top, 84.0 - 380.0));
    }

    #[test]
    fn test_slide_direction_follows_rank() {
        let f = fixture();
        let mut tooltip = TooltipEngine::default();

        tooltip.show("A1", &f.tree, &f.visible, &f.geometry);
        tooltip.show("B", &f.tree, &f.visible, &f.geometry);
        assert_eq!(tooltip.state().slide, SlideDirection::Up);
        assert_eq!(
            tooltip.state().previous.as_ref().map(TooltipContent::title),
            Some("A1")
        );

        tooltip.show("A", &f.tree, &f.visible, &f.geometry);
        assert_eq!(tooltip.state().slide, SlideDirection::Down);
    }

    #[test]
    fn test_hide_fades_then_releases_content() {
        let f = fixture();
        let start = Instant::now();
        let mut tooltip = TooltipEngine::default();
        tooltip.show("A1", &f.tree, &f.visible, &f.geometry);

        tooltip.hide(start);

        assert_eq!(tooltip.state().opacity, Opacity::Hidden);
        assert!(tooltip.state().fade_out);
        assert!(tooltip.state().current.is_some());
        assert!(!tooltip.tick(start + 100 * MS));
        assert!(tooltip.tick(start + 150 * MS));
        assert!(tooltip.state().current.is_none());
        assert!(tooltip.anchor().is_none());
    }

    #[test]
    fn test_show_during_fade_cancels_release() {
        let f = fixture();
        let start = Instant::now();
        let mut tooltip = TooltipEngine::default();
        tooltip.show("A1", &f.tree, &f.visible, &f.geometry);
        tooltip.hide(start);

        tooltip.show("A2", &f.tree, &f.visible, &f.geometry);

        assert!(!tooltip.tick(start + 200 * MS));
        assert_eq!(tooltip.state().opacity, Opacity::Visible);
        assert!(!tooltip.state().fade_out);
        assert_eq!(tooltip.state().slide, SlideDirection::Up);
    }

    #[test]
    fn test_hide_instantly_skips_fade() {
        let f = fixture();
        let mut tooltip = TooltipEngine::default();
        tooltip.show("A1", &f.tree, &f.visible, &f.geometry);

        tooltip.hide_instantly();

        let state = tooltip.state();
        assert_eq!(state.opacity, Opacity::Hidden);
        assert!(!state.fade_out);
        assert!(state.current.is_none());
        assert!(tooltip.deadline().is_none());
    }

    #[test]
    fn test_dim_only_affects_visible_tooltip() {
        let f = fixture();
        let mut tooltip = TooltipEngine::default();

        tooltip.dim();
        assert_eq!(tooltip.state().opacity, Opacity::Hidden);

        tooltip.show("A1", &f.tree, &f.visible, &f.geometry);
        tooltip.dim();
        assert_eq!(tooltip.state().opacity, Opacity::Dimmed);
    }

    #[test]
    fn test_reposition_without_anchor() {
        let f = fixture();
        let mut tooltip = TooltipEngine::default();

        assert!(!tooltip.reposition(&f.geometry));
    }

    #[test]
    fn test_folder_content_counts_pages() {
        let tree = PageTree::from_nodes(vec![TreeNode::folder(
            "Docs",
            vec![
                TreeNode::page("One", "/1"),
                TreeNode::folder("More", vec![TreeNode::page("Two", "/2")]),
            ],
        )]);

        assert_eq!(
            TooltipContent::for_title(&tree, "Docs"),
            Some(TooltipContent::Folder {
                title: "Docs".to_owned(),
                page_count: 2,
            })
        );
    }

    #[test]
    fn test_state_serialization() {
        let f = fixture();
        let mut tooltip = TooltipEngine::default();
        tooltip.show("A1", &f.tree, &f.visible, &f.geometry);
        tooltip.dim();

        let json = serde_json::to_value(tooltip.state()).unwrap();

        assert_eq!(json["opacity"], 50);
        assert_eq!(json["arrowEdge"], "top");
        assert_eq!(json["current"]["kind"], "page");
        assert_eq!(json["current"]["url"], "/a1");
        assert!(json["previous"].is_null());
    }
}
