//! Navigation view: the owned state object behind one mounted sidebar.
//!
//! [`NavigationView`] wires the components together and is the only thing
//! the presentation layer talks to. It is created by [`NavigationView::mount`]
//! when the sidebar mounts and released by [`NavigationView::dispose`] when it
//! unmounts; every timer and geometry observation lives inside it.
//!
//! # Event flow
//!
//! ```text
//! route / key / pointer / geometry event
//!   -> expansion store -> visible sequence
//!   -> keyboard traversal -> focus coordinator
//!   -> { scroll sync, tooltip, highlight trackers }
//! ```
//!
//! Every handler takes the event's `Instant`. Timers are deadlines fired by
//! [`tick`](NavigationView::tick); [`next_deadline`](NavigationView::next_deadline)
//! tells the host when to call it next. Outward requests (navigation,
//! scrolling, observer registration) are queued as [`Effect`]s and collected
//! with [`drain_effects`](NavigationView::drain_effects).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::expansion::ExpansionSet;
use crate::focus::{DEFAULT_HOVER_EXIT_DELAY, Focus, FocusCoordinator};
use crate::geometry::{Geometry, ObservedTarget};
use crate::highlight::{DEFAULT_SETTLE_INTERVAL, DEFAULT_SETTLE_WINDOW, HighlightTracker};
use crate::keyboard::{self, KeyOutcome, KeyPress, TraversalContext, TraversalState, Transition};
use crate::scroll::{DEFAULT_SCROLL_MARGIN, ScrollSynchronizer};
use crate::tooltip::{DEFAULT_TOOLTIP_FADE, DEFAULT_TOOLTIP_OFFSET, TooltipEngine, TooltipState};
use crate::tree::{Node, PageTree, PrevNext};
use crate::visible::VisibleSequence;

/// Timing and spacing configuration for [`NavigationView`].
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Delay before hover focus is released after the pointer leaves.
    pub hover_exit_delay: Duration,
    /// Tooltip fade-out duration after focus loss.
    pub tooltip_fade: Duration,
    /// Margin kept between a scrolled-to entry and the viewport edge.
    pub scroll_margin: f64,
    /// Horizontal gap between the focused entry and the tooltip.
    pub tooltip_offset: f64,
    /// Highlight re-measure cadence.
    pub settle_interval: Duration,
    /// Highlight re-measure window.
    pub settle_window: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hover_exit_delay: DEFAULT_HOVER_EXIT_DELAY,
            tooltip_fade: DEFAULT_TOOLTIP_FADE,
            scroll_margin: DEFAULT_SCROLL_MARGIN,
            tooltip_offset: DEFAULT_TOOLTIP_OFFSET,
            settle_interval: DEFAULT_SETTLE_INTERVAL,
            settle_window: DEFAULT_SETTLE_WINDOW,
        }
    }
}

/// Outward request for the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Route to a page.
    Navigate {
        /// Target url.
        url: String,
    },
    /// Scroll the sidebar viewport by `delta` pixels (positive is down).
    ScrollBy {
        /// Scroll amount.
        delta: f64,
    },
    /// Start observing an element's geometry.
    Observe {
        /// Element to observe.
        target: ObservedTarget,
    },
    /// Stop observing an element's geometry.
    Unobserve {
        /// Element to release.
        target: ObservedTarget,
    },
}

/// Page link for previous/next navigation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageLink {
    /// Page title.
    pub title: String,
    /// Page url.
    pub url: String,
}

impl PageLink {
    fn from_node(node: &Node) -> Option<Self> {
        Some(Self {
            title: node.title.clone(),
            url: node.url()?.to_owned(),
        })
    }
}

/// Serializable view of every read accessor.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSnapshot {
    /// Current route.
    pub route: String,
    /// Titles from root to the current page.
    pub breadcrumbs: Vec<String>,
    /// Open folders, sorted.
    pub expanded: Vec<String>,
    /// Visible titles in sidebar order.
    pub visible: Vec<String>,
    /// Focused entry.
    pub focus: Option<Focus>,
    /// Previous page in reading order.
    pub previous: Option<PageLink>,
    /// Next page in reading order.
    pub next: Option<PageLink>,
    /// Tooltip state.
    pub tooltip: TooltipState,
    /// Highlight offsets per expanded folder with an active child.
    pub highlights: BTreeMap<String, f64>,
}

/// Owned sidebar navigation state.
pub struct NavigationView<G: Geometry> {
    tree: Arc<PageTree>,
    geometry: G,
    config: EngineConfig,
    route: String,
    breadcrumbs: Vec<String>,
    expansion: ExpansionSet,
    visible: VisibleSequence,
    focus: FocusCoordinator,
    scroll: ScrollSynchronizer,
    tooltip: TooltipEngine,
    highlights: BTreeMap<String, HighlightTracker>,
    observations: BTreeSet<ObservedTarget>,
    effects: Vec<Effect>,
}

impl<G: Geometry> NavigationView<G> {
    /// Mount the view at `route`.
    ///
    /// Seeds the expansion state from the route's ancestors and requests
    /// observation of the tooltip, the viewport and every expanded folder.
    #[must_use]
    pub fn mount(
        tree: Arc<PageTree>,
        geometry: G,
        config: EngineConfig,
        route: &str,
        now: Instant,
    ) -> Self {
        let expansion = ExpansionSet::for_route(&tree, route);
        let visible = VisibleSequence::compute(&tree, &expansion);
        let breadcrumbs = owned(tree.find_breadcrumb_path(route));

        let mut view = Self {
            focus: FocusCoordinator::new(config.hover_exit_delay),
            scroll: ScrollSynchronizer::new(config.scroll_margin),
            tooltip: TooltipEngine::new(config.tooltip_offset, config.tooltip_fade),
            tree,
            geometry,
            config,
            route: route.to_owned(),
            breadcrumbs,
            expansion,
            visible,
            highlights: BTreeMap::new(),
            observations: BTreeSet::new(),
            effects: Vec::new(),
        };

        view.observe(ObservedTarget::Tooltip);
        view.observe(ObservedTarget::Viewport);
        view.sync_trackers();
        view.restart_highlights(now);

        tracing::debug!(
            route,
            expanded = view.expansion.len(),
            visible = view.visible.len(),
            "Navigation view mounted"
        );
        view
    }

    /// Release every timer and observation.
    ///
    /// Returns the effects still queued followed by the `Unobserve` requests
    /// the host must honour.
    pub fn dispose(mut self) -> Vec<Effect> {
        self.focus.dispose();
        self.tooltip.dispose();
        for tracker in self.highlights.values_mut() {
            tracker.cancel();
        }
        let observations = std::mem::take(&mut self.observations);
        self.effects.extend(
            observations
                .into_iter()
                .map(|target| Effect::Unobserve { target }),
        );
        tracing::debug!("Navigation view disposed");
        self.effects
    }

    /// Page tree.
    #[must_use]
    pub fn tree(&self) -> &PageTree {
        &self.tree
    }

    /// Geometry capability.
    #[must_use]
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Mutable geometry capability, for hosts that update measurements in place.
    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current route.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Titles from root to the current page, empty if the route is unknown.
    #[must_use]
    pub fn breadcrumbs(&self) -> &[String] {
        &self.breadcrumbs
    }

    /// Expansion state.
    #[must_use]
    pub fn expansion(&self) -> &ExpansionSet {
        &self.expansion
    }

    /// Check whether a folder is open.
    #[must_use]
    pub fn is_expanded(&self, title: &str) -> bool {
        self.expansion.is_expanded(title)
    }

    /// Visible titles in sidebar order.
    #[must_use]
    pub fn visible_sequence(&self) -> &VisibleSequence {
        &self.visible
    }

    /// Focused entry.
    #[must_use]
    pub fn focus(&self) -> Option<&Focus> {
        self.focus.current()
    }

    /// Keyboard traversal state.
    #[must_use]
    pub fn traversal_state(&self) -> TraversalState {
        TraversalState::of(&self.focus)
    }

    /// Previous and next pages of the current route in reading order.
    #[must_use]
    pub fn prev_next(&self) -> PrevNext<'_> {
        self.tree.compute_prev_next(&self.route)
    }

    /// Tooltip state.
    #[must_use]
    pub fn tooltip(&self) -> &TooltipState {
        self.tooltip.state()
    }

    /// Highlight offset inside an expanded folder.
    #[must_use]
    pub fn highlight_offset(&self, folder: &str) -> Option<f64> {
        self.highlights.get(folder).and_then(HighlightTracker::offset)
    }

    /// Take the queued effects.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Earliest pending timer deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.highlights
            .values()
            .filter_map(HighlightTracker::deadline)
            .chain(self.focus.deadline())
            .chain(self.tooltip.deadline())
            .min()
    }

    /// Snapshot of every read accessor.
    #[must_use]
    pub fn snapshot(&self) -> NavigationSnapshot {
        let links = self.prev_next();
        NavigationSnapshot {
            route: self.route.clone(),
            breadcrumbs: self.breadcrumbs.clone(),
            expanded: self.expansion.iter().map(str::to_owned).collect(),
            visible: self.visible.titles().to_vec(),
            focus: self.focus.current().cloned(),
            previous: links.previous.and_then(PageLink::from_node),
            next: links.next.and_then(PageLink::from_node),
            tooltip: self.tooltip.state().clone(),
            highlights: self
                .highlights
                .iter()
                .filter_map(|(folder, t)| Some((folder.clone(), t.offset()?)))
                .collect(),
        }
    }

    /// The routing collaborator moved to `url`.
    ///
    /// Recomputes breadcrumbs, opens the new page's ancestors and dims a
    /// shown tooltip. An unknown url clears the breadcrumbs and leaves the
    /// expansion state alone.
    pub fn navigate_to(&mut self, url: &str, now: Instant) {
        self.route = url.to_owned();
        self.breadcrumbs = owned(self.tree.find_breadcrumb_path(url));
        if self.breadcrumbs.is_empty() {
            tracing::warn!(url, "Route does not match any page");
        }

        if self.expansion.sync_route(&self.tree, url) {
            self.expansion_changed(now);
        } else {
            self.restart_highlights(now);
        }
        self.tooltip.dim();
        tracing::debug!(url, breadcrumbs = ?self.breadcrumbs, "Route changed");
    }

    /// Open a folder.
    pub fn expand(&mut self, title: &str, now: Instant) {
        if self.expansion.expand(title) {
            self.expansion_changed(now);
        }
    }

    /// Close a folder.
    pub fn collapse(&mut self, title: &str, now: Instant) {
        if self.expansion.collapse(title) {
            self.expansion_changed(now);
        }
    }

    /// Flip a folder between open and closed.
    pub fn toggle(&mut self, title: &str, now: Instant) {
        self.expansion.toggle(title);
        self.expansion_changed(now);
    }

    /// Pointer entered the entry with `title`.
    pub fn start_hover_focus(&mut self, title: &str, now: Instant) {
        if self.focus.start_hover_focus(title) {
            self.focus_changed(now);
        }
    }

    /// Pointer left the focused entry (or the tooltip).
    pub fn end_hover_focus(&mut self, now: Instant) {
        self.focus.end_hover_focus(now);
    }

    /// Enter keyboard mode on the current page or the first visible entry.
    pub fn start_keyboard_focus(&mut self, now: Instant) {
        let current = self.breadcrumbs.last().map(String::as_str);
        if self.focus.start_keyboard_focus(&self.visible, current) {
            self.focus_changed(now);
        }
    }

    /// Leave keyboard mode immediately.
    pub fn end_keyboard_focus(&mut self, now: Instant) {
        if self.focus.end_keyboard_focus() {
            self.focus_changed(now);
        }
    }

    /// Handle a key press. The host must prevent the default action when
    /// the outcome says so.
    pub fn handle_key(&mut self, press: KeyPress, now: Instant) -> KeyOutcome {
        let mut ctx = TraversalContext {
            tree: &self.tree,
            expansion: &mut self.expansion,
            focus: &mut self.focus,
            visible: &self.visible,
            current_title: self.breadcrumbs.last().map(String::as_str),
        };
        let outcome = keyboard::handle_key(press, &mut ctx);

        if let KeyOutcome::Handled(transition) = &outcome {
            match transition {
                Transition::None => {}
                Transition::Focus | Transition::Blur => self.focus_changed(now),
                Transition::Expansion => self.expansion_changed(now),
                Transition::Navigate(url) => self.effects.push(Effect::Navigate { url: url.clone() }),
            }
        }
        outcome
    }

    /// A click landed outside the sidebar tree.
    pub fn click_outside(&mut self, now: Instant) {
        if self.focus.current().is_some() {
            self.end_keyboard_focus(now);
        }
    }

    /// The user scrolled the sidebar or the page.
    ///
    /// Hides the tooltip without a fade and ends keyboard focus. Programmatic
    /// scrolls requested through [`Effect::ScrollBy`] must not be reported here.
    pub fn scrolled(&mut self) {
        self.tooltip.hide_instantly();
        if self.focus.end_keyboard_focus() {
            tracing::debug!("Focus ended by scroll");
        }
    }

    /// The observed tooltip content changed size.
    pub fn tooltip_resized(&mut self) {
        self.tooltip.reposition(&self.geometry);
    }

    /// The observed viewport or a folder container changed size.
    pub fn layout_changed(&mut self, now: Instant) {
        self.tooltip.reposition(&self.geometry);
        self.restart_highlights(now);
    }

    /// Fire due timers.
    pub fn tick(&mut self, now: Instant) {
        if self.focus.tick(now) {
            self.focus_changed(now);
        }
        if self.tooltip.tick(now) {
            tracing::trace!("Tooltip released");
        }
        for tracker in self.highlights.values_mut() {
            tracker.tick(now, &self.tree, &self.breadcrumbs, &self.geometry);
        }
    }

    fn focus_changed(&mut self, now: Instant) {
        let Some(title) = self.focus.title().map(str::to_owned) else {
            self.tooltip.hide(now);
            return;
        };

        if let Some(delta) = self.scroll.sync(&self.geometry, &title) {
            self.effects.push(Effect::ScrollBy { delta });
        }
        self.tooltip
            .show(&title, &self.tree, &self.visible, &self.geometry);
    }

    fn expansion_changed(&mut self, now: Instant) {
        self.visible = VisibleSequence::compute(&self.tree, &self.expansion);
        self.sync_trackers();
        self.restart_highlights(now);
        self.tooltip.reposition(&self.geometry);
        tracing::debug!(
            expanded = self.expansion.len(),
            visible = self.visible.len(),
            "Expansion changed"
        );
    }

    /// Create trackers for newly opened folders and drop closed ones.
    fn sync_trackers(&mut self) {
        let open: BTreeSet<String> = self
            .expansion
            .iter()
            .filter(|title| self.tree.find_by_title(title).is_some_and(Node::is_folder))
            .map(str::to_owned)
            .collect();

        let closed: Vec<String> = self
            .highlights
            .keys()
            .filter(|folder| !open.contains(*folder))
            .cloned()
            .collect();
        for folder in closed {
            self.highlights.remove(&folder);
            self.unobserve(&ObservedTarget::Folder(folder));
        }

        for folder in open {
            if !self.highlights.contains_key(&folder) {
                self.observe(ObservedTarget::Folder(folder.clone()));
                let tracker = HighlightTracker::new(
                    folder.clone(),
                    self.config.settle_interval,
                    self.config.settle_window,
                );
                self.highlights.insert(folder, tracker);
            }
        }
    }

    fn restart_highlights(&mut self, now: Instant) {
        for tracker in self.highlights.values_mut() {
            tracker.restart(now, &self.tree, &self.breadcrumbs, &self.geometry);
        }
    }

    fn observe(&mut self, target: ObservedTarget) {
        if self.observations.insert(target.clone()) {
            self.effects.push(Effect::Observe { target });
        }
    }

    fn unobserve(&mut self, target: &ObservedTarget) {
        if self.observations.remove(target) {
            self.effects.push(Effect::Unobserve {
                target: target.clone(),
            });
        }
    }
}

fn owned(titles: Vec<&str>) -> Vec<String> {
    titles.into_iter().map(str::to_owned).collect()
}
