//! Focus coordination between pointer hover and keyboard navigation.
//!
//! A single element is focused at a time. Hover focus is released through a
//! short debounce so that the pointer can briefly leave an entry (for
//! example, to move into the tooltip) without the focus flickering to none.
//! Keyboard focus always wins: any keyboard-sourced change cancels a pending
//! hover exit.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::timer::Timer;
use crate::visible::VisibleSequence;

/// Default delay before hover focus is released.
pub const DEFAULT_HOVER_EXIT_DELAY: Duration = Duration::from_millis(150);

/// What caused the current focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusSource {
    /// Pointer hover.
    Hover,
    /// Keyboard navigation.
    Keyboard,
}

/// Focused sidebar entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Focus {
    /// Title of the focused entry.
    pub title: String,
    /// What caused the focus.
    pub source: FocusSource,
}

/// Single source of truth for the focused entry.
#[derive(Debug)]
pub struct FocusCoordinator {
    current: Option<Focus>,
    hover_exit: Timer,
    hover_exit_delay: Duration,
}

impl Default for FocusCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_HOVER_EXIT_DELAY)
    }
}

impl FocusCoordinator {
    /// Create a coordinator with nothing focused.
    #[must_use]
    pub fn new(hover_exit_delay: Duration) -> Self {
        Self {
            current: None,
            hover_exit: Timer::new(),
            hover_exit_delay,
        }
    }

    /// Current focus.
    #[must_use]
    pub fn current(&self) -> Option<&Focus> {
        self.current.as_ref()
    }

    /// Title of the focused entry.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.current.as_ref().map(|f| f.title.as_str())
    }

    /// True if a hover exit is pending.
    #[must_use]
    pub fn is_exit_pending(&self) -> bool {
        self.hover_exit.is_armed()
    }

    /// Pending hover exit deadline.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.hover_exit.deadline()
    }

    /// Pointer entered an entry. Returns true if the focus changed.
    pub fn start_hover_focus(&mut self, title: &str) -> bool {
        if self.hover_exit.cancel() {
            tracing::trace!(title, "Hover exit cancelled");
        }
        self.set(title, FocusSource::Hover)
    }

    /// Pointer left an entry.
    ///
    /// Arms the delayed clear only when the focus came from hover; keyboard
    /// focus is unaffected by the pointer.
    pub fn end_hover_focus(&mut self, now: Instant) {
        if matches!(&self.current, Some(f) if f.source == FocusSource::Hover) {
            self.hover_exit.arm(now, self.hover_exit_delay);
            tracing::trace!(delay = ?self.hover_exit_delay, "Hover exit armed");
        }
    }

    /// Enter keyboard mode. Returns true if the focus changed.
    ///
    /// An existing focus keeps its title and becomes keyboard-sourced.
    /// Otherwise focuses `current_title` if it is visible, else the first
    /// visible entry.
    pub fn start_keyboard_focus(
        &mut self,
        visible: &VisibleSequence,
        current_title: Option<&str>,
    ) -> bool {
        self.hover_exit.cancel();

        if let Some(focus) = &mut self.current {
            focus.source = FocusSource::Keyboard;
            return false;
        }

        let target = current_title
            .filter(|title| visible.contains(title))
            .or_else(|| visible.first());
        match target {
            Some(title) => {
                let title = title.to_owned();
                self.set(&title, FocusSource::Keyboard)
            }
            None => false,
        }
    }

    /// Move keyboard focus to `title`. Returns true if the focus changed.
    pub fn focus_keyboard(&mut self, title: &str) -> bool {
        self.hover_exit.cancel();
        self.set(title, FocusSource::Keyboard)
    }

    /// Clear the focus immediately. Returns true if something was focused.
    pub fn end_keyboard_focus(&mut self) -> bool {
        self.hover_exit.cancel();
        self.clear()
    }

    /// Fire the hover exit if due. Returns true if the focus was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.hover_exit.fire(now) {
            return false;
        }
        if matches!(&self.current, Some(f) if f.source == FocusSource::Hover) {
            self.clear()
        } else {
            false
        }
    }

    /// Cancel pending timers.
    pub fn dispose(&mut self) {
        self.hover_exit.cancel();
    }

    fn set(&mut self, title: &str, source: FocusSource) -> bool {
        let next = Focus {
            title: title.to_owned(),
            source,
        };
        if self.current.as_ref() == Some(&next) {
            return false;
        }
        let moved = self.title() != Some(title);
        tracing::debug!(title, ?source, "Focus set");
        self.current = Some(next);
        moved
    }

    fn clear(&mut self) -> bool {
        let cleared = self.current.take();
        if let Some(focus) = &cleared {
            tracing::debug!(title = %focus.title, "Focus cleared");
        }
        cleared.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expansion::ExpansionSet;
    use crate::tree::tests::sample_tree;

    const MS: Duration = Duration::from_millis(1);

    fn visible(open: &[&str]) -> VisibleSequence {
        let mut expansion = ExpansionSet::new();
        for title in open {
            expansion.expand(title);
        }
        VisibleSequence::compute(&sample_tree(), &expansion)
    }

    #[test]
    fn test_start_hover_focus_sets_focus_immediately() {
        let mut focus = FocusCoordinator::default();

        assert!(focus.start_hover_focus("B"));

        assert_eq!(
            focus.current(),
            Some(&Focus {
                title: "B".to_owned(),
                source: FocusSource::Hover,
            })
        );
    }

    #[test]
    fn test_end_hover_focus_clears_after_delay() {
        let start = Instant::now();
        let mut focus = FocusCoordinator::default();
        focus.start_hover_focus("B");

        focus.end_hover_focus(start);

        assert!(!focus.tick(start + 149 * MS));
        assert_eq!(focus.title(), Some("B"));
        assert!(focus.tick(start + 150 * MS));
        assert_eq!(focus.title(), None);
    }

    #[test]
    fn test_reenter_before_delay_keeps_focus() {
        let start = Instant::now();
        let mut focus = FocusCoordinator::default();
        focus.start_hover_focus("B");
        focus.end_hover_focus(start);

        // Every observable state between leave and re-enter keeps focus
        for t in [10u32, 50, 100] {
            focus.tick(start + t * MS);
            assert_eq!(focus.title(), Some("B"));
        }
        assert!(!focus.start_hover_focus("B"));

        assert!(!focus.tick(start + 500 * MS));
        assert_eq!(focus.title(), Some("B"));
    }

    #[test]
    fn test_end_hover_focus_ignores_keyboard_focus() {
        let start = Instant::now();
        let mut focus = FocusCoordinator::default();
        focus.focus_keyboard("A");

        focus.end_hover_focus(start);

        assert!(!focus.is_exit_pending());
        assert!(!focus.tick(start + 200 * MS));
        assert_eq!(focus.title(), Some("A"));
    }

    #[test]
    fn test_keyboard_focus_cancels_pending_hover_exit() {
        let start = Instant::now();
        let mut focus = FocusCoordinator::default();
        focus.start_hover_focus("B");
        focus.end_hover_focus(start);

        focus.focus_keyboard("A");

        assert!(!focus.is_exit_pending());
        assert!(!focus.tick(start + 200 * MS));
        assert_eq!(focus.current().unwrap().source, FocusSource::Keyboard);
    }

    #[test]
    fn test_start_keyboard_focus_prefers_current_page() {
        let mut focus = FocusCoordinator::default();

        assert!(focus.start_keyboard_focus(&visible(&["A"]), Some("A1")));

        assert_eq!(focus.title(), Some("A1"));
    }

    #[test]
    fn test_start_keyboard_focus_hidden_current_page_uses_first() {
        let mut focus = FocusCoordinator::default();

        assert!(focus.start_keyboard_focus(&visible(&[]), Some("A1")));

        assert_eq!(focus.title(), Some("A"));
    }

    #[test]
    fn test_start_keyboard_focus_is_idempotent() {
        let mut focus = FocusCoordinator::default();
        let seq = visible(&["A"]);
        focus.start_keyboard_focus(&seq, Some("A1"));
        focus.focus_keyboard("A2");

        assert!(!focus.start_keyboard_focus(&seq, Some("A1")));

        assert_eq!(focus.title(), Some("A2"));
    }

    #[test]
    fn test_start_keyboard_focus_adopts_hover_focus() {
        let start = Instant::now();
        let mut focus = FocusCoordinator::default();
        focus.start_hover_focus("B");
        focus.end_hover_focus(start);

        assert!(!focus.start_keyboard_focus(&visible(&[]), None));

        assert!(!focus.tick(start + 200 * MS));
        assert_eq!(focus.title(), Some("B"));
        assert_eq!(focus.current().unwrap().source, FocusSource::Keyboard);
    }

    #[test]
    fn test_start_keyboard_focus_empty_sequence() {
        let mut focus = FocusCoordinator::default();

        assert!(!focus.start_keyboard_focus(&VisibleSequence::default(), None));
        assert!(focus.current().is_none());
    }

    #[test]
    fn test_end_keyboard_focus_clears_immediately() {
        let mut focus = FocusCoordinator::default();
        focus.focus_keyboard("A");

        assert!(focus.end_keyboard_focus());
        assert!(focus.current().is_none());
        assert!(!focus.end_keyboard_focus());
    }
}
