//! Keyboard traversal of the sidebar.
//!
//! The traversal state is derived from the [`FocusCoordinator`]: `Unfocused`
//! when nothing is focused, `Focused(title)` otherwise. Arrow keys walk the
//! [`VisibleSequence`] with wraparound, Space and the horizontal arrows open
//! and close folders, Enter requests navigation to a page.

use serde::Deserialize;

use crate::expansion::ExpansionSet;
use crate::focus::FocusCoordinator;
use crate::tree::{Node, NodeKind, PageTree};
use crate::visible::VisibleSequence;

/// Keys the sidebar reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum Key {
    /// The `0` digit, used with Ctrl or Cmd to enter keyboard mode.
    #[serde(rename = "0")]
    Digit0,
    /// Down arrow.
    ArrowDown,
    /// Up arrow.
    ArrowUp,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Space bar.
    #[serde(rename = " ", alias = "Space")]
    Space,
    /// Enter.
    Enter,
    /// Escape.
    Escape,
}

/// Key press with modifier state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct KeyPress {
    /// Pressed key.
    pub key: Key,
    /// Control held.
    #[serde(default)]
    pub ctrl: bool,
    /// Command (meta) held.
    #[serde(default)]
    pub meta: bool,
}

impl KeyPress {
    /// Key press without modifiers.
    #[must_use]
    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
        }
    }

    /// Key press with Ctrl held.
    #[must_use]
    pub const fn ctrl(key: Key) -> Self {
        Self {
            key,
            ctrl: true,
            meta: false,
        }
    }

    fn is_focus_shortcut(self) -> bool {
        self.key == Key::Digit0 && (self.ctrl || self.meta)
    }
}

/// Traversal state derived from the focus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraversalState {
    /// Nothing focused.
    Unfocused,
    /// An entry is focused.
    Focused(String),
}

impl TraversalState {
    /// Derive the state from the focus coordinator.
    #[must_use]
    pub fn of(focus: &FocusCoordinator) -> Self {
        focus
            .title()
            .map_or(Self::Unfocused, |title| Self::Focused(title.to_owned()))
    }
}

/// Result of handling a key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not a sidebar key in the current state; let the browser handle it.
    Ignored,
    /// Consumed; the caller must prevent the default action.
    Handled(Transition),
}

impl KeyOutcome {
    /// True if the default browser action must be suppressed.
    #[must_use]
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

/// What a handled key changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Guard not met; nothing changed.
    None,
    /// Focus moved or was established.
    Focus,
    /// Focus was cleared.
    Blur,
    /// The focused folder was opened or closed.
    Expansion,
    /// Navigation to the url was requested.
    Navigate(String),
}

/// Mutable state the traversal operates on.
pub struct TraversalContext<'a> {
    /// Page tree.
    pub tree: &'a PageTree,
    /// Expanded folders.
    pub expansion: &'a mut ExpansionSet,
    /// Focus coordinator.
    pub focus: &'a mut FocusCoordinator,
    /// Visible sequence for the current expansion state.
    pub visible: &'a VisibleSequence,
    /// Title of the page matching the current route.
    pub current_title: Option<&'a str>,
}

/// Handle a key press.
///
/// The caller recomputes the visible sequence after a
/// [`Transition::Expansion`] and performs the navigation of a
/// [`Transition::Navigate`].
pub fn handle_key(press: KeyPress, ctx: &mut TraversalContext<'_>) -> KeyOutcome {
    if press.is_focus_shortcut() {
        let changed = ctx.focus.start_keyboard_focus(ctx.visible, ctx.current_title);
        return KeyOutcome::Handled(if changed {
            Transition::Focus
        } else {
            Transition::None
        });
    }

    let TraversalState::Focused(title) = TraversalState::of(ctx.focus) else {
        return KeyOutcome::Ignored;
    };

    let visible = ctx.visible;
    let transition = match press.key {
        Key::Digit0 => return KeyOutcome::Ignored,
        Key::ArrowDown => move_to(ctx, visible.next_after(&title)),
        Key::ArrowUp => move_to(ctx, visible.previous_before(&title)),
        Key::Escape => {
            ctx.focus.end_keyboard_focus();
            Transition::Blur
        }
        Key::Space => with_folder(ctx, &title, |expansion, title| {
            expansion.toggle(title);
            true
        }),
        Key::ArrowRight => with_folder(ctx, &title, ExpansionSet::expand),
        Key::ArrowLeft => with_folder(ctx, &title, ExpansionSet::collapse),
        Key::Enter => match ctx.tree.find_by_title(&title).map(|n| &n.kind) {
            Some(NodeKind::Page(info)) => Transition::Navigate(info.url.clone()),
            _ => Transition::None,
        },
    };

    tracing::debug!(key = ?press.key, %title, ?transition, "Key handled");
    KeyOutcome::Handled(transition)
}

fn move_to(ctx: &mut TraversalContext<'_>, target: Option<&str>) -> Transition {
    match target {
        Some(target) if ctx.focus.focus_keyboard(target) => Transition::Focus,
        _ => Transition::None,
    }
}

/// Apply `change` to the expansion state if `title` is a folder.
fn with_folder(
    ctx: &mut TraversalContext<'_>,
    title: &str,
    change: impl FnOnce(&mut ExpansionSet, &str) -> bool,
) -> Transition {
    let is_folder = ctx.tree.find_by_title(title).is_some_and(Node::is_folder);
    if is_folder && change(&mut *ctx.expansion, title) {
        Transition::Expansion
    } else {
        Transition::None
    }
}
