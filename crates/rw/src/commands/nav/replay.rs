//! `rw nav replay` command implementation.
//!
//! Replays a timestamped event script against the engine mounted on a
//! [`RowLayout`], acting as the host: scroll requests move the layout,
//! navigation requests are routed back into the view, and due timers fire
//! between events.
//!
//! Script format:
//!
//! ```json
//! {
//!   "route": "/a1",
//!   "viewportHeight": 400,
//!   "events": [
//!     {"at": 0, "event": "key", "key": "0", "ctrl": true},
//!     {"at": 40, "event": "key", "key": "ArrowDown"},
//!     {"at": 90, "event": "hover_enter", "title": "B"},
//!     {"at": 120, "event": "hover_leave"},
//!     {"at": 600, "event": "tick"}
//!   ]
//! }
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use rw_nav::{
    Effect, EngineConfig, Key, KeyPress, NavigationSnapshot, NavigationView, PageTree,
};
use serde::{Deserialize, Serialize};

use super::layout::{self, RowLayout};
use super::{SourceArgs, engine_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav replay command.
#[derive(Args)]
pub(crate) struct ReplayArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Event script (JSON).
    #[arg(short, long)]
    script: PathBuf,

    /// Print the state right after the last event instead of letting
    /// pending timers run out.
    #[arg(long)]
    no_settle: bool,
}

impl ReplayArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (config, tree) = self.source.load()?;

        let json = std::fs::read_to_string(&self.script).map_err(|e| {
            CliError::Validation(format!(
                "Failed to read script {}: {e}",
                self.script.display()
            ))
        })?;
        let script: Script = serde_json::from_str(&json)?;

        let report = replay(tree, engine_config(&config.navigation), &script, !self.no_settle)?;
        output.json(&report)?;
        Ok(())
    }
}

/// Event script.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Script {
    /// Route the sidebar mounts at.
    route: String,
    /// Visible sidebar height in pixels.
    #[serde(default = "default_viewport_height")]
    viewport_height: f64,
    /// Height of one sidebar row in pixels.
    #[serde(default = "default_row_height")]
    row_height: f64,
    /// Events in chronological order.
    events: Vec<Step>,
}

fn default_viewport_height() -> f64 {
    400.0
}

fn default_row_height() -> f64 {
    28.0
}

/// One scripted event with its offset from mount in milliseconds.
#[derive(Debug, Deserialize)]
struct Step {
    at: u64,
    #[serde(flatten)]
    event: ScriptEvent,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ScriptEvent {
    Navigate {
        url: String,
    },
    Key {
        key: Key,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        meta: bool,
    },
    HoverEnter {
        title: String,
    },
    HoverLeave,
    ClickOutside,
    Scroll {
        #[serde(default)]
        delta: f64,
    },
    Expand {
        title: String,
    },
    Collapse {
        title: String,
    },
    Toggle {
        title: String,
    },
    Tick,
}

/// Effect emitted during replay, stamped with its offset from mount.
#[derive(Debug, Serialize)]
struct EffectRecord {
    at: u64,
    #[serde(flatten)]
    effect: Effect,
}

/// Replay result.
#[derive(Debug, Serialize)]
struct Report {
    snapshot: NavigationSnapshot,
    /// Outcome of every key event: true when the default action was prevented.
    keys: Vec<bool>,
    effects: Vec<EffectRecord>,
    scroll_top: f64,
}

/// Host side of a replay: owns the view and a clock origin.
struct Host {
    view: NavigationView<RowLayout>,
    start: Instant,
    effects: Vec<EffectRecord>,
}

impl Host {
    fn instant(&self, at: u64) -> Instant {
        self.start + Duration::from_millis(at)
    }

    fn offset(&self, now: Instant) -> u64 {
        u64::try_from(now.duration_since(self.start).as_millis()).unwrap_or(u64::MAX)
    }

    /// Fire every timer due at or before `now`, in deadline order.
    fn advance(&mut self, now: Instant) {
        while let Some(deadline) = self.view.next_deadline().filter(|d| *d <= now) {
            self.view.tick(deadline);
            self.settle(deadline);
        }
    }

    /// Fire timers until none remain.
    fn run_out(&mut self) {
        while let Some(deadline) = self.view.next_deadline() {
            self.view.tick(deadline);
            self.settle(deadline);
        }
    }

    /// Apply queued effects and re-lay the sidebar.
    fn settle(&mut self, now: Instant) {
        layout::refresh(&mut self.view, now);
        loop {
            let effects = self.view.drain_effects();
            if effects.is_empty() {
                break;
            }
            for effect in effects {
                match &effect {
                    Effect::ScrollBy { delta } => {
                        self.view.geometry_mut().scroll_by(*delta);
                        self.view.layout_changed(now);
                    }
                    Effect::Navigate { url } => {
                        self.view.navigate_to(url, now);
                        layout::refresh(&mut self.view, now);
                    }
                    Effect::Observe { .. } | Effect::Unobserve { .. } => {}
                }
                let at = self.offset(now);
                self.effects.push(EffectRecord { at, effect });
            }
        }
    }

    /// Dispatch one event. Returns the prevent-default flag for key events.
    fn dispatch(&mut self, event: &ScriptEvent, now: Instant) -> Option<bool> {
        let view = &mut self.view;
        match event {
            ScriptEvent::Navigate { url } => view.navigate_to(url, now),
            ScriptEvent::Key { key, ctrl, meta } => {
                let press = KeyPress {
                    key: *key,
                    ctrl: *ctrl,
                    meta: *meta,
                };
                return Some(view.handle_key(press, now).prevents_default());
            }
            ScriptEvent::HoverEnter { title } => view.start_hover_focus(title, now),
            ScriptEvent::HoverLeave => view.end_hover_focus(now),
            ScriptEvent::ClickOutside => view.click_outside(now),
            ScriptEvent::Scroll { delta } => {
                view.scrolled();
                view.geometry_mut().scroll_by(*delta);
                view.layout_changed(now);
            }
            ScriptEvent::Expand { title } => view.expand(title, now),
            ScriptEvent::Collapse { title } => view.collapse(title, now),
            ScriptEvent::Toggle { title } => view.toggle(title, now),
            ScriptEvent::Tick => {}
        }
        None
    }
}

fn replay(
    tree: Arc<PageTree>,
    config: EngineConfig,
    script: &Script,
    settle: bool,
) -> Result<Report, CliError> {
    if script
        .events
        .windows(2)
        .any(|pair| pair[1].at < pair[0].at)
    {
        return Err(CliError::Validation(
            "Script events must be in chronological order".to_owned(),
        ));
    }

    let start = Instant::now();
    let geometry = RowLayout::new(Arc::clone(&tree), script.viewport_height, script.row_height);
    let mut host = Host {
        view: NavigationView::mount(tree, geometry, config, &script.route, start),
        start,
        effects: Vec::new(),
    };
    host.settle(start);

    let mut keys = Vec::new();
    for step in &script.events {
        let now = host.instant(step.at);
        host.advance(now);
        tracing::debug!(at = step.at, event = ?step.event, "Replaying event");
        if let Some(prevented) = host.dispatch(&step.event, now) {
            keys.push(prevented);
        }
        host.settle(now);
    }
    if settle {
        host.run_out();
    }

    Ok(Report {
        snapshot: host.view.snapshot(),
        keys,
        scroll_top: host.view.geometry().scroll_top(),
        effects: host.effects,
    })
}

#[cfg(test)]
mod tests {
    use rw_nav::{FocusSource, ObservedTarget, TreeNode};

    use super::*;

    fn tree() -> Arc<PageTree> {
        Arc::new(PageTree::from_nodes(vec![
            TreeNode::folder(
                "A",
                vec![TreeNode::page("A1", "/a1"), TreeNode::page("A2", "/a2")],
            ),
            TreeNode::folder("B", vec![TreeNode::page("B1", "/b1")]),
        ]))
    }

    fn script(json: &str) -> Script {
        serde_json::from_str(json).unwrap()
    }

    fn run(json: &str) -> Report {
        replay(tree(), EngineConfig::default(), &script(json), true).unwrap()
    }

    #[test]
    fn test_parse_script_events() {
        let script = script(
            r#"{
                "route": "/a1",
                "events": [
                    {"at": 0, "event": "key", "key": "0", "ctrl": true},
                    {"at": 5, "event": "key", "key": " "},
                    {"at": 10, "event": "hover_enter", "title": "B"},
                    {"at": 20, "event": "scroll"},
                    {"at": 30, "event": "tick"}
                ]
            }"#,
        );

        assert_eq!(script.viewport_height, 400.0);
        assert_eq!(script.events.len(), 5);
        assert!(matches!(
            script.events[0].event,
            ScriptEvent::Key {
                key: Key::Digit0,
                ctrl: true,
                meta: false
            }
        ));
        assert!(matches!(
            script.events[1].event,
            ScriptEvent::Key { key: Key::Space, .. }
        ));
    }

    #[test]
    fn test_keyboard_session() {
        let report = run(r#"{
            "route": "/a1",
            "events": [
                {"at": 0, "event": "key", "key": "ArrowDown"},
                {"at": 10, "event": "key", "key": "0", "meta": true},
                {"at": 20, "event": "key", "key": "ArrowDown"}
            ]
        }"#);

        assert_eq!(report.keys, vec![false, true, true]);
        let focus = report.snapshot.focus.unwrap();
        assert_eq!(focus.title, "A2");
        assert_eq!(focus.source, FocusSource::Keyboard);
    }

    #[test]
    fn test_enter_routes_back_into_view() {
        let report = run(r#"{
            "route": "/a1",
            "events": [
                {"at": 0, "event": "key", "key": "0", "ctrl": true},
                {"at": 10, "event": "key", "key": "ArrowDown"},
                {"at": 20, "event": "key", "key": "ArrowDown"},
                {"at": 30, "event": "key", "key": " "},
                {"at": 40, "event": "key", "key": "ArrowDown"},
                {"at": 50, "event": "key", "key": "Enter"}
            ]
        }"#);

        assert_eq!(report.snapshot.route, "/b1");
        assert_eq!(report.snapshot.breadcrumbs, vec!["B", "B1"]);
        assert!(
            report
                .effects
                .iter()
                .any(|r| r.at == 50 && r.effect == Effect::Navigate { url: "/b1".to_owned() })
        );
    }

    #[test]
    fn test_hover_reenter_keeps_focus() {
        let report = run(r#"{
            "route": "/a1",
            "events": [
                {"at": 0, "event": "hover_enter", "title": "B"},
                {"at": 50, "event": "hover_leave"},
                {"at": 120, "event": "hover_enter", "title": "B"}
            ]
        }"#);

        assert_eq!(report.snapshot.focus.map(|f| f.title), Some("B".to_owned()));
    }

    #[test]
    fn test_hover_leave_settles_to_hidden() {
        let report = run(r#"{
            "route": "/a1",
            "events": [
                {"at": 0, "event": "hover_enter", "title": "A2"},
                {"at": 50, "event": "hover_leave"}
            ]
        }"#);

        assert!(report.snapshot.focus.is_none());
        assert!(report.snapshot.tooltip.current.is_none());
    }

    #[test]
    fn test_focus_below_fold_scrolls_layout() {
        let report = run(r#"{
            "route": "/b1",
            "viewportHeight": 60,
            "events": [
                {"at": 0, "event": "key", "key": "0", "ctrl": true}
            ]
        }"#);

        // /b1 opens only B: rows A, B, B1; B1 spans 56..84 in a 60 px viewport
        assert!(
            report
                .effects
                .iter()
                .any(|r| r.effect == Effect::ScrollBy { delta: 42.0 })
        );
        assert_eq!(report.scroll_top, 24.0);
    }

    #[test]
    fn test_collapse_releases_folder_observation() {
        let report = run(r#"{
            "route": "/a1",
            "events": [
                {"at": 5, "event": "collapse", "title": "A"}
            ]
        }"#);

        assert!(report.effects.iter().any(|r| r.at == 5
            && r.effect
                == Effect::Unobserve {
                    target: ObservedTarget::Folder("A".to_owned())
                }));
        assert!(report.snapshot.expanded.is_empty());
    }

    #[test]
    fn test_out_of_order_script_is_rejected() {
        let script = script(r#"{
            "route": "/a1",
            "events": [
                {"at": 10, "event": "tick"},
                {"at": 5, "event": "tick"}
            ]
        }"#);

        let err = replay(tree(), EngineConfig::default(), &script, true).unwrap_err();

        assert!(err.to_string().contains("chronological"));
    }

    #[test]
    fn test_report_serialization() {
        let report = run(r#"{"route": "/a1", "events": []}"#);

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["snapshot"]["route"], "/a1");
        assert_eq!(json["effects"][0]["at"], 0);
        assert_eq!(json["effects"][0]["effect"], "observe");
        assert_eq!(json["effects"][0]["target"]["kind"], "tooltip");
    }
}
