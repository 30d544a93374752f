//! Expanded folder tracking.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::tree::PageTree;

/// Set of folder titles currently open in the sidebar.
///
/// Grows automatically when the route changes (ancestors of the new page are
/// added) and shrinks only through explicit [`collapse`](Self::collapse).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExpansionSet {
    open: BTreeSet<String>,
}

impl ExpansionSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set seeded with the ancestors of the page at `url`.
    #[must_use]
    pub fn for_route(tree: &PageTree, url: &str) -> Self {
        let mut set = Self::new();
        set.sync_route(tree, url);
        set
    }

    /// Open a folder. Returns true if it was closed.
    pub fn expand(&mut self, title: &str) -> bool {
        self.open.insert(title.to_owned())
    }

    /// Close a folder. Returns true if it was open.
    pub fn collapse(&mut self, title: &str) -> bool {
        self.open.remove(title)
    }

    /// Flip a folder between open and closed. Returns the new state.
    pub fn toggle(&mut self, title: &str) -> bool {
        if self.collapse(title) {
            false
        } else {
            self.expand(title)
        }
    }

    /// Check whether a folder is open.
    #[must_use]
    pub fn is_expanded(&self, title: &str) -> bool {
        self.open.contains(title)
    }

    /// Union the ancestor folders of the page at `url` into the set.
    ///
    /// The matched page itself is not added. An unknown url leaves the set
    /// unchanged. Returns true if any folder was newly opened.
    pub fn sync_route(&mut self, tree: &PageTree, url: &str) -> bool {
        let path = tree.find_breadcrumb_path(url);
        let Some((_, ancestors)) = path.split_last() else {
            return false;
        };

        let mut changed = false;
        for title in ancestors {
            changed |= self.expand(title);
        }
        changed
    }

    /// Open folder titles in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.open.iter().map(String::as_str)
    }

    /// Number of open folders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    /// True if no folder is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}
