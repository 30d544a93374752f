//! Expansion-aware ordering of sidebar entries.

use std::collections::HashMap;

use crate::expansion::ExpansionSet;
use crate::tree::PageTree;

/// Titles in the order they appear in the sidebar.
///
/// Depth-first pre-order walk of the tree that descends into a folder only
/// if it is expanded. Used for keyboard traversal and tooltip slide ranking.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibleSequence {
    titles: Vec<String>,
    ranks: HashMap<String, usize>,
}

impl VisibleSequence {
    /// Compute the sequence for a tree and expansion state.
    #[must_use]
    pub fn compute(tree: &PageTree, expansion: &ExpansionSet) -> Self {
        let titles: Vec<String> = tree
            .walk(|folder| expansion.is_expanded(&folder.title))
            .into_iter()
            .map(|node| node.title.clone())
            .collect();

        let mut ranks = HashMap::with_capacity(titles.len());
        for (i, title) in titles.iter().enumerate() {
            ranks.entry(title.clone()).or_insert(i);
        }

        Self { titles, ranks }
    }

    /// Visible titles in order.
    #[must_use]
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Position of a title, `None` if it is hidden or unknown.
    #[must_use]
    pub fn rank(&self, title: &str) -> Option<usize> {
        self.ranks.get(title).copied()
    }

    /// Check whether a title is visible.
    #[must_use]
    pub fn contains(&self, title: &str) -> bool {
        self.ranks.contains_key(title)
    }

    /// First visible title.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.titles.first().map(String::as_str)
    }

    /// Last visible title.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.titles.last().map(String::as_str)
    }

    /// Title after `title`, wrapping to the first after the last.
    ///
    /// A hidden or unknown title moves to the first entry.
    #[must_use]
    pub fn next_after(&self, title: &str) -> Option<&str> {
        match self.rank(title) {
            Some(rank) => self.titles.get((rank + 1) % self.titles.len()),
            None => self.titles.first(),
        }
        .map(String::as_str)
    }

    /// Title before `title`, wrapping to the last before the first.
    ///
    /// A hidden or unknown title moves to the last entry.
    #[must_use]
    pub fn previous_before(&self, title: &str) -> Option<&str> {
        match self.rank(title) {
            Some(0) | None => self.titles.last(),
            Some(rank) => self.titles.get(rank - 1),
        }
        .map(String::as_str)
    }

    /// Number of visible entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// True if nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tree::tests::{nested_tree, sample_tree};
    use crate::tree::{PageTree, TreeNode};

    fn visible(tree: &PageTree, open: &[&str]) -> VisibleSequence {
        let mut expansion = ExpansionSet::new();
        for title in open {
            expansion.expand(title);
        }
        VisibleSequence::compute(tree, &expansion)
    }

    #[test]
    fn test_compute_collapsed_tree_shows_roots() {
        let tree = sample_tree();

        assert_eq!(visible(&tree, &[]).titles(), ["A", "B"]);
    }

    #[test]
    fn test_compute_descends_into_expanded_folders() {
        let tree = sample_tree();

        assert_eq!(visible(&tree, &["A"]).titles(), ["A", "A1", "A2", "B"]);
    }

    #[test]
    fn test_compute_requires_every_ancestor_expanded() {
        let tree = nested_tree();

        // Advanced is open but its parent Guide is not
        let seq = visible(&tree, &["Advanced"]);
        assert_eq!(seq.titles(), ["Guide", "FAQ"]);
        assert!(!seq.contains("Tuning"));

        let seq = visible(&tree, &["Advanced", "Guide"]);
        assert_eq!(
            seq.titles(),
            ["Guide", "Install", "Advanced", "Tuning", "FAQ"]
        );
    }

    #[test]
    fn test_membership_matches_ancestor_expansion() {
        let tree = nested_tree();
        let folders = ["Guide", "Advanced"];

        // Exhaust every subset of the folders
        for mask in 0..4u8 {
            let open: Vec<&str> = folders
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, t)| *t)
                .collect();
            let seq = visible(&tree, &open);
            let guide = open.contains(&"Guide");
            let advanced = open.contains(&"Advanced");

            assert!(seq.contains("Guide") && seq.contains("FAQ"));
            assert_eq!(seq.contains("Install"), guide);
            assert_eq!(seq.contains("Advanced"), guide);
            assert_eq!(seq.contains("Tuning"), guide && advanced);
        }
    }

    #[test]
    fn test_next_after_wraps_to_first() {
        let seq = visible(&sample_tree(), &["A"]);

        assert_eq!(seq.next_after("A1"), Some("A2"));
        assert_eq!(seq.next_after("B"), Some("A"));
    }

    #[test]
    fn test_previous_before_wraps_to_last() {
        let seq = visible(&sample_tree(), &["A"]);

        assert_eq!(seq.previous_before("A2"), Some("A1"));
        assert_eq!(seq.previous_before("A"), Some("B"));
    }

    #[test]
    fn test_hidden_title_moves_to_boundaries() {
        let seq = visible(&sample_tree(), &[]);

        assert_eq!(seq.next_after("A1"), Some("A"));
        assert_eq!(seq.previous_before("A1"), Some("B"));
    }

    #[test]
    fn test_empty_tree_has_no_neighbours() {
        let seq = visible(&PageTree::from_nodes(Vec::new()), &[]);

        assert!(seq.is_empty());
        assert_eq!(seq.next_after("A"), None);
        assert_eq!(seq.previous_before("A"), None);
    }

    #[test]
    fn test_rank_follows_order() {
        let tree = PageTree::from_nodes(vec![
            TreeNode::page("One", "/1"),
            TreeNode::page("Two", "/2"),
        ]);
        let seq = visible(&tree, &[]);

        assert_eq!(seq.rank("One"), Some(0));
        assert_eq!(seq.rank("Two"), Some(1));
        assert_eq!(seq.rank("Three"), None);
        assert_eq!(seq.first(), Some("One"));
        assert_eq!(seq.last(), Some("Two"));
    }
}
