//! Page tree for sidebar navigation.
//!
//! The tree is produced once by an external generator and is immutable for
//! the engine's lifetime. [`TreeNode`] is the nested wire form; [`PageTree`]
//! is the indexed form every other component queries.
//!
//! # Architecture
//!
//! Nodes are stored in a flat `Vec<Node>` in depth-first pre-order, with
//! parent/children relationships tracked by indices. This provides:
//! - O(1) title and url lookups via `HashMap` indexes
//! - O(d) breadcrumb building where d is the node depth
//! - Leaf ordering that is simply the arena order filtered to pages
//!
//! Titles are expected to be globally unique and urls unique among pages.
//! The tree does not validate this; on duplicates the first node in
//! pre-order wins.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Page tree node as produced by the tree generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    /// Navigable leaf.
    Page {
        /// Display title, unique across the tree.
        title: String,
        /// Route of the page, unique among pages.
        url: String,
        /// Short summary shown in the preview tooltip.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// Last update stamp shown in the preview tooltip.
        #[serde(
            default,
            rename = "lastUpdated",
            skip_serializing_if = "Option::is_none"
        )]
        last_updated: Option<String>,
    },
    /// Group of child nodes without a url of its own.
    Folder {
        /// Display title, unique across the tree.
        title: String,
        /// Ordered children.
        children: Vec<TreeNode>,
    },
}

impl TreeNode {
    /// Create a page node without description or update stamp.
    #[must_use]
    pub fn page(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Page {
            title: title.into(),
            url: url.into(),
            description: None,
            last_updated: None,
        }
    }

    /// Create a folder node.
    #[must_use]
    pub fn folder(title: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self::Folder {
            title: title.into(),
            children,
        }
    }

    /// Node title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Page { title, .. } | Self::Folder { title, .. } => title,
        }
    }
}

/// Page-specific data of a [`Node`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageInfo {
    /// Route of the page.
    pub url: String,
    /// Short summary.
    pub description: Option<String>,
    /// Last update stamp.
    pub last_updated: Option<String>,
}

/// Kind of an indexed node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Navigable leaf.
    Page(PageInfo),
    /// Group of child nodes.
    Folder,
}

/// Indexed tree node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    /// Display title.
    pub title: String,
    /// Page data or folder marker.
    pub kind: NodeKind,
}

impl Node {
    /// True if this node is a folder.
    #[must_use]
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder)
    }

    /// Page url, `None` for folders.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Page(info) => Some(&info.url),
            NodeKind::Folder => None,
        }
    }

    /// Page data, `None` for folders.
    #[must_use]
    pub fn page(&self) -> Option<&PageInfo> {
        match &self.kind {
            NodeKind::Page(info) => Some(info),
            NodeKind::Folder => None,
        }
    }
}

/// Neighbours of a page in reading order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrevNext<'a> {
    /// Page before the current one, `None` on the first page.
    pub previous: Option<&'a Node>,
    /// Page after the current one, `None` on the last page.
    pub next: Option<&'a Node>,
}

/// Error returned when a page tree cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The tree document is not valid JSON or does not match the node schema.
    #[error("Invalid page tree: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable page tree with title and url indexes.
pub struct PageTree {
    nodes: Vec<Node>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    roots: Vec<usize>,
    title_index: HashMap<String, usize>,
    url_index: HashMap<String, usize>,
    leaves: Vec<usize>,
}

impl PageTree {
    /// Build the indexed tree from root nodes.
    #[must_use]
    pub fn from_nodes(roots: Vec<TreeNode>) -> Self {
        let mut builder = PageTreeBuilder::default();
        for node in roots {
            builder.push(node, None);
        }
        builder.build()
    }

    /// Parse a JSON array of root nodes.
    ///
    /// # Errors
    ///
    /// Returns `TreeError::Parse` if the document is not a valid node array.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let roots: Vec<TreeNode> = serde_json::from_str(json)?;
        Ok(Self::from_nodes(roots))
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find a node by title.
    #[must_use]
    pub fn find_by_title(&self, title: &str) -> Option<&Node> {
        self.title_index.get(title).map(|&i| &self.nodes[i])
    }

    /// Titles from root to the page with the given url, leaf included.
    ///
    /// Returns an empty path if no page has this url.
    #[must_use]
    pub fn find_breadcrumb_path(&self, url: &str) -> Vec<&str> {
        let Some(&idx) = self.url_index.get(url) else {
            return Vec::new();
        };

        let mut path = Vec::new();
        let mut current = Some(idx);
        while let Some(i) = current {
            path.push(self.nodes[i].title.as_str());
            current = self.parents[i];
        }
        path.reverse();
        path
    }

    /// All pages in depth-first order, regardless of expansion state.
    #[must_use]
    pub fn flatten(&self) -> Vec<&Node> {
        self.leaves.iter().map(|&i| &self.nodes[i]).collect()
    }

    /// Previous and next pages in reading order.
    ///
    /// Uses the full leaf ordering and does not wrap around. Both neighbours
    /// are `None` for an unknown url.
    #[must_use]
    pub fn compute_prev_next(&self, url: &str) -> PrevNext<'_> {
        let Some(&idx) = self.url_index.get(url) else {
            return PrevNext::default();
        };
        let Some(pos) = self.leaves.iter().position(|&i| i == idx) else {
            return PrevNext::default();
        };

        PrevNext {
            previous: pos
                .checked_sub(1)
                .and_then(|p| self.leaves.get(p))
                .map(|&i| &self.nodes[i]),
            next: self.leaves.get(pos + 1).map(|&i| &self.nodes[i]),
        }
    }

    /// Direct children of a folder, empty for pages and unknown titles.
    #[must_use]
    pub fn children(&self, title: &str) -> Vec<&Node> {
        self.title_index
            .get(title)
            .map(|&i| self.children[i].iter().map(|&c| &self.nodes[c]).collect())
            .unwrap_or_default()
    }

    /// Number of pages anywhere beneath a folder.
    #[must_use]
    pub fn page_count(&self, title: &str) -> usize {
        fn count(idx: usize, tree: &PageTree) -> usize {
            if tree.children[idx].is_empty() {
                usize::from(!tree.nodes[idx].is_folder())
            } else {
                tree.children[idx].iter().map(|&c| count(c, tree)).sum()
            }
        }

        self.title_index
            .get(title)
            .filter(|&&i| self.nodes[i].is_folder())
            .map_or(0, |&i| count(i, self))
    }

    /// Walk nodes in pre-order, descending into a folder only when
    /// `descend` returns true for it.
    pub(crate) fn walk<'a>(&'a self, mut descend: impl FnMut(&Node) -> bool) -> Vec<&'a Node> {
        fn visit<'a>(
            idx: usize,
            tree: &'a PageTree,
            descend: &mut impl FnMut(&Node) -> bool,
            out: &mut Vec<&'a Node>,
        ) {
            let node = &tree.nodes[idx];
            out.push(node);
            if node.is_folder() && descend(node) {
                for &child in &tree.children[idx] {
                    visit(child, tree, descend, out);
                }
            }
        }

        let mut out = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            visit(root, self, &mut descend, &mut out);
        }
        out
    }
}

/// Builder that flattens nested [`TreeNode`]s into the arena in pre-order.
#[derive(Default)]
struct PageTreeBuilder {
    nodes: Vec<Node>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    roots: Vec<usize>,
}

impl PageTreeBuilder {
    fn push(&mut self, node: TreeNode, parent: Option<usize>) -> usize {
        let idx = self.nodes.len();
        self.children.push(Vec::new());
        self.parents.push(parent);
        if let Some(parent) = parent {
            self.children[parent].push(idx);
        } else {
            self.roots.push(idx);
        }

        match node {
            TreeNode::Page {
                title,
                url,
                description,
                last_updated,
            } => {
                self.nodes.push(Node {
                    title,
                    kind: NodeKind::Page(PageInfo {
                        url,
                        description,
                        last_updated,
                    }),
                });
            }
            TreeNode::Folder { title, children } => {
                self.nodes.push(Node {
                    title,
                    kind: NodeKind::Folder,
                });
                for child in children {
                    self.push(child, Some(idx));
                }
            }
        }

        idx
    }

    fn build(self) -> PageTree {
        let mut title_index = HashMap::with_capacity(self.nodes.len());
        let mut url_index = HashMap::new();
        let mut leaves = Vec::new();

        for (i, node) in self.nodes.iter().enumerate() {
            title_index.entry(node.title.clone()).or_insert(i);
            if let Some(url) = node.url() {
                url_index.entry(url.to_owned()).or_insert(i);
                leaves.push(i);
            }
        }

        PageTree {
            nodes: self.nodes,
            children: self.children,
            parents: self.parents,
            roots: self.roots,
            title_index,
            url_index,
            leaves,
        }
    }
}
