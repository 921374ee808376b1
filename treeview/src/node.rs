//! Tree nodes: the caller-facing builder and the attached node store.
//!
//! Callers describe the forest with owned [`TreeNode`] values. Attaching moves
//! them into a [`NodeStore`], an arena where each node records its ID, level
//! and parent index. Children lists are the only ownership edges; the parent
//! link is a plain index, so walking up the tree never needs a back-pointer.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::{BoxError, Result, TreeviewError};

/// Separator between path segments in node IDs.
pub const ID_SEPARATOR: char = '/';

/// Outcome of a leaf callback.
pub type CallbackResult = std::result::Result<(), BoxError>;

/// Work run when a leaf node is activated.
#[derive(Clone)]
pub enum Callback {
    /// Returns a future, polled on the tokio runtime.
    Async(Arc<dyn Fn() -> BoxFuture<'static, CallbackResult> + Send + Sync>),
    /// A plain function, run on the blocking thread pool.
    Blocking(Arc<dyn Fn() -> CallbackResult + Send + Sync>),
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Async(_) => f.write_str("Callback::Async"),
            Callback::Blocking(_) => f.write_str("Callback::Blocking"),
        }
    }
}

/// A node as supplied by the caller, before it is attached.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub label: String,
    pub children: Vec<TreeNode>,
    pub expanded: bool,
    pub on_activate: Option<Callback>,
}

impl TreeNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
            expanded: false,
            on_activate: None,
        }
    }

    pub fn child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = TreeNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// Run an async callback when this leaf is activated.
    pub fn on_activate<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CallbackResult> + Send + 'static,
    {
        self.on_activate = Some(Callback::Async(Arc::new(move || f().boxed())));
        self
    }

    /// Run a synchronous callback off the calling thread when activated.
    pub fn on_activate_blocking<F>(mut self, f: F) -> Self
    where
        F: Fn() -> CallbackResult + Send + Sync + 'static,
    {
        self.on_activate = Some(Callback::Blocking(Arc::new(f)));
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Position of a node inside a [`NodeStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

/// An attached node.
#[derive(Debug)]
pub struct NodeEntry {
    id: String,
    label: String,
    level: usize,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
    expanded: bool,
    callback: Option<Callback>,
}

impl NodeEntry {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Depth from the root (roots are level 0).
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn callback(&self) -> Option<&Callback> {
        self.callback.as_ref()
    }
}

/// Arena holding the attached forest.
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: Vec<NodeEntry>,
    roots: Vec<NodeIndex>,
    by_id: HashMap<String, NodeIndex>,
}

/// Derive a node ID from its parent's ID and its own label.
pub fn node_id(parent_path: &str, label: &str) -> String {
    if parent_path.is_empty() {
        label.to_string()
    } else {
        format!("{parent_path}{ID_SEPARATOR}{label}")
    }
}

impl NodeStore {
    /// Attach a forest, assigning IDs, levels and parent links depth-first.
    ///
    /// Fails with [`TreeviewError::DuplicateId`] when two nodes derive the
    /// same ID, e.g. siblings sharing a label.
    pub fn attach(roots: Vec<TreeNode>, expand_roots: bool) -> Result<Self> {
        let mut store = Self::default();
        for root in roots {
            let index = store.attach_node(root, None, 0, "")?;
            if expand_roots {
                store.set_expanded(index, true);
            }
            store.roots.push(index);
        }
        Ok(store)
    }

    fn attach_node(
        &mut self,
        node: TreeNode,
        parent: Option<NodeIndex>,
        level: usize,
        path: &str,
    ) -> Result<NodeIndex> {
        let id = node_id(path, &node.label);
        if self.by_id.contains_key(&id) {
            return Err(TreeviewError::DuplicateId { id });
        }

        let index = NodeIndex(self.nodes.len());
        self.by_id.insert(id.clone(), index);
        self.nodes.push(NodeEntry {
            id: id.clone(),
            label: node.label,
            level,
            parent,
            children: Vec::with_capacity(node.children.len()),
            // Only branches can be expanded.
            expanded: node.expanded && !node.children.is_empty(),
            callback: node.on_activate,
        });

        for child in node.children {
            let child_index = self.attach_node(child, Some(index), level + 1, &id)?;
            self.nodes[index.0].children.push(child_index);
        }
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    pub fn get(&self, index: NodeIndex) -> Option<&NodeEntry> {
        self.nodes.get(index.0)
    }

    pub fn lookup(&self, id: &str) -> Option<NodeIndex> {
        self.by_id.get(id).copied()
    }

    /// Set a branch's expansion flag. Returns whether anything changed.
    ///
    /// Leaves are never expanded; calls on them are ignored.
    pub fn set_expanded(&mut self, index: NodeIndex, expanded: bool) -> bool {
        match self.nodes.get_mut(index.0) {
            Some(entry) if entry.has_children() && entry.expanded != expanded => {
                entry.expanded = expanded;
                true
            }
            _ => false,
        }
    }

    /// Flip a branch's expansion flag, returning the new state.
    pub fn toggle(&mut self, index: NodeIndex) -> Option<bool> {
        let expanded = !self.get(index)?.is_expanded();
        self.set_expanded(index, expanded).then_some(expanded)
    }

    /// Ancestor chain of a node, root first, ending with the node itself.
    pub fn path(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut path = Vec::new();
        let mut current = self.get(index).map(|_| index);
        while let Some(i) = current {
            path.push(i);
            current = self.get(i).and_then(NodeEntry::parent);
        }
        path.reverse();
        path
    }
}
