//! Path resolution and validity checks over a forest snapshot.
//!
//! Everything here is read-only. Paths and nodes found here must be
//! re-resolved after every structural mutation because sibling indices shift.

use tracing::instrument;

use crate::domain::node::{Forest, NodeId, NodeRef, TreePath};

/// Where a node sits: its parent group (`None` at root level) and its index
/// among that parent's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub parent: Option<NodeId>,
    pub index: usize,
}

impl<P> Forest<P> {
    /// Path to the first node with `id` in depth-first preorder.
    #[instrument(level = "trace", skip(self))]
    pub fn find_path(&self, id: &NodeId) -> Option<TreePath> {
        find_path_in(self.roots(), id, &TreePath::root())
    }

    /// The node itself, found with the same traversal as [`Forest::find_path`].
    #[instrument(level = "trace", skip(self))]
    pub fn find_node(&self, id: &NodeId) -> Option<&NodeRef<P>> {
        find_node_in(self.roots(), id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.find_node(id).is_some()
    }

    /// Node addressed by `path` in this snapshot.
    pub fn node_at(&self, path: &TreePath) -> Option<&NodeRef<P>> {
        let (&first, rest) = path.as_slice().split_first()?;
        let mut node = self.roots().get(first)?;
        for &index in rest {
            node = node.children().get(index)?;
        }
        Some(node)
    }

    /// True iff `candidate` occurs anywhere below `ancestor`'s children.
    ///
    /// A node is not its own descendant; an unknown `ancestor` or a layer
    /// without children has no descendants.
    #[instrument(level = "trace", skip(self))]
    pub fn is_descendant(&self, ancestor: &NodeId, candidate: &NodeId) -> bool {
        match self.find_node(ancestor) {
            Some(node) => find_node_in(node.children(), candidate).is_some(),
            None => false,
        }
    }

    /// Parent group of `id`; `None` when the node is at root level or absent.
    pub fn find_parent(&self, id: &NodeId) -> Option<&NodeRef<P>> {
        let path = self.find_path(id)?;
        let parent_len = path.len().checked_sub(1)?;
        let parent_path = TreePath::from(path.as_slice()[..parent_len].to_vec());
        self.node_at(&parent_path)
    }

    /// Parent and sibling index of `id`.
    pub fn destination_of(&self, id: &NodeId) -> Option<Destination> {
        let path = self.find_path(id)?;
        let index = path.last()?;
        Some(Destination {
            parent: self.find_parent(id).map(|parent| parent.id.clone()),
            index,
        })
    }
}

fn find_path_in<P>(nodes: &[NodeRef<P>], id: &NodeId, current: &TreePath) -> Option<TreePath> {
    for (index, node) in nodes.iter().enumerate() {
        let path = current.child(index);
        if node.id == *id {
            return Some(path);
        }
        if let Some(found) = find_path_in(node.children(), id, &path) {
            return Some(found);
        }
    }
    None
}

fn find_node_in<'a, P>(nodes: &'a [NodeRef<P>], id: &NodeId) -> Option<&'a NodeRef<P>> {
    for node in nodes {
        if node.id == *id {
            return Some(node);
        }
        if let Some(found) = find_node_in(node.children(), id) {
            return Some(found);
        }
    }
    None
}
