use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::error::DomainError;

/// Unique identifier of a node across the whole tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Shared handle to a node.
///
/// Subtrees are shared between tree snapshots; a mutation copies only the
/// ancestor chain of the node it touches (see `Rc::make_mut`).
pub type NodeRef<P> = Rc<Node<P>>;

/// Entry in the hierarchy: a layer, or a group of layers.
///
/// `children` being `Some` (even empty) marks the node as group-capable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<P> {
    pub id: NodeId,
    /// UI hint: the group is unfolded. Set when a node is dropped inside it.
    #[serde(default, skip_serializing_if = "is_false")]
    pub expanded: bool,
    #[serde(flatten)]
    pub payload: P,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeRef<P>>>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl<P> Node<P> {
    pub fn leaf(id: impl Into<NodeId>, payload: P) -> Self {
        Self {
            id: id.into(),
            expanded: false,
            payload,
            children: None,
        }
    }

    pub fn group(id: impl Into<NodeId>, payload: P, children: Vec<Node<P>>) -> Self {
        Self {
            id: id.into(),
            expanded: false,
            payload,
            children: Some(children.into_iter().map(Rc::new).collect()),
        }
    }

    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn is_group(&self) -> bool {
        self.children.is_some()
    }

    /// Children in order; empty for layers and empty groups alike.
    pub fn children(&self) -> &[NodeRef<P>] {
        self.children.as_deref().unwrap_or(&[])
    }

    fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(|child| child.depth())
            .max()
            .unwrap_or(0)
    }
}

/// Sibling indices from the root level down to a node.
///
/// Only valid for the tree snapshot it was resolved against: any insert or
/// removal shifts the indices of later siblings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TreePath(Vec<usize>);

impl TreePath {
    /// The empty path, addressing the root level itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the addressed node among its siblings.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }
}

impl From<Vec<usize>> for TreePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

/// Ordered root level of a hierarchy.
///
/// Construction guarantees that ids are unique across the whole tree; all
/// structural operations return new forests and preserve that guarantee.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Forest<P> {
    roots: Vec<NodeRef<P>>,
}

impl<P> Default for Forest<P> {
    fn default() -> Self {
        Self { roots: Vec::new() }
    }
}

impl<P> Forest<P> {
    pub fn new(roots: Vec<Node<P>>) -> Result<Self, DomainError> {
        Self::from_refs(roots.into_iter().map(Rc::new).collect())
    }

    pub fn from_refs(roots: Vec<NodeRef<P>>) -> Result<Self, DomainError> {
        let forest = Self { roots };
        forest.ensure_unique_ids()?;
        Ok(forest)
    }

    /// Caller guarantees uniqueness (used by operations that only move nodes).
    pub(crate) fn from_roots_unchecked(roots: Vec<NodeRef<P>>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[NodeRef<P>] {
        &self.roots
    }

    pub fn into_roots(self) -> Vec<NodeRef<P>> {
        self.roots
    }

    /// Total number of nodes, groups included.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots.iter().map(|root| root.depth()).max().unwrap_or(0)
    }

    /// Depth-first preorder walk yielding each node with its path.
    pub fn iter(&self) -> PreorderIter<'_, P> {
        PreorderIter::new(self)
    }

    /// All ids in preorder (the flat layer order a backend persists).
    pub fn order(&self) -> Vec<NodeId> {
        self.iter().map(|(_, node)| node.id.clone()).collect()
    }

    #[instrument(level = "trace", skip(self))]
    fn ensure_unique_ids(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for (_, node) in self.iter() {
            if !seen.insert(&node.id) {
                return Err(DomainError::DuplicateId(node.id.clone()));
            }
        }
        Ok(())
    }
}

pub struct PreorderIter<'a, P> {
    stack: Vec<(TreePath, &'a NodeRef<P>)>,
}

impl<'a, P> PreorderIter<'a, P> {
    fn new(forest: &'a Forest<P>) -> Self {
        let stack = forest
            .roots
            .iter()
            .enumerate()
            .rev()
            .map(|(index, node)| (TreePath::root().child(index), node))
            .collect();
        Self { stack }
    }
}

impl<'a, P> Iterator for PreorderIter<'a, P> {
    type Item = (TreePath, &'a NodeRef<P>);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for (index, child) in node.children().iter().enumerate().rev() {
            self.stack.push((path.child(index), child));
        }
        Some((path, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str) -> Node<()> {
        Node::leaf(id, ())
    }

    fn group(id: &str, children: Vec<Node<()>>) -> Node<()> {
        Node::group(id, (), children)
    }

    #[test]
    fn given_nested_forest_when_iterating_then_yields_preorder_with_paths() {
        let forest = Forest::new(vec![
            group("a", vec![leaf("b"), group("c", vec![leaf("e")])]),
            leaf("d"),
        ])
        .unwrap();

        let visited: Vec<(String, String)> = forest
            .iter()
            .map(|(path, node)| (path.to_string(), node.id.to_string()))
            .collect();

        assert_eq!(
            visited,
            vec![
                ("/0".to_string(), "a".to_string()),
                ("/0/0".to_string(), "b".to_string()),
                ("/0/1".to_string(), "c".to_string()),
                ("/0/1/0".to_string(), "e".to_string()),
                ("/1".to_string(), "d".to_string()),
            ]
        );
    }

    #[test]
    fn given_duplicate_ids_when_constructing_then_rejects() {
        let result = Forest::new(vec![group("a", vec![leaf("b")]), leaf("b")]);
        assert_eq!(result, Err(DomainError::DuplicateId(NodeId::from("b"))));
    }

    #[test]
    fn given_empty_group_when_asking_then_is_group_capable() {
        let node = group("a", vec![]);
        assert!(node.is_group());
        assert!(node.children().is_empty());
        assert!(!leaf("b").is_group());
    }

    #[test]
    fn given_forest_when_measuring_then_reports_depth_and_len() {
        let forest = Forest::new(vec![
            group("a", vec![group("b", vec![leaf("c")])]),
            leaf("d"),
        ])
        .unwrap();
        assert_eq!(forest.depth(), 3);
        assert_eq!(forest.len(), 4);
        assert_eq!(Forest::<()>::default().depth(), 0);
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Tag {
        label: String,
    }

    #[test]
    fn given_payload_without_default_when_deserializing_then_children_are_optional() {
        let json = r#"[
            {"id": "a", "label": "Group", "children": [{"id": "b", "label": "Leaf"}]},
            {"id": "c", "label": "Loose"}
        ]"#;
        let nodes: Vec<Node<Tag>> = serde_json::from_str(json).unwrap();
        assert!(nodes[0].is_group());
        assert_eq!(nodes[0].children()[0].payload.label, "Leaf");
        assert!(!nodes[1].is_group());
        assert!(!nodes[1].expanded);
    }
}
