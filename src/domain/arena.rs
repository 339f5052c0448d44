use std::collections::HashMap;
use std::rc::Rc;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::error::DropRejection;
use crate::domain::node::{Forest, Node, NodeId, NodeRef};
use crate::domain::position::DropPosition;
use crate::domain::resolve::Destination;
use crate::domain::session::DropTarget;

/// Arena slot for one node.
#[derive(Debug, Clone)]
pub struct ArenaNode<P> {
    pub id: NodeId,
    pub payload: P,
    pub expanded: bool,
    /// Index of parent node in the arena, None for root-level nodes
    pub parent: Option<Index>,
    /// Child indices; `None` for nodes that cannot hold children
    pub children: Option<Vec<Index>>,
}

/// Flat, id-indexed representation of a forest for large trees.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Moves relink indices in place instead of copying ancestor chains, and
/// descendant checks walk parent links (O(depth)) instead of searching subtrees.
#[derive(Debug)]
pub struct LayerArena<P> {
    arena: Arena<ArenaNode<P>>,
    roots: Vec<Index>,
    by_id: HashMap<NodeId, Index>,
}

impl<P: Clone> LayerArena<P> {
    #[instrument(level = "debug", skip(forest))]
    pub fn from_forest(forest: &Forest<P>) -> Self {
        let mut tree = Self {
            arena: Arena::with_capacity(forest.len()),
            roots: Vec::new(),
            by_id: HashMap::new(),
        };
        for root in forest.roots() {
            let idx = tree.insert_subtree(root, None);
            tree.roots.push(idx);
        }
        tree
    }

    fn insert_subtree(&mut self, node: &NodeRef<P>, parent: Option<Index>) -> Index {
        let idx = self.arena.insert(ArenaNode {
            id: node.id.clone(),
            payload: node.payload.clone(),
            expanded: node.expanded,
            parent,
            children: node.children.as_ref().map(|_| Vec::new()),
        });
        self.by_id.insert(node.id.clone(), idx);

        for child in node.children() {
            let child_idx = self.insert_subtree(child, Some(idx));
            if let Some(children) = self.arena.get_mut(idx).and_then(|n| n.children.as_mut()) {
                children.push(child_idx);
            }
        }
        idx
    }

    /// Rebuild the nested representation.
    #[instrument(level = "debug", skip(self))]
    pub fn to_forest(&self) -> Forest<P> {
        let roots = self
            .roots
            .iter()
            .filter_map(|&idx| self.build_node(idx))
            .map(Rc::new)
            .collect();
        Forest::from_roots_unchecked(roots)
    }

    fn build_node(&self, idx: Index) -> Option<Node<P>> {
        let slot = self.arena.get(idx)?;
        let children = slot.children.as_ref().map(|children| {
            children
                .iter()
                .filter_map(|&child| self.build_node(child))
                .map(Rc::new)
                .collect()
        });
        Some(Node {
            id: slot.id.clone(),
            expanded: slot.expanded,
            payload: slot.payload.clone(),
            children,
        })
    }
}

impl<P> LayerArena<P> {
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn index_of(&self, id: &NodeId) -> Option<Index> {
        self.by_id.get(id).copied()
    }

    pub fn get(&self, idx: Index) -> Option<&ArenaNode<P>> {
        self.arena.get(idx)
    }

    pub fn node(&self, id: &NodeId) -> Option<&ArenaNode<P>> {
        self.index_of(id).and_then(|idx| self.arena.get(idx))
    }

    pub fn parent_of(&self, id: &NodeId) -> Option<&NodeId> {
        let parent = self.node(id)?.parent?;
        self.arena.get(parent).map(|p| &p.id)
    }

    /// Same contract as [`Forest::is_descendant`].
    pub fn is_descendant(&self, ancestor: &NodeId, candidate: &NodeId) -> bool {
        let (Some(ancestor), Some(candidate)) = (self.index_of(ancestor), self.index_of(candidate))
        else {
            return false;
        };
        let mut current = self.arena.get(candidate).and_then(|n| n.parent);
        while let Some(idx) = current {
            if idx == ancestor {
                return true;
            }
            current = self.arena.get(idx).and_then(|n| n.parent);
        }
        false
    }

    fn siblings_of(&self, idx: Index) -> Option<&Vec<Index>> {
        match self.arena.get(idx)?.parent {
            Some(parent) => self.arena.get(parent)?.children.as_ref(),
            None => Some(&self.roots),
        }
    }

    fn siblings_of_mut(&mut self, parent: Option<Index>) -> Option<&mut Vec<Index>> {
        match parent {
            Some(parent) => self.arena.get_mut(parent)?.children.as_mut(),
            None => Some(&mut self.roots),
        }
    }

    /// Move `dragged` relative to `target`, with the same outcome as a
    /// path-based drop on the equivalent forest.
    ///
    /// All validation happens before any link is touched, so a rejection
    /// leaves the arena unchanged.
    #[instrument(level = "debug", skip(self))]
    pub fn relocate(
        &mut self,
        dragged: &NodeId,
        target: &DropTarget,
        position: DropPosition,
    ) -> Result<Destination, DropRejection> {
        if target.node_id() == Some(dragged) {
            return Err(DropRejection::InvalidSelfDrop(dragged.clone()));
        }
        let dragged_idx = self
            .index_of(dragged)
            .ok_or_else(|| DropRejection::PathNotFound(dragged.clone()))?;

        let target_idx = match target {
            DropTarget::MainLevel => None,
            DropTarget::Node(target_id) => {
                if self.is_descendant(dragged, target_id) {
                    return Err(DropRejection::InvalidDescendantDrop {
                        dragged: dragged.clone(),
                        target: target_id.clone(),
                    });
                }
                let idx = self
                    .index_of(target_id)
                    .ok_or_else(|| DropRejection::PathNotFound(target_id.clone()))?;
                if position == DropPosition::Inside
                    && self.arena.get(idx).and_then(|n| n.children.as_ref()).is_none()
                {
                    return Err(DropRejection::UnsupportedInsertTarget(target_id.clone()));
                }
                Some(idx)
            }
        };

        self.detach(dragged_idx)
            .ok_or_else(|| DropRejection::PathNotFound(dragged.clone()))?;

        let (parent, index) = match target_idx {
            None => {
                self.roots.push(dragged_idx);
                (None, self.roots.len() - 1)
            }
            Some(target_idx) if position == DropPosition::Inside => {
                let children = self
                    .siblings_of_mut(Some(target_idx))
                    .ok_or_else(|| DropRejection::PathNotFound(dragged.clone()))?;
                children.push(dragged_idx);
                let index = children.len() - 1;
                if let Some(slot) = self.arena.get_mut(target_idx) {
                    slot.expanded = true;
                }
                (Some(target_idx), index)
            }
            Some(target_idx) => {
                // sibling index resolved after detaching, so it already accounts for the shift
                let parent = self.arena.get(target_idx).and_then(|n| n.parent);
                let offset = self
                    .siblings_of(target_idx)
                    .and_then(|siblings| siblings.iter().position(|&i| i == target_idx))
                    .ok_or_else(|| DropRejection::PathNotFound(dragged.clone()))?;
                let index = match position {
                    DropPosition::After => offset + 1,
                    _ => offset,
                };
                let siblings = self
                    .siblings_of_mut(parent)
                    .ok_or_else(|| DropRejection::PathNotFound(dragged.clone()))?;
                siblings.insert(index, dragged_idx);
                (parent, index)
            }
        };

        if let Some(slot) = self.arena.get_mut(dragged_idx) {
            slot.parent = parent;
        }
        let parent = parent.and_then(|p| self.arena.get(p)).map(|p| p.id.clone());
        debug!("relocated {} under {:?} at {}", dragged, parent, index);
        Ok(Destination { parent, index })
    }

    fn detach(&mut self, idx: Index) -> Option<()> {
        let parent = self.arena.get(idx)?.parent;
        let siblings = self.siblings_of_mut(parent)?;
        let offset = siblings.iter().position(|&i| i == idx)?;
        siblings.remove(offset);
        Some(())
    }
}
