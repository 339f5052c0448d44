//! Pure structural mutations.
//!
//! Each operation returns a new forest. Only the ancestor chain along the
//! touched path is copied; every other subtree is shared with the input.

use std::collections::HashSet;
use std::rc::Rc;

use tracing::{instrument, trace};

use crate::domain::error::DomainError;
use crate::domain::node::{Forest, Node, NodeId, NodeRef, TreePath};
use crate::domain::position::DropPosition;

impl<P: Clone> Forest<P> {
    /// Splice the node at `path` out of its parent's children.
    ///
    /// Returns the input unchanged and `None` when `path` addresses nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_at_path(&self, path: &TreePath) -> (Forest<P>, Option<NodeRef<P>>) {
        let Some((&last, parents)) = path.as_slice().split_last() else {
            return (self.clone(), None);
        };

        let mut roots = self.roots().to_vec();
        let Some(siblings) = siblings_mut(&mut roots, parents) else {
            return (self.clone(), None);
        };
        if last >= siblings.len() {
            return (self.clone(), None);
        }
        let removed = siblings.remove(last);
        trace!("removed {} at {}", removed.id, path);

        (Forest::from_roots_unchecked(roots), Some(removed))
    }

    /// Insert `node` relative to the node at `path`.
    ///
    /// - empty `path` (root level): `Before` prepends, anything else appends
    /// - `Inside`: appended to the target's children and the target is expanded
    /// - `Before`/`After`: spliced at the target's sibling index, or the one after
    ///
    /// Any id of the inserted subtree that is already present is a `DuplicateId`.
    #[instrument(level = "debug", skip(self, node), fields(node = %node.id))]
    pub fn insert_at_path(
        &self,
        node: NodeRef<P>,
        path: &TreePath,
        position: DropPosition,
    ) -> Result<Forest<P>, DomainError> {
        self.ensure_insertable(&node)?;
        let mut roots = self.roots().to_vec();

        let Some((&last, parents)) = path.as_slice().split_last() else {
            match position {
                DropPosition::Before => roots.insert(0, node),
                DropPosition::After | DropPosition::Inside => roots.push(node),
            }
            return Ok(Forest::from_roots_unchecked(roots));
        };

        let siblings =
            siblings_mut(&mut roots, parents).ok_or_else(|| DomainError::InvalidPath(path.clone()))?;
        if last >= siblings.len() {
            return Err(DomainError::InvalidPath(path.clone()));
        }

        match position {
            DropPosition::Inside => {
                if !siblings[last].is_group() {
                    return Err(DomainError::NotAGroup(siblings[last].id.clone()));
                }
                let target = Rc::make_mut(&mut siblings[last]);
                target.children.get_or_insert_with(Vec::new).push(node);
                target.expanded = true;
            }
            DropPosition::Before => siblings.insert(last, node),
            DropPosition::After => siblings.insert(last + 1, node),
        }

        Ok(Forest::from_roots_unchecked(roots))
    }

    /// Apply `f` to the node `id`.
    ///
    /// `f` may change the payload and `expanded`; changing the id or the
    /// children list is rejected with `StructureChanged`.
    pub fn update_node<F>(&self, id: &NodeId, f: F) -> Result<Forest<P>, DomainError>
    where
        F: FnOnce(&mut Node<P>),
    {
        let path = self
            .find_path(id)
            .ok_or_else(|| DomainError::NodeNotFound(id.clone()))?;
        let Some((&last, parents)) = path.as_slice().split_last() else {
            return Err(DomainError::InvalidPath(path.clone()));
        };

        let mut roots = self.roots().to_vec();
        let siblings =
            siblings_mut(&mut roots, parents).ok_or_else(|| DomainError::InvalidPath(path.clone()))?;
        let node = siblings
            .get_mut(last)
            .ok_or_else(|| DomainError::InvalidPath(path.clone()))?;
        let children_before = node.children.clone();
        let node = Rc::make_mut(node);
        f(node);
        if node.id != *id || !same_children(&children_before, &node.children) {
            return Err(DomainError::StructureChanged(id.clone()));
        }
        Ok(Forest::from_roots_unchecked(roots))
    }

    fn ensure_insertable(&self, node: &NodeRef<P>) -> Result<(), DomainError> {
        let mut seen: HashSet<&NodeId> = self.iter().map(|(_, n)| &n.id).collect();
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            if !seen.insert(&current.id) {
                return Err(DomainError::DuplicateId(current.id.clone()));
            }
            pending.extend(current.children());
        }
        Ok(())
    }
}

fn same_children<P>(before: &Option<Vec<NodeRef<P>>>, after: &Option<Vec<NodeRef<P>>>) -> bool {
    match (before, after) {
        (None, None) => true,
        (Some(a), Some(b)) => a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Rc::ptr_eq(x, y)),
        _ => false,
    }
}

/// Children list reached by walking `parents`, copying each ancestor on the way.
fn siblings_mut<'a, P: Clone>(
    roots: &'a mut Vec<NodeRef<P>>,
    parents: &[usize],
) -> Option<&'a mut Vec<NodeRef<P>>> {
    let mut siblings = roots;
    for &index in parents {
        let node = Rc::make_mut(siblings.get_mut(index)?);
        siblings = node.children.as_mut()?;
    }
    Some(siblings)
}
