//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::node::{NodeId, TreePath};

/// Domain errors represent tree construction and structural violations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("no node at tree path: {0}")]
    InvalidPath(TreePath),

    #[error("node does not accept children: {0}")]
    NotAGroup(NodeId),

    #[error("update may not change the id or children of {0}")]
    StructureChanged(NodeId),

    #[error("invalid inside band: lower={lower}, upper={upper} (need 0 <= lower < upper <= 1)")]
    InvalidBand { lower: f64, upper: f64 },

    #[error("invalid main level margin: {0} (need a finite value >= 0)")]
    InvalidMargin(f64),
}

/// Why a drop did not apply.
///
/// Every rejection leaves the committed tree untouched and the drag session cleared.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DropRejection {
    #[error("no drag in progress")]
    NoActiveDrag,

    #[error("cannot drop {0} onto itself")]
    InvalidSelfDrop(NodeId),

    #[error("cannot drop {dragged} into its own descendant {target}")]
    InvalidDescendantDrop { dragged: NodeId, target: NodeId },

    #[error("node not found in current tree: {0}")]
    PathNotFound(NodeId),

    #[error("drop target does not accept children: {0}")]
    UnsupportedInsertTarget(NodeId),
}
