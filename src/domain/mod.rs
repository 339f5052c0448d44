//! Domain layer: tree types and reordering algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod layer;
pub mod mutate;
pub mod node;
pub mod position;
pub mod resolve;
pub mod session;

pub use arena::{ArenaNode, LayerArena};
pub use error::{DomainError, DropRejection};
pub use layer::{KindFilter, Layer, LayerForest, LayerKind, LayerMeta};
pub use node::{Forest, Node, NodeId, NodeRef, PreorderIter, TreePath};
pub use position::{classify, DropPosition, InsideBand, PointerSample, Rect};
pub use resolve::Destination;
pub use session::{DragSession, DragState, DropTarget, MAIN_LEVEL_DROP_ID};
