//! Application layer: drag orchestration and document I/O
//!
//! This layer drives the domain algorithms and owns the committed tree.

pub mod controller;
pub mod document;
pub mod error;
pub mod error_ext;
pub mod replay;

pub use controller::{move_node, DragController, HoverUpdate, Move};
pub use document::{load_forest, parse_forest, render_forest, DocumentFormat, TreeDocument};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::{InputKind, IoResultExt, ParseResultExt};
pub use replay::{load_script, replay, Event, Script, StepOutcome, StepReport};
