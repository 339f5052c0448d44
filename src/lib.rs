//! Hierarchical layer tree reordering engine.
//!
//! - [`domain`]: tree model, path resolution, drop classification, pure mutations
//! - [`application`]: the drag controller plus document and script I/O
//! - [`cli`]: command line front end

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree_traits;
pub mod util;
