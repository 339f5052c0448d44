use std::fmt::Display;

use termtree::Tree;
use tracing::instrument;

use crate::domain::{Forest, Node};

/// Render as a `termtree` for terminal output.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<P: Display> TreeNodeConvert for Node<P> {
    fn to_tree_string(&self) -> Tree<String> {
        let mut label = format!("{} [{}]", self.payload, self.id);
        if self.is_group() {
            label.push_str(if self.expanded { " (+)" } else { " (-)" });
        }

        let leaves: Vec<_> = self
            .children()
            .iter()
            .map(|child| child.to_tree_string())
            .collect();

        Tree::new(label).with_leaves(leaves)
    }
}

// A forest has no single root; the roots hang off a "." node.
impl<P: Display> TreeNodeConvert for Forest<P> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        if self.is_empty() {
            return Tree::new("Empty tree".to_string());
        }
        let leaves: Vec<_> = self.roots().iter().map(|root| root.to_tree_string()).collect();
        Tree::new(".".to_string()).with_leaves(leaves)
    }
}
