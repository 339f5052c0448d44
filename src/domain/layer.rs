//! Map layer payload and layer-panel helpers.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::error::DomainError;
use crate::domain::node::{Forest, Node, NodeId, NodeRef};

/// Kind of a map layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Group,
    #[default]
    Vector,
    Raster,
    Wms,
}

/// Kind selector for [`Forest::filter_by_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Vector,
    Raster,
    Wms,
}

impl FromStr for KindFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(KindFilter::All),
            "vector" => Ok(KindFilter::Vector),
            "raster" => Ok(KindFilter::Raster),
            "wms" => Ok(KindFilter::Wms),
            other => Err(format!("unknown layer kind: {other} (expected all, vector, raster or wms)")),
        }
    }
}

impl KindFilter {
    fn matches(&self, kind: LayerKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Vector => kind == LayerKind::Vector,
            KindFilter::Raster => kind == LayerKind::Raster,
            KindFilter::Wms => kind == LayerKind::Wms,
        }
    }
}

/// Payload carried by every layer tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerMeta {
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(rename = "type", default)]
    pub kind: LayerKind,
}

fn default_visible() -> bool {
    true
}

impl LayerMeta {
    pub fn new(name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            name: name.into(),
            visible: true,
            kind,
        }
    }
}

impl fmt::Display for LayerMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.visible {
            write!(f, " (hidden)")?;
        }
        Ok(())
    }
}

pub type Layer = Node<LayerMeta>;
pub type LayerForest = Forest<LayerMeta>;

/// Group node with a `Group` payload.
pub fn group(id: &str, name: &str, children: Vec<Layer>) -> Layer {
    Node::group(id, LayerMeta::new(name, LayerKind::Group), children)
}

/// Plain layer node.
pub fn layer(id: &str, name: &str, kind: LayerKind) -> Layer {
    Node::leaf(id, LayerMeta::new(name, kind))
}

impl<P: Clone> Forest<P> {
    pub fn toggle_expansion(&self, id: &NodeId) -> Result<Forest<P>, DomainError> {
        self.update_node(id, |node| node.expanded = !node.expanded)
    }

    /// Expand or collapse every group.
    #[instrument(level = "debug", skip(self))]
    pub fn set_all_expanded(&self, expanded: bool) -> Forest<P> {
        fn walk<P: Clone>(nodes: &[NodeRef<P>], expanded: bool) -> Vec<NodeRef<P>> {
            nodes
                .iter()
                .map(|node| match &node.children {
                    None => Rc::clone(node),
                    Some(children) => Rc::new(Node {
                        id: node.id.clone(),
                        expanded,
                        payload: node.payload.clone(),
                        children: Some(walk(children, expanded)),
                    }),
                })
                .collect()
        }
        Forest::from_roots_unchecked(walk(self.roots(), expanded))
    }
}

impl<P> Forest<P> {
    /// Number of plain layers (nodes that cannot hold children).
    pub fn count_layers(&self) -> usize {
        self.iter().filter(|(_, node)| !node.is_group()).count()
    }

    pub fn count_groups(&self) -> usize {
        self.iter().filter(|(_, node)| node.is_group()).count()
    }
}

impl Forest<LayerMeta> {
    pub fn toggle_visibility(&self, id: &NodeId) -> Result<Self, DomainError> {
        self.update_node(id, |node| node.payload.visible = !node.payload.visible)
    }

    /// Visible plain layers in preorder.
    pub fn visible_layers(&self) -> Vec<&NodeRef<LayerMeta>> {
        self.iter()
            .filter(|(_, node)| !node.is_group() && node.payload.visible)
            .map(|(_, node)| node)
            .collect()
    }

    /// Case-insensitive name search.
    ///
    /// A node is kept when its name matches or any descendant matches. Kept
    /// groups carry only their matching children, so a group that matches by
    /// name alone comes back empty.
    #[instrument(level = "debug", skip(self))]
    pub fn filter_by_name(&self, term: &str) -> Self {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.clone();
        }

        fn walk(nodes: &[NodeRef<LayerMeta>], term: &str) -> Vec<NodeRef<LayerMeta>> {
            let mut kept = Vec::new();
            for node in nodes {
                let name_matches = node.payload.name.to_lowercase().contains(term);
                match &node.children {
                    None if name_matches => kept.push(Rc::clone(node)),
                    None => {}
                    Some(children) => {
                        let children = walk(children, term);
                        if name_matches || !children.is_empty() {
                            kept.push(Rc::new(Node {
                                children: Some(children),
                                ..Node::clone(node)
                            }));
                        }
                    }
                }
            }
            kept
        }
        Forest::from_roots_unchecked(walk(self.roots(), &term))
    }

    /// Keep layers of the selected kind; groups survive only while they still
    /// contain a match.
    #[instrument(level = "debug", skip(self))]
    pub fn filter_by_kind(&self, filter: KindFilter) -> Self {
        if filter == KindFilter::All {
            return self.clone();
        }

        fn walk(nodes: &[NodeRef<LayerMeta>], filter: KindFilter) -> Vec<NodeRef<LayerMeta>> {
            let mut kept = Vec::new();
            for node in nodes {
                if node.is_group() {
                    let children = walk(node.children(), filter);
                    if !children.is_empty() {
                        kept.push(Rc::new(Node {
                            children: Some(children),
                            ..Node::clone(node)
                        }));
                    }
                } else if filter.matches(node.payload.kind) {
                    kept.push(Rc::clone(node));
                }
            }
            kept
        }
        Forest::from_roots_unchecked(walk(self.roots(), filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // roads (group)
    // ├── Highways (vector)
    // └── Ortho (raster, hidden)
    // Base WMS (wms)
    fn sample() -> LayerForest {
        let mut ortho = layer("ortho", "Ortho", LayerKind::Raster);
        ortho.payload.visible = false;
        Forest::new(vec![
            group(
                "roads",
                "Roads",
                vec![layer("hw", "Highways", LayerKind::Vector), ortho],
            ),
            layer("base", "Base WMS", LayerKind::Wms),
        ])
        .unwrap()
    }

    #[test]
    fn given_layers_when_counting_then_separates_groups() {
        let forest = sample();
        assert_eq!(forest.count_layers(), 3);
        assert_eq!(forest.count_groups(), 1);
        let visible: Vec<&str> = forest
            .visible_layers()
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(visible, vec!["hw", "base"]);
    }

    #[test]
    fn given_child_match_when_filtering_by_name_then_keeps_parent_group() {
        let filtered = sample().filter_by_name("HIGH");
        assert_eq!(filtered.order(), vec!["roads".into(), "hw".into()] as Vec<NodeId>);
    }

    #[test]
    fn given_group_name_match_without_child_matches_when_filtering_then_group_is_emptied() {
        let filtered = sample().filter_by_name("roads");
        assert_eq!(filtered.order(), vec![NodeId::from("roads")]);
        let roads = filtered.find_node(&"roads".into()).unwrap();
        assert!(roads.is_group());
        assert!(roads.children().is_empty());
    }

    #[test]
    fn given_blank_term_when_filtering_by_name_then_returns_everything() {
        let forest = sample();
        assert_eq!(forest.filter_by_name("   "), forest);
    }

    #[test]
    fn given_kind_filter_when_filtering_then_drops_empty_groups() {
        let forest = sample();
        let wms = forest.filter_by_kind(KindFilter::Wms);
        assert_eq!(wms.order(), vec![NodeId::from("base")]);
        let raster = forest.filter_by_kind(KindFilter::Raster);
        assert_eq!(raster.order(), vec![NodeId::from("roads"), NodeId::from("ortho")]);
    }

    #[test]
    fn given_layer_when_toggling_visibility_then_flips_flag() {
        let forest = sample();
        let toggled = forest.toggle_visibility(&"ortho".into()).unwrap();
        assert!(toggled.find_node(&"ortho".into()).unwrap().payload.visible);
        assert!(!forest.find_node(&"ortho".into()).unwrap().payload.visible);
    }

    #[test]
    fn given_groups_when_expanding_all_then_every_group_is_expanded() {
        let forest = sample().set_all_expanded(true);
        assert!(forest.find_node(&"roads".into()).unwrap().expanded);
        let collapsed = forest.set_all_expanded(false);
        assert!(!collapsed.find_node(&"roads".into()).unwrap().expanded);
        let toggled = collapsed.toggle_expansion(&"roads".into()).unwrap();
        assert!(toggled.find_node(&"roads".into()).unwrap().expanded);
    }
}
