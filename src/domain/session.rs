//! Drag session state.

use std::fmt;

use serde::Serialize;

use crate::domain::node::NodeId;
use crate::domain::position::DropPosition;

/// Reserved textual id for the root-level drop zone.
pub const MAIN_LEVEL_DROP_ID: &str = "__main_level__";

/// What a drop is aimed at: a specific node, or the root level itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum DropTarget {
    Node(NodeId),
    MainLevel,
}

impl DropTarget {
    /// Hosts that carry targets as strings use [`MAIN_LEVEL_DROP_ID`] for the root level.
    pub fn parse(id: &str) -> Self {
        if id == MAIN_LEVEL_DROP_ID {
            DropTarget::MainLevel
        } else {
            DropTarget::Node(NodeId::from(id))
        }
    }

    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            DropTarget::Node(id) => Some(id),
            DropTarget::MainLevel => None,
        }
    }
}

impl From<NodeId> for DropTarget {
    fn from(id: NodeId) -> Self {
        DropTarget::Node(id)
    }
}

impl From<DropTarget> for String {
    fn from(target: DropTarget) -> Self {
        target.to_string()
    }
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropTarget::Node(id) => write!(f, "{id}"),
            DropTarget::MainLevel => f.write_str(MAIN_LEVEL_DROP_ID),
        }
    }
}

/// Coarse phase of a session, derived from its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging,
    Hovering,
}

/// Snapshot of an in-flight drag, consumed by the presentation layer for
/// highlight and insertion-line feedback.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DragSession {
    dragged_item_id: Option<NodeId>,
    drop_target: Option<DropTarget>,
    drop_position: DropPosition,
    show_main_level_zone: bool,
}

impl DragSession {
    pub fn dragged_item_id(&self) -> Option<&NodeId> {
        self.dragged_item_id.as_ref()
    }

    pub fn drop_target(&self) -> Option<&DropTarget> {
        self.drop_target.as_ref()
    }

    pub fn drop_position(&self) -> DropPosition {
        self.drop_position
    }

    pub fn show_main_level_zone(&self) -> bool {
        self.show_main_level_zone
    }

    pub fn state(&self) -> DragState {
        match (&self.dragged_item_id, &self.drop_target) {
            (None, _) => DragState::Idle,
            (Some(_), None) => DragState::Dragging,
            (Some(_), Some(_)) => DragState::Hovering,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state() == DragState::Idle
    }

    /// Start a fresh drag of `id`, dropping whatever was in flight.
    pub(crate) fn begin(&mut self, id: NodeId) {
        *self = Self {
            dragged_item_id: Some(id),
            ..Self::default()
        };
    }

    /// Returns whether anything changed.
    pub(crate) fn retarget(&mut self, target: DropTarget, position: DropPosition) -> bool {
        if self.drop_target.as_ref() == Some(&target) && self.drop_position == position {
            return false;
        }
        self.drop_target = Some(target);
        self.drop_position = position;
        true
    }

    /// Returns whether anything changed.
    pub(crate) fn clear_target(&mut self) -> bool {
        let changed = self.drop_target.is_some() || self.drop_position != DropPosition::Before;
        self.drop_target = None;
        self.drop_position = DropPosition::Before;
        changed
    }

    /// Returns whether anything changed.
    pub(crate) fn set_main_level_zone(&mut self, show: bool) -> bool {
        let changed = self.show_main_level_zone != show;
        self.show_main_level_zone = show;
        changed
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_fresh_session_when_inspecting_then_is_idle() {
        let session = DragSession::default();
        assert_eq!(session.state(), DragState::Idle);
        assert_eq!(session.drop_position(), DropPosition::Before);
        assert!(!session.show_main_level_zone());
    }

    #[test]
    fn given_same_target_and_position_when_retargeting_then_reports_unchanged() {
        let mut session = DragSession::default();
        session.begin("a".into());
        assert_eq!(session.state(), DragState::Dragging);
        assert!(session.retarget(DropTarget::parse("b"), DropPosition::After));
        assert!(!session.retarget(DropTarget::parse("b"), DropPosition::After));
        assert!(session.retarget(DropTarget::parse("b"), DropPosition::Inside));
        assert_eq!(session.state(), DragState::Hovering);
    }

    #[test]
    fn given_sentinel_string_when_parsing_then_targets_main_level() {
        assert_eq!(DropTarget::parse(MAIN_LEVEL_DROP_ID), DropTarget::MainLevel);
        assert_eq!(
            DropTarget::parse("layer-1"),
            DropTarget::Node(NodeId::from("layer-1"))
        );
        assert_eq!(DropTarget::MainLevel.to_string(), MAIN_LEVEL_DROP_ID);
    }

    #[test]
    fn given_hovering_session_when_beginning_again_then_resets() {
        let mut session = DragSession::default();
        session.begin("a".into());
        session.retarget(DropTarget::MainLevel, DropPosition::After);
        session.set_main_level_zone(true);
        session.begin("b".into());
        assert_eq!(session.dragged_item_id(), Some(&NodeId::from("b")));
        assert!(session.drop_target().is_none());
        assert!(!session.show_main_level_zone());
    }
}
