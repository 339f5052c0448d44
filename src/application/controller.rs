//! Drag-and-drop orchestration over a committed forest.
//!
//! The controller owns the committed tree and the drag session. Pointer events
//! update the session; a drop validates, removes, re-resolves the target path
//! against the post-removal tree, inserts, and only then commits.

use tracing::{debug, info, instrument, trace};

use crate::application::ApplicationResult;
use crate::config::EngineSettings;
use crate::domain::{
    classify, Destination, DomainError, DragSession, DropPosition, DropRejection, DropTarget,
    Forest, InsideBand, NodeId, PointerSample,
};

/// Default width of the main-level zone along the container's left edge.
pub const DEFAULT_MAIN_LEVEL_MARGIN: f64 = 30.0;

/// Outcome of a pointer event.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverUpdate {
    /// False when the event left target and position as they were, or was ignored.
    pub changed: bool,
    pub session: DragSession,
}

/// A committed move: where the dragged node ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub id: NodeId,
    pub destination: Destination,
}

#[derive(Debug, Clone)]
pub struct DragController<P> {
    forest: Forest<P>,
    session: DragSession,
    band: InsideBand,
    main_level_margin: f64,
}

impl<P: Clone> DragController<P> {
    pub fn new(forest: Forest<P>) -> Self {
        Self {
            forest,
            session: DragSession::default(),
            band: InsideBand::default(),
            main_level_margin: DEFAULT_MAIN_LEVEL_MARGIN,
        }
    }

    pub fn from_settings(forest: Forest<P>, settings: &EngineSettings) -> ApplicationResult<Self> {
        let band = InsideBand::new(settings.inside_band_lower, settings.inside_band_upper)?;
        Ok(Self::new(forest)
            .with_band(band)
            .with_main_level_margin(settings.main_level_margin)?)
    }

    pub fn with_band(mut self, band: InsideBand) -> Self {
        self.band = band;
        self
    }

    /// The margin must be finite and non-negative.
    pub fn with_main_level_margin(mut self, margin: f64) -> Result<Self, DomainError> {
        if !margin.is_finite() || margin < 0.0 {
            return Err(DomainError::InvalidMargin(margin));
        }
        self.main_level_margin = margin;
        Ok(self)
    }

    pub fn forest(&self) -> &Forest<P> {
        &self.forest
    }

    pub fn into_forest(self) -> Forest<P> {
        self.forest
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    /// Swap in a tree changed outside the engine; an in-flight drag keeps going
    /// and is validated against the new tree on drop.
    pub fn replace_forest(&mut self, forest: Forest<P>) {
        self.forest = forest;
    }

    #[instrument(level = "debug", skip(self))]
    pub fn begin_drag(&mut self, id: NodeId) {
        self.session.begin(id);
    }

    /// Pointer moving over `target`.
    ///
    /// Ignored without a drag, over the dragged node itself, over one of its
    /// descendants, or over an id the tree does not contain.
    #[instrument(level = "trace", skip(self, pointer))]
    pub fn hover(&mut self, target: &NodeId, pointer: &PointerSample) -> HoverUpdate {
        let Some(group_capable) = self.accepts_hover(target) else {
            return self.update(false);
        };
        let position = classify(pointer, group_capable, &self.band);
        let changed = self
            .session
            .retarget(DropTarget::Node(target.clone()), position);
        if changed {
            debug!("drop target {} ({})", target, position);
        }
        self.update(changed)
    }

    /// Pointer entering `target`: a coarse before/after split at the midpoint.
    ///
    /// Subsequent [`hover`](Self::hover) events refine it to `inside` on groups.
    #[instrument(level = "trace", skip(self, pointer))]
    pub fn enter(&mut self, target: &NodeId, pointer: &PointerSample) -> HoverUpdate {
        if self.accepts_hover(target).is_none() {
            return self.update(false);
        }
        let position = classify(pointer, false, &self.band);
        let changed = self
            .session
            .retarget(DropTarget::Node(target.clone()), position);
        self.update(changed)
    }

    /// Pointer leaving the current target element.
    ///
    /// Moving onto a nested child is not leaving: the target only clears once
    /// the pointer is outside the element's bounds.
    #[instrument(level = "trace", skip(self))]
    pub fn leave(&mut self, pointer: &PointerSample) -> HoverUpdate {
        if !pointer.has_left() {
            return self.update(false);
        }
        let changed = self.session.clear_target();
        self.update(changed)
    }

    /// Pointer moving over the tree container.
    ///
    /// Within the main-level margin of the left edge the zone shows and the
    /// root level becomes the target; moving out hides it again.
    #[instrument(level = "trace", skip(self))]
    pub fn track_container(&mut self, pointer: &PointerSample) -> HoverUpdate {
        if self.session.is_idle() {
            return self.update(false);
        }
        let in_zone = pointer.in_main_level_zone(self.main_level_margin);
        let mut changed = self.session.set_main_level_zone(in_zone);
        if in_zone {
            changed |= self
                .session
                .retarget(DropTarget::MainLevel, DropPosition::After);
        } else if self.session.drop_target() == Some(&DropTarget::MainLevel) {
            changed |= self.session.clear_target();
        }
        self.update(changed)
    }

    /// Pointer over the explicit main-level zone element.
    #[instrument(level = "trace", skip(self))]
    pub fn hover_main_level(&mut self) -> HoverUpdate {
        if self.session.is_idle() {
            return self.update(false);
        }
        let changed = self
            .session
            .retarget(DropTarget::MainLevel, DropPosition::After);
        self.update(changed)
    }

    /// Drop the dragged node on `target` at the session's recorded position.
    ///
    /// The session is cleared whatever the outcome; on rejection the committed
    /// tree is untouched.
    #[instrument(level = "debug", skip(self))]
    pub fn drop_on(&mut self, target: &DropTarget) -> Result<Move, DropRejection> {
        let position = self.session.drop_position();
        let result = self
            .dragged()
            .and_then(|dragged| self.commit(&dragged, target, position));
        self.session.clear();
        result
    }

    /// Append the dragged node as the last child of `group`, whatever position
    /// the pointer last suggested.
    #[instrument(level = "debug", skip(self))]
    pub fn drop_at_end(&mut self, group: &NodeId) -> Result<Move, DropRejection> {
        let target = DropTarget::Node(group.clone());
        let result = self
            .dragged()
            .and_then(|dragged| self.commit(&dragged, &target, DropPosition::Inside));
        self.session.clear();
        result
    }

    /// Cancel the drag; the tree stays as it is.
    #[instrument(level = "debug", skip(self))]
    pub fn end_drag(&mut self) {
        self.session.clear();
    }

    fn dragged(&self) -> Result<NodeId, DropRejection> {
        self.session
            .dragged_item_id()
            .cloned()
            .ok_or(DropRejection::NoActiveDrag)
    }

    fn commit(
        &mut self,
        dragged: &NodeId,
        target: &DropTarget,
        position: DropPosition,
    ) -> Result<Move, DropRejection> {
        match move_node(&self.forest, dragged, target, position) {
            Ok((forest, destination)) => {
                info!(
                    "moved {} to {} under {:?} at {}",
                    dragged, target, destination.parent, destination.index
                );
                self.forest = forest;
                Ok(Move {
                    id: dragged.clone(),
                    destination,
                })
            }
            Err(rejection) => {
                debug!("drop rejected: {}", rejection);
                Err(rejection)
            }
        }
    }

    /// Group capability of a valid hover target, `None` when the hover is ignored.
    fn accepts_hover(&self, target: &NodeId) -> Option<bool> {
        let dragged = self.session.dragged_item_id()?;
        if dragged == target || self.forest.is_descendant(dragged, target) {
            trace!("ignoring hover over {}", target);
            return None;
        }
        self.forest.find_node(target).map(|node| node.is_group())
    }

    fn update(&self, changed: bool) -> HoverUpdate {
        HoverUpdate {
            changed,
            session: self.session.clone(),
        }
    }
}

/// Move `dragged` relative to `target` and return the resulting tree together
/// with the node's new location. `forest` itself is never modified.
///
/// Validation order: self drop, unknown dragged node, root-level drop,
/// descendant drop, unknown target, `inside` on a layer. Sibling indices
/// shift on removal, so the target path is resolved again on the
/// intermediate tree before inserting.
#[instrument(level = "debug", skip(forest))]
pub fn move_node<P: Clone>(
    forest: &Forest<P>,
    dragged: &NodeId,
    target: &DropTarget,
    position: DropPosition,
) -> Result<(Forest<P>, Destination), DropRejection> {
    let not_found = |id: &NodeId| DropRejection::PathNotFound(id.clone());

    if target.node_id() == Some(dragged) {
        return Err(DropRejection::InvalidSelfDrop(dragged.clone()));
    }

    let dragged_path = forest.find_path(dragged).ok_or_else(|| not_found(dragged))?;

    let moved = match target {
        DropTarget::MainLevel => {
            let (rest, removed) = forest.remove_at_path(&dragged_path);
            let removed = removed.ok_or_else(|| not_found(dragged))?;
            let mut roots = rest.into_roots();
            roots.push(removed);
            Forest::from_roots_unchecked(roots)
        }
        DropTarget::Node(target_id) => {
            if forest.is_descendant(dragged, target_id) {
                return Err(DropRejection::InvalidDescendantDrop {
                    dragged: dragged.clone(),
                    target: target_id.clone(),
                });
            }
            let target_node = forest.find_node(target_id).ok_or_else(|| not_found(target_id))?;
            if position == DropPosition::Inside && !target_node.is_group() {
                return Err(DropRejection::UnsupportedInsertTarget(target_id.clone()));
            }

            let (rest, removed) = forest.remove_at_path(&dragged_path);
            let removed = removed.ok_or_else(|| not_found(dragged))?;
            let target_path = rest.find_path(target_id).ok_or_else(|| not_found(target_id))?;
            trace!("target {} re-resolved to {}", target_id, target_path);

            rest.insert_at_path(removed, &target_path, position)
                .map_err(|e| match e {
                    DomainError::NotAGroup(id) => DropRejection::UnsupportedInsertTarget(id),
                    _ => not_found(target_id),
                })?
        }
    };

    let destination = moved.destination_of(dragged).ok_or_else(|| not_found(dragged))?;
    Ok((moved, destination))
}
