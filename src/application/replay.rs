//! Scripted pointer-event replay.
//!
//! A script is the sequence of events a presentation layer would deliver,
//! written down as data so a drag interaction can be reproduced from the CLI
//! or a test.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::controller::{DragController, Move};
use crate::application::document::{expand_path, DocumentFormat};
use crate::application::{ApplicationResult, InputKind, IoResultExt, ParseResultExt};
use crate::domain::{DropRejection, DropTarget, NodeId, PointerSample, Rect};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    BeginDrag {
        id: NodeId,
    },
    Enter {
        target: NodeId,
        bounds: Rect,
        x: f64,
        y: f64,
    },
    Hover {
        target: NodeId,
        bounds: Rect,
        x: f64,
        y: f64,
    },
    Leave {
        bounds: Rect,
        x: f64,
        y: f64,
    },
    /// Pointer over the tree container (main-level zone detection).
    Container {
        bounds: Rect,
        x: f64,
        y: f64,
    },
    MainLevel,
    /// `target` may be the main-level sentinel id.
    Drop {
        target: String,
    },
    DropAtEnd {
        group: NodeId,
    },
    EndDrag,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Started,
    Session { changed: bool },
    Moved(Move),
    Rejected(DropRejection),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub step: usize,
    pub event: Event,
    pub outcome: StepOutcome,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::BeginDrag { id } => write!(f, "begin_drag {id}"),
            Event::Enter { target, .. } => write!(f, "enter {target}"),
            Event::Hover { target, .. } => write!(f, "hover {target}"),
            Event::Leave { .. } => write!(f, "leave"),
            Event::Container { .. } => write!(f, "container"),
            Event::MainLevel => write!(f, "main_level"),
            Event::Drop { target } => write!(f, "drop {target}"),
            Event::DropAtEnd { group } => write!(f, "drop_at_end {group}"),
            Event::EndDrag => write!(f, "end_drag"),
        }
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Started => write!(f, "dragging"),
            StepOutcome::Session { changed: true } => write!(f, "session updated"),
            StepOutcome::Session { changed: false } => write!(f, "no change"),
            StepOutcome::Moved(m) => match &m.destination.parent {
                Some(parent) => write!(f, "moved {} into {} at {}", m.id, parent, m.destination.index),
                None => write!(f, "moved {} to root at {}", m.id, m.destination.index),
            },
            StepOutcome::Rejected(reason) => write!(f, "rejected: {reason}"),
            StepOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Load a script from a `.toml` or `.json` file.
#[instrument(level = "debug")]
pub fn load_script(path: &Path) -> ApplicationResult<Script> {
    let path = expand_path(path);
    let format = DocumentFormat::from_path(&path)?;
    let content = fs::read_to_string(&path).with_path_context("read script", &path)?;
    match format {
        DocumentFormat::Json => {
            serde_json::from_str(&content).with_input_context(InputKind::Script, &path)
        }
        DocumentFormat::Toml => toml::from_str(&content).with_input_context(InputKind::Script, &path),
    }
}

/// Feed every event to `controller` in order.
#[instrument(level = "debug", skip_all, fields(events = script.events.len()))]
pub fn replay<P: Clone>(controller: &mut DragController<P>, script: &Script) -> Vec<StepReport> {
    script
        .events
        .iter()
        .enumerate()
        .map(|(step, event)| {
            let outcome = apply(controller, event);
            debug!("step {}: {} -> {}", step, event, outcome);
            StepReport {
                step,
                event: event.clone(),
                outcome,
            }
        })
        .collect()
}

fn apply<P: Clone>(controller: &mut DragController<P>, event: &Event) -> StepOutcome {
    let session = |changed| StepOutcome::Session { changed };
    let drop_result = |result: Result<Move, DropRejection>| match result {
        Ok(moved) => StepOutcome::Moved(moved),
        Err(reason) => StepOutcome::Rejected(reason),
    };

    match event {
        Event::BeginDrag { id } => {
            controller.begin_drag(id.clone());
            StepOutcome::Started
        }
        Event::Enter { target, bounds, x, y } => {
            session(controller.enter(target, &PointerSample::new(*bounds, *x, *y)).changed)
        }
        Event::Hover { target, bounds, x, y } => {
            session(controller.hover(target, &PointerSample::new(*bounds, *x, *y)).changed)
        }
        Event::Leave { bounds, x, y } => {
            session(controller.leave(&PointerSample::new(*bounds, *x, *y)).changed)
        }
        Event::Container { bounds, x, y } => {
            session(controller.track_container(&PointerSample::new(*bounds, *x, *y)).changed)
        }
        Event::MainLevel => session(controller.hover_main_level().changed),
        Event::Drop { target } => drop_result(controller.drop_on(&DropTarget::parse(target))),
        Event::DropAtEnd { group } => drop_result(controller.drop_at_end(group)),
        Event::EndDrag => {
            controller.end_drag();
            StepOutcome::Cancelled
        }
    }
}
