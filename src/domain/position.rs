//! Pointer geometry and drop position classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Where a dragged node lands relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    #[default]
    Before,
    After,
    Inside,
}

impl fmt::Display for DropPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DropPosition::Before => "before",
            DropPosition::After => "after",
            DropPosition::Inside => "inside",
        };
        f.write_str(s)
    }
}

impl FromStr for DropPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "before" => Ok(DropPosition::Before),
            "after" => Ok(DropPosition::After),
            "inside" => Ok(DropPosition::Inside),
            other => Err(format!("unknown drop position: {other}")),
        }
    }
}

/// On-screen bounding box of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// A pointer event as seen by the engine: element bounds plus pointer position,
/// all in the same coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub bounds: Rect,
    pub x: f64,
    pub y: f64,
}

impl PointerSample {
    pub fn new(bounds: Rect, x: f64, y: f64) -> Self {
        Self { bounds, x, y }
    }

    /// Pointer Y as a fraction of the element height (0 = top edge, 1 = bottom edge).
    ///
    /// Degenerate bounds (zero, negative or non-finite height) and a
    /// non-finite pointer position read as the top edge.
    pub fn relative_y(&self) -> f64 {
        let height = self.bounds.height;
        if !height.is_finite() || height <= 0.0 {
            return 0.0;
        }
        let relative = (self.y - self.bounds.top) / height;
        if relative.is_finite() {
            relative
        } else {
            0.0
        }
    }

    /// True when the pointer is strictly outside the element, as opposed to
    /// having moved onto one of its nested children.
    pub fn has_left(&self) -> bool {
        self.x < self.bounds.left
            || self.x > self.bounds.right()
            || self.y < self.bounds.top
            || self.y > self.bounds.bottom()
    }

    /// True when the pointer is within `margin` of the container's left edge.
    pub fn in_main_level_zone(&self, margin: f64) -> bool {
        self.x - self.bounds.left < margin
    }
}

/// Middle band of a group row (as relative Y) that classifies as `inside`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsideBand {
    lower: f64,
    upper: f64,
}

impl Default for InsideBand {
    fn default() -> Self {
        Self {
            lower: 0.25,
            upper: 0.75,
        }
    }
}

impl InsideBand {
    pub fn new(lower: f64, upper: f64) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&lower) || !(0.0..=1.0).contains(&upper) || lower >= upper {
            return Err(DomainError::InvalidBand { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Exclusive on both ends.
    pub fn contains(&self, relative_y: f64) -> bool {
        relative_y > self.lower && relative_y < self.upper
    }
}

/// Turn pointer geometry into a discrete drop position.
///
/// Group-capable targets get `inside` for the middle band; outside of it, and
/// for plain layers, the upper half is `before` and the lower half `after`.
pub fn classify(pointer: &PointerSample, group_capable: bool, band: &InsideBand) -> DropPosition {
    let relative_y = pointer.relative_y();
    if group_capable && band.contains(relative_y) {
        DropPosition::Inside
    } else if relative_y < 0.5 {
        DropPosition::Before
    } else {
        DropPosition::After
    }
}
