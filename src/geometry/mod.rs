//! # Geometric Anchoring
//!
//! Computes where a property arrow touches a vertex boundary.
//!
//! Two boundary shapes exist on the canvas:
//!
//! | Shape | Used by | Snap rule |
//! |-------|---------|-----------|
//! | [`Ellipse`] | class vertices | segment/ellipse intersection (quadratic) |
//! | [`Rect`] | literal vertices | nearest edge, orthogonal coordinate held |
//!
//! Both implement [`Shape`]; [`Boundary`] is the tagged union stored on a
//! vertex and dispatches to the right implementation.
//!
//! Pure math: no graph types in here.

pub mod ellipse;
pub mod rect;

use serde::{Deserialize, Serialize};

pub use ellipse::Ellipse;
pub use rect::Rect;

/// Tolerance used by point-in-boundary hit tests, in canvas units.
pub const HIT_TOLERANCE: f64 = 0.5;

/// A point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Capability shared by every vertex boundary.
pub trait Shape {
    /// Geometric center.
    fn center(&self) -> Point;

    /// Bottom-right extent, used for canvas growth.
    fn max_corner(&self) -> Point;

    /// Inclusive hit test, widened by `tolerance` on every side.
    fn contains(&self, p: Point, tolerance: f64) -> bool;

    /// Boundary point where an arrow from `from` aimed at `click` terminates.
    fn snap(&self, from: Point, click: Point) -> Point;

    /// Whether the shape has finite, strictly positive extents.
    fn is_well_formed(&self) -> bool;
}

/// Vertex boundary: ellipse for classes, rectangle for literals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum Boundary {
    Ellipse(Ellipse),
    Rect(Rect),
}

impl Boundary {
    pub fn is_ellipse(&self) -> bool {
        matches!(self, Boundary::Ellipse(_))
    }

    pub fn as_ellipse(&self) -> Option<&Ellipse> {
        match self {
            Boundary::Ellipse(e) => Some(e),
            Boundary::Rect(_) => None,
        }
    }

    pub fn as_rect(&self) -> Option<&Rect> {
        match self {
            Boundary::Rect(r) => Some(r),
            Boundary::Ellipse(_) => None,
        }
    }

    /// Top-most point of the boundary; self-referential loops hang here.
    pub fn top(&self) -> Point {
        match self {
            Boundary::Ellipse(e) => Point::new(e.center.x, e.center.y - e.ry),
            Boundary::Rect(r) => Point::new(r.origin.x + r.width / 2.0, r.origin.y),
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $b:ident => $e:expr) => {
        match $self {
            Boundary::Ellipse($b) => $e,
            Boundary::Rect($b) => $e,
        }
    };
}

impl Shape for Boundary {
    fn center(&self) -> Point {
        dispatch!(self, b => b.center())
    }

    fn max_corner(&self) -> Point {
        dispatch!(self, b => b.max_corner())
    }

    fn contains(&self, p: Point, tolerance: f64) -> bool {
        dispatch!(self, b => b.contains(p, tolerance))
    }

    fn snap(&self, from: Point, click: Point) -> Point {
        dispatch!(self, b => b.snap(from, click))
    }

    fn is_well_formed(&self) -> bool {
        dispatch!(self, b => b.is_well_formed())
    }
}

/// Component-wise bounding-box test for the segment `a`–`b`.
pub(crate) fn within_segment_box(p: Point, a: Point, b: Point, eps: f64) -> bool {
    let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
    let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
    p.x >= min_x - eps && p.x <= max_x + eps && p.y >= min_y - eps && p.y <= max_y + eps
}
