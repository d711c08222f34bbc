//! Rectangle boundary (literal vertices).

use serde::{Deserialize, Serialize};

use super::{Point, Shape};

/// Axis-aligned rectangle: top-left origin plus size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

/// The rectangle edge an arrow snapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectSide {
    MinX,
    MaxX,
    MinY,
    MaxY,
}

impl Rect {
    pub const fn new(origin: Point, width: f64, height: f64) -> Self {
        Self { origin, width, height }
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.width
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.height
    }

    /// Edge nearest to `click`. Ties resolve in the order minX, maxX, minY, maxY.
    pub fn nearest_side(&self, click: Point) -> RectSide {
        let candidates = [
            (RectSide::MinX, (click.x - self.min_x()).abs()),
            (RectSide::MaxX, (click.x - self.max_x()).abs()),
            (RectSide::MinY, (click.y - self.min_y()).abs()),
            (RectSide::MaxY, (click.y - self.max_y()).abs()),
        ];
        let mut best = candidates[0];
        for c in &candidates[1..] {
            if c.1 < best.1 {
                best = *c;
            }
        }
        best.0
    }
}

impl Shape for Rect {
    fn center(&self) -> Point {
        Point::new(self.origin.x + self.width / 2.0, self.origin.y + self.height / 2.0)
    }

    fn max_corner(&self) -> Point {
        Point::new(self.max_x(), self.max_y())
    }

    fn contains(&self, p: Point, tolerance: f64) -> bool {
        p.x >= self.min_x() - tolerance
            && p.x <= self.max_x() + tolerance
            && p.y >= self.min_y() - tolerance
            && p.y <= self.max_y() + tolerance
    }

    /// Snaps to the nearest edge. The orthogonal coordinate keeps the click
    /// value, clamped to the edge's extent.
    fn snap(&self, _from: Point, click: Point) -> Point {
        let x = click.x.clamp(self.min_x(), self.max_x());
        let y = click.y.clamp(self.min_y(), self.max_y());
        match self.nearest_side(click) {
            RectSide::MinX => Point::new(self.min_x(), y),
            RectSide::MaxX => Point::new(self.max_x(), y),
            RectSide::MinY => Point::new(x, self.min_y()),
            RectSide::MaxY => Point::new(x, self.max_y()),
        }
    }

    fn is_well_formed(&self) -> bool {
        self.origin.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}
