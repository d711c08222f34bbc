//! Ellipse boundary (class vertices) and segment intersection.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{Point, Shape, within_segment_box};

/// Axis-aligned ellipse: center plus horizontal (`rx`) and vertical (`ry`) radii.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
}

/// Up to two crossing points of a segment with an ellipse.
pub type Crossings = SmallVec<[Point; 2]>;

impl Ellipse {
    pub const fn new(center: Point, rx: f64, ry: f64) -> Self {
        Self { center, rx, ry }
    }

    /// Value of the normalized ellipse equation at `p`: `1.0` on the boundary.
    pub fn equation(&self, p: Point) -> f64 {
        let dx = (p.x - self.center.x) / self.rx;
        let dy = (p.y - self.center.y) / self.ry;
        dx * dx + dy * dy
    }

    /// Intersections of the segment `a`–`b` with the ellipse boundary.
    ///
    /// Works in center-relative coordinates. A vertical segment solves
    /// `y = ±(v/h)·sqrt(h² − x²)` directly; any other segment substitutes
    /// `y = a·x + b` into the ellipse equation, giving
    /// `r·x² + s·x + t = 0` with
    ///
    /// ```text
    /// r = a²h² + v²,   s = 2abh²,   t = h²b² − h²v²
    /// ```
    ///
    /// Every root must fall inside the segment's bounding box. The `+`
    /// root comes first.
    pub fn intersect_segment(&self, a: Point, b: Point) -> Crossings {
        let (h, v) = (self.rx, self.ry);
        let p1 = Point::new(a.x - self.center.x, a.y - self.center.y);
        let p2 = Point::new(b.x - self.center.x, b.y - self.center.y);
        let scale = 1.0 + p1.x.abs().max(p1.y.abs()).max(p2.x.abs()).max(p2.y.abs());
        let eps = 1e-9 * scale;

        let mut roots: Crossings = SmallVec::new();

        if (p1.x - p2.x).abs() <= eps {
            let x = p1.x;
            if x.abs() <= h {
                let y = (v / h) * (h * h - x * x).max(0.0).sqrt();
                roots.push(Point::new(x, y));
                if y != 0.0 {
                    roots.push(Point::new(x, -y));
                }
            }
        } else {
            let slope = (p2.y - p1.y) / (p2.x - p1.x);
            let intercept = p1.y - slope * p1.x;
            let r = slope * slope * h * h + v * v;
            let s = 2.0 * slope * intercept * h * h;
            let t = h * h * intercept * intercept - h * h * v * v;
            let d = s * s - 4.0 * r * t;

            if d == 0.0 {
                let x = -s / (2.0 * r);
                roots.push(Point::new(x, slope * x + intercept));
            } else if d > 0.0 {
                let sq = d.sqrt();
                for x in [(-s + sq) / (2.0 * r), (-s - sq) / (2.0 * r)] {
                    roots.push(Point::new(x, slope * x + intercept));
                }
            }
        }

        roots
            .into_iter()
            .filter(|p| within_segment_box(*p, p1, p2, eps))
            .map(|p| Point::new(p.x + self.center.x, p.y + self.center.y))
            .collect()
    }
}

impl Shape for Ellipse {
    fn center(&self) -> Point {
        self.center
    }

    fn max_corner(&self) -> Point {
        Point::new(self.center.x + self.rx, self.center.y + self.ry)
    }

    fn contains(&self, p: Point, tolerance: f64) -> bool {
        let dx = (p.x - self.center.x) / (self.rx + tolerance);
        let dy = (p.y - self.center.y) / (self.ry + tolerance);
        dx * dx + dy * dy <= 1.0
    }

    /// The line direction runs from the subject's center (`from`) to the
    /// raw click. One crossing is the normal case; more means the line cut
    /// across the shape, and the first accepted root is used.
    fn snap(&self, from: Point, click: Point) -> Point {
        let crossings = self.intersect_segment(from, click);
        match crossings.len() {
            0 => {
                tracing::debug!(%from, %click, "segment does not reach ellipse boundary; keeping click point");
                click
            }
            1 => crossings[0],
            n => {
                tracing::warn!(%from, %click, crossings = n, "segment crosses ellipse more than once; using first root");
                crossings[0]
            }
        }
    }

    fn is_well_formed(&self) -> bool {
        self.center.is_finite()
            && self.rx.is_finite()
            && self.ry.is_finite()
            && self.rx > 0.0
            && self.ry > 0.0
    }
}
