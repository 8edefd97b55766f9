use std::fmt;

use cgmath::prelude::*;
use cgmath::{Deg, Rad};

use super::{cross, Displacement, Point2d, Vector2d};
use crate::error::{Endpoint, GeometryError, Result};
use crate::util::Interval;

/// Where a point lies relative to a directed line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    On,
    Right,
}

/// A directed line segment from `a` to `b`.
///
/// Swapping the endpoints reverses the direction and angle, but not the
/// extremes, which are found by comparing coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line2d {
    pub a: Point2d,
    pub b: Point2d,
}

impl Line2d {
    pub const fn new(a: Point2d, b: Point2d) -> Self {
        Self { a, b }
    }

    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point2d::new(x1, y1), Point2d::new(x2, y2))
    }

    /// Creates a line from endpoints that may not have been detected.
    pub fn try_from_points(a: Option<Point2d>, b: Option<Point2d>) -> Result<Self> {
        let a = a.ok_or(GeometryError::MissingPoint(Endpoint::A))?;
        let b = b.ok_or(GeometryError::MissingPoint(Endpoint::B))?;
        Ok(Self::new(a, b))
    }

    /// The vector from `a` to `b`.
    pub fn direction(&self) -> Vector2d {
        self.b - self.a
    }

    /// The length of the segment.
    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }

    /// Whether both endpoints coincide.
    pub fn is_degenerate(&self) -> bool {
        self.a == self.b
    }

    /// The signed angle of the direction vector.
    ///
    /// A degenerate line reports an angle of zero.
    pub fn angle(&self) -> Rad<f64> {
        let d = self.direction();
        Rad(d.y.atan2(d.x))
    }

    /// The signed angle of the direction vector in degrees.
    pub fn angle_deg(&self) -> f64 {
        Deg::from(self.angle()).0
    }

    /// The horizontal extent of the segment.
    pub fn x_span(&self) -> Interval<f64> {
        Interval::spanning(self.a.x, self.b.x)
    }

    /// The vertical extent of the segment.
    pub fn y_span(&self) -> Interval<f64> {
        Interval::spanning(self.a.y, self.b.y)
    }

    pub fn width(&self) -> f64 {
        (self.a.x - self.b.x).abs()
    }

    pub fn height(&self) -> f64 {
        (self.a.y - self.b.y).abs()
    }

    /// The centre of the segment.
    pub fn midpoint(&self) -> Point2d {
        Point2d::new(self.x_span().midpoint(), self.y_span().midpoint())
    }

    pub fn leftmost(&self) -> Point2d {
        if self.a.x < self.b.x {
            self.a
        } else {
            self.b
        }
    }

    pub fn rightmost(&self) -> Point2d {
        if self.a.x > self.b.x {
            self.a
        } else {
            self.b
        }
    }

    /// The endpoint with the smaller y, which is higher up in image coordinates.
    pub fn topmost(&self) -> Point2d {
        if self.a.y < self.b.y {
            self.a
        } else {
            self.b
        }
    }

    /// The endpoint with the larger y.
    pub fn bottommost(&self) -> Point2d {
        if self.a.y > self.b.y {
            self.a
        } else {
            self.b
        }
    }

    /// Twice the signed area of the triangle `a`, `b`, `point`.
    ///
    /// Positive when the point is left of the line, negative when right
    /// and zero when the three points are collinear.
    pub fn how_left(&self, point: Point2d) -> f64 {
        cross(self.direction(), point - self.a)
    }

    /// Classifies a point, treating cross products within `epsilon` of zero as on the line.
    pub fn side_of(&self, point: Point2d, epsilon: f64) -> Side {
        let area = self.how_left(point);
        if area.abs() <= epsilon {
            Side::On
        } else if area > 0.0 {
            Side::Left
        } else {
            Side::Right
        }
    }

    pub fn is_left_of(&self, point: Point2d) -> bool {
        self.how_left(point) > 0.0
    }

    pub fn is_right_of(&self, point: Point2d) -> bool {
        self.how_left(point) < 0.0
    }

    /// Whether the point is exactly collinear and within the vertical extent of the segment.
    pub fn exists_on_line(&self, point: Point2d) -> bool {
        self.exists_on_line_within(point, 0.0)
    }

    /// As [Self::exists_on_line], with a tolerance on the collinearity test.
    pub fn exists_on_line_within(&self, point: Point2d, epsilon: f64) -> bool {
        self.y_span().contains(point.y) && self.side_of(point, epsilon) == Side::On
    }

    /// Interpolates across the bounding box of the segment.
    ///
    /// Each axis is interpolated on its own, starting from the leftmost x and the
    /// topmost y. The result lies on the segment only when the leftmost and
    /// topmost endpoints are the same point.
    pub fn point_at(&self, fraction: f64) -> Point2d {
        Point2d::new(self.x_span().lerp(fraction), self.y_span().lerp(fraction))
    }

    /// Intersects the infinite extensions of two lines.
    ///
    /// Returns `Ok(None)` when the lines are parallel or coincident.
    pub fn intersect(&self, other: &Line2d) -> Result<Option<Point2d>> {
        if self.is_degenerate() || other.is_degenerate() {
            return Err(GeometryError::DegenerateLine);
        }

        let (x1, y1, x2, y2) = (self.a.x, self.a.y, self.b.x, self.b.y);
        let (x3, y3, x4, y4) = (other.a.x, other.a.y, other.b.x, other.b.y);

        let determinant = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
        if determinant == 0.0 {
            return Ok(None);
        }

        let p = x1 * y2 - y1 * x2;
        let q = x3 * y4 - y3 * x4;
        let x = (p * (x3 - x4) - (x1 - x2) * q) / determinant;
        let y = (p * (y3 - y4) - (y1 - y2) * q) / determinant;
        Ok(Some(Point2d::new(x, y)))
    }

    /// The perpendicular distance from a point to the infinite extension of the line.
    pub fn distance(&self, point: Point2d) -> Result<f64> {
        let length = self.length();
        if length == 0.0 {
            return Err(GeometryError::DegenerateLine);
        }
        Ok(self.how_left(point).abs() / length)
    }

    /// Summarises a set of lines as one line.
    ///
    /// The result runs along the mean direction vector and is centred on the
    /// centroid of all endpoints. Lines pointing in opposite directions cancel
    /// out, which yields a degenerate line.
    pub fn average<'a>(lines: impl IntoIterator<Item = &'a Line2d>) -> Result<Line2d> {
        let mut count = 0usize;
        let mut sum_points = Vector2d::new(0.0, 0.0);
        let mut sum_direction = Vector2d::new(0.0, 0.0);
        for line in lines {
            count += 1;
            sum_points += line.a.to_vec() + line.b.to_vec();
            sum_direction += line.direction();
        }
        if count == 0 {
            return Err(GeometryError::EmptyCollection);
        }

        let n = count as f64;
        let centroid = Point2d::from_vec(sum_points / (2.0 * n));
        let mean = Displacement::from(sum_direction / n);
        let origin = mean.project(centroid, -0.5);
        Ok(Line2d::new(origin, mean.project(origin, 1.0)))
    }
}

impl TryFrom<&[f64]> for Line2d {
    type Error = GeometryError;

    /// Reads a segment as `[x1, y1, x2, y2]`, the layout line detectors emit.
    fn try_from(coords: &[f64]) -> Result<Self> {
        match *coords {
            [x1, y1, x2, y2] => Ok(Self::from_coords(x1, y1, x2, y2)),
            _ => Err(GeometryError::CoordinateCount(coords.len())),
        }
    }
}

impl fmt::Display for Line2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) - ({}, {})",
            self.a.x, self.a.y, self.b.x, self.b.y
        )
    }
}
