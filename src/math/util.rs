use super::{Point2d, Point3d, Vector2d};

/// The z-component of the cross product of two planar vectors.
///
/// Positive when `v` turns anticlockwise from `u` in a y-up frame.
#[inline(always)]
pub fn cross(u: Vector2d, v: Vector2d) -> f64 {
    u.x * v.y - v.x * u.y
}

/// Drops the z coordinate of a point.
pub fn flatten(point: Point3d) -> Point2d {
    Point2d::new(point.x, point.y)
}
