//! Mathematical structs and functions.

use cgmath::{Point2, Point3, Vector2};
pub use displacement::Displacement;
pub use line::{Line2d, Side};
pub use util::*;

mod displacement;
mod line;
mod util;

/// A 2D point
pub type Point2d = Point2<f64>;

/// A 2D vector
pub type Vector2d = Vector2<f64>;

/// A 3D point, for detectors that report depth alongside image coordinates.
pub type Point3d = Point3<f64>;
