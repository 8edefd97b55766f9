use super::{Point2d, Vector2d};
use crate::error::{Axis, GeometryError, Result};

/// How far and in which direction, without an anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Displacement {
    pub dx: f64,
    pub dy: f64,
}

impl Displacement {
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// A purely horizontal displacement.
    pub const fn along_x(dx: f64) -> Self {
        Self { dx, dy: 0.0 }
    }

    /// A purely vertical displacement.
    pub const fn along_y(dy: f64) -> Self {
        Self { dx: 0.0, dy }
    }

    pub fn to_vec(self) -> Vector2d {
        Vector2d::new(self.dx, self.dy)
    }

    /// The point reached by moving `scale` times this displacement from `origin`.
    pub fn project(&self, origin: Point2d, scale: f64) -> Point2d {
        origin + scale * self.to_vec()
    }

    /// The horizontal delta that accompanies a vertical delta of `dy`.
    pub fn dx_for_dy(&self, dy: f64) -> Result<f64> {
        if self.dy == 0.0 {
            return Err(GeometryError::ZeroComponent(Axis::Y));
        }
        Ok(dy / self.dy * self.dx)
    }

    /// The vertical delta that accompanies a horizontal delta of `dx`.
    pub fn dy_for_dx(&self, dx: f64) -> Result<f64> {
        if self.dx == 0.0 {
            return Err(GeometryError::ZeroComponent(Axis::X));
        }
        Ok(dx / self.dx * self.dy)
    }
}

impl From<Vector2d> for Displacement {
    fn from(vec: Vector2d) -> Self {
        Self::new(vec.x, vec.y)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn project_scales_from_origin() {
        let d = Displacement::new(2.0, -1.0);
        let p = d.project(Point2d::new(1.0, 1.0), 3.0);
        assert_approx_eq!(p.x, 7.0);
        assert_approx_eq!(p.y, -2.0);
        assert_eq!(d.project(Point2d::new(4.0, 5.0), 0.0), Point2d::new(4.0, 5.0));
    }

    #[test]
    fn proportional_deltas() {
        let d = Displacement::new(4.0, 2.0);
        assert_approx_eq!(d.dx_for_dy(3.0).unwrap(), 6.0);
        assert_approx_eq!(d.dy_for_dx(-2.0).unwrap(), -1.0);
    }

    #[test]
    fn zero_component_is_an_error() {
        assert_eq!(
            Displacement::along_x(5.0).dx_for_dy(1.0),
            Err(GeometryError::ZeroComponent(Axis::Y))
        );
        assert_eq!(
            Displacement::along_y(5.0).dy_for_dx(1.0),
            Err(GeometryError::ZeroComponent(Axis::X))
        );
        assert_eq!(Displacement::along_x(5.0).dy_for_dx(10.0), Ok(0.0));
    }
}
