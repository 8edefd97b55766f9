//! Miscellaneous utility structs and functions.

use std::fmt::Debug;

use cgmath::num_traits::Float;

/// A closed interval on the real number line.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd> Interval<T> {
    /// Creates the smallest interval containing both values, in either order.
    pub fn spanning(a: T, b: T) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Returns true if this interval contains the value, bounds included.
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

impl<T: std::ops::Sub<T, Output = T> + Copy> Interval<T> {
    /// Gets the magnitude of the interval.
    pub fn length(&self) -> T {
        self.max - self.min
    }
}

impl<T: Float> Interval<T> {
    /// Returns the centre/mid-point of the interval.
    pub fn midpoint(&self) -> T {
        (self.min + self.max) / (T::one() + T::one())
    }

    pub fn lerp(&self, t: T) -> T {
        self.min + t * (self.max - self.min)
    }
}

impl<T: Debug> Debug for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.min, &self.max)
    }
}

#[cfg(test)]
mod test {
    use super::Interval;

    #[test]
    fn spanning_orders_bounds() {
        assert_eq!(Interval::spanning(8.0, 3.0), Interval::new(3.0, 8.0));
        assert_eq!(Interval::spanning(3.0, 8.0), Interval::new(3.0, 8.0));
    }

    #[test]
    fn contains_is_inclusive() {
        let span = Interval::new(-2.0, 4.0);
        assert!(span.contains(-2.0));
        assert!(span.contains(4.0));
        assert!(span.contains(0.5));
        assert!(!span.contains(4.000001));
        assert!(!span.contains(-3.0));
    }

    #[test]
    fn lerp_and_midpoint() {
        let span = Interval::new(10.0, 20.0);
        assert_eq!(span.length(), 10.0);
        assert_eq!(span.lerp(0.25), 12.5);
        assert_eq!(span.midpoint(), 15.0);
        assert_eq!(Interval::spanning(3.0f32, -1.0).midpoint(), 1.0);
    }
}
