//! Ray parameter intervals.
//!
//! Used both for the brackets the root solver narrows and for the window of
//! distances a hit is accepted in.

/// Closed interval [min, max] along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Minimum value of the interval
    pub min: f32,
    /// Maximum value of the interval
    pub max: f32,
}

impl Interval {
    /// Create a new interval with given min and max values
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Calculate the size (width) of the interval
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Midpoint of the interval, `min * 0.5 + max * 0.5`.
    pub fn midpoint(&self) -> f32 {
        self.min * 0.5 + self.max * 0.5
    }

    /// Check if the interval surrounds the given value (exclusive bounds)
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surrounds_excludes_endpoints() {
        let i = Interval::new(0.5, 2.0);
        assert!(i.surrounds(1.0));
        assert!(!i.surrounds(0.5));
        assert!(!i.surrounds(2.0));
    }

    #[test]
    fn midpoint_and_size() {
        let i = Interval::new(1.0, 3.0);
        assert_eq!(i.midpoint(), 2.0);
        assert_eq!(i.size(), 2.0);
    }
}
