//! Scalar potential fields sampled by the ray marcher.
//!
//! The renderer draws exactly one surface: the zero set of the power-8 spherical
//! escape-time potential implemented by [`Mandelbulb`]. The [`ScalarField`] trait
//! exists so the root solver can be exercised on simple synthetic fields.

use glam::Vec3A;

/// Exponent of the spherical power map.
pub const POWER: f32 = 8.0;

/// Maximum number of map iterations per sample.
pub const FIELD_ITERATIONS: usize = 5;

/// Iteration stops once `|a|^POWER` exceeds this value.
pub const ESCAPE_THRESHOLD: f32 = 6.0;

/// Squared radius the final orbit point is compared against.
pub const BOUND_SQUARED: f32 = 4.0;

/// Anything that maps a point to a real potential.
///
/// Positive values are "inside". Implementations must be pure: the same point
/// always yields the same value, so the field can be sampled from every worker
/// thread at once.
pub trait ScalarField: Sync + Send {
    /// Evaluate the potential at `p`.
    fn sample(&self, p: Vec3A) -> f32;
}

impl<F> ScalarField for F
where
    F: Fn(Vec3A) -> f32 + Sync + Send,
{
    fn sample(&self, p: Vec3A) -> f32 {
        self(p)
    }
}

/// Power-8 spherical escape-time fractal.
///
/// Not a distance field: the returned value `4 - |a|^2` only changes sign across
/// the fractal boundary and is used purely as a root-finding target.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mandelbulb;

impl Mandelbulb {
    /// Apply one step of the power map to `a`, offset by the seed point `p`.
    ///
    /// Returns the new orbit point and `|a|^POWER` measured before the step,
    /// which is what the escape test looks at.
    #[inline]
    fn step(a: Vec3A, p: Vec3A) -> (Vec3A, f32) {
        let r = a.length();
        if r < f32::EPSILON {
            // r^8 vanishes at the origin, so the map degenerates to a = p
            return (p, 0.0);
        }
        let theta = a.y.atan2(a.x) * POWER;
        let phi = (a.z / r).acos() * POWER;
        let r_pow = r.powf(POWER);
        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        let next = Vec3A::new(
            r_pow * sin_phi * cos_theta,
            r_pow * sin_phi * sin_theta,
            r_pow * cos_phi,
        ) + p;
        (next, r_pow)
    }
}

impl ScalarField for Mandelbulb {
    fn sample(&self, p: Vec3A) -> f32 {
        let mut a = p;
        for _ in 0..FIELD_ITERATIONS {
            let (next, r_pow) = Self::step(a, p);
            a = next;
            if r_pow > ESCAPE_THRESHOLD {
                break;
            }
        }
        BOUND_SQUARED - a.length_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_points_are_inside() {
        let field = Mandelbulb;
        assert!(field.sample(Vec3A::new(0.1, 0.05, -0.1)) > 0.0);
        assert!(field.sample(Vec3A::new(0.0, 0.3, 0.0)) > 0.0);
    }

    #[test]
    fn far_points_are_outside() {
        let field = Mandelbulb;
        assert!(field.sample(Vec3A::new(1.6, 0.0, 0.0)) < 0.0);
        assert!(field.sample(Vec3A::new(0.0, -3.0, 0.5)) < 0.0);
    }

    #[test]
    fn origin_is_defined_and_inside() {
        let v = Mandelbulb.sample(Vec3A::ZERO);
        assert!(v.is_finite());
        assert_eq!(v, BOUND_SQUARED);
    }

    #[test]
    fn sampling_is_deterministic() {
        let p = Vec3A::new(0.62, -0.41, 0.37);
        let a = Mandelbulb.sample(p);
        let b = Mandelbulb.sample(p);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn escaped_orbit_stops_iterating() {
        // A point far outside escapes on the first step: a = p^8-map + p, no further steps.
        let p = Vec3A::new(2.0, 0.0, 0.0);
        let (a, r_pow) = Mandelbulb::step(p, p);
        assert!(r_pow > ESCAPE_THRESHOLD);
        let expected = BOUND_SQUARED - a.length_squared();
        assert_eq!(Mandelbulb.sample(p), expected);
    }

    #[test]
    fn closures_are_fields() {
        let plane = |p: Vec3A| p.x - 1.0;
        assert_eq!(plane.sample(Vec3A::new(3.0, 0.0, 0.0)), 2.0);
    }
}
