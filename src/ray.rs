//! Ray representation for fractal ray marching.
//!
//! A ray is defined as r(t) = origin + t * direction. Primary rays also carry the
//! view-space direction they were built from, which the shader needs for its
//! reflection term.

use glam::Vec3A;

/// Primary ray through one pixel.
///
/// Mathematical representation: r(t) = origin + t * direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    ///
    /// Shared by every pixel of a frame: it is the orbit camera position.
    pub origin: Vec3A,

    /// World-space direction of the ray.
    ///
    /// Not normalized. The marcher steps in multiples of this vector, so its
    /// length scales the effective step size the same way it does in the
    /// fragment-shader formulation of the algorithm.
    pub direction: Vec3A,

    /// View-space direction `(px*sx, py*sy, -1)` before the basis transform.
    ///
    /// Also not normalized; the shader normalizes it when building the view vector.
    pub local_direction: Vec3A,
}

impl Ray {
    /// Create a new ray from an origin and its world and view-space directions.
    pub fn new(origin: Vec3A, direction: Vec3A, local_direction: Vec3A) -> Self {
        Self {
            origin,
            direction,
            local_direction,
        }
    }

    /// Compute a point at parameter t along the ray.
    ///
    /// Returns r(t) = origin + t * direction.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }
}
