//! Orbit camera for primary ray generation.

use glam::Vec3A;
use serde::Deserialize;

use crate::ray::Ray;

/// Orbit camera: two angles and a distance around a fixed center point.
///
/// This is the only animated state of the renderer. The orchestrator advances
/// `azimuth` once per tick and otherwise treats it as read-only.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrbitCamera {
    /// Rotation around the vertical axis, in radians
    pub azimuth: f32,
    /// Angle above the horizontal plane, in radians
    pub elevation: f32,
    /// Distance from the center to the camera position
    pub distance: f32,
    /// Point the camera orbits and looks at
    pub center: [f32; 3],
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            azimuth: 2.8,
            elevation: 0.4,
            distance: 1.6,
            center: [0.0, 0.0, 0.0],
        }
    }
}

impl OrbitCamera {
    /// Create a camera from orbit parameters.
    pub fn new(azimuth: f32, elevation: f32, distance: f32, center: Vec3A) -> Self {
        Self {
            azimuth,
            elevation,
            distance,
            center: center.to_array(),
        }
    }

    /// Check that the camera describes a usable orbit.
    ///
    /// The orbit distance scales the march step and the hit window, so it must
    /// be positive. Every value must be finite.
    pub fn validate(&self) -> Result<(), String> {
        if !self.azimuth.is_finite() || !self.elevation.is_finite() {
            return Err(format!(
                "camera angles must be finite, got azimuth {} and elevation {}",
                self.azimuth, self.elevation
            ));
        }
        if !self.center.iter().all(|c| c.is_finite()) {
            return Err(format!("camera center must be finite, got {:?}", self.center));
        }
        if !(self.distance.is_finite() && self.distance > 0.0) {
            return Err(format!(
                "camera distance must be positive and finite, got {}",
                self.distance
            ));
        }
        Ok(())
    }

    /// Compute the origin and orientation shared by every pixel of a frame.
    ///
    /// The basis depends only on the two angles, so identical angles always
    /// reproduce the same vectors bit for bit.
    pub fn frame(&self) -> CameraFrame {
        let (sin_a1, cos_a1) = self.azimuth.sin_cos();
        let (sin_a2, cos_a2) = self.elevation.sin_cos();
        let center = Vec3A::from_array(self.center);

        let origin = center
            + self.distance * Vec3A::new(cos_a1 * cos_a2, sin_a2, sin_a1 * cos_a2);

        CameraFrame {
            origin,
            right: Vec3A::new(sin_a1, 0.0, -cos_a1),
            up: Vec3A::new(-sin_a2 * cos_a1, cos_a2, -sin_a2 * sin_a1),
            forward: Vec3A::new(-cos_a1 * cos_a2, -sin_a2, -sin_a1 * cos_a2),
            distance: self.distance,
        }
    }
}

/// Per-frame snapshot of the camera: position, orthonormal basis and orbit distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    /// Camera position in world space
    pub origin: Vec3A,
    /// Camera basis vector pointing right
    pub right: Vec3A,
    /// Camera basis vector pointing up
    pub up: Vec3A,
    /// Viewing direction
    pub forward: Vec3A,
    /// Orbit distance; scales the march step and the accepted hit range
    pub distance: f32,
}

impl CameraFrame {
    /// Build the ray through screen coordinates `(px, py)` in `[-1, 1]`.
    ///
    /// `scale` holds the aspect factors `(sx, sy)`; see [`aspect_scale`].
    pub fn ray(&self, px: f32, py: f32, scale: (f32, f32)) -> Ray {
        let (sx, sy) = scale;
        let x = px * sx;
        let y = py * sy;
        let direction = self.forward + self.right * x + self.up * y;
        Ray::new(self.origin, direction, Vec3A::new(x, y, -1.0))
    }
}

/// Aspect factors for a `width × height` target, `(2w/(w+h), 2h/(w+h))`.
///
/// Both factors are 1.0 for a square target. Degenerate sizes fall back to 1.0.
pub fn aspect_scale(width: u32, height: u32) -> (f32, f32) {
    let sum = width as f32 + height as f32;
    if sum <= 0.0 {
        return (1.0, 1.0);
    }
    (2.0 * width as f32 / sum, 2.0 * height as f32 / sum)
}

/// Screen coordinates of the center of pixel `(i, j)` in a `size × size` target.
///
/// Row 0 is the top of the image, so `py` decreases as `j` grows.
pub fn pixel_to_screen(i: u32, j: u32, size: u32) -> (f32, f32) {
    let n = size as f32;
    let px = (i as f32 + 0.5) * 2.0 / n - 1.0;
    let py = 1.0 - (j as f32 + 0.5) * 2.0 / n;
    (px, py)
}
