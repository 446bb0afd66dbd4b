//! Normal estimation and the fixed lighting model.
//!
//! The surface is lit by one hard-coded directional light with a specular-like
//! reflection lobe, a normal tilt term and constant ambient. Base hue cycles
//! with the squared distance of the hit point from the origin.

use glam::{Vec3A, Vec4};

use crate::camera::CameraFrame;
use crate::field::ScalarField;
use crate::ray::Ray;
use crate::solver::Hit;

/// RGBA color with straight alpha.
pub type Color = Vec4;

/// Color written for rays that miss the surface.
pub const BACKGROUND: Color = Vec4::new(0.0, 0.0, 0.0, 1.0);

/// Light direction. Deliberately not unit length.
pub const LIGHT_DIR: Vec3A = Vec3A::new(0.276, 0.920, 0.276);

/// Finite-difference offset as a fraction of the hit distance.
pub const NORMAL_EPSILON_SCALE: f32 = 0.00025;

const SPECULAR_WEIGHT: f32 = 0.45;
const TILT_WEIGHT: f32 = 0.25;
const AMBIENT: f32 = 0.3;
const HUE_FREQUENCY: f32 = 10.0;
const HUE_PHASE: f32 = 2.05;

/// Estimate the surface normal at `point` by central differences along the camera basis.
///
/// The offset grows with the hit distance `t`. The forward component is taken
/// with the opposite sign to the other two, matching the camera-facing
/// orientation the lighting expects. Falls back to `-forward` where the
/// gradient vanishes.
pub fn estimate_normal<F: ScalarField + ?Sized>(
    field: &F,
    frame: &CameraFrame,
    point: Vec3A,
    t: f32,
) -> Vec3A {
    let eps = t * NORMAL_EPSILON_SCALE;
    let dx = field.sample(point - frame.right * eps) - field.sample(point + frame.right * eps);
    let dy = field.sample(point - frame.up * eps) - field.sample(point + frame.up * eps);
    let dz = field.sample(point + frame.forward * eps) - field.sample(point - frame.forward * eps);
    Vec3A::new(dx, dy, dz)
        .try_normalize()
        .unwrap_or(-frame.forward)
}

/// Light intensity for a normal seen along `view`.
///
/// `0.45 * max(0, refl·L)^4 + 0.25 * (n·L) + 0.3`, where `refl` is `view`
/// mirrored about `normal`.
pub fn intensity(normal: Vec3A, view: Vec3A) -> f32 {
    let reflected = normal * (-2.0 * view.dot(normal)) + view;
    let specular = reflected.dot(LIGHT_DIR).max(0.0).powi(4);
    let tilt = normal.dot(LIGHT_DIR);
    specular * SPECULAR_WEIGHT + tilt * TILT_WEIGHT + AMBIENT
}

/// Base hue from the squared radius of the hit point, each channel in `[0, 1]`.
pub fn hue(point: Vec3A) -> Vec3A {
    let rho = point.length_squared() * HUE_FREQUENCY;
    Vec3A::new(rho.sin(), (rho + HUE_PHASE).sin(), (rho - HUE_PHASE).sin()) * 0.5 + 0.5
}

/// Final color for a solver result. Misses are opaque black.
pub fn shade<F: ScalarField + ?Sized>(
    field: &F,
    frame: &CameraFrame,
    ray: &Ray,
    hit: Option<Hit>,
) -> Color {
    let Some(hit) = hit else {
        return BACKGROUND;
    };

    let normal = estimate_normal(field, frame, hit.point, hit.t);
    // View vector stays in ray-local space
    let view = ray.local_direction.normalize_or_zero();
    let rgb = hue(hit.point) * intensity(normal, view);
    rgb.extend(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;

    #[test]
    fn miss_is_opaque_black() {
        let frame = OrbitCamera::default().frame();
        let ray = frame.ray(0.0, 0.0, (1.0, 1.0));
        let field = |_: Vec3A| -1.0;
        assert_eq!(shade(&field, &frame, &ray, None), BACKGROUND);
    }

    #[test]
    fn hue_channels_stay_in_unit_range() {
        for r in [0.0f32, 0.3, 0.77, 1.2, 2.5] {
            let h = hue(Vec3A::new(r, 0.0, 0.0));
            assert!(h.min_element() >= 0.0 && h.max_element() <= 1.0);
        }
        assert_eq!(hue(Vec3A::ZERO).x, 0.5);
    }

    #[test]
    fn head_on_normal_intensity() {
        // Normal facing the viewer reflects the view straight back.
        let normal = Vec3A::new(0.0, 0.0, 1.0);
        let view = Vec3A::new(0.0, 0.0, -1.0);
        let expected = 0.276f32.powi(4) * 0.45 + 0.276 * 0.25 + 0.3;
        assert!((intensity(normal, view) - expected).abs() < 1e-6);
    }

    #[test]
    fn normal_follows_gradient_of_planar_field() {
        // Camera looks down -x; the potential drops along forward, so n.z is negative.
        let frame = OrbitCamera::new(0.0, 0.0, 1.6, Vec3A::ZERO).frame();
        let field = |p: Vec3A| p.x;
        let n = estimate_normal(&field, &frame, Vec3A::new(0.5, 0.0, 0.0), 1.0);
        assert!((n - Vec3A::new(0.0, 0.0, -1.0)).length() < 1e-4, "n = {:?}", n);
    }

    #[test]
    fn flat_field_normal_faces_camera() {
        let frame = OrbitCamera::default().frame();
        let field = |_: Vec3A| 1.0;
        let n = estimate_normal(&field, &frame, Vec3A::ZERO, 1.0);
        assert_eq!(n, -frame.forward);
    }

    #[test]
    fn hit_color_is_opaque() {
        let frame = OrbitCamera::new(0.0, 0.0, 1.6, Vec3A::ZERO).frame();
        let ray = frame.ray(0.0, 0.0, (1.0, 1.0));
        let field = |p: Vec3A| 1.0 - p.x;
        let hit = Hit {
            t: 0.6,
            point: ray.at(0.6),
        };
        let color = shade(&field, &frame, &ray, Some(hit));
        assert_eq!(color.w, 1.0);
        assert!(color.x >= 0.0 && color.y >= 0.0 && color.z >= 0.0);
    }
}
