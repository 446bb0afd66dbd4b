//! Surface solver: locates the first zero-crossing of a potential along a ray.
//!
//! The potential is neither monotone nor a signed distance, so sphere tracing
//! is not an option. The solver marches at a fixed increment and refines in one
//! of two ways:
//!
//! - **simple crossing**: the sampled potential goes from negative to positive
//!   between two steps; bisection narrows the bracket.
//! - **bump**: the potential rises toward zero and falls again without a sampled
//!   crossing (a near-tangent graze). A golden-section search finds the
//!   interior maximum; if it is positive, bisection refines the crossing on its
//!   left side.
//!
//! Every loop has a fixed bound, so the worst-case cost per ray is known up front.

use crate::field::ScalarField;
use crate::interval::Interval;
use crate::ray::Ray;

/// Number of field samples taken along a ray before giving up.
pub const MARCH_STEPS: u32 = 1000;

/// March increment as a fraction of the orbit distance.
pub const STEP_FRACTION: f32 = 0.002;

/// Iterations used by every bisection refinement.
pub const BISECTION_ITERATIONS: u32 = 8;

/// Iterations of golden-section narrowing on a bump.
pub const GOLDEN_SECTION_ITERATIONS: u32 = 8;

/// Golden-section split ratios.
const GOLDEN_LOW: f32 = 0.381_966_01;
const GOLDEN_HIGH: f32 = 0.618_033_99;

/// Iteration bounds for the solver.
///
/// The defaults are the algorithm constants; tests substitute smaller values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverLimits {
    /// Field samples taken along the ray
    pub march_steps: u32,
    /// Iterations for each bisection
    pub bisection_iterations: u32,
    /// Iterations for the golden-section search
    pub golden_section_iterations: u32,
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self {
            march_steps: MARCH_STEPS,
            bisection_iterations: BISECTION_ITERATIONS,
            golden_section_iterations: GOLDEN_SECTION_ITERATIONS,
        }
    }
}

/// Accepted surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Distance along the ray, in units of the ray direction
    pub t: f32,
    /// World-space point `origin + direction * t`
    pub point: glam::Vec3A,
}

/// March increment for an orbit distance.
pub fn march_step(distance: f32) -> f32 {
    STEP_FRACTION * distance
}

/// Find the first accepted surface crossing along `ray`.
///
/// `distance` is the orbit distance of the camera. It sets the march increment
/// (`0.002 * distance`) and the accepted window: a simple crossing must lie
/// below `2 * distance`, a refined bump must lie strictly between one march
/// increment and `2 * distance`.
pub fn find_hit<F: ScalarField + ?Sized>(
    field: &F,
    ray: &Ray,
    distance: f32,
    limits: &SolverLimits,
) -> Option<Hit> {
    let step = march_step(distance);
    let far = 2.0 * distance;
    let potential = |t: f32| field.sample(ray.at(t));

    let mut v2 = potential(0.0);
    let mut v1 = potential(step);

    for k in 2..limits.march_steps.saturating_add(2) {
        let v = potential(step * k as f32);

        if v > 0.0 && v1 < 0.0 {
            let bracket = Interval::new(step * (k - 1) as f32, step * k as f32);
            let t = bisect(&potential, bracket, limits.bisection_iterations);
            if t < far {
                return Some(hit_at(ray, t));
            }
        }

        if is_bump(v, v1, v2) {
            let start = step * (k - 2) as f32;
            let bracket = Interval::new(start, step * k as f32);
            let peak = golden_section(&potential, bracket, limits.golden_section_iterations);

            let refine_to = if peak.left_value > 0.0 {
                Some(peak.left)
            } else if peak.right_value > 0.0 {
                Some(peak.right)
            } else {
                None
            };

            if let Some(end) = refine_to {
                let t = bisect(
                    &potential,
                    Interval::new(start, end),
                    limits.bisection_iterations,
                );
                if Interval::new(step, far).surrounds(t) {
                    return Some(hit_at(ray, t));
                }
            }
        }

        v2 = v1;
        v1 = v;
    }

    None
}

/// A sample that is a negative local maximum close enough to zero to hide a root.
fn is_bump(v: f32, v1: f32, v2: f32) -> bool {
    v < v1 && v1 > v2 && v1 < 0.0 && (v1 * 2.0 > v || v1 * 2.0 > v2)
}

fn hit_at(ray: &Ray, t: f32) -> Hit {
    Hit {
        t,
        point: ray.at(t),
    }
}

/// Bisect `bracket` for a sign change of `f`, negative side at `min`.
///
/// Each iteration keeps the half whose upper end stays positive. Returns the
/// last midpoint evaluated, which lies within `size / 2^iterations` of the root
/// when `f` changes sign exactly once inside the bracket.
pub fn bisect<G: Fn(f32) -> f32>(f: &G, mut bracket: Interval, iterations: u32) -> f32 {
    let mut mid = bracket.midpoint();
    for _ in 0..iterations {
        mid = bracket.midpoint();
        if f(mid) > 0.0 {
            bracket.max = mid;
        } else {
            bracket.min = mid;
        }
    }
    mid
}

/// Result of golden-section narrowing: the two interior points and their values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldenPeak {
    /// Left interior point
    pub left: f32,
    /// Potential at `left`
    pub left_value: f32,
    /// Right interior point
    pub right: f32,
    /// Potential at `right`
    pub right_value: f32,
}

/// Narrow `bracket` toward the maximum of `f` with golden-section steps.
///
/// Each iteration discards the outer segment next to the smaller value and
/// places one new point, reusing the other one.
pub fn golden_section<G: Fn(f32) -> f32>(f: &G, bracket: Interval, iterations: u32) -> GoldenPeak {
    let mut r1 = bracket.min;
    let mut r4 = bracket.max;
    let mut r2 = r1 + bracket.size() * GOLDEN_LOW;
    let mut r3 = r1 + bracket.size() * GOLDEN_HIGH;
    let mut m2 = f(r2);
    let mut m3 = f(r3);

    for _ in 0..iterations {
        if m2 > m3 {
            r4 = r3;
            r3 = r2;
            r2 = r4 * GOLDEN_LOW + r1 * GOLDEN_HIGH;
            m3 = m2;
            m2 = f(r2);
        } else {
            r1 = r2;
            r2 = r3;
            r3 = r4 * GOLDEN_HIGH + r1 * GOLDEN_LOW;
            m2 = m3;
            m3 = f(r3);
        }
    }

    GoldenPeak {
        left: r2,
        left_value: m2,
        right: r3,
        right_value: m3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3A;

    fn x_axis_ray() -> Ray {
        Ray::new(Vec3A::ZERO, Vec3A::X, Vec3A::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn bisection_converges_on_linear_field() {
        let f = |t: f32| t - 5.0;
        for (lo, hi) in [(4.8f32, 5.1f32), (4.99, 5.004), (4.0, 6.5)] {
            let width = hi - lo;
            let t = bisect(&f, Interval::new(lo, hi), BISECTION_ITERATIONS);
            assert!(
                (t - 5.0).abs() <= width / 256.0 + 1e-6,
                "bracket [{}, {}] gave {}",
                lo,
                hi,
                t
            );
        }
    }

    #[test]
    fn bisection_without_iterations_returns_midpoint() {
        let f = |t: f32| t - 5.0;
        assert_eq!(bisect(&f, Interval::new(4.0, 6.0), 0), 5.0);
    }

    #[test]
    fn golden_section_moves_toward_peak() {
        let f = |t: f32| -(t - 0.7) * (t - 0.7);
        let peak = golden_section(&f, Interval::new(0.0, 1.0), GOLDEN_SECTION_ITERATIONS);
        assert!(peak.left < peak.right);
        assert!((peak.left - 0.7).abs() < 0.05);
        assert!((peak.right - 0.7).abs() < 0.05);
    }

    #[test]
    fn simple_crossing_is_refined() {
        let plane = |p: Vec3A| p.x - 1.0;
        let distance = 1.6;
        let hit = find_hit(&plane, &x_axis_ray(), distance, &SolverLimits::default())
            .expect("plane crossing should be found");
        let step = march_step(distance);
        assert!((hit.t - 1.0).abs() <= step / 256.0 + 1e-5, "t = {}", hit.t);
        assert_eq!(hit.point, x_axis_ray().at(hit.t));
    }

    #[test]
    fn far_crossing_is_rejected() {
        // Root at t = 5 lies beyond 2 * distance = 3.2.
        let plane = |p: Vec3A| p.x - 5.0;
        let limits = SolverLimits {
            march_steps: 2000,
            ..SolverLimits::default()
        };
        assert_eq!(find_hit(&plane, &x_axis_ray(), 1.6, &limits), None);
    }

    #[test]
    fn fields_without_crossing_miss() {
        let outside = |_: Vec3A| -1.0;
        let inside = |_: Vec3A| 1.0;
        let limits = SolverLimits::default();
        assert_eq!(find_hit(&outside, &x_axis_ray(), 1.6, &limits), None);
        assert_eq!(find_hit(&inside, &x_axis_ray(), 1.6, &limits), None);
    }

    #[test]
    fn grazing_bump_is_found() {
        // A narrow positive cap between two march samples: every sample is
        // negative, so only the golden-section path can see it.
        let distance = 1.6;
        let step = march_step(distance);
        let peak = step * 313.4;
        let cap = move |p: Vec3A| 1e-3 - 1000.0 * (p.x - peak) * (p.x - peak);

        let hit = find_hit(&cap, &x_axis_ray(), distance, &SolverLimits::default())
            .expect("bump should be refined into a hit");
        let left_root = peak - 0.001;
        assert!((hit.t - left_root).abs() < 1e-4, "t = {}", hit.t);
        assert!(Interval::new(step, 2.0 * distance).surrounds(hit.t));
    }

    #[test]
    fn bump_below_zero_is_skipped() {
        let distance = 1.6;
        let step = march_step(distance);
        let peak = step * 313.4;
        let dip = move |p: Vec3A| -1e-3 - 1000.0 * (p.x - peak) * (p.x - peak);
        assert_eq!(
            find_hit(&dip, &x_axis_ray(), distance, &SolverLimits::default()),
            None
        );
    }

    #[test]
    fn bump_refined_inside_first_step_is_rejected() {
        // Cap centered at 0.6 step: the bump shows at k = 2 and its left root
        // falls below one march increment.
        let distance = 1.6;
        let step = march_step(distance);
        let center = 0.6 * step;
        let width = 4e-4;
        let cap = move |p: Vec3A| {
            let d = (p.x - center) / width;
            1e-3 * (1.0 - d * d)
        };

        let ray = x_axis_ray();
        let potential = |t: f32| cap(ray.at(t));
        let bracket = Interval::new(0.0, 2.0 * step);
        let peak = golden_section(&potential, bracket, GOLDEN_SECTION_ITERATIONS);
        assert!(peak.left_value > 0.0);
        let t = bisect(&potential, Interval::new(0.0, peak.left), BISECTION_ITERATIONS);
        assert!(t > 0.0 && t < step, "t = {}", t);

        assert_eq!(
            find_hit(&cap, &ray, distance, &SolverLimits::default()),
            None
        );
    }

    #[test]
    fn bump_positive_only_at_right_golden_point_is_refined() {
        // Potential jumps from -1 to a small positive cap at `edge`, so after
        // narrowing the left golden point sits on the cliff and only the right
        // one is positive.
        let distance = 1.6;
        let step = march_step(distance);
        let edge = step * 312.382;
        let width = step * 0.4;
        let cliff = move |p: Vec3A| {
            if p.x < edge {
                -1.0
            } else {
                let d = (p.x - edge) / width;
                1e-3 * (1.0 - d * d)
            }
        };

        let ray = x_axis_ray();
        let potential = |t: f32| cliff(ray.at(t));
        let bracket = Interval::new(step * 312.0, step * 314.0);
        let peak = golden_section(&potential, bracket, GOLDEN_SECTION_ITERATIONS);
        assert!(peak.left_value <= 0.0, "left value {}", peak.left_value);
        assert!(peak.right_value > 0.0, "right value {}", peak.right_value);

        let hit = find_hit(&cliff, &ray, distance, &SolverLimits::default())
            .expect("right golden point should be refined into a hit");
        assert!((hit.t - edge).abs() < 1e-5, "t = {}, edge = {}", hit.t, edge);
    }

    #[test]
    fn march_limit_bounds_search() {
        let plane = |p: Vec3A| p.x - 1.0;
        let limits = SolverLimits {
            march_steps: 10,
            ..SolverLimits::default()
        };
        assert_eq!(find_hit(&plane, &x_axis_ray(), 1.6, &limits), None);
    }
}
