use glam::Vec2;

use crate::api::NarrowphaseApi;
use crate::types::*;

/// Circle/point/ray primitive tests.
pub struct Narrowphase;

impl NarrowphaseApi for Narrowphase {
    fn overlap_circle_circle(c0: Vec2, r0: f32, c1: Vec2, r1: f32) -> Option<Overlap> {
        let delta = c0 - c1;
        let dist2 = delta.length_squared();
        let rsum = r0 + r1;
        // Closed interval: d == r0 + r1 still overlaps. A NaN distance never does.
        if !(dist2 <= rsum * rsum) {
            return None;
        }
        if dist2 == 0.0 {
            return Some(Overlap { normal: Vec2::ZERO, depth: rsum, contact: c0 });
        }
        let dist = dist2.sqrt();
        let normal = delta / dist;
        Some(Overlap {
            normal,
            depth: (rsum - dist).max(0.0),
            contact: c0 - normal * r0,
        })
    }

    fn overlap_point_circle(p: Vec2, c: Vec2, r: f32) -> bool {
        (p - c).length_squared() <= r * r
    }

    fn ray_circle(origin: Vec2, dir: Vec2, center: Vec2, r: f32) -> Option<RayHit> {
        let t = first_root(origin - center, dir, r, |t| t >= 0.0)?;
        Some(hit_at(origin, dir, center, t))
    }

    fn line_segment_circle(a: Vec2, b: Vec2, center: Vec2, r: f32) -> Option<RayHit> {
        let d = b - a;
        let t = first_root(a - center, d, r, |t| (0.0..=1.0).contains(&t))?;
        Some(hit_at(a, d, center, t))
    }
}

/// Smallest accepted root of `|m + t*d|^2 = r^2`. `None` for a zero `d`.
fn first_root(m: Vec2, d: Vec2, r: f32, accept: impl Fn(f32) -> bool) -> Option<f32> {
    let a = d.length_squared();
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * m.dot(d);
    let c = m.length_squared() - r * r;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t0 = (-b - sq) / (2.0 * a);
    let t1 = (-b + sq) / (2.0 * a);
    [t0, t1].into_iter().filter(|&t| accept(t)).reduce(f32::min)
}

fn hit_at(origin: Vec2, dir: Vec2, center: Vec2, t: f32) -> RayHit {
    let contact = origin + dir * t;
    RayHit { toi: t, normal: normalize_or_zero(contact - center), contact }
}

// --- Degenerate-safe vector helpers -------------------------------------------

/// `v / s`, or zero when `s` is zero or not finite.
pub fn safe_div(v: Vec2, s: f32) -> Vec2 {
    if s == 0.0 || !s.is_finite() {
        Vec2::ZERO
    } else {
        v / s
    }
}

/// Unit vector along `v`, or zero for a zero-length `v`.
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len2 = v.length_squared();
    if len2 > 0.0 {
        v / len2.sqrt()
    } else {
        Vec2::ZERO
    }
}

/// Projection of `v` onto `axis`; zero when `axis` has zero length.
pub fn project_onto_or_zero(v: Vec2, axis: Vec2) -> Vec2 {
    let len2 = axis.length_squared();
    if len2 == 0.0 {
        Vec2::ZERO
    } else {
        axis * (v.dot(axis) / len2)
    }
}

/// Reflect `v` about the line with the given normal (need not be unit).
/// A zero normal leaves `v` unchanged.
pub fn reflect(v: Vec2, normal: Vec2) -> Vec2 {
    v - 2.0 * project_onto_or_zero(v, normal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_circle_touching_counts() {
        let ov = Narrowphase::overlap_circle_circle(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0)
            .unwrap();
        assert_eq!(ov.depth, 0.0);
        assert_eq!(ov.normal, Vec2::new(-1.0, 0.0));
        let apart = Narrowphase::overlap_circle_circle(Vec2::ZERO, 5.0, Vec2::new(11.0, 0.0), 5.0);
        assert!(apart.is_none());
    }

    #[test]
    fn test_circle_circle_nan_center_never_overlaps() {
        let far = Vec2::new(1000.0, 0.0);
        assert!(Narrowphase::overlap_circle_circle(Vec2::NAN, 1.0, far, 1.0).is_none());
        assert!(Narrowphase::overlap_circle_circle(far, 1.0, Vec2::new(f32::NAN, 0.0), 1.0).is_none());
        assert!(Narrowphase::overlap_circle_circle(Vec2::ZERO, f32::NAN, far, 1.0).is_none());
        assert!(!Narrowphase::overlap_point_circle(far, Vec2::NAN, 1.0));
    }

    #[test]
    fn test_circle_circle_depth_and_contact() {
        let ov = Narrowphase::overlap_circle_circle(Vec2::new(3.0, 0.0), 2.0, Vec2::ZERO, 2.0).unwrap();
        assert!((ov.depth - 1.0).abs() < 1e-6);
        assert_eq!(ov.normal, Vec2::new(1.0, 0.0));
        assert_eq!(ov.contact, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_circle_circle_coincident() {
        let ov = Narrowphase::overlap_circle_circle(Vec2::ONE, 1.0, Vec2::ONE, 2.0).unwrap();
        assert_eq!(ov.normal, Vec2::ZERO);
        assert_eq!(ov.depth, 3.0);
    }

    #[test]
    fn test_point_circle_boundary() {
        assert!(Narrowphase::overlap_point_circle(Vec2::new(1.0, 0.0), Vec2::ZERO, 1.0));
        assert!(!Narrowphase::overlap_point_circle(Vec2::new(1.0, 0.1), Vec2::ZERO, 1.0));
    }

    #[test]
    fn test_ray_circle_hit() {
        let hit = Narrowphase::ray_circle(Vec2::new(-3.0, 0.0), Vec2::X, Vec2::ZERO, 1.0).unwrap();
        assert!((hit.toi - 2.0).abs() < 1e-5);
        assert!((hit.contact.x + 1.0).abs() < 1e-5);
        assert!((hit.normal.x + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_circle_from_inside_hits_exit() {
        let hit = Narrowphase::ray_circle(Vec2::ZERO, Vec2::X, Vec2::ZERO, 2.0).unwrap();
        assert!((hit.toi - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_circle_miss_and_zero_dir() {
        assert!(Narrowphase::ray_circle(Vec2::new(-3.0, 0.0), -Vec2::X, Vec2::ZERO, 1.0).is_none());
        assert!(Narrowphase::ray_circle(Vec2::new(-3.0, 5.0), Vec2::X, Vec2::ZERO, 1.0).is_none());
        assert!(Narrowphase::ray_circle(Vec2::new(-3.0, 0.0), Vec2::ZERO, Vec2::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_segment_circle() {
        let hit =
            Narrowphase::line_segment_circle(Vec2::new(-2.0, 0.0), Vec2::new(2.0, 0.0), Vec2::ZERO, 1.0)
                .unwrap();
        assert!((hit.toi - 0.25).abs() < 1e-5);
        assert!((hit.contact.x + 1.0).abs() < 1e-5);
        let (a, b) = (Vec2::new(-4.0, 0.0), Vec2::new(-2.0, 0.0));
        let short = Narrowphase::line_segment_circle(a, b, Vec2::ZERO, 1.0);
        assert!(short.is_none());
    }

    #[test]
    fn test_degenerate_helpers() {
        assert_eq!(project_onto_or_zero(Vec2::new(3.0, 4.0), Vec2::ZERO), Vec2::ZERO);
        assert_eq!(project_onto_or_zero(Vec2::new(3.0, 4.0), Vec2::new(2.0, 0.0)), Vec2::new(3.0, 0.0));
        assert_eq!(reflect(Vec2::new(1.0, -1.0), Vec2::ZERO), Vec2::new(1.0, -1.0));
        assert_eq!(reflect(Vec2::new(1.0, -1.0), Vec2::new(0.0, 3.0)), Vec2::new(1.0, 1.0));
        assert_eq!(safe_div(Vec2::ONE, 0.0), Vec2::ZERO);
        assert_eq!(safe_div(Vec2::ONE, 2.0), Vec2::splat(0.5));
        assert_eq!(normalize_or_zero(Vec2::ZERO), Vec2::ZERO);
    }
}
