//! Collision primitives
//!
//! Two halves: the velocity reflection helper the table resolver leans on for
//! every obstacle, and a coarse body-vs-body overlap test that samples one
//! body's surface as a point cloud and probes it against the other body's
//! unit volume. The overlap test is approximate by construction (it can miss
//! contacts that fall between sample points) and is meant as a broad phase,
//! not a resolver.

use glam::{Mat4, Vec3};

/// Push `velocity` along `normal` in proportion to how head-on the approach
/// is. With `strength` 1 a perpendicular hit has its normal component
/// cancelled; larger values add energy, the arcade-bumper effect.
///
/// A (near) zero velocity has no direction to deflect and is left untouched.
pub fn deflect(velocity: &mut Vec3, normal: Vec3, strength: f32) {
    let speed = velocity.length();
    if speed <= 1e-6 {
        return;
    }
    let cos_theta = velocity.dot(normal) / speed;
    *velocity += normal * (speed * cos_theta.abs() * strength);
}

/// Unit-sphere membership with slack. `margin` widens (positive) or shrinks
/// (negative) the accepted radius in squared-distance terms.
pub fn intersect_unit_sphere(point: Vec3, margin: f32) -> bool {
    point.dot(point) < 1.0 + margin
}

/// Axis-aligned unit-cube membership with slack on every face.
pub fn intersect_unit_cube(point: Vec3, margin: f32) -> bool {
    point.x.abs() <= 1.0 + margin && point.y.abs() <= 1.0 + margin && point.z.abs() <= 1.0 + margin
}

/// Coarse overlap test: carry `b`'s surface samples into `a`'s local unit
/// space and ask `test` whether any lands inside. `point_cloud` is expressed
/// in `b`'s local space; `leeway` passes through to `test` as its margin.
///
/// A body never collides with itself.
pub fn check_colliding(
    a: &crate::sim::body::RigidBody,
    b: &crate::sim::body::RigidBody,
    point_cloud: &[Vec3],
    test: fn(Vec3, f32) -> bool,
    leeway: f32,
) -> bool {
    if std::ptr::eq(a, b) {
        return false;
    }
    let into_a: Mat4 = a.drawn_location().inverse();
    let from_b = b.drawn_location();
    point_cloud
        .iter()
        .any(|&p| test(into_a.transform_point3(from_b.transform_point3(p)), leeway))
}
