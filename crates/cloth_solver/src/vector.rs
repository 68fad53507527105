//! The single 3-component value type used by the solver.
//!
//! `Vector3` is bevy's `Vec3`, so positions and normals flow into render
//! meshes and gizmos without conversion. Everything the solver needs
//! (add/sub/scale/negate/dot/cross/length) comes from the type itself; the
//! helpers below only cover the zero-length hazards.

pub use bevy::math::Vec3 as Vector3;

/// Lengths at or below this are treated as zero.
pub const EPSILON: f32 = 1e-6;

/// Unit vector in the direction of `v`, or zero when `v` has no usable direction.
pub fn unit_or_zero(v: Vector3) -> Vector3 {
    let length = v.length();
    if length > EPSILON && length.is_finite() {
        v / length
    } else {
        Vector3::ZERO
    }
}

/// Face normal of the triangle `a, b, c`.
///
/// Not normalized: the magnitude equals twice the triangle area.
pub fn triangle_normal(a: Vector3, b: Vector3, c: Vector3) -> Vector3 {
    (b - a).cross(c - a)
}
