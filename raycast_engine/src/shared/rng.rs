//! Sampling helpers for baking tools and tests

use std::f64::consts::TAU;

use rand::Rng;

use crate::core::types::{Number, Point3, Vector3};

/// Uniform point inside the box spanned by `min` and `max`
pub fn point_in_box<R: Rng>(rng: &mut R, min: Point3, max: Point3) -> Point3 {
    let axis = |rng: &mut R, lo: Number, hi: Number| lo + (hi - lo) * rng.gen::<Number>();
    Point3::new(axis(rng, min.x, max.x), axis(rng, min.y, max.y), axis(rng, min.z, max.z))
}

/// Uniform point inside the unit ball, by rejection from the enclosing cube
pub fn vector_in_unit_sphere<R: Rng>(rng: &mut R) -> Vector3 {
    std::iter::repeat_with(|| point_in_box(rng, Point3::NEG_ONE, Point3::ONE))
        .find(|v| v.length_squared() <= 1.)
        .unwrap_or(Vector3::ZERO)
}

/// Uniform direction, using the cylindrical projection of the sphere (Archimedes' hat-box theorem)
pub fn vector_on_unit_sphere<R: Rng>(rng: &mut R) -> Vector3 {
    let z: Number = rng.gen_range(-1.0..=1.0);
    let phi = rng.gen_range(0. ..TAU);
    let r = (1. - z * z).max(0.).sqrt();
    Vector3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Unit direction in the hemisphere around `normal`, with a density proportional to the cosine of its angle
/// to the normal. Uniform disk samples are lifted onto the hemisphere (Malley's method).
///
/// `normal` must be normalised.
pub fn vector_cosine_hemisphere<R: Rng>(rng: &mut R, normal: Vector3) -> Vector3 {
    let (tangent, bitangent) = normal.any_orthonormal_pair();
    let r = rng.gen::<Number>().sqrt();
    let phi = rng.gen_range(0. ..TAU);
    let (x, y) = (r * phi.cos(), r * phi.sin());
    let z = (1. - x * x - y * y).max(0.).sqrt();
    (tangent * x + bitangent * y + normal * z).normalize_or_zero()
}

/// Random number in `min..max`
pub fn number_in<R: Rng>(rng: &mut R, min: Number, max: Number) -> Number { rng.gen_range(min..max) }
