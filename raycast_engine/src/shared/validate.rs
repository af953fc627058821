//! Debug-only sanity checks. Each function is a no-op in builds without `debug_assertions`.

use std::borrow::Borrow;

use approx::*;

use crate::core::types::{Number, Point3, Vector3};
use crate::shared::intersect::Hit;
use crate::shared::interval::Interval;
use crate::shared::ray::Ray;

macro_rules! debug_assert_only {
    () => {
        if cfg!(not(debug_assertions)) {
            return;
        }
    };
}

pub const EPSILON: Number = 1e-6;
pub const RELATIVE: Number = 1e-3;

#[inline(always)]
#[track_caller]
pub fn number(val: impl Borrow<Number>) {
    debug_assert_only!();

    let val = val.borrow();
    assert!(val.is_finite(), "should be finite; val: {val}");
}

#[inline(always)]
#[track_caller]
pub fn point3(v: impl Borrow<Point3>) {
    debug_assert_only!();
    let v = v.borrow();
    assert!(v.is_finite(), "should be finite; vec: {v:?}");
}

#[inline(always)]
#[track_caller]
pub fn normal3(n: impl Borrow<Vector3>) {
    debug_assert_only!();
    let n = n.borrow();
    point3(n);
    assert!(
        n.is_normalized(),
        "should be normalised; vec: {n:?}, len: {:?}",
        n.length()
    );
}

/// Asserts that a hit returned for `ray` is consistent with it
#[inline(always)]
#[track_caller]
pub fn hit(ray: impl Borrow<Ray>, hit: impl Borrow<Hit>, interval: impl Borrow<Interval<Number>>) {
    debug_assert_only!();

    let (ray, hit, interval) = (ray.borrow(), hit.borrow(), interval.borrow());

    number(hit.distance);
    point3(hit.position);
    normal3(hit.normal);

    assert!(
        interval.contains(&hit.distance),
        "hit dist {} not in interval {}",
        hit.distance,
        interval
    );

    let expected = ray.at(hit.distance);
    assert!(
        Point3::relative_eq(&hit.position, &expected, EPSILON, RELATIVE),
        "hit position doesn't match ray at hit dist; hit_pos: {pos:?}, dist: {dist}, ray: {ray:?}, ray_pos: {expected:?}",
        pos = hit.position,
        dist = hit.distance,
    );

    let [w0, w1, w2] = hit.weights();
    assert!(
        [w0, w1, w2].iter().all(|w| (-EPSILON..=1. + EPSILON).contains(w)),
        "barycentrics out of range; uv: {:?}",
        hit.uv
    );
}
