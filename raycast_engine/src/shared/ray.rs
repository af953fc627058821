use getset::CopyGetters;

use crate::core::types::{Number, Point3, Vector3};

/// A ray with a normalised direction.
///
/// Because the direction is always unit-length, distances along the ray (`t`) are world-space distances.
#[derive(Copy, Clone, PartialEq, Debug, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Ray {
    /// World-space origin of the ray
    pos: Point3,
    /// Direction vector of the ray, always normalised
    dir: Vector3,
    /// Component-wise reciprocal of [`Self::dir()`], for the slab test.
    /// Axis-parallel rays have infinite components here
    inv_dir: Vector3,
}

impl Ray {
    /// Creates a new ray, normalising the direction.
    ///
    /// Returns [None] if the origin isn't finite, or the direction can't be normalised
    /// (zero-length, infinite or NaN).
    pub fn new(pos: impl Into<Point3>, dir: impl Into<Vector3>) -> Option<Self> {
        let (pos, dir) = (pos.into(), dir.into());
        if !pos.is_finite() {
            return None;
        }
        let dir = dir.try_normalize()?;
        Some(Self {
            pos,
            dir,
            inv_dir: dir.recip(),
        })
    }

    /// Creates the ray travelling from `from` towards `to`, along with the distance between the two points.
    ///
    /// Returns [None] if the points coincide.
    pub fn between(from: impl Into<Point3>, to: impl Into<Point3>) -> Option<(Self, Number)> {
        let (from, to) = (from.into(), to.into());
        let dist = from.distance(to);
        Self::new(from, to - from).map(|ray| (ray, dist))
    }

    /// Gets the position at a given distance along the ray
    ///
    /// `pos + (t * dir)`
    #[inline(always)]
    pub fn at(&self, t: Number) -> Point3 { self.pos + (self.dir * t) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn direction_is_normalised() {
        let ray = Ray::new([1., 2., 3.], [0., 0., -4.]).expect("valid ray");
        assert_relative_eq!(ray.dir(), Vector3::NEG_Z);
        assert_relative_eq!(ray.at(2.), Point3::new(1., 2., 1.));
    }

    #[test]
    fn degenerate_rays_are_rejected() {
        assert!(Ray::new([0., 0., 0.], [0., 0., 0.]).is_none());
        assert!(Ray::new([0., 0., 0.], [Number::NAN, 0., 1.]).is_none());
        assert!(Ray::new([Number::INFINITY, 0., 0.], [0., 0., 1.]).is_none());
        assert!(Ray::between([1., 1., 1.], [1., 1., 1.]).is_none());
    }
}
