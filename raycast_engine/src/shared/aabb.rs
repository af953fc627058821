use std::borrow::Borrow;

use getset::CopyGetters;
use itertools::Itertools;

use crate::core::types::{Number, Point3, Vector3};
use crate::shared::interval::Interval;
use crate::shared::ray::Ray;

/// An **Axis-Aligned Bounding Box** (AABB)
///
/// The box spans between the two corners `min` and `max`.
/// The [empty](Self::EMPTY) box has inverted infinite corners, so that encompassing anything with it
/// yields that thing.
#[derive(CopyGetters, Copy, Clone, Debug, PartialEq)]
#[getset(get_copy = "pub")]
pub struct Aabb {
    /// The lower corner of the [Aabb]; the corner with the smallest coordinates
    min: Point3,
    /// The upper corner of the [Aabb]; the corner with the largest coordinates
    max: Point3,
}

// region Constructors

impl Aabb {
    pub const EMPTY: Self = Self {
        min: Point3::INFINITY,
        max: Point3::NEG_INFINITY,
    };

    /// Creates a new [Aabb] from two points, which do *not* have to be sorted by min/max
    pub fn new(a: impl Into<Point3>, b: impl Into<Point3>) -> Self {
        let (a, b) = (a.into(), b.into());
        Self {
            min: Point3::min(a, b),
            max: Point3::max(a, b),
        }
    }

    /// Returns an [Aabb] that surrounds the two given boxes
    pub fn encompass(a: impl Borrow<Self>, b: impl Borrow<Self>) -> Self {
        let (a, b) = (a.borrow(), b.borrow());
        Self {
            min: Point3::min(a.min, b.min),
            max: Point3::max(a.max, b.max),
        }
    }

    /// [Self::encompass] but for an arbitrary number of boxes
    pub fn encompass_iter<B: Borrow<Self>>(iter: impl IntoIterator<Item = B>) -> Self {
        iter.into_iter()
            .fold(Self::EMPTY, |a: Self, b: B| Self::encompass(a, b.borrow()))
    }

    /// [Self::encompass] but for an arbitrary number of points
    pub fn encompass_points<B: Borrow<Point3>>(iter: impl IntoIterator<Item = B>) -> Self {
        iter.into_iter().fold(Self::EMPTY, |aabb, p| aabb.with_point(*p.borrow()))
    }

    /// Grows the box so that it also contains `p`
    pub fn with_point(self, p: Point3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }
}

impl Default for Aabb {
    fn default() -> Self { Self::EMPTY }
}

// endregion Constructors

// region Helper

impl Aabb {
    /// Whether the box contains no points at all
    pub fn is_empty(&self) -> bool { self.min.cmpgt(self.max).any() }

    /// How large the [Aabb] is along each axis
    pub fn size(&self) -> Vector3 {
        if self.is_empty() {
            Vector3::ZERO
        } else {
            self.max - self.min
        }
    }

    pub fn centre(&self) -> Point3 { (self.min + self.max) / 2. }

    /// Surface area of the box
    pub fn area(&self) -> Number {
        let size = self.size();
        ((size.x * size.y) + (size.y * size.z) + (size.z * size.x)) * 2.
    }

    /// Index (`0..3`) of the axis along which the box is the largest
    pub fn longest_axis(&self) -> usize {
        self.size()
            .to_array()
            .into_iter()
            .position_max_by(Number::total_cmp)
            .unwrap_or(0)
    }

    /// Whether `other` lies entirely inside `self`. The empty box is inside every box
    pub fn contains_aabb(&self, other: &Self) -> bool {
        other.is_empty() || (self.min.cmple(other.min).all() && other.max.cmple(self.max).all())
    }

    // Returns the corners of the AABB
    pub fn corners(&self) -> [Point3; 8] {
        let (l, h) = (self.min, self.max);
        [
            Point3::new(l.x, l.y, l.z),
            Point3::new(l.x, l.y, h.z),
            Point3::new(l.x, h.y, l.z),
            Point3::new(l.x, h.y, h.z),
            Point3::new(h.x, l.y, l.z),
            Point3::new(h.x, l.y, h.z),
            Point3::new(h.x, h.y, l.z),
            Point3::new(h.x, h.y, h.z),
        ]
    }

    /// The twelve edges of the box, as pairs of [corners](Self::corners)
    pub fn edges(&self) -> [[Point3; 2]; 12] {
        // Corners differing in exactly one bit of their index share an edge
        const EDGES: [[usize; 2]; 12] = [
            [0, 1], [2, 3], [4, 5], [6, 7],
            [0, 2], [1, 3], [4, 6], [5, 7],
            [0, 4], [1, 5], [2, 6], [3, 7],
        ];
        let c = self.corners();
        EDGES.map(|[a, b]| [c[a], c[b]])
    }
}

// endregion Helper

// region Impl

impl Aabb {
    /// Checks whether the given ray intersects with the AABB at any point within the given distance interval.
    ///
    /// Returns the distance at which the ray enters the part of the box inside the interval
    /// (clamped to the interval's start), or [None] if it misses.
    pub fn hit(&self, ray: &Ray, interval: &Interval<Number>) -> Option<Number> {
        /*
        CREDITS:

        Author: Tavianator
        URL:
            - <https://tavianator.com/2011/ray_box.html>
            - <https://tavianator.com/2015/ray_box_nan.html>
        */

        if self.is_empty() {
            return None;
        }

        let (pos, inv_dir) = (ray.pos(), ray.inv_dir());

        let mut t_min = Number::NEG_INFINITY;
        let mut t_max = Number::INFINITY;
        for axis in 0..3 {
            // Parallel to this slab: the origin is either between the planes (inclusive) for the whole ray, or never.
            // The slab products would be `0 * inf = NaN` for an origin exactly on a plane.
            if !inv_dir[axis].is_finite() {
                if pos[axis] < self.min[axis] || pos[axis] > self.max[axis] {
                    return None;
                }
                continue;
            }

            let t1 = (self.min[axis] - pos[axis]) * inv_dir[axis];
            let t2 = (self.max[axis] - pos[axis]) * inv_dir[axis];
            t_min = Number::max(t_min, Number::min(t1, t2));
            t_max = Number::min(t_max, Number::max(t1, t2));
        }

        interval.overlap(t_min, t_max).map(|(entry, _exit)| entry)
    }
}

// endregion Impl
