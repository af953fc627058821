use getset::CopyGetters;

use crate::core::types::{Number, Point2, Point3, Vector3};
use crate::raycast::opts::FaceCulling;
use crate::shared::aabb::Aabb;
use crate::shared::interval::Interval;
use crate::shared::ray::Ray;

/// Rays closer than this to being parallel with a triangle (cosine of the angle between the ray and the plane normal)
/// are treated as missing it
const PARALLEL_EPSILON: Number = 1e-12;

/// A single world-space triangle, with its derived data cached
#[derive(Copy, Clone, Debug, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Triangle {
    /// The three corner vertices of the triangle, in counter-clockwise order
    vertices: [Point3; 3],
    /// Unit normal, following the winding of the vertices
    normal: Vector3,
    /// Length of `cross(v1 - v0, v2 - v0)`, twice the area
    double_area: Number,
    aabb: Aabb,
    centroid: Point3,
}

/// Where a ray struck a [Triangle]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleHit {
    pub dist: Number,
    /// Barycentric weights of the second and third vertices
    pub uv: Point2,
    pub front_face: bool,
}

impl Triangle {
    /// Creates a triangle, returning [None] if it is degenerate: any vertex isn't finite,
    /// or its area is not above `min_area`.
    pub fn new(vertices: impl Into<[Point3; 3]>, min_area: Number) -> Option<Self> {
        let vertices = vertices.into();
        if !vertices.iter().all(|v| v.is_finite()) {
            return None;
        }

        let [v0, v1, v2] = vertices;
        let n_raw = Vector3::cross(v1 - v0, v2 - v0);
        let double_area = n_raw.length();
        if !double_area.is_finite() || double_area / 2. <= min_area {
            return None;
        }

        Some(Self {
            vertices,
            normal: n_raw / double_area,
            double_area,
            aabb: Aabb::encompass_points(vertices),
            centroid: (v0 + v1 + v2) / 3.,
        })
    }

    pub fn area(&self) -> Number { self.double_area / 2. }

    /// Intersects the ray with the triangle, accepting only distances inside `interval`.
    ///
    /// Both sides are hit unless `culling` says otherwise.
    pub fn intersect(&self, ray: &Ray, interval: &Interval<Number>, culling: FaceCulling) -> Option<TriangleHit> {
        /*
        CREDITS:

        Title: "Ray-Tracing: Rendering a Triangle (Möller-Trumbore algorithm)"
        Author: Scratchapixel
        URL: <https://www.scratchapixel.com/lessons/3d-basic-rendering/ray-tracing-rendering-a-triangle/moller-trumbore-ray-triangle-intersection.html>
        */

        let [v0, v1, v2] = self.vertices;

        let v0v1 = v1 - v0;
        let v0v2 = v2 - v0;
        let p_vec = Vector3::cross(ray.dir(), v0v2);
        // Equal to `-dot(dir, n_raw)`: positive when the ray travels against the normal
        let det = v0v1.dot(p_vec);

        let threshold = PARALLEL_EPSILON * self.double_area;
        let front_face = det > 0.;
        match culling {
            FaceCulling::None if det.abs() <= threshold => return None,
            FaceCulling::Back if det <= threshold => return None,
            _ => {}
        }

        let inv_det = 1. / det;

        let t_vec = ray.pos() - v0;
        let u = Vector3::dot(t_vec, p_vec) * inv_det;
        if !(0. ..=1.).contains(&u) {
            return None;
        }

        let q_vec = Vector3::cross(t_vec, v0v1);
        let v = Vector3::dot(ray.dir(), q_vec) * inv_det;
        if v < 0. || u + v > 1. {
            return None;
        }

        let t = Vector3::dot(v0v2, q_vec) * inv_det;
        if !interval.contains(&t) {
            return None;
        }

        Some(TriangleHit {
            dist: t,
            uv: Point2::new(u, v),
            front_face,
        })
    }
}
