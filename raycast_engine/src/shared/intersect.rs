use std::cmp::Ordering;
use std::ops::{Add, Mul};

use serde::Serialize;

use crate::core::types::{LocalId, MeshId, Number, Point2, Point3, Vector3};

/// The result of a nearest-hit query: where the ray struck, and which source triangle it struck
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Hit {
    /// Distance along the ray that the intersection occurred.
    ///
    /// Ray directions are normalised, so this is the world-space distance from the ray origin
    pub distance: Number,
    /// The position in world coordinates of the intersection
    pub position: Point3,
    /// Geometric normal of the triangle that was hit.
    ///
    /// This follows the triangle's counter-clockwise winding, irrespective of the incident ray;
    /// check [`Self::front_face`] to know which side was struck.
    ///
    /// # Invariants
    ///  - Must be normalised
    pub normal: Vector3,
    /// Whether the ray struck the side that [`Self::normal`] points out of
    pub front_face: bool,
    /// Barycentric coordinates of the intersection: the weights of the second and third vertices.
    /// The first vertex has weight `1 - u - v`
    pub uv: Point2,
    /// Index of the triangle inside the index buffer of the mesh it came from
    pub local_id: LocalId,
    /// Identifier of the mesh the triangle came from
    pub mesh_id: MeshId,
    /// Index of the triangle inside the flattened geometry store
    pub internal_id: usize,
}

impl PartialOrd for Hit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Number::partial_cmp(&self.distance, &other.distance) }
}

// region Interpolation

impl Hit {
    /// Barycentric weights of the three vertices of the triangle
    pub fn weights(&self) -> [Number; 3] { [1. - self.uv.x - self.uv.y, self.uv.x, self.uv.y] }

    /// Interpolates per-vertex values (ordered like the triangle's vertices) at the hit point
    pub fn interpolate<T>(&self, values: [T; 3]) -> T
    where
        T: Mul<Number, Output = T> + Add<Output = T>,
    {
        let [w0, w1, w2] = self.weights();
        let [a, b, c] = values;
        a * w0 + b * w1 + c * w2
    }

    /// Looks up the hit triangle's vertices inside the source mesh (`indices`, the same buffer the mesh was added with),
    /// and interpolates `attributes` at the hit point.
    ///
    /// Returns [None] if the buffers don't match the mesh the triangle was loaded from.
    pub fn interpolate_attribute<T>(&self, attributes: &[T], indices: &[u32]) -> Option<T>
    where
        T: Copy + Mul<Number, Output = T> + Add<Output = T>,
    {
        let tri = indices.get(self.local_id * 3..self.local_id * 3 + 3)?;
        let mut values = [None; 3];
        for (value, &index) in values.iter_mut().zip(tri) {
            *value = attributes.get(index as usize).copied();
        }
        let [Some(a), Some(b), Some(c)] = values else {
            return None;
        };
        Some(self.interpolate([a, b, c]))
    }

    /// Interpolates vertex normals of the source mesh at the hit point (smooth shading normal).
    ///
    /// If the normals cancel out (or the buffers don't match the mesh), returns [None]
    pub fn interpolate_normal(&self, normals: &[Vector3], indices: &[u32]) -> Option<Vector3> {
        self.interpolate_attribute(normals, indices)?.try_normalize()
    }
}

// endregion Interpolation
