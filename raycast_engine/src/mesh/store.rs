//! The flattened, world-space triangle buffer that the [BVH](crate::accel::bvh::Bvh) indexes

use getset::{CopyGetters, Getters};
use serde::Serialize;
use thiserror::Error;
use tracing::{trace, warn};

use crate::core::targets::GEOMETRY;
use crate::core::types::{LocalId, Matrix4, MeshId, Number, Point3};
use crate::mesh::triangle::Triangle;

/// Triangles with an area at or below this are dropped when populating a [GeometryStore]
pub const DEFAULT_MIN_AREA: Number = 1e-12;

/// Maps a triangle of the [GeometryStore] back to the mesh it was loaded from
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TriangleInfos {
    /// Identifier of the source mesh
    pub mesh_id: MeshId,
    /// Index of the triangle inside the source mesh's index buffer
    pub local_id: LocalId,
}

/// Errors for malformed mesh input. The store is never partially modified when one of these is returned
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("index buffer length {len} is not a multiple of three")]
    IndexCountNotTriangles { len: usize },
    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        index: u32,
        position: usize,
        vertex_count: usize,
    },
    #[error("{triangles} triangles were given with {infos} triangle infos")]
    LengthMismatch { triangles: usize, infos: usize },
}

/// What happened to the triangles of one mesh when it was added to a [GeometryStore]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MeshStats {
    /// Number of triangles appended to the store
    pub added: usize,
    /// Number of degenerate triangles that were skipped
    pub skipped: usize,
}

/// Owns the world-space triangles that are ray cast against, and their [TriangleInfos].
///
/// `triangles()[i]` always corresponds to `infos()[i]`.
///
/// # Degenerate triangles
/// Triangles that are degenerate (non-finite vertices, or an area at or below [`Self::min_area()`]) are never stored,
/// so they can't produce NaN bounding boxes in the BVH. The [TriangleInfos::local_id] of the remaining triangles is
/// unaffected by the skipping: it is always the triangle's position in the original index buffer.
#[derive(Clone, Debug, Getters, CopyGetters)]
pub struct GeometryStore {
    #[getset(get = "pub")]
    triangles: Vec<Triangle>,
    #[getset(get = "pub")]
    infos: Vec<TriangleInfos>,
    #[getset(get_copy = "pub")]
    min_area: Number,
}

// region Constructors

impl GeometryStore {
    pub fn new() -> Self { Self::with_min_area(DEFAULT_MIN_AREA) }

    /// Creates an empty store, that will drop triangles with an area at or below `min_area`
    pub fn with_min_area(min_area: Number) -> Self {
        Self {
            triangles: vec![],
            infos: vec![],
            min_area,
        }
    }

    /// Creates a store from already-flattened data
    pub fn from_parts(triangles: Vec<Triangle>, infos: Vec<TriangleInfos>) -> Result<Self, GeometryError> {
        if triangles.len() != infos.len() {
            return Err(GeometryError::LengthMismatch {
                triangles: triangles.len(),
                infos: infos.len(),
            });
        }
        Ok(Self {
            triangles,
            infos,
            min_area: DEFAULT_MIN_AREA,
        })
    }
}

impl Default for GeometryStore {
    fn default() -> Self { Self::new() }
}

// endregion Constructors

// region Population

impl GeometryStore {
    /// Appends the triangles of one mesh, given world-space `vertices` and a triangle-list `indices` buffer.
    ///
    /// Fails without modifying the store if the index buffer isn't made of whole triangles, or references
    /// a vertex that doesn't exist.
    pub fn add_mesh(&mut self, vertices: &[Point3], indices: &[u32], mesh_id: MeshId) -> Result<MeshStats, GeometryError> {
        Self::validate_indices(vertices.len(), indices)?;

        let mut stats = MeshStats::default();
        self.triangles.reserve(indices.len() / 3);
        self.infos.reserve(indices.len() / 3);

        for (local_id, tri) in indices.chunks_exact(3).enumerate() {
            let corners = [0, 1, 2].map(|i| vertices[tri[i] as usize]);
            match Triangle::new(corners, self.min_area) {
                Some(triangle) => {
                    self.triangles.push(triangle);
                    self.infos.push(TriangleInfos { mesh_id, local_id });
                    stats.added += 1;
                }
                None => {
                    trace!(target: GEOMETRY, mesh_id, local_id, ?corners, "skipping degenerate triangle");
                    stats.skipped += 1;
                }
            }
        }

        if stats.skipped > 0 {
            warn!(target: GEOMETRY, mesh_id, ?stats, "skipped degenerate triangles");
        }
        trace!(target: GEOMETRY, mesh_id, ?stats, total = self.len(), "added mesh");

        Ok(stats)
    }

    /// Same as [Self::add_mesh()], but first transforms the (object-space) `vertices` into world space
    pub fn add_mesh_transformed(
        &mut self,
        vertices: &[Point3],
        indices: &[u32],
        mesh_id: MeshId,
        transform: &Matrix4,
    ) -> Result<MeshStats, GeometryError> {
        let world = vertices.iter().map(|&v| transform.transform_point3(v)).collect::<Vec<_>>();
        self.add_mesh(&world, indices, mesh_id)
    }

    fn validate_indices(vertex_count: usize, indices: &[u32]) -> Result<(), GeometryError> {
        if indices.len() % 3 != 0 {
            return Err(GeometryError::IndexCountNotTriangles { len: indices.len() });
        }
        match indices.iter().position(|&index| index as usize >= vertex_count) {
            Some(position) => Err(GeometryError::IndexOutOfRange {
                index: indices[position],
                position,
                vertex_count,
            }),
            None => Ok(()),
        }
    }
}

// endregion Population

impl GeometryStore {
    pub fn len(&self) -> usize { self.triangles.len() }

    pub fn is_empty(&self) -> bool { self.triangles.is_empty() }

    /// Triangle at index `internal_id` and its infos
    pub fn get(&self, internal_id: usize) -> Option<(&Triangle, &TriangleInfos)> {
        Some((self.triangles.get(internal_id)?, self.infos.get(internal_id)?))
    }
}
