//! Connectivity between triangles, for region growing with [FloodFiller](crate::flood::filler::FloodFiller)

use std::collections::HashMap;

use itertools::Itertools;
use smallvec::SmallVec;
use tracing::debug;

use crate::core::targets::GEOMETRY;
use crate::core::types::Point3;
use crate::mesh::store::{GeometryError, GeometryStore};

/// A graph of nodes identified by index, `0..node_count()`
pub trait Adjacency {
    fn node_count(&self) -> usize;

    /// Nodes directly connected to `node`. Never includes `node` itself
    fn neighbours(&self, node: usize) -> &[usize];
}

/// Triangles are adjacent when they share an edge (two vertices).
///
/// Edges shared by more than two triangles connect all of them.
/// Neighbour lists are sorted and free of duplicates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriangleAdjacency {
    /// Start of each triangle's neighbours in `neighbours`, plus a final end offset
    offsets: Vec<usize>,
    neighbours: Vec<usize>,
}

impl TriangleAdjacency {
    /// Adjacency of the triangles of one mesh's index buffer. Triangle `i` is `indices[3i..3i + 3]`
    pub fn from_indices(indices: &[u32]) -> Result<Self, GeometryError> {
        if indices.len() % 3 != 0 {
            return Err(GeometryError::IndexCountNotTriangles { len: indices.len() });
        }
        Ok(Self::from_triangles(indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])))
    }

    /// Adjacency of every triangle in the store, indexed like [GeometryStore::triangles()].
    ///
    /// The store doesn't keep index buffers, so vertices are matched by position: corners that are exactly
    /// equal are the same vertex, even across meshes.
    pub fn from_store(store: &GeometryStore) -> Self {
        let mut welded = HashMap::<[u64; 3], u32>::new();
        let mut vertex_id = |p: Point3| -> u32 {
            // `-0.0` and `0.0` are the same position
            let key = (p + Point3::ZERO).to_array().map(f64::to_bits);
            let next = welded.len() as u32;
            *welded.entry(key).or_insert(next)
        };

        let triangles = store
            .triangles()
            .iter()
            .map(|tri| tri.vertices().map(&mut vertex_id))
            .collect_vec();

        let adjacency = Self::from_triangles(triangles);
        debug!(target: GEOMETRY, triangles = store.len(), vertices = welded.len(), "welded store adjacency");
        adjacency
    }

    fn from_triangles(triangles: impl IntoIterator<Item = [u32; 3]>) -> Self {
        let mut edges = HashMap::<(u32, u32), SmallVec<[usize; 2]>>::new();
        let mut count = 0;
        for (tri, [a, b, c]) in triangles.into_iter().enumerate() {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                if u == v {
                    continue;
                }
                edges.entry((u.min(v), u.max(v))).or_default().push(tri);
            }
            count += 1;
        }

        let mut lists = vec![Vec::new(); count];
        for sharing in edges.values().filter(|sharing| sharing.len() > 1) {
            for (&i, &j) in sharing.iter().tuple_combinations() {
                if i != j {
                    lists[i].push(j);
                    lists[j].push(i);
                }
            }
        }

        let mut offsets = Vec::with_capacity(count + 1);
        let mut neighbours = Vec::new();
        for list in lists {
            offsets.push(neighbours.len());
            neighbours.extend(list.into_iter().sorted_unstable().dedup());
        }
        offsets.push(neighbours.len());

        Self { offsets, neighbours }
    }
}

impl Adjacency for TriangleAdjacency {
    fn node_count(&self) -> usize { self.offsets.len() - 1 }

    fn neighbours(&self, node: usize) -> &[usize] { &self.neighbours[self.offsets[node]..self.offsets[node + 1]] }
}
