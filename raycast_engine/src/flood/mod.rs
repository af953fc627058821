//! # Module [crate::flood]
//!
//! Region growing over an [Adjacency](crate::mesh::adjacency::Adjacency) graph, most often the triangles of a mesh.
//!
//! Used for splitting geometry into connected charts, and for spreading baked values (such as visibility masks)
//! into the triangles around the ones that were sampled.

pub mod filler;
