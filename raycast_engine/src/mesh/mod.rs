//! # Module [crate::mesh]
//!
//! Triangle geometry, as consumed by the ray caster.
//!
//! Collaborator meshes are flattened into a [store::GeometryStore]: a list of world-space [triangle::Triangle]s,
//! each tagged with the [store::TriangleInfos] that maps it back to its source mesh.
//! [adjacency] derives connectivity from the same data, for [crate::flood].

pub mod adjacency;
pub mod store;
pub mod triangle;
