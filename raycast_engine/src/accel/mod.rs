//! Module containing **Bounding Volume Hierarchy** (BVH) structures
//!
//! These are used to accelerate ray-triangle intersection tests by narrowing the search space,
//! by skipping triangles that obviously can't be intersected.

pub mod build;
pub mod bvh;
pub mod node;
