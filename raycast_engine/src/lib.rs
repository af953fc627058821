//! # Raycast Engine
//!
//! CPU ray casting against static triangle soup, accelerated with a **Bounding Volume Hierarchy** (BVH).
//!
//! Used by editor picking, visibility tests, and offline baking tools.
//!
//! ## Layout
//! - [`mesh::store::GeometryStore`]: the flattened world-space triangles, and their [`mesh::store::TriangleInfos`]
//! - [`accel::bvh::Bvh`]: the acceleration structure, built from a store
//! - [`raycast::raycaster::Raycaster`]: owns both, and answers nearest-hit and any-hit queries
//! - [`shared::intersect::Hit`]: what a nearest-hit query returns
//! - [`flood`]: region growing over triangle adjacency, for charting and baking masks
//!
//! ## Example
//!
//! ```
//! use raycast_engine::core::types::Point3;
//! use raycast_engine::mesh::store::GeometryStore;
//! use raycast_engine::raycast::raycaster::Raycaster;
//!
//! let mut store = GeometryStore::new();
//! store
//!     .add_mesh(
//!         &[Point3::new(0., 0., 0.), Point3::new(1., 0., 0.), Point3::new(0., 1., 0.)],
//!         &[0, 1, 2],
//!         7,
//!     )
//!     .expect("mesh should be valid");
//!
//! let raycaster = Raycaster::new(store, Default::default());
//! let hit = raycaster
//!     .intersects(Point3::new(0.2, 0.2, 5.), Point3::new(0., 0., -1.), 0., 100.)
//!     .expect("ray should hit the triangle");
//!
//! assert_eq!(hit.mesh_id, 7);
//! assert_eq!(hit.local_id, 0);
//! ```

pub mod accel;
pub mod core;
pub mod flood;
pub mod mesh;
pub mod raycast;
pub mod shared;
