use getset::Getters;
use puffin::profile_function;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::accel::bvh::Bvh;
use crate::core::targets::RAYCAST;
use crate::core::types::{Number, Point3, Vector3};
use crate::mesh::store::GeometryStore;
use crate::raycast::opts::RaycasterOpts;
use crate::shared::intersect::Hit;
use crate::shared::interval::Interval;
use crate::shared::ray::Ray;
use crate::shared::validate;

/// Gap left at both ends of a segment by [Raycaster::visible()], so the surfaces the points lie on don't occlude them
pub const VISIBILITY_EPSILON: Number = 1e-6;

/// Answers nearest-hit and any-hit queries against the triangles of a [GeometryStore].
///
/// Owns the store and the [Bvh] built over it. Queries only need `&self`, so any number of threads may
/// query at once; changing the geometry or the options needs `&mut self` (or ownership), which can't
/// happen while a query is running.
#[derive(Clone, Debug, Getters)]
#[getset(get = "pub")]
pub struct Raycaster {
    store: GeometryStore,
    bvh: Bvh,
    opts: RaycasterOpts,
}

/// One ray of a batched query, in the same shape as the arguments to [Raycaster::intersects()]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RayQuery {
    pub origin: Point3,
    pub dir: Vector3,
    pub t_min: Number,
    pub t_max: Number,
}

// region Constructors

impl Raycaster {
    /// Takes ownership of the store and builds the BVH over it
    pub fn new(store: GeometryStore, opts: RaycasterOpts) -> Self {
        let bvh = Bvh::build(store.triangles(), &opts.bvh);
        debug!(target: RAYCAST, triangles = store.len(), culling = %opts.culling, "created raycaster");
        Self { store, bvh, opts }
    }

    /// Rebuilds the BVH with new options
    pub fn rebuild(&mut self, opts: RaycasterOpts) {
        self.bvh = Bvh::build(self.store.triangles(), &opts.bvh);
        self.opts = opts;
    }

    /// Gives the store back, so more meshes can be added before building a new raycaster
    pub fn into_store(self) -> GeometryStore { self.store }
}

// endregion Constructors

// region Nearest hit

impl Raycaster {
    /// Finds the closest triangle that the ray hits with a distance in `[t_min, t_max]`.
    ///
    /// `dir` doesn't need to be normalised, but distances are measured as if it were.
    /// Returns [None] on a miss, or if the ray or range are invalid
    /// (zero-length or non-finite direction, non-finite origin, `t_min > t_max`, NaN bounds).
    pub fn intersects(&self, origin: Point3, dir: Vector3, t_min: Number, t_max: Number) -> Option<Hit> {
        let Some(ray) = Ray::new(origin, dir) else {
            trace!(target: RAYCAST, ?origin, ?dir, "rejected invalid ray");
            return None;
        };
        self.intersects_ray(&ray, Interval::from(t_min..=t_max))
    }

    /// Same as [Self::intersects()], with an already-built ray
    pub fn intersects_ray(&self, ray: &Ray, interval: Interval<Number>) -> Option<Hit> {
        if interval.is_empty() {
            trace!(target: RAYCAST, %interval, "rejected empty interval");
            return None;
        }

        let culling = self.opts.culling;
        let triangles = self.store.triangles();
        let (distance, (internal_id, tri_hit)) = self.bvh.traverse_nearest(ray, &interval, |idx, interval| {
            triangles[idx]
                .intersect(ray, interval, culling)
                .map(|tri_hit| (tri_hit.dist, (idx, tri_hit)))
        })?;

        let infos = self.store.infos()[internal_id];
        let hit = Hit {
            distance,
            position: ray.at(distance),
            normal: triangles[internal_id].normal(),
            front_face: tri_hit.front_face,
            uv: tri_hit.uv,
            local_id: infos.local_id,
            mesh_id: infos.mesh_id,
            internal_id,
        };

        validate::hit(ray, hit, interval);
        Some(hit)
    }
}

// endregion Nearest hit

// region Any hit

impl Raycaster {
    /// Checks whether the ray hits anything with a distance in `[t_min, t_max]`.
    ///
    /// Stops at the first intersection found, so this is cheaper than [Self::intersects()].
    /// Invalid rays or ranges never hit.
    pub fn has_hit(&self, origin: Point3, dir: Vector3, t_min: Number, t_max: Number) -> bool {
        let Some(ray) = Ray::new(origin, dir) else {
            trace!(target: RAYCAST, ?origin, ?dir, "rejected invalid ray");
            return false;
        };
        self.has_hit_ray(&ray, Interval::from(t_min..=t_max))
    }

    /// Same as [Self::has_hit()], with an already-built ray
    pub fn has_hit_ray(&self, ray: &Ray, interval: Interval<Number>) -> bool {
        if interval.is_empty() {
            trace!(target: RAYCAST, %interval, "rejected empty interval");
            return false;
        }

        let culling = self.opts.culling;
        let triangles = self.store.triangles();
        self.bvh
            .traverse_any(ray, &interval, |idx, interval| triangles[idx].intersect(ray, interval, culling).is_some())
    }

    /// Checks that nothing lies on the segment between two points.
    ///
    /// [VISIBILITY_EPSILON] is trimmed off both ends, so that points lying on a surface can still see each other.
    /// Coincident points are always visible.
    pub fn visible(&self, p0: Point3, p1: Point3) -> bool {
        let Some((ray, dist)) = Ray::between(p0, p1) else {
            return true;
        };
        if dist <= 2. * VISIBILITY_EPSILON {
            return true;
        }
        !self.has_hit_ray(&ray, Interval::from(VISIBILITY_EPSILON..=dist - VISIBILITY_EPSILON))
    }
}

// endregion Any hit

// region Batches

impl Raycaster {
    /// Runs [Self::intersects()] for every query in parallel, returning results in the same order
    pub fn intersects_batch(&self, queries: &[RayQuery]) -> Vec<Option<Hit>> {
        profile_function!();
        queries
            .par_iter()
            .map(|q| self.intersects(q.origin, q.dir, q.t_min, q.t_max))
            .collect()
    }

    /// Runs [Self::has_hit()] for every query in parallel, returning results in the same order
    pub fn has_hit_batch(&self, queries: &[RayQuery]) -> Vec<bool> {
        profile_function!();
        queries
            .par_iter()
            .map(|q| self.has_hit(q.origin, q.dir, q.t_min, q.t_max))
            .collect()
    }
}

// endregion Batches
