#![allow(dead_code)]

use approx::assert_relative_eq;
use rand::SeedableRng;
use raycast_engine::core::types::*;
use raycast_engine::mesh::store::GeometryStore;
use raycast_engine::raycast::opts::FaceCulling;
use raycast_engine::raycast::raycaster::{RayQuery, Raycaster};
use raycast_engine::shared::interval::Interval;
use raycast_engine::shared::ray::Ray;
use raycast_engine::shared::rng;

pub type Rng = rand::rngs::SmallRng;

/// Half-size of the cube that random soups are generated in
pub const SCENE_EXTENT: Number = 10.;

pub fn seeded(seed: u64) -> Rng { Rng::seed_from_u64(seed) }

/// The triangle `(0,0,0), (1,0,0), (0,1,0)`, facing `+Z`
pub fn unit_triangle() -> ([Point3; 3], [u32; 3]) { ([Point3::ZERO, Point3::X, Point3::Y], [0, 1, 2]) }

pub fn unit_triangle_store(mesh_id: MeshId) -> GeometryStore {
    let (vertices, indices) = unit_triangle();
    let mut store = GeometryStore::new();
    store.add_mesh(&vertices, &indices, mesh_id).expect("unit triangle is valid");
    store
}

/// `n * n` unit quads on the `z = 0` plane, each split along its diagonal, facing `+Z`
pub fn grid_store(n: u32) -> GeometryStore {
    let vertex = |i: u32, j: u32| j * (n + 1) + i;
    let vertices = (0..=n)
        .flat_map(|j| (0..=n).map(move |i| Point3::new(i as Number, j as Number, 0.)))
        .collect::<Vec<_>>();
    let indices = (0..n)
        .flat_map(|j| (0..n).map(move |i| (i, j)))
        .flat_map(|(i, j)| {
            let (a, b, c, d) = (vertex(i, j), vertex(i + 1, j), vertex(i + 1, j + 1), vertex(i, j + 1));
            [a, b, c, a, c, d]
        })
        .collect::<Vec<_>>();

    let mut store = GeometryStore::new();
    store.add_mesh(&vertices, &indices, 0).expect("grid indices are valid");
    store
}

/// A closed, outward-facing box spanning `min..max`
pub fn closed_box_store(min: Point3, max: Point3) -> GeometryStore {
    let vertices = (0..8)
        .map(|i| Point3::new((i & 1) as Number, ((i >> 1) & 1) as Number, ((i >> 2) & 1) as Number))
        .collect::<Vec<_>>();
    #[rustfmt::skip]
    let indices = [
        0, 2, 1, 1, 2, 3, // -Z
        4, 5, 6, 5, 7, 6, // +Z
        0, 1, 4, 1, 5, 4, // -Y
        2, 6, 3, 3, 6, 7, // +Y
        0, 4, 2, 2, 4, 6, // -X
        1, 3, 5, 3, 7, 5, // +X
    ];

    let transform = Matrix4::from_translation(min) * Matrix4::from_scale(max - min);
    let mut store = GeometryStore::new();
    store
        .add_mesh_transformed(&vertices, &indices, 0, &transform)
        .expect("box indices are valid");
    store
}

/// A store of `count` random, independent triangles, split across a few meshes
pub fn random_soup(rng: &mut Rng, count: usize) -> GeometryStore {
    const PER_MESH: usize = 64;

    let mut store = GeometryStore::new();
    let mut remaining = count;
    let mut mesh_id = 0;
    while remaining > 0 {
        let n = remaining.min(PER_MESH);
        let mut vertices = Vec::with_capacity(n * 3);
        for _ in 0..n {
            let centre = rng::point_in_box(rng, Point3::splat(-SCENE_EXTENT), Point3::splat(SCENE_EXTENT));
            let size = rng::number_in(rng, 0.1, 2.);
            for _ in 0..3 {
                vertices.push(centre + rng::vector_in_unit_sphere(rng) * size);
            }
        }
        let indices = (0..(n * 3) as u32).collect::<Vec<_>>();
        store.add_mesh(&vertices, &indices, mesh_id).expect("soup indices are valid");

        remaining -= n;
        mesh_id += 1;
    }
    store
}

/// A random ray starting somewhere around the soup
pub fn random_query(rng: &mut Rng) -> RayQuery {
    let origin = rng::point_in_box(rng, Point3::splat(-SCENE_EXTENT * 1.5), Point3::splat(SCENE_EXTENT * 1.5));
    RayQuery {
        origin,
        dir: rng::vector_on_unit_sphere(rng),
        t_min: 0.,
        t_max: Number::INFINITY,
    }
}

/// A random ray aimed through a point inside the soup, so that most of them hit something
pub fn random_aimed_query(rng: &mut Rng) -> RayQuery {
    let origin = rng::point_in_box(rng, Point3::splat(-SCENE_EXTENT * 1.5), Point3::splat(SCENE_EXTENT * 1.5));
    let target = rng::point_in_box(rng, Point3::splat(-SCENE_EXTENT), Point3::splat(SCENE_EXTENT));
    RayQuery {
        origin,
        dir: target - origin,
        t_min: 0.,
        t_max: Number::INFINITY,
    }
}

/// Nearest hit found by testing every triangle in the store, as `(distance, internal_id)`
pub fn brute_force(store: &GeometryStore, query: &RayQuery, culling: FaceCulling) -> Option<(Number, usize)> {
    let ray = Ray::new(query.origin, query.dir)?;
    let interval = Interval::new(query.t_min, query.t_max);

    let mut best: Option<(Number, usize)> = None;
    for (idx, tri) in store.triangles().iter().enumerate() {
        if let Some(hit) = tri.intersect(&ray, &interval, culling) {
            if best.map_or(true, |(dist, _)| hit.dist < dist) {
                best = Some((hit.dist, idx));
            }
        }
    }
    best
}

/// Checks a query against [brute_force()], for both the nearest and any hit.
///
/// Returns whether something was hit. Where several triangles share the hit point (an edge or a vertex),
/// any of them may be reported, as long as it really is hit at that distance.
pub fn assert_matches_brute_force(raycaster: &Raycaster, query: &RayQuery) -> bool {
    let culling = raycaster.opts().culling;
    let expected = brute_force(raycaster.store(), query, culling);
    let actual = raycaster.intersects(query.origin, query.dir, query.t_min, query.t_max);
    let any = raycaster.has_hit(query.origin, query.dir, query.t_min, query.t_max);

    match (expected, actual) {
        (None, None) => {}
        (Some((dist, _)), Some(hit)) => {
            assert_relative_eq!(hit.distance, dist);
            let ray = Ray::new(query.origin, query.dir).expect("query hit, so the ray is valid");
            let own = raycaster.store().triangles()[hit.internal_id]
                .intersect(&ray, &Interval::from(query.t_min..=query.t_max), culling)
                .unwrap_or_else(|| panic!("reported triangle isn't hit; query: {query:?}, hit: {hit:?}"));
            assert_relative_eq!(own.dist, dist);
        }
        (expected, actual) => panic!("mismatch for {query:?}: expected {expected:?}, got {actual:?}"),
    }
    assert_eq!(any, expected.is_some(), "any-hit disagrees with brute force for {query:?}");

    expected.is_some()
}
