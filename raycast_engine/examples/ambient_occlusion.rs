//! Bakes per-triangle ambient occlusion for a small scene of boxes on a ground plane.
//!
//! Run with `RUST_LOG=debug` to see what the engine is doing.

use itertools::Itertools;
use rand::SeedableRng;
use raycast_engine::core::targets::MAIN;
use raycast_engine::core::types::*;
use raycast_engine::flood::filler::FloodFiller;
use raycast_engine::mesh::adjacency::TriangleAdjacency;
use raycast_engine::mesh::store::GeometryStore;
use raycast_engine::raycast::opts::RaycasterOpts;
use raycast_engine::raycast::raycaster::{RayQuery, Raycaster};
use raycast_engine::shared::rng;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Hemisphere samples per triangle
const SAMPLES: usize = 64;
/// Occluders further than this don't darken a triangle
const AO_DISTANCE: Number = 3.;
/// Sample rays start this far off the surface, so they don't hit the triangle they came from
const SURFACE_OFFSET: Number = 1e-4;

const GROUND_MESH: MeshId = 0;

/// Unit cube spanning `0..1` on every axis, wound counter-clockwise when seen from outside
fn cube() -> (Vec<Point3>, Vec<u32>) {
    let vertices = (0..8)
        .map(|i| Point3::new((i & 1) as Number, ((i >> 1) & 1) as Number, ((i >> 2) & 1) as Number))
        .collect();
    #[rustfmt::skip]
    let indices = vec![
        0, 2, 1, 1, 2, 3, // -Z
        4, 5, 6, 5, 7, 6, // +Z
        0, 1, 4, 1, 5, 4, // -Y
        2, 6, 3, 3, 6, 7, // +Y
        0, 4, 2, 2, 4, 6, // -X
        1, 3, 5, 3, 7, 5, // +X
    ];
    (vertices, indices)
}

fn build_scene() -> GeometryStore {
    let mut store = GeometryStore::new();

    let ground = [
        Point3::new(-5., 0., -5.),
        Point3::new(5., 0., -5.),
        Point3::new(5., 0., 5.),
        Point3::new(-5., 0., 5.),
    ];
    let stats = store
        .add_mesh(&ground, &[0, 2, 1, 0, 3, 2], GROUND_MESH)
        .expect("ground mesh is valid");
    info!(target: MAIN, ?stats, "added ground");

    let (vertices, indices) = cube();
    let boxes = [
        (Vector3::new(-2., 0., -1.), Vector3::splat(1.5)),
        (Vector3::new(1., 0., 0.5), Vector3::new(1., 2.5, 1.)),
        (Vector3::new(-0.5, 0., 2.), Vector3::splat(0.75)),
    ];
    for (mesh_id, (translation, scale)) in (GROUND_MESH + 1..).zip(boxes) {
        let transform = Matrix4::from_translation(translation) * Matrix4::from_scale(scale);
        let stats = store
            .add_mesh_transformed(&vertices, &indices, mesh_id, &transform)
            .expect("cube mesh is valid");
        info!(target: MAIN, mesh_id, ?stats, "added box");
    }

    store
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let raycaster = Raycaster::new(build_scene(), RaycasterOpts::default());
    info!(target: MAIN, stats = ?raycaster.bvh().stats(), "scene ready");

    let mut rng = rand::rngs::SmallRng::seed_from_u64(0);
    let triangles = raycaster.store().triangles();
    let queries = triangles
        .iter()
        .flat_map(|tri| {
            let normal = tri.normal();
            let origin = tri.centroid() + normal * SURFACE_OFFSET;
            (0..SAMPLES)
                .map(|_| RayQuery {
                    origin,
                    dir: rng::vector_cosine_hemisphere(&mut rng, normal),
                    t_min: 0.,
                    t_max: AO_DISTANCE,
                })
                .collect_vec()
        })
        .collect_vec();

    let occluded = raycaster.has_hit_batch(&queries);
    let ambient = occluded
        .chunks(SAMPLES)
        .map(|samples| 1. - samples.iter().filter(|&&hit| hit).count() as Number / SAMPLES as Number)
        .collect_vec();

    for (mesh_id, group) in &raycaster
        .store()
        .infos()
        .iter()
        .zip(&ambient)
        .group_by(|(infos, _)| infos.mesh_id)
    {
        let values = group.map(|(_, &ao)| ao).collect_vec();
        let mean = values.iter().sum::<Number>() / values.len() as Number;
        info!(target: MAIN, mesh_id, triangles = values.len(), mean_ambient = mean, "baked mesh");
    }

    // Push the darkest triangles' values out across their charts, as a padding mask
    let adjacency = TriangleAdjacency::from_store(raycaster.store());
    let filler = FloodFiller::new(&adjacency);
    let charts = filler.fill_all();
    let dark = ambient.iter().positions(|&ao| ao < 0.5).map(|idx| (idx, ambient[idx]));
    let mask = filler.propagate(dark).expect("seeds come from the store");
    info!(
        target: MAIN,
        charts = charts.len(),
        masked = mask.iter().flatten().count(),
        "built occlusion mask"
    );
}
