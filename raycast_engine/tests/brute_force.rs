//! Compares the BVH against testing every triangle, on random triangle soups

use approx::assert_relative_eq;
use itertools::Itertools;
use rand::Rng as _;
use nonzero::nonzero;
use raycast_engine::core::types::*;
use raycast_engine::raycast::opts::{BvhOpts, FaceCulling, RaycasterOpts, SplitStrategy};
use raycast_engine::raycast::raycaster::{RayQuery, Raycaster};
use strum::IntoEnumIterator;

use crate::common::*;

mod common;

const TRIANGLES: usize = 600;
const RAYS: usize = 400;

fn check_against_brute_force(raycaster: &Raycaster, queries: &[RayQuery]) {
    let culling = raycaster.opts().culling;
    let mut hits = 0;

    for query in queries {
        let expected = brute_force(raycaster.store(), query, culling);
        let actual = raycaster.intersects(query.origin, query.dir, query.t_min, query.t_max);
        let any = raycaster.has_hit(query.origin, query.dir, query.t_min, query.t_max);

        match (expected, actual) {
            (None, None) => {}
            (Some((dist, internal_id)), Some(hit)) => {
                assert_relative_eq!(hit.distance, dist);
                assert_eq!(hit.internal_id, internal_id, "query: {query:?}");
                assert_eq!(hit.local_id, raycaster.store().infos()[internal_id].local_id);
                hits += 1;
            }
            (expected, actual) => panic!("mismatch for {query:?}: expected {expected:?}, got {actual:?}"),
        }
        assert_eq!(any, actual.is_some(), "any-hit disagrees with nearest-hit for {query:?}");
    }

    assert!(hits > 0, "no query hit anything, test is meaningless");
}

fn queries(rng: &mut Rng) -> Vec<RayQuery> {
    (0..RAYS)
        .map(|i| if i % 2 == 0 { random_aimed_query(rng) } else { random_query(rng) })
        .collect()
}

/// Every tree shape and culling mode worth checking structured scenes with.
/// Single-triangle leaves put node box faces on every seam of axis-aligned geometry
fn structured_opts() -> Vec<RaycasterOpts> {
    SplitStrategy::iter()
        .cartesian_product([nonzero!(1_usize), nonzero!(4_usize)])
        .cartesian_product(FaceCulling::iter())
        .map(|((split, leaf_size), culling)| RaycasterOpts {
            bvh: BvhOpts {
                split,
                leaf_size,
                ..Default::default()
            },
            culling,
        })
        .collect()
}

fn query(origin: Point3, dir: Vector3) -> RayQuery {
    RayQuery {
        origin,
        dir,
        t_min: 0.,
        t_max: Number::INFINITY,
    }
}

#[test]
fn grid_seams_match() {
    const N: u32 = 8;

    let mut queries = vec![];
    // Whole and half coordinates, so rays run along shared edges, through shared vertices, and through quad interiors
    let coords = (0..=2 * N).map(|i| i as Number / 2.).chain([3.3]).collect::<Vec<_>>();
    for (&x, &y) in coords.iter().cartesian_product(&coords) {
        queries.push(query(Point3::new(x, y, 5.), Vector3::NEG_Z));
        queries.push(query(Point3::new(x, y, -5.), Vector3::Z));
        // Tilted in one plane only, so the other axis stays exactly on the seam
        queries.push(query(Point3::new(x, y, 5.), Vector3::new(1., 0., -1.)));
        queries.push(query(Point3::new(x, y, 5.), Vector3::new(0., -1., -1.)));
        // Starting on the surface, and travelling inside its plane
        queries.push(query(Point3::new(x, y, 0.), Vector3::NEG_Z));
        queries.push(query(Point3::new(x, y, 0.), Vector3::X));
    }

    for opts in structured_opts() {
        let raycaster = Raycaster::new(grid_store(N), opts);
        let hits = queries.iter().filter(|q| assert_matches_brute_force(&raycaster, q)).count();
        // At least every ray straight down or straight up, depending on culling
        assert!(hits >= coords.len().pow(2), "only {hits} of {} queries hit the grid", queries.len());
    }
}

#[test]
fn closed_box_faces_edges_and_corners_match() {
    let (min, max) = (Point3::splat(-2.), Point3::splat(2.));

    let mut queries = vec![];
    let coords = [-3., -2., -1., 0., 0.5, 2., 3.];
    for (&a, &b) in coords.iter().cartesian_product(&coords) {
        for axis in 0..3 {
            let along = Vector3::AXES[axis];
            // Lay `a` and `b` on the two axes the ray doesn't travel along
            let across = |a: Number, b: Number, c: Number| {
                let mut p = [0.; 3];
                p[(axis + 1) % 3] = a;
                p[(axis + 2) % 3] = b;
                p[axis] = c;
                Point3::from_array(p)
            };

            // From outside, on both sides
            queries.push(query(across(a, b, 10.), -along));
            queries.push(query(across(a, b, -10.), along));
            // From the centre plane, and from exactly on a face plane
            queries.push(query(across(a, b, 0.), along));
            queries.push(query(across(a, b, 2.), -along));
            queries.push(query(across(a, b, -2.), -along));
        }
    }

    for opts in structured_opts() {
        let raycaster = Raycaster::new(closed_box_store(min, max), opts);
        let hits = queries.iter().filter(|q| assert_matches_brute_force(&raycaster, q)).count();
        assert!(hits > 0);
    }
}

#[test]
fn every_split_strategy_matches() {
    let mut rng = seeded(0x5eed);
    let store = random_soup(&mut rng, TRIANGLES);
    let queries = queries(&mut rng);

    for split in SplitStrategy::iter() {
        for leaf_size in [nonzero!(1_usize), nonzero!(4_usize), nonzero!(12_usize)] {
            let opts = RaycasterOpts {
                bvh: BvhOpts {
                    split,
                    leaf_size,
                    ..Default::default()
                },
                ..Default::default()
            };
            let raycaster = Raycaster::new(store.clone(), opts);
            check_against_brute_force(&raycaster, &queries);
        }
    }
}

#[test]
fn back_face_culling_matches() {
    let mut rng = seeded(42);
    let store = random_soup(&mut rng, TRIANGLES);
    let queries = queries(&mut rng);

    let raycaster = Raycaster::new(
        store,
        RaycasterOpts {
            culling: FaceCulling::Back,
            ..Default::default()
        },
    );
    check_against_brute_force(&raycaster, &queries);
}

#[test]
fn forced_median_splits_match() {
    let mut rng = seeded(7);
    let store = random_soup(&mut rng, TRIANGLES);
    let queries = queries(&mut rng);

    let opts = RaycasterOpts {
        bvh: BvhOpts {
            max_depth: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    check_against_brute_force(&Raycaster::new(store, opts), &queries);
}

#[test]
fn hits_respect_range() {
    let mut rng = seeded(1234);
    let store = random_soup(&mut rng, TRIANGLES);
    let raycaster = Raycaster::new(store, RaycasterOpts::default());

    let queries = (0..RAYS)
        .map(|_| {
            let t_min = rng.gen_range(0. ..20.);
            RayQuery {
                t_min,
                t_max: t_min + rng.gen_range(0. ..10.),
                ..random_aimed_query(&mut rng)
            }
        })
        .collect::<Vec<_>>();

    for query in &queries {
        if let Some(hit) = raycaster.intersects(query.origin, query.dir, query.t_min, query.t_max) {
            assert!((query.t_min..=query.t_max).contains(&hit.distance), "{hit:?} outside {query:?}");
        }
    }
    check_against_brute_force_ranged(&raycaster, &queries);
}

/// Like [check_against_brute_force()], but doesn't require anything to be hit
fn check_against_brute_force_ranged(raycaster: &Raycaster, queries: &[RayQuery]) {
    for query in queries {
        let expected = brute_force(raycaster.store(), query, raycaster.opts().culling).map(|(_, id)| id);
        let actual = raycaster
            .intersects(query.origin, query.dir, query.t_min, query.t_max)
            .map(|hit| hit.internal_id);
        assert_eq!(actual, expected, "query: {query:?}");
    }
}

#[test]
fn parallel_build_is_deterministic() {
    let mut rng = seeded(99);
    let store = random_soup(&mut rng, 3000);
    let queries = queries(&mut rng);

    let build = |parallel_threshold| {
        let opts = RaycasterOpts {
            bvh: BvhOpts {
                parallel_threshold,
                ..Default::default()
            },
            ..Default::default()
        };
        Raycaster::new(store.clone(), opts)
    };
    let serial = build(None);
    let parallel = build(Some(nonzero!(8_usize)));

    assert_eq!(serial.bvh().nodes(), parallel.bvh().nodes());
    assert_eq!(serial.bvh().order(), parallel.bvh().order());
    assert_eq!(serial.bvh().stats(), parallel.bvh().stats());

    for q in &queries {
        assert_eq!(
            serial.intersects(q.origin, q.dir, q.t_min, q.t_max),
            parallel.intersects(q.origin, q.dir, q.t_min, q.t_max)
        );
    }
}

#[test]
fn repeated_queries_are_identical() {
    let mut rng = seeded(5);
    let raycaster = Raycaster::new(random_soup(&mut rng, TRIANGLES), RaycasterOpts::default());
    for q in queries(&mut rng) {
        let first = raycaster.intersects(q.origin, q.dir, q.t_min, q.t_max);
        let second = raycaster.intersects(q.origin, q.dir, q.t_min, q.t_max);
        assert_eq!(first, second);
    }
}
