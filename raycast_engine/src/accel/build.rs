//! Construction of the [Bvh](crate::accel::bvh::Bvh): a recursive, in-place partition of the triangle indices.
//!
//! The tree is first built as boxed [BuildNode]s (so that independent subtrees can be built on different threads),
//! then flattened into the final node array in pre-order.

use puffin::profile_function;
use serde::Serialize;
use valuable::Valuable;

use crate::accel::node::Node;
use crate::core::types::{Number, Point3};
use crate::mesh::triangle::Triangle;
use crate::raycast::opts::{BvhOpts, SplitStrategy};
use crate::shared::aabb::Aabb;

/// Cost of testing a ray against one box, relative to testing one triangle
const TRAVERSAL_COST: Number = 0.125;

/// Summary of a built tree
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Valuable)]
pub struct BvhStats {
    pub triangles: usize,
    pub nodes: usize,
    pub leaves: usize,
    /// Depth of the deepest leaf, where the root is at depth zero
    pub depth: usize,
    pub largest_leaf: usize,
}

/// Output of [build()]
pub(crate) struct Built {
    pub nodes: Vec<Node>,
    /// Store indices of the triangles, in the order leaf ranges refer to
    pub order: Vec<usize>,
    pub stats: BvhStats,
}

#[derive(Copy, Clone, Debug)]
struct BuildPrim {
    /// Index of the triangle in the store
    index: usize,
    aabb: Aabb,
    centroid: Point3,
}

#[derive(Debug)]
enum BuildNode {
    Leaf {
        aabb: Aabb,
        start: usize,
        count: usize,
    },
    Internal {
        aabb: Aabb,
        left: Box<BuildNode>,
        right: Box<BuildNode>,
    },
}

#[derive(Copy, Clone, Debug, Default)]
struct Bucket {
    count: usize,
    aabb: Aabb,
}

enum SahOutcome {
    /// Splitting isn't worth it, keep the range as one leaf
    Leaf,
    /// The range was partitioned; the first child gets `..mid`
    Split(usize),
    /// The heuristic couldn't separate the range
    Fallback,
}

pub(crate) fn build(triangles: &[Triangle], opts: &BvhOpts) -> Built {
    profile_function!();

    let mut prims = triangles
        .iter()
        .enumerate()
        .map(|(index, tri)| BuildPrim {
            index,
            aabb: tri.aabb(),
            centroid: tri.centroid(),
        })
        .collect::<Vec<_>>();

    let mut stats = BvhStats {
        triangles: prims.len(),
        ..Default::default()
    };

    if prims.is_empty() {
        stats.nodes = 1;
        stats.leaves = 1;
        return Built {
            nodes: vec![Node::leaf(Aabb::EMPTY, 0, 0)],
            order: vec![],
            stats,
        };
    }

    let root = build_node(&mut prims, 0, 0, opts);

    let mut nodes = Vec::with_capacity(2 * prims.len() / opts.leaf_size.get() + 1);
    flatten_node(&root, 0, &mut nodes, &mut stats);
    stats.nodes = nodes.len();

    Built {
        nodes,
        order: prims.into_iter().map(|p| p.index).collect(),
        stats,
    }
}

/// Recursively partitions `prims` (which start at `offset` in the full order) into a subtree
fn build_node(prims: &mut [BuildPrim], offset: usize, depth: usize, opts: &BvhOpts) -> BuildNode {
    let aabb = Aabb::encompass_iter(prims.iter().map(|p| p.aabb));
    let count = prims.len();
    let leaf = BuildNode::Leaf {
        aabb,
        start: offset,
        count,
    };

    if count <= opts.leaf_size.get() {
        return leaf;
    }

    let centroid_bounds = Aabb::encompass_points(prims.iter().map(|p| p.centroid));
    let axis = centroid_bounds.longest_axis();

    let mid = if depth >= opts.max_depth {
        median_split(prims, axis)
    } else {
        match opts.split {
            SplitStrategy::Median => median_split(prims, axis),
            SplitStrategy::Sah => match sah_split(prims, &aabb, &centroid_bounds, axis, opts) {
                SahOutcome::Leaf => return leaf,
                SahOutcome::Split(mid) => mid,
                SahOutcome::Fallback => median_split(prims, axis),
            },
        }
    };

    let (left, right) = prims.split_at_mut(mid);
    let parallel = opts.parallel_threshold.is_some_and(|threshold| count >= threshold.get());
    let (left, right) = if parallel {
        rayon::join(
            || build_node(left, offset, depth + 1, opts),
            || build_node(right, offset + mid, depth + 1, opts),
        )
    } else {
        (
            build_node(left, offset, depth + 1, opts),
            build_node(right, offset + mid, depth + 1, opts),
        )
    };

    BuildNode::Internal {
        aabb,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Splits the range in half around the median centroid along `axis`.
///
/// Always makes progress (both halves are non-empty for two or more prims), even when every centroid coincides
fn median_split(prims: &mut [BuildPrim], axis: usize) -> usize {
    let mid = prims.len() / 2;
    prims.select_nth_unstable_by(mid, |a, b| {
        Number::total_cmp(&a.centroid[axis], &b.centroid[axis]).then(a.index.cmp(&b.index))
    });
    mid
}

/// Finds the cheapest bucket boundary according to the binned **Surface-Area Heuristic**, and partitions around it
fn sah_split(
    prims: &mut [BuildPrim],
    bounds: &Aabb,
    centroid_bounds: &Aabb,
    axis: usize,
    opts: &BvhOpts,
) -> SahOutcome {
    let n_buckets = opts.sah_buckets.get().max(2);
    let axis_min = centroid_bounds.min()[axis];
    let axis_extent = centroid_bounds.size()[axis];

    // Identical (or collinear across this axis) centroids all land in one bucket
    if !(axis_extent > 0.) || !axis_extent.is_finite() {
        return SahOutcome::Fallback;
    }

    let bucket_of = |centroid: Point3| -> usize {
        let b = ((centroid[axis] - axis_min) / axis_extent * n_buckets as Number) as usize;
        b.min(n_buckets - 1)
    };

    let mut buckets = vec![Bucket::default(); n_buckets];
    for p in prims.iter() {
        let bucket = &mut buckets[bucket_of(p.centroid)];
        bucket.count += 1;
        bucket.aabb = Aabb::encompass(bucket.aabb, p.aabb);
    }

    // Sweep from the right, so that `right_*[i]` covers buckets `i..`
    let mut right_area = vec![0.; n_buckets];
    let mut right_count = vec![0; n_buckets];
    let mut acc = Bucket::default();
    for i in (0..n_buckets).rev() {
        acc.count += buckets[i].count;
        acc.aabb = Aabb::encompass(acc.aabb, buckets[i].aabb);
        right_area[i] = acc.aabb.area();
        right_count[i] = acc.count;
    }

    let parent_area = match bounds.area() {
        area if area > 0. => area,
        _ => 1.,
    };

    // Then from the left, splitting between bucket `i` and `i + 1`
    let mut best: Option<(usize, Number)> = None;
    let mut acc = Bucket::default();
    for i in 0..n_buckets - 1 {
        acc.count += buckets[i].count;
        acc.aabb = Aabb::encompass(acc.aabb, buckets[i].aabb);
        if acc.count == 0 || right_count[i + 1] == 0 {
            continue;
        }
        let cost = TRAVERSAL_COST
            + (acc.aabb.area() * acc.count as Number + right_area[i + 1] * right_count[i + 1] as Number) / parent_area;
        if best.map_or(true, |(_, best_cost)| cost < best_cost) {
            best = Some((i, cost));
        }
    }

    let Some((split, cost)) = best else {
        return SahOutcome::Fallback;
    };

    let leaf_cost = prims.len() as Number;
    if cost >= leaf_cost && prims.len() <= opts.max_leaf_size.get() {
        return SahOutcome::Leaf;
    }

    match partition(prims, |p| bucket_of(p.centroid) <= split) {
        0 => SahOutcome::Fallback,
        mid if mid == prims.len() => SahOutcome::Fallback,
        mid => SahOutcome::Split(mid),
    }
}

/// Moves every element matching `pred` before the others, returning how many matched
fn partition<T>(slice: &mut [T], pred: impl Fn(&T) -> bool) -> usize {
    let mut left = 0;
    let mut right = slice.len();

    while left < right {
        if pred(&slice[left]) {
            left += 1;
        } else {
            right -= 1;
            slice.swap(left, right);
        }
    }

    left
}

/// Recursively flattens a [BuildNode] into `nodes` in pre-order, returning its index
fn flatten_node(node: &BuildNode, depth: usize, nodes: &mut Vec<Node>, stats: &mut BvhStats) -> usize {
    let idx = nodes.len();
    stats.depth = stats.depth.max(depth);

    match node {
        &BuildNode::Leaf { aabb, start, count } => {
            nodes.push(Node::leaf(aabb, start, count));
            stats.leaves += 1;
            stats.largest_leaf = stats.largest_leaf.max(count);
        }
        BuildNode::Internal { aabb, left, right } => {
            // Reserve space for this node, children indices are patched in once known
            nodes.push(Node::internal(*aabb, 0, 0));

            let left_idx = flatten_node(left, depth + 1, nodes, stats);
            let right_idx = flatten_node(right, depth + 1, nodes, stats);
            nodes[idx].set_children(left_idx, right_idx);
        }
    }

    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_moves_matches_first() {
        let mut values = [5, 1, 8, 2, 9, 3];
        let mid = partition(&mut values, |&v| v < 5);
        assert_eq!(mid, 3);
        assert!(values[..mid].iter().all(|&v| v < 5));
        assert!(values[mid..].iter().all(|&v| v >= 5));
    }

    #[test]
    fn median_split_handles_identical_centroids() {
        let prim = |index| BuildPrim {
            index,
            aabb: Aabb::new(Point3::ZERO, Point3::ONE),
            centroid: Point3::splat(0.5),
        };
        let mut prims = (0..9).map(prim).collect::<Vec<_>>();
        assert_eq!(median_split(&mut prims, 0), 4);
        // Ties are broken by index
        assert!(prims[..4].iter().all(|p| p.index < 4));
    }
}
