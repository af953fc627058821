use std::ops::Range;

use getset::Getters;
use smallvec::SmallVec;
use tracing::debug;

use crate::accel::build::{build, Built, BvhStats};
use crate::accel::node::{Node, NodeKind};
use crate::core::targets::BVH;
use crate::core::types::Number;
use crate::mesh::triangle::Triangle;
use crate::raycast::opts::BvhOpts;
use crate::shared::aabb::Aabb;
use crate::shared::interval::Interval;
use crate::shared::ray::Ray;

/// Inline capacity of the traversal stack; deeper trees spill onto the heap
const STACK_SIZE: usize = 64;

/// A **Bounding Volume Hierarchy** over the triangles of a [GeometryStore](crate::mesh::store::GeometryStore).
///
/// # Layout
/// Nodes live in one flat array in pre-order, with the root at index `0`.
/// Leaves own a contiguous range of [`Self::order()`], which maps back to indices into the store.
/// The store's triangles are never reordered, so a hit's internal id stays valid.
///
/// # Invariants
/// - Every node's box contains the boxes of its children, and of the triangles in its leaf range
/// - Every triangle index appears in exactly one leaf
#[derive(Clone, Debug, Getters)]
#[getset(get = "pub")]
pub struct Bvh {
    nodes: Vec<Node>,
    /// Triangle indices, in the order that leaf ranges refer to
    order: Vec<usize>,
    stats: BvhStats,
}

// region Constructors

impl Bvh {
    /// Builds a tree over `triangles`.
    ///
    /// An empty slice gives a tree with a single empty leaf, which nothing can intersect
    pub fn build(triangles: &[Triangle], opts: &BvhOpts) -> Self {
        let Built { nodes, order, stats } = build(triangles, opts);
        debug!(target: BVH, ?stats, ?opts, "built bvh");
        Self { nodes, order, stats }
    }
}

// endregion Constructors

// region Accessors

impl Bvh {
    pub fn root(&self) -> &Node { &self.nodes[0] }

    /// Bounds of everything in the tree
    pub fn aabb(&self) -> Aabb { self.root().aabb() }

    /// Store indices of the triangles referred to by a leaf range
    pub fn leaf_triangles(&self, range: Range<usize>) -> &[usize] { &self.order[range] }

    /// Visits every node in pre-order, along with its depth (the root being at depth `0`)
    pub fn walk(&self, mut visit: impl FnMut(usize, usize, &Node)) {
        let mut stack = SmallVec::<[(usize, usize); STACK_SIZE]>::new();
        stack.push((0, 0));

        while let Some((idx, depth)) = stack.pop() {
            let node = &self.nodes[idx];
            visit(idx, depth, node);
            if let NodeKind::Internal { left, right } = node.kind() {
                // Right first, so the left subtree gets popped (and visited) first
                stack.push((right, depth + 1));
                stack.push((left, depth + 1));
            }
        }
    }
}

// endregion Accessors

// region Traversal

impl Bvh {
    /// Finds the closest result of `test` along the ray.
    ///
    /// `test` is called with the store index of each candidate triangle, and the interval it must hit within;
    /// it returns the distance of the hit and some associated data. The interval shrinks as closer hits are found,
    /// so any hit `test` returns is strictly closer than every previous one.
    ///
    /// Of two hits at exactly the same distance, the first one found wins.
    pub fn traverse_nearest<H>(
        &self,
        ray: &Ray,
        interval: &Interval<Number>,
        mut test: impl FnMut(usize, &Interval<Number>) -> Option<(Number, H)>,
    ) -> Option<(Number, H)> {
        let root_entry = self.root().aabb().hit(ray, interval)?;

        let mut best: Option<(Number, H)> = None;
        let mut stack = SmallVec::<[(usize, Number); STACK_SIZE]>::new();
        stack.push((0, root_entry));

        while let Some((idx, entry)) = stack.pop() {
            // Something closer was found after this node was pushed
            if best.as_ref().is_some_and(|(dist, _)| entry >= *dist) {
                continue;
            }

            let current = match &best {
                Some((dist, _)) => interval.with_end(*dist),
                None => *interval,
            };

            match self.nodes[idx].kind() {
                NodeKind::Leaf { start, count } => {
                    for &tri in &self.order[start..start + count] {
                        let current = match &best {
                            Some((dist, _)) => interval.with_end(*dist),
                            None => *interval,
                        };
                        if let Some((dist, data)) = test(tri, &current) {
                            if best.as_ref().map_or(true, |(best_dist, _)| dist < *best_dist) {
                                best = Some((dist, data));
                            }
                        }
                    }
                }
                NodeKind::Internal { left, right } => {
                    let l = self.nodes[left].aabb().hit(ray, &current);
                    let r = self.nodes[right].aabb().hit(ray, &current);

                    // Push the far child first, so the near one is popped next
                    match (l, r) {
                        (Some(l), Some(r)) if r < l => {
                            stack.push((left, l));
                            stack.push((right, r));
                        }
                        (Some(l), Some(r)) => {
                            stack.push((right, r));
                            stack.push((left, l));
                        }
                        (Some(l), None) => stack.push((left, l)),
                        (None, Some(r)) => stack.push((right, r)),
                        (None, None) => {}
                    }
                }
            }
        }

        best
    }

    /// Returns as soon as `test` accepts any candidate triangle, without looking for the closest
    pub fn traverse_any(&self, ray: &Ray, interval: &Interval<Number>, mut test: impl FnMut(usize, &Interval<Number>) -> bool) -> bool {
        if self.root().aabb().hit(ray, interval).is_none() {
            return false;
        }

        let mut stack = SmallVec::<[usize; STACK_SIZE]>::new();
        stack.push(0);

        while let Some(idx) = stack.pop() {
            match self.nodes[idx].kind() {
                NodeKind::Leaf { start, count } => {
                    if self.order[start..start + count].iter().any(|&tri| test(tri, interval)) {
                        return true;
                    }
                }
                NodeKind::Internal { left, right } => {
                    for child in [right, left] {
                        if self.nodes[child].aabb().hit(ray, interval).is_some() {
                            stack.push(child);
                        }
                    }
                }
            }
        }

        false
    }
}

// endregion Traversal
