use std::num::NonZeroUsize;

use derivative::Derivative;
use nonzero::nonzero;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use valuable::Valuable;

/// Options for a [Raycaster](crate::raycast::raycaster::Raycaster)
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RaycasterOpts {
    pub bvh: BvhOpts,
    pub culling: FaceCulling,
}

/// Options controlling how the [Bvh](crate::accel::bvh::Bvh) is built.
///
/// None of these change query results, only how fast they are answered
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
pub struct BvhOpts {
    /// Ranges with this many triangles or fewer always become leaves
    #[derivative(Default(value = "nonzero!(4_usize)"))]
    pub leaf_size: NonZeroUsize,
    /// Largest leaf the SAH is allowed to create when splitting wouldn't pay off
    #[derivative(Default(value = "nonzero!(16_usize)"))]
    pub max_leaf_size: NonZeroUsize,
    pub split: SplitStrategy,
    /// How many buckets the centroid range is divided into when evaluating SAH splits. Values below 2 act as 2
    #[derivative(Default(value = "nonzero!(12_usize)"))]
    pub sah_buckets: NonZeroUsize,
    /// Below this depth, every split is a median split.
    /// Bounds the depth of the tree (and the build's recursion) to `max_depth + log2(n)`
    #[derivative(Default(value = "64"))]
    pub max_depth: usize,
    /// Subtrees with at least this many triangles are built in parallel. [None] builds on the calling thread only
    #[derivative(Default(value = "Some(nonzero!(4096_usize))"))]
    pub parallel_threshold: Option<NonZeroUsize>,
}

/// How a node's triangles are divided between its two children
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Valuable, EnumIter, Display)]
pub enum SplitStrategy {
    /// Binned **Surface-Area Heuristic**, along the longest centroid axis.
    /// Falls back to [SplitStrategy::Median] when the centroids can't be separated
    #[default]
    Sah,
    /// Split at the median centroid along the longest centroid axis
    Median,
}

/// Which sides of triangles can be hit
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Valuable, EnumIter, Display)]
pub enum FaceCulling {
    /// Both sides are hit
    #[default]
    None,
    /// Only the counter-clockwise (front) side is hit
    Back,
}
