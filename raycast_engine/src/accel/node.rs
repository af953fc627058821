use std::ops::Range;

use getset::CopyGetters;

use crate::shared::aabb::Aabb;

/// A node of the [Bvh](crate::accel::bvh::Bvh), stored in a flat array and referring to others by index
#[derive(Copy, Clone, Debug, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Node {
    /// Bounds everything below this node
    aabb: Aabb,
    kind: NodeKind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Branch with two children, as indices into the node array
    Internal { left: usize, right: usize },
    /// A contiguous range of the BVH's triangle order
    Leaf { start: usize, count: usize },
}

impl Node {
    pub(crate) fn internal(aabb: Aabb, left: usize, right: usize) -> Self {
        Self {
            aabb,
            kind: NodeKind::Internal { left, right },
        }
    }

    pub(crate) fn leaf(aabb: Aabb, start: usize, count: usize) -> Self {
        Self {
            aabb,
            kind: NodeKind::Leaf { start, count },
        }
    }

    pub fn is_leaf(&self) -> bool { matches!(self.kind, NodeKind::Leaf { .. }) }

    /// Indices of the two children, if this is an internal node
    pub fn children(&self) -> Option<[usize; 2]> {
        match self.kind {
            NodeKind::Internal { left, right } => Some([left, right]),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// Range of the triangle order owned by this node, if it's a leaf
    pub fn leaf_range(&self) -> Option<Range<usize>> {
        match self.kind {
            NodeKind::Leaf { start, count } => Some(start..start + count),
            NodeKind::Internal { .. } => None,
        }
    }

    /// Patches the child indices of an internal node, once they're known
    pub(crate) fn set_children(&mut self, left: usize, right: usize) { self.kind = NodeKind::Internal { left, right }; }
}
