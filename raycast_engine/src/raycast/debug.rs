//! Geometry for visualising a [Bvh] in an editor overlay

use std::ops::RangeBounds;

use crate::accel::bvh::Bvh;
use crate::core::types::Point3;

/// Line segments outlining the box of every node whose depth lies in `depths` (the root is at depth `0`).
///
/// Each box contributes its 12 edges. Empty boxes are skipped.
pub fn bvh_debug_lines(bvh: &Bvh, depths: impl RangeBounds<usize>) -> Vec<[Point3; 2]> {
    let mut lines = vec![];
    bvh.walk(|_, depth, node| {
        if depths.contains(&depth) && !node.aabb().is_empty() {
            lines.extend(node.aabb().edges());
        }
    });
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::triangle::Triangle;
    use crate::raycast::opts::BvhOpts;

    #[test]
    fn root_only() {
        let tris = (0..20)
            .filter_map(|i| {
                let o = Point3::new(i as f64, 0., 0.);
                Triangle::new([o, o + Point3::X, o + Point3::Y], 0.)
            })
            .collect::<Vec<_>>();
        let bvh = Bvh::build(&tris, &BvhOpts::default());

        let lines = bvh_debug_lines(&bvh, 0..1);
        assert_eq!(lines.len(), 12);
        assert_eq!(bvh_debug_lines(&bvh, ..).len(), 12 * bvh.nodes().len());
    }

    #[test]
    fn empty_tree_has_no_lines() {
        let bvh = Bvh::build(&[], &BvhOpts::default());
        assert!(bvh_debug_lines(&bvh, ..).is_empty());
    }
}
