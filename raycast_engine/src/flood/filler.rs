use std::collections::VecDeque;

use derivative::Derivative;
use getset::Getters;
use thiserror::Error;
use tracing::debug;

use crate::core::targets::FLOOD;
use crate::core::types::Number;
use crate::mesh::adjacency::Adjacency;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum FloodError {
    #[error("seed {seed} is out of range for {node_count} nodes")]
    SeedOutOfRange { seed: usize, node_count: usize },
}

/// The result of a flood fill: a partition of (some of) the nodes into connected regions
#[derive(Clone, Debug, Default, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct Regions {
    /// Region of each node, or [None] if no region reached it
    labels: Vec<Option<usize>>,
    /// Nodes of each region, in the order they were reached (the seed first)
    members: Vec<Vec<usize>>,
}

impl Regions {
    pub fn len(&self) -> usize { self.members.len() }

    pub fn is_empty(&self) -> bool { self.members.is_empty() }

    pub fn region_of(&self, node: usize) -> Option<usize> { self.labels.get(node).copied().flatten() }
}

/// Grows regions breadth-first across an [Adjacency] graph. Every node is visited at most once per operation
#[derive(Derivative)]
#[derivative(Copy(bound = ""), Clone(bound = ""))]
pub struct FloodFiller<'a, A: Adjacency> {
    adjacency: &'a A,
}

impl<'a, A: Adjacency> FloodFiller<'a, A> {
    pub fn new(adjacency: &'a A) -> Self { Self { adjacency } }

    /// Grows one region from each seed, in order. Seeds already claimed by an earlier region are skipped,
    /// so the regions are the connected components containing the seeds.
    pub fn fill(&self, seeds: impl IntoIterator<Item = usize>) -> Result<Regions, FloodError> {
        let node_count = self.adjacency.node_count();
        let mut regions = Regions {
            labels: vec![None; node_count],
            members: vec![],
        };
        let mut queue = VecDeque::new();

        for seed in seeds {
            if seed >= node_count {
                return Err(FloodError::SeedOutOfRange { seed, node_count });
            }
            if regions.labels[seed].is_some() {
                continue;
            }
            self.grow(seed, &mut regions, &mut queue);
        }

        debug!(target: FLOOD, nodes = node_count, regions = regions.len(), "flood filled seeds");
        Ok(regions)
    }

    /// Labels every node with its connected component. Isolated nodes get a region of their own
    pub fn fill_all(&self) -> Regions {
        let node_count = self.adjacency.node_count();
        let mut regions = Regions {
            labels: vec![None; node_count],
            members: vec![],
        };
        let mut queue = VecDeque::new();

        for seed in 0..node_count {
            if regions.labels[seed].is_none() {
                self.grow(seed, &mut regions, &mut queue);
            }
        }

        debug!(target: FLOOD, nodes = node_count, regions = regions.len(), "flood filled all nodes");
        regions
    }

    fn grow(&self, seed: usize, regions: &mut Regions, queue: &mut VecDeque<usize>) {
        let label = regions.members.len();
        let mut members = vec![seed];
        regions.labels[seed] = Some(label);
        queue.push_back(seed);

        while let Some(node) = queue.pop_front() {
            for &next in self.adjacency.neighbours(node) {
                if regions.labels[next].is_none() {
                    regions.labels[next] = Some(label);
                    members.push(next);
                    queue.push_back(next);
                }
            }
        }

        regions.members.push(members);
    }

    /// Spreads seed values outwards: every reachable node takes the value of the seed closest to it in hops.
    ///
    /// When two seeds are equally close, the one given first wins; a node given twice keeps its first value.
    /// Nodes unreachable from any seed are [None].
    pub fn propagate(&self, seeds: impl IntoIterator<Item = (usize, Number)>) -> Result<Vec<Option<Number>>, FloodError> {
        let node_count = self.adjacency.node_count();
        let mut values = vec![None; node_count];
        let mut queue = VecDeque::new();

        // Breadth-first from every seed at once; seed order is kept at each depth, so earlier seeds claim ties
        for (seed, value) in seeds {
            if seed >= node_count {
                return Err(FloodError::SeedOutOfRange { seed, node_count });
            }
            if values[seed].is_none() {
                values[seed] = Some(value);
                queue.push_back(seed);
            }
        }
        let seeded = queue.len();

        while let Some(node) = queue.pop_front() {
            let value = values[node];
            for &next in self.adjacency.neighbours(node) {
                if values[next].is_none() {
                    values[next] = value;
                    queue.push_back(next);
                }
            }
        }

        debug!(
            target: FLOOD,
            nodes = node_count,
            seeded,
            reached = values.iter().filter(|v| v.is_some()).count(),
            "propagated seed values"
        );
        Ok(values)
    }
}
