//! Greedy region tour
//!
//! Nearest-neighbour ordering of regions as an open path, starting at the
//! first region. Not optimal; good enough to keep connector travel short.

use crate::region::Region;
use std::collections::BTreeMap;

/// An open visiting path over region indices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tour {
    order: Vec<usize>,
    adjacency: BTreeMap<usize, Vec<usize>>,
    total_distance: u64,
}

impl Tour {
    /// Region indices in visiting order
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Region index to neighbouring indices along the path
    pub fn adjacency(&self) -> &BTreeMap<usize, Vec<usize>> {
        &self.adjacency
    }

    /// Sum of the distances of the chosen hops
    pub fn total_distance(&self) -> u64 {
        self.total_distance
    }

    /// Consecutive `(from, to)` hops
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.order.windows(2).map(|w| (w[0], w[1]))
    }

    /// Number of visited regions
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when no region was visited
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Build a greedy tour over `regions` using [`Region::distance`]
pub fn build_tour(regions: &[Region]) -> Tour {
    build_tour_with(regions.len(), |a, b| regions[a].distance(&regions[b]))
}

/// Build a greedy tour over `count` items with an arbitrary distance function.
///
/// Starts at index 0; ties go to the lowest index.
pub fn build_tour_with<F>(count: usize, mut distance: F) -> Tour
where
    F: FnMut(usize, usize) -> u64,
{
    let mut tour = Tour::default();
    if count == 0 {
        return tour;
    }

    let mut remaining: Vec<usize> = (1..count).collect();
    let mut current = 0;
    tour.order.push(current);
    tour.adjacency.insert(current, Vec::new());

    while !remaining.is_empty() {
        let mut best_pos = 0;
        let mut best_dist = u64::MAX;
        for (pos, &candidate) in remaining.iter().enumerate() {
            let d = distance(current, candidate);
            if d < best_dist {
                best_dist = d;
                best_pos = pos;
            }
        }

        let next = remaining.remove(best_pos);
        tour.adjacency.entry(current).or_default().push(next);
        tour.adjacency.entry(next).or_default().push(current);
        tour.order.push(next);
        tour.total_distance = tour.total_distance.saturating_add(best_dist);
        current = next;
    }

    tour
}
