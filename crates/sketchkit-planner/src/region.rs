//! Region Segmentation
//!
//! Splits a bitmap into 4-connected clusters of foreground pixels using an
//! iterative flood fill. Clusters smaller than the minimum size are dropped
//! (their pixels stay visited, so they are never revisited).

use crate::bitmap::Bitmap;
use serde::{Deserialize, Serialize};
use sketchkit_core::Point;
use std::collections::HashSet;

/// Default minimum number of pixels a region must contain
pub const DEFAULT_MIN_REGION_SIZE: usize = 10;

/// A 4-connected cluster of foreground pixels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Pixels in sorted order
    pixels: Vec<Point>,
    /// Pixels with at least one 4-neighbour outside the region, sorted
    outline: Vec<Point>,
}

impl Region {
    /// Build a region from its pixels, deriving the outline
    pub fn new(pixels: impl IntoIterator<Item = Point>) -> Self {
        let members: HashSet<Point> = pixels.into_iter().collect();
        let mut outline: Vec<Point> = members
            .iter()
            .filter(|p| p.neighbors().any(|n| !members.contains(&n)))
            .copied()
            .collect();
        outline.sort_unstable();

        let mut pixels: Vec<Point> = members.into_iter().collect();
        pixels.sort_unstable();

        Self { pixels, outline }
    }

    /// All pixels of the region
    pub fn pixels(&self) -> &[Point] {
        &self.pixels
    }

    /// Boundary pixels of the region
    pub fn outline(&self) -> &[Point] {
        &self.outline
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// True for a region with no pixels
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Whether `point` belongs to the region
    pub fn contains(&self, point: &Point) -> bool {
        self.pixels.binary_search(point).is_ok()
    }

    /// Minimum Manhattan distance between the two outlines
    pub fn distance(&self, other: &Region) -> u64 {
        self.nearest_connecting_points(other)
            .map(|(a, b)| a.manhattan_distance(&b))
            .unwrap_or(u64::MAX)
    }

    /// The outline pair `(mine, theirs)` realising [`Region::distance`].
    ///
    /// Ties resolve to the first pair in sorted outline order. `None` when
    /// either region is empty.
    pub fn nearest_connecting_points(&self, other: &Region) -> Option<(Point, Point)> {
        let mut best: Option<(Point, Point, u64)> = None;
        for a in &self.outline {
            for b in &other.outline {
                let d = a.manhattan_distance(b);
                if best.is_none_or(|(_, _, min)| d < min) {
                    best = Some((*a, *b, d));
                    if d == 0 {
                        return Some((*a, *b));
                    }
                }
            }
        }
        best.map(|(a, b, _)| (a, b))
    }
}

/// Flood-fill region finder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionFinder {
    min_region_size: usize,
}

impl Default for RegionFinder {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_REGION_SIZE)
    }
}

impl RegionFinder {
    /// Create a finder that keeps regions of at least `min_region_size` pixels
    pub fn new(min_region_size: usize) -> Self {
        Self { min_region_size }
    }

    /// Minimum kept region size
    pub fn min_region_size(&self) -> usize {
        self.min_region_size
    }

    /// Segment the bitmap, scanning row-major
    pub fn find_regions<B: Bitmap + ?Sized>(&self, bitmap: &B) -> Vec<Region> {
        let width = bitmap.width();
        let height = bitmap.height();
        let mut visited = vec![false; width as usize * height as usize];
        let mut regions = Vec::new();
        let mut discarded = 0usize;

        for y in 0..height {
            for x in 0..width {
                let index = y as usize * width as usize + x as usize;
                if visited[index] || !bitmap.is_foreground(x, y) {
                    continue;
                }

                let pixels = flood_fill(bitmap, &mut visited, x, y);
                if pixels.len() >= self.min_region_size {
                    regions.push(Region::new(pixels));
                } else {
                    discarded += 1;
                }
            }
        }

        tracing::debug!(
            "Found {} regions ({} below {} pixels discarded) in {}x{} bitmap",
            regions.len(),
            discarded,
            self.min_region_size,
            width,
            height
        );
        regions
    }
}

fn flood_fill<B: Bitmap + ?Sized>(bitmap: &B, visited: &mut [bool], x: u32, y: u32) -> Vec<Point> {
    let width = bitmap.width() as i64;
    let height = bitmap.height() as i64;
    let mut pixels = Vec::new();
    let mut stack = vec![Point::new(x as i64, y as i64)];
    visited[(y as i64 * width + x as i64) as usize] = true;

    while let Some(p) = stack.pop() {
        pixels.push(p);
        for n in p.neighbors() {
            if n.x < 0 || n.y < 0 || n.x >= width || n.y >= height {
                continue;
            }
            let index = (n.y * width + n.x) as usize;
            if !visited[index] && bitmap.is_foreground(n.x as u32, n.y as u32) {
                visited[index] = true;
                stack.push(n);
            }
        }
    }
    pixels
}
