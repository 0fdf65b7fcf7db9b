//! Continuous traversal
//!
//! Walks every pixel of a connected pixel set as one 4-connected path. The
//! walk is a depth-first search; whenever the next candidate is not adjacent
//! to the stylus, the shortest in-set path back to it is retraced so the
//! stylus never lifts.

use sketchkit_core::Point;
use std::collections::{HashMap, HashSet, VecDeque};

/// Trace `pixels` starting at `start`.
///
/// Returns an empty path when `start` is not in the set. Every consecutive
/// pair of the result is 4-adjacent, and every pixel reachable from `start`
/// appears at least once.
pub fn trace(pixels: &HashSet<Point>, start: Point) -> Vec<Point> {
    if !pixels.contains(&start) {
        tracing::debug!("Trace start {} is outside the pixel set", start);
        return Vec::new();
    }

    let mut visited: HashSet<Point> = HashSet::with_capacity(pixels.len());
    let mut path: Vec<Point> = Vec::with_capacity(pixels.len());
    let mut stack = vec![start];
    let mut current: Option<Point> = None;

    while let Some(candidate) = stack.pop() {
        if visited.contains(&candidate) {
            continue;
        }

        let added = match current {
            Some(at) if !at.is_adjacent(&candidate) => match find_path(pixels, at, candidate) {
                Some(bridge) => bridge,
                None => {
                    tracing::debug!("No path from {} to {}, skipping", at, candidate);
                    visited.insert(candidate);
                    continue;
                }
            },
            _ => vec![candidate],
        };
        current = Some(candidate);

        // Bridge pixels may be first visits; their unvisited neighbours must
        // still be explored. The candidate's neighbours go on top.
        for p in added {
            visited.insert(p);
            path.push(p);
            for n in p.neighbors() {
                if pixels.contains(&n) && !visited.contains(&n) {
                    stack.push(n);
                }
            }
        }
    }

    path
}

/// Shortest 4-connected path inside `pixels` from `from` to `to`, excluding
/// `from` and including `to`.
fn find_path(pixels: &HashSet<Point>, from: Point, to: Point) -> Option<Vec<Point>> {
    let mut parents: HashMap<Point, Point> = HashMap::new();
    let mut queue = VecDeque::from([from]);
    parents.insert(from, from);

    while let Some(p) = queue.pop_front() {
        if p == to {
            let mut path = Vec::new();
            let mut cursor = to;
            while cursor != from {
                path.push(cursor);
                cursor = parents[&cursor];
            }
            path.reverse();
            return Some(path);
        }
        for n in p.neighbors() {
            if pixels.contains(&n) && !parents.contains_key(&n) {
                parents.insert(n, p);
                queue.push_back(n);
            }
        }
    }
    None
}
