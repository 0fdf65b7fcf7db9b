//! Rectilinear connectors
//!
//! Bridges between regions are L-shaped: horizontal leg first along the start
//! row, then vertical leg along the end column.

use sketchkit_core::Point;

/// Pixels of the L-shaped path from `start` to `end`, both inclusive.
///
/// The result has `|dx| + |dy| + 1` pixels and consecutive pixels are
/// 4-adjacent.
pub fn connect(start: Point, end: Point) -> Vec<Point> {
    let mut path = Vec::with_capacity(start.manhattan_distance(&end) as usize + 1);
    let step_x = (end.x - start.x).signum();
    let step_y = (end.y - start.y).signum();

    let mut cursor = start;
    path.push(cursor);
    while cursor.x != end.x {
        cursor.x += step_x;
        path.push(cursor);
    }
    while cursor.y != end.y {
        cursor.y += step_y;
        path.push(cursor);
    }
    path
}
