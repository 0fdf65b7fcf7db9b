//! Integer pixel geometry
//!
//! A single `Point` type is used both for absolute pixel coordinates and for
//! relative displacements (translation vectors). Distances are Manhattan
//! distances because the plotter can only move along one axis at a time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};

/// Integer 2D pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal pixel coordinate
    pub x: i64,
    /// Vertical pixel coordinate (grows downward, image convention)
    pub y: i64,
}

/// Relative displacement between two points.
pub type Vector = Point;

/// Plotter home position.
pub const ORIGIN: Point = Point { x: 0, y: 0 };

/// Four-connected neighbour offsets in up, right, down, left order.
pub const NEIGHBOR_OFFSETS: [Point; 4] = [
    Point { x: 0, y: -1 },
    Point { x: 1, y: 0 },
    Point { x: 0, y: 1 },
    Point { x: -1, y: 0 },
];

impl Point {
    /// Create a new point
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Manhattan distance `|dx| + |dy|` to another point
    pub fn manhattan_distance(&self, other: &Point) -> u64 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Whether `other` is this point or one of its four-connected neighbours
    pub fn is_adjacent(&self, other: &Point) -> bool {
        self.manhattan_distance(other) <= 1
    }

    /// Per-axis sign pattern, each component in `{-1, 0, 1}`
    pub fn signum(&self) -> Point {
        Point::new(self.x.signum(), self.y.signum())
    }

    /// True when both components are zero
    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// The four-connected neighbours (up, right, down, left)
    pub fn neighbors(&self) -> impl Iterator<Item = Point> + '_ {
        NEIGHBOR_OFFSETS.iter().map(move |offset| *self + *offset)
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl std::iter::Sum for Point {
    fn sum<I: Iterator<Item = Point>>(iter: I) -> Point {
        iter.fold(ORIGIN, |acc, p| acc + p)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
