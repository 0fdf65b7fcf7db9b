//! Path vectorisation
//!
//! Compresses a pixel path into translation vectors by accumulating steps
//! while their per-axis sign pattern stays the same.

use sketchkit_core::{Point, Vector, ORIGIN};

/// Compress `path` into translation vectors whose sum is `last - first`
pub fn vectorize(path: &[Point]) -> Vec<Vector> {
    let mut vectors = Vec::new();
    let mut accumulated = ORIGIN;
    let mut pattern = ORIGIN;

    for pair in path.windows(2) {
        let step = pair[1] - pair[0];
        if step.is_zero() {
            continue;
        }

        let step_pattern = step.signum();
        if step_pattern != pattern && !accumulated.is_zero() {
            vectors.push(accumulated);
            accumulated = ORIGIN;
        }
        pattern = step_pattern;
        accumulated += step;
    }

    if !accumulated.is_zero() {
        vectors.push(accumulated);
    }
    vectors
}
