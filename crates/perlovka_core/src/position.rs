//! Pixel pair positions inside the flattened plane.

use crate::value::PairValue;

/// Offsets of two pixels relative to a pivot.
///
/// Solver geometry holds these fixed once built; lookups go through
/// [`PairPosition::translate`] which yields the absolute indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairPosition {
    pub a: isize,
    pub b: isize,
}

/// Absolute indices of two pixels in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedPair {
    pub a: usize,
    pub b: usize,
}

impl PairPosition {
    pub const fn new(a: isize, b: isize) -> Self {
        Self { a, b }
    }

    /// Shift both offsets by the pivot index.
    ///
    /// The pivot must lie far enough from the plane edges for both results to
    /// stay non-negative; the sweep region guarantees it.
    #[inline]
    pub fn translate(&self, pivot: usize) -> PlacedPair {
        let pivot = pivot as isize;
        PlacedPair {
            a: (pivot + self.a) as usize,
            b: (pivot + self.b) as usize,
        }
    }
}

impl PlacedPair {
    #[inline]
    pub fn read(&self, plane: &[i32]) -> PairValue {
        PairValue::new(plane[self.a], plane[self.b])
    }

    /// Compensate `value` by `delta` and store it back at this position.
    #[inline]
    pub fn write(&self, plane: &mut [i32], value: &mut PairValue, delta: i32) {
        value.apply_delta(delta);
        plane[self.a] = value.a;
        plane[self.b] = value.b;
    }
}
