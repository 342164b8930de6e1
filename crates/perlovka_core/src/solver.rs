//! Grain pattern solver.
//!
//! Geometry is precomputed once per run as a flat list of comparison boxes,
//! each comparing two diagonal pixel pairs around an implicit pivot. Boxes are
//! laid out ring by ring (radius 1 outward) for each selected grid
//! orientation. Walking the list at a pivot:
//!
//! - match: compensate both pairs, continue with the next box in storage order
//! - mismatch: jump to the box's `skip_to` index, or stop when there is none
//!
//! Every ring's entry box skips past the remaining rings of its orientation,
//! so an outward search is abandoned at the first radius that does not match.
//! Refinement boxes (field matching) only skip to their successor.

use log::debug;

use crate::position::PairPosition;
use crate::value::{MatchMode, ResolveMode};

// =============================================================================
// Types
// =============================================================================

/// Grain detection grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Grid {
    /// Diamonds centred on the pivot pixel.
    #[default]
    Odd,
    /// Diamonds centred on the corner between the pivot and its upper-left
    /// neighbours.
    Even,
    /// Odd chain followed by the even chain.
    Both,
}

impl Grid {
    fn orientations(self) -> &'static [Orientation] {
        match self {
            Self::Odd => &[Orientation::Odd],
            Self::Even => &[Orientation::Even],
            Self::Both => &[Orientation::Odd, Orientation::Even],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Odd,
    Even,
}

/// Two pixel pairs compared against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonBox {
    pub first: PairPosition,
    pub second: PairPosition,
    /// Box to continue with on mismatch. `None` ends the walk.
    pub skip_to: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Solver {
    boxes: Vec<ComparisonBox>,
    matching: MatchMode,
    resolver: ResolveMode,
}

// =============================================================================
// Geometry
// =============================================================================

/// Row offset and column offsets of a diamond ring.
///
/// Odd rings span rows `±radius` and columns `±radius`:
///
/// ```text
/// A |   | B
///     x
/// C |   | D
/// ```
///
/// Even rings are shifted by half a pixel towards the pivot:
///
/// ```text
/// A | B(x)
/// C | D
/// ```
struct Ring {
    top: isize,
    bottom: isize,
    left: isize,
    right: isize,
    row_stride: isize,
}

impl Ring {
    fn new(width: usize, radius: usize, orientation: Orientation) -> Self {
        let row_stride = isize::try_from(width).unwrap_or(isize::MAX);
        let radius = isize::try_from(radius).unwrap_or(isize::MAX);
        let row = radius.saturating_mul(row_stride);

        let (top, right) = match orientation {
            Orientation::Odd => (row, radius),
            Orientation::Even => (row - row_stride, radius - 1),
        };

        Self {
            top,
            bottom: -row,
            left: -radius,
            right,
            row_stride,
        }
    }

    /// Corner diagonals of the diamond.
    fn corners(&self) -> (PairPosition, PairPosition) {
        (
            PairPosition::new(self.top + self.left, self.bottom + self.right),
            PairPosition::new(self.top + self.right, self.bottom + self.left),
        )
    }

    /// Diagonals moved `step` pixels inwards along the rows.
    fn along_rows(&self, step: isize) -> (PairPosition, PairPosition) {
        (
            PairPosition::new(self.top + self.left + step, self.bottom + self.right - step),
            PairPosition::new(self.top + self.right - step, self.bottom + self.left + step),
        )
    }

    /// Diagonals moved `step` rows inwards along the columns.
    fn along_columns(&self, step: isize) -> (PairPosition, PairPosition) {
        let shift = self.row_stride * step;
        (
            PairPosition::new(self.top - shift + self.left, self.bottom + shift + self.right),
            PairPosition::new(self.top - shift + self.right, self.bottom + shift + self.left),
        )
    }
}

/// Number of boxes per orientation, saturating at `usize::MAX`.
pub fn boxes_per_grid(radius: usize, field_matching: bool) -> usize {
    if field_matching {
        radius.saturating_mul(radius)
    } else {
        radius
    }
}

fn push_rings(
    boxes: &mut Vec<ComparisonBox>,
    width: usize,
    radius: usize,
    field_matching: bool,
    orientation: Orientation,
    next_grid: Option<usize>,
) {
    for ring_radius in 1..=radius {
        let ring = Ring::new(width, ring_radius, orientation);

        let (first, second) = ring.corners();
        boxes.push(ComparisonBox {
            first,
            second,
            skip_to: next_grid,
        });

        if !field_matching {
            continue;
        }

        for step in 1..ring_radius as isize {
            for (first, second) in [ring.along_rows(step), ring.along_columns(step)] {
                let next = boxes.len() + 1;
                boxes.push(ComparisonBox {
                    first,
                    second,
                    skip_to: Some(next),
                });
            }
        }
    }
}

// =============================================================================
// Solver
// =============================================================================

impl Solver {
    /// Precompute comparison boxes for planes of the given width.
    ///
    /// `radius` must be at least 1 for the solver to do anything; with 0 the
    /// box list is empty and [`Solver::apply`] never matches.
    pub fn build(
        width: usize,
        radius: usize,
        grid: Grid,
        matching: MatchMode,
        resolver: ResolveMode,
        field_matching: bool,
    ) -> Self {
        let per_grid = boxes_per_grid(radius, field_matching);
        let orientations = grid.orientations();
        let mut boxes = Vec::with_capacity(per_grid * orientations.len());

        for (index, &orientation) in orientations.iter().enumerate() {
            let next_grid = if index + 1 < orientations.len() {
                Some((index + 1) * per_grid)
            } else {
                None
            };
            push_rings(&mut boxes, width, radius, field_matching, orientation, next_grid);
        }

        if let Some(last) = boxes.last_mut() {
            last.skip_to = None;
        }

        debug!(
            "solver built: grid={:?} radius={} field_matching={} boxes={}",
            grid,
            radius,
            field_matching,
            boxes.len()
        );

        Self {
            boxes,
            matching,
            resolver,
        }
    }

    pub fn boxes(&self) -> &[ComparisonBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn matching(&self) -> MatchMode {
        self.matching
    }

    pub fn resolver(&self) -> ResolveMode {
        self.resolver
    }

    /// Walk the box chain at `pivot`, compensating every matched couple of
    /// pairs in place. Returns the number of compensations made.
    ///
    /// `pivot` must be at least `radius` rows and columns away from every edge.
    pub fn apply(&self, plane: &mut [i32], pivot: usize) -> usize {
        let mut resolved = 0;
        let mut index = 0;

        while let Some(comparison) = self.boxes.get(index) {
            let first = comparison.first.translate(pivot);
            let second = comparison.second.translate(pivot);

            let mut first_value = first.read(plane);
            let mut second_value = second.read(plane);

            if self.matching.matches(&first_value, &second_value) {
                let delta = self.resolver.delta(&first_value, &second_value);

                first.write(plane, &mut first_value, delta);
                second.write(plane, &mut second_value, delta);

                resolved += 1;
                index += 1;
            } else {
                match comparison.skip_to {
                    Some(next) => index = next,
                    None => break,
                }
            }
        }

        resolved
    }
}
