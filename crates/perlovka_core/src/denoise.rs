//! Grain reduction driver.
//!
//! A run goes:
//! 1. Horizontal then vertical differencing of the whole plane
//! 2. One solver built from the configured geometry
//! 3. Full sweeps of the interior until a sweep changes nothing, the iteration
//!    limit is reached, or the progress callback asks to stop
//! 4. Vertical then horizontal inverse differencing
//!
//! Repeated sweeps matter: a compensation at one pivot can expose a matching
//! pattern at a neighbouring pivot that was already visited.

use log::{debug, info, warn};
use ndarray::Array2;

use crate::diff;
use crate::error::{PerlovkaError, Result};
use crate::solver::{Grid, Solver};
use crate::value::{MatchMode, ResolveMode};

// =============================================================================
// Constants
// =============================================================================

/// Default maximal grain radius, in pixels.
pub const DEFAULT_RADIUS: usize = 5;

/// Default sweep limit.
pub const DEFAULT_ITERATIONS: usize = 5;

/// Default grain detection grid.
pub const DEFAULT_GRID: Grid = Grid::Odd;

/// Default fields matching mode.
pub const DEFAULT_MATCHING: MatchMode = MatchMode::Strict;

/// Default compensation greediness.
pub const DEFAULT_RESOLVER: ResolveMode = ResolveMode::LeastOfMax;

// =============================================================================
// Types
// =============================================================================

/// Parameters of one grain reduction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DenoiseConfig {
    /// Supposed maximal radius of the grain. Default: 5
    pub radius: usize,
    /// Sweep limit. 0 runs the difference round trip only. Default: 5
    pub iterations: usize,
    /// Grain detection grid. Default: Odd
    pub grid: Grid,
    /// Fields matching mode. Default: Strict
    pub matching: MatchMode,
    /// Compensation greediness. Default: LeastOfMax
    pub resolver: ResolveMode,
    /// Compare pixels along the ring sides, not only its corners. Default: false
    pub field_matching: bool,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            iterations: DEFAULT_ITERATIONS,
            grid: DEFAULT_GRID,
            matching: DEFAULT_MATCHING,
            resolver: DEFAULT_RESOLVER,
            field_matching: false,
        }
    }
}

impl DenoiseConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if self.radius == 0 {
            return Err(PerlovkaError::InvalidConfiguration(
                "radius must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    fn build_solver(&self, width: usize) -> Solver {
        Solver::build(
            width,
            self.radius,
            self.grid,
            self.matching,
            self.resolver,
            self.field_matching,
        )
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    /// Sweeps actually performed.
    pub iterations_made: usize,
    /// Compensations applied across all sweeps.
    pub resolved: usize,
    /// The progress callback stopped the run before it converged.
    pub aborted: bool,
}

/// Progress reported after every sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// 1-based index of the sweep just finished.
    pub iteration: usize,
    pub resolved_in_sweep: usize,
    pub resolved_total: usize,
}

/// Answer of the progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepControl {
    #[default]
    Continue,
    Abort,
}

// =============================================================================
// Helper Functions
// =============================================================================

fn validate_plane(len: usize, width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(PerlovkaError::InvalidConfiguration(format!(
            "plane dimensions must be > 0, got {}x{}",
            width, height
        )));
    }

    let expected = width.checked_mul(height).ok_or_else(|| {
        PerlovkaError::InvalidConfiguration(format!(
            "plane dimensions {}x{} overflow",
            width, height
        ))
    })?;

    if len != expected {
        return Err(PerlovkaError::InvalidConfiguration(format!(
            "plane has {} values, expected {}x{} = {}",
            len, width, height, expected
        )));
    }
    Ok(())
}

/// `radius * 2 < width` and `radius * 2 < height`, without overflowing.
fn has_interior(width: usize, height: usize, radius: usize) -> bool {
    radius < width.div_ceil(2) && radius < height.div_ceil(2)
}

/// One pass of the solver over every interior pivot, row-major.
fn sweep(
    solver: &Solver,
    plane: &mut [i32],
    width: usize,
    height: usize,
    radius: usize,
) -> usize {
    let mut resolved = 0;

    for y in radius..height.saturating_sub(radius) {
        let row = y * width;
        for x in radius..width.saturating_sub(radius) {
            resolved += solver.apply(plane, row + x);
        }
    }

    resolved
}

// =============================================================================
// Main Entry Point
// =============================================================================

/// Reduce grain in a row-major `width` x `height` plane, in place.
pub fn denoise(
    plane: &mut [i32],
    width: usize,
    height: usize,
    config: &DenoiseConfig,
) -> Result<RunStats> {
    denoise_with_progress(plane, width, height, config, |_| SweepControl::Continue)
}

/// [`denoise`] with a callback invoked synchronously after every sweep.
///
/// Returning [`SweepControl::Abort`] stops before the next sweep; the plane is
/// still transformed back, so it always holds pixel values on return.
pub fn denoise_with_progress<P>(
    plane: &mut [i32],
    width: usize,
    height: usize,
    config: &DenoiseConfig,
    mut on_sweep: P,
) -> Result<RunStats>
where
    P: FnMut(&SweepReport) -> SweepControl,
{
    config.validate()?;
    validate_plane(plane.len(), width, height)?;

    let radius = config.radius;
    let solver = if has_interior(width, height, radius) {
        Some(config.build_solver(width))
    } else {
        warn!(
            "radius {} leaves no interior in a {}x{} plane, nothing to compensate",
            radius, width, height
        );
        None
    };

    diff::forward(plane, width);

    let mut stats = RunStats::default();

    while stats.iterations_made < config.iterations {
        let resolved_in_sweep = solver
            .as_ref()
            .map_or(0, |solver| sweep(solver, plane, width, height, radius));

        stats.iterations_made += 1;
        stats.resolved += resolved_in_sweep;

        let report = SweepReport {
            iteration: stats.iterations_made,
            resolved_in_sweep,
            resolved_total: stats.resolved,
        };
        debug!(
            "sweep {}: resolved {} (total {})",
            report.iteration, report.resolved_in_sweep, report.resolved_total
        );

        if on_sweep(&report) == SweepControl::Abort {
            stats.aborted = true;
            break;
        }
        if resolved_in_sweep == 0 {
            break;
        }
    }

    drop(solver);
    diff::inverse(plane, width);

    info!(
        "denoised {}x{} plane: {} sweeps, {} compensations{}",
        width,
        height,
        stats.iterations_made,
        stats.resolved,
        if stats.aborted { " (aborted)" } else { "" }
    );

    Ok(stats)
}

/// [`denoise`] for a standard-layout `rows x cols` array.
pub fn denoise_array(plane: &mut Array2<i32>, config: &DenoiseConfig) -> Result<RunStats> {
    let (height, width) = plane.dim();
    let data = plane.as_slice_mut().ok_or_else(|| {
        PerlovkaError::InvalidConfiguration(
            "plane must be contiguous in row-major order".to_string(),
        )
    })?;

    denoise(data, width, height, config)
}
