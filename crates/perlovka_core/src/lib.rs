//! Perlovka Core Library
//!
//! Grain reduction for single-channel integer planes. Grain is detected as
//! small, locally symmetric bumps in the second differences of the image and
//! compensated in place, while edges (whose differences lean one way) are left
//! alone. This crate contains all algorithm logic and no I/O.

pub mod balance;
pub mod channels;
pub mod denoise;
pub mod diff;
pub mod error;
pub mod position;
pub mod solver;
pub mod value;

// Re-export commonly used types at the crate root
pub use balance::SignBalance;
pub use denoise::{
    denoise, denoise_array, denoise_with_progress, DenoiseConfig, RunStats, SweepControl,
    SweepReport,
};
pub use error::{PerlovkaError, Result};
pub use solver::{Grid, Solver};
pub use value::{MatchMode, PairValue, ResolveMode};
