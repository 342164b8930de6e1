//! Error type shared by every fallible entry point of the crate.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PerlovkaError {
    /// Plane geometry or run parameters that the kernel cannot work with.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Pixel layout the channel adapters cannot map onto integer planes.
    #[error("Unsupported layout: {0}")]
    UnsupportedLayout(String),
}

pub type Result<T> = std::result::Result<T, PerlovkaError>;
