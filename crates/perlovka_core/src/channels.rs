//! Conversions between interleaved images and integer planes.
//!
//! The grain kernel works on one `i32` plane at a time. These helpers split
//! an `height x width x components` image into colour planes, run the kernel
//! on each plane in parallel and bring the results back into 8- or 16-bit
//! pixel range.

use ndarray::{s, Array2, Array3, ArrayView2, ArrayView3, ArrayViewMut2, Axis, Zip};
use rayon::prelude::*;

use crate::denoise::{denoise_array, DenoiseConfig, RunStats};
use crate::error::{PerlovkaError, Result};

const U8_MAX: i32 = u8::MAX as i32;
const U16_MAX: i32 = u16::MAX as i32;

/// Number of colour planes for an image with `components` channels.
///
/// Grey (+alpha) maps to one plane, RGB (+alpha) to three. Alpha is never
/// denoised.
pub fn color_channel_count(components: usize) -> Result<usize> {
    match components {
        1 | 2 => Ok(1),
        3 | 4 => Ok(3),
        other => Err(PerlovkaError::UnsupportedLayout(format!(
            "expected 1 to 4 components per pixel, got {}",
            other
        ))),
    }
}

/// Split an interleaved image into its colour planes.
pub fn split_channels<T>(image: ArrayView3<T>) -> Result<Vec<Array2<i32>>>
where
    T: Copy + Into<i32>,
{
    let colors = color_channel_count(image.dim().2)?;

    Ok((0..colors)
        .map(|c| image.index_axis(Axis(2), c).mapv(|v| -> i32 { v.into() }))
        .collect())
}

/// Bring a plane into `0..=255`.
///
/// A negative minimum shifts the plane up first; only then, if the original
/// amplitude exceeds the byte range, values are scaled down. Shifting and
/// scaling are kept apart so a small amplitude is never stretched.
pub fn normalize_to_u8(mut plane: ArrayViewMut2<i32>) {
    let Some((min, max)) = min_max(plane.view()) else {
        return;
    };
    let amplitude = max as i64 - min as i64;
    let shift = if min < 0 { -(min as i64) } else { 0 };
    let scale = (amplitude > U8_MAX as i64).then(|| U8_MAX as f64 / amplitude as f64);

    // The shifted plane may span more than i32, so it only exists in i64.
    plane.mapv_inplace(|v| {
        let shifted = v as i64 + shift;
        match scale {
            Some(scale) => (shifted as f64 * scale) as i32,
            None => shifted as i32,
        }
    });
}

/// Clamp a plane into `0..=65535`.
pub fn clamp_to_u16(mut plane: ArrayViewMut2<i32>) {
    plane.mapv_inplace(|v| {
        if v < 1 {
            0
        } else {
            v.min(U16_MAX)
        }
    });
}

/// Interleave normalised planes into an 8-bit image.
pub fn merge_channels_u8(planes: &[Array2<i32>]) -> Result<Array3<u8>> {
    merge_channels(planes, |v| v.clamp(0, U8_MAX) as u8)
}

/// Interleave clamped planes into a 16-bit image.
pub fn merge_channels_u16(planes: &[Array2<i32>]) -> Result<Array3<u16>> {
    merge_channels(planes, |v| v.clamp(0, U16_MAX) as u16)
}

fn merge_channels<T, C>(planes: &[Array2<i32>], cast: C) -> Result<Array3<T>>
where
    T: Copy + Default,
    C: Fn(i32) -> T,
{
    let (rows, cols) = common_shape(planes)?;
    let mut image = Array3::<T>::default((rows, cols, planes.len()));

    for (c, plane) in planes.iter().enumerate() {
        Zip::from(image.index_axis_mut(Axis(2), c))
            .and(plane)
            .for_each(|out, &v| *out = cast(v));
    }

    Ok(image)
}

/// Denoise every plane in parallel, each with its own solver.
pub fn denoise_planes(planes: &mut [Array2<i32>], config: &DenoiseConfig) -> Result<Vec<RunStats>> {
    config.validate()?;
    common_shape(planes)?;

    planes
        .par_iter_mut()
        .map(|plane| denoise_array(plane, config))
        .collect()
}

/// Interior of a plane, `radius` pixels in from every edge.
pub fn crop_border(plane: ArrayView2<i32>, radius: usize) -> Array2<i32> {
    let (rows, cols) = plane.dim();
    if radius * 2 >= rows || radius * 2 >= cols {
        return Array2::zeros((0, 0));
    }

    plane
        .slice(s![radius..rows - radius, radius..cols - radius])
        .to_owned()
}

fn common_shape(planes: &[Array2<i32>]) -> Result<(usize, usize)> {
    let first = planes.first().ok_or_else(|| {
        PerlovkaError::InvalidConfiguration("at least one plane is required".to_string())
    })?;
    let shape = first.dim();

    if let Some(other) = planes.iter().find(|p| p.dim() != shape) {
        return Err(PerlovkaError::InvalidConfiguration(format!(
            "plane shape mismatch: {:?} vs {:?}",
            shape,
            other.dim()
        )));
    }
    Ok(shape)
}

fn min_max(plane: ArrayView2<i32>) -> Option<(i32, i32)> {
    plane.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
