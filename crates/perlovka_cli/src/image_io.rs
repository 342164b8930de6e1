use ndarray::Array3;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::ColorType;

use perlovka_core::PerlovkaError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("Invalid image shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error(transparent)]
    Core(#[from] PerlovkaError),

    #[error("Unsupported image: {0}")]
    Unsupported(String),
}

/// Pixels of the first TIFF page, `height x width x components`.
#[derive(Debug)]
pub enum LoadedImage {
    U8(Array3<u8>),
    U16(Array3<u16>),
}

fn components_of(color_type: ColorType) -> Result<(usize, u8), CliError> {
    match color_type {
        ColorType::Gray(bits) => Ok((1, bits)),
        ColorType::GrayA(bits) => Ok((2, bits)),
        ColorType::RGB(bits) => Ok((3, bits)),
        ColorType::RGBA(bits) => Ok((4, bits)),
        other => Err(CliError::Unsupported(format!(
            "TIFF color type {:?}; only grey and RGB (with optional alpha) are supported",
            other
        ))),
    }
}

/// Load the first page of an 8- or 16-bit grey/RGB TIFF.
pub fn load_tiff(path: &Path) -> Result<LoadedImage, CliError> {
    let reader = BufReader::new(File::open(path)?);
    let mut decoder = Decoder::new(reader)?;

    let (width, height) = decoder.dimensions()?;
    let (components, bits) = components_of(decoder.colortype()?)?;
    let shape = (height as usize, width as usize, components);

    match (decoder.read_image()?, bits) {
        (DecodingResult::U8(data), 8) => Ok(LoadedImage::U8(Array3::from_shape_vec(shape, data)?)),
        (DecodingResult::U16(data), 16) => {
            Ok(LoadedImage::U16(Array3::from_shape_vec(shape, data)?))
        }
        (_, bits) => Err(CliError::Unsupported(format!(
            "{}-bit samples; only 8- and 16-bit unsigned integers are supported",
            bits
        ))),
    }
}

pub fn save_tiff_u8(path: &Path, image: &Array3<u8>) -> Result<(), CliError> {
    let (height, width, components) = image.dim();
    let data: Vec<u8> = image.iter().copied().collect();
    let mut encoder = TiffEncoder::new(BufWriter::new(File::create(path)?))?;

    match components {
        1 => encoder.write_image::<colortype::Gray8>(width as u32, height as u32, &data)?,
        3 => encoder.write_image::<colortype::RGB8>(width as u32, height as u32, &data)?,
        other => {
            return Err(CliError::Unsupported(format!(
                "cannot write {} components",
                other
            )))
        }
    }
    Ok(())
}

pub fn save_tiff_u16(path: &Path, image: &Array3<u16>) -> Result<(), CliError> {
    let (height, width, components) = image.dim();
    let data: Vec<u16> = image.iter().copied().collect();
    let mut encoder = TiffEncoder::new(BufWriter::new(File::create(path)?))?;

    match components {
        1 => encoder.write_image::<colortype::Gray16>(width as u32, height as u32, &data)?,
        3 => encoder.write_image::<colortype::RGB16>(width as u32, height as u32, &data)?,
        other => {
            return Err(CliError::Unsupported(format!(
                "cannot write {} components",
                other
            )))
        }
    }
    Ok(())
}
