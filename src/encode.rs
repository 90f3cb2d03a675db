//! Raster-to-image encoding.
//!
//! Output collaborator for the render pipeline: takes a finished [`Raster`]
//! and writes it to disk. Failures here are reported to the caller and never
//! corrupt or block the in-memory raster.

use crate::Raster;
use std::fmt;
use std::path::Path;

/// Image formats the encoder can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Bmp,
}

impl ImageFormat {
    /// Selects a format from a file extension (case insensitive).
    pub fn from_ext(ext: &str) -> Result<Self, EncodeError> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "bmp" => Ok(Self::Bmp),
            other => Err(EncodeError::UnsupportedFormat(other.into())),
        }
    }
}

/// Encoding failure. Non-fatal to the render pipeline.
#[derive(Debug)]
pub enum EncodeError {
    /// The requested output format is not one the encoder supports.
    UnsupportedFormat(String),
    /// Codec or I/O failure from the underlying encoder.
    Image(image::ImageError),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::UnsupportedFormat(ext) => {
                write!(f, "unsupported image format: {ext:?}")
            }
            EncodeError::Image(err) => write!(f, "image encoding failed: {err}"),
        }
    }
}

impl std::error::Error for EncodeError {}

impl From<image::ImageError> for EncodeError {
    fn from(err: image::ImageError) -> Self {
        EncodeError::Image(err)
    }
}

/// Writes `raster` to `path` in the given format.
pub fn save(raster: &Raster, path: &Path, format: ImageFormat) -> Result<(), EncodeError> {
    let format = match format {
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Bmp => image::ImageFormat::Bmp,
    };
    image::save_buffer_with_format(
        path,
        &raster.to_bytes(),
        raster.width() as u32,
        raster.height() as u32,
        image::ColorType::Rgb8,
        format,
    )
    .map_err(|err| {
        log::error!("failed to write raster to {}: {}", path.display(), err);
        EncodeError::Image(err)
    })
}

/// Writes `raster` to `path`, picking the format from the file extension.
pub fn save_by_extension(raster: &Raster, path: &Path) -> Result<(), EncodeError> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| EncodeError::UnsupportedFormat(String::new()))?;
    save(raster, path, ImageFormat::from_ext(ext)?)
}
