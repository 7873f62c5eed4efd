//! Convert 24-bit uncompressed BMP images to and from DXT1 compressed
//! DDS textures.
//!
//! The two containers disagree on scanline order, so every conversion
//! flips the image vertically at block granularity in addition to
//! compressing or decompressing the pixel data.
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::{BufReader, BufWriter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut reader = BufReader::new(File::open("image.bmp")?);
//! let bmp = bmp_dds::Bmp::read(&mut reader)?;
//!
//! let dds = bmp_dds::dds_from_bmp(&bmp)?;
//!
//! let mut writer = BufWriter::new(File::create("image.dds")?);
//! dds.write(&mut writer)?;
//! # Ok(())
//! # }
//! ```

mod bc1;
pub mod bmp;
mod convert;
pub mod dds;
mod error;
mod rgb;
mod surface;

pub use bmp::Bmp;
pub use convert::*;
pub use dds::Dds;
pub use error::*;
pub use rgb::swap_red_blue;
pub use surface::{SurfaceDxt1, SurfaceRgb8};

/// The container format of an image file, determined by its extension.
#[derive(Debug, PartialEq, Eq, Clone, Copy, strum::EnumString, strum::Display)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum ImageFormat {
    /// Uncompressed 24-bit BMP.
    Bmp,
    /// DXT1 compressed DDS.
    Dds,
}

impl ImageFormat {
    /// Determine the format of a file from its extension.
    pub fn from_path(path: &std::path::Path) -> Option<ImageFormat> {
        path.extension()
            .and_then(std::ffi::OsStr::to_str)
            .and_then(|extension| extension.parse().ok())
    }
}

/// Size in bytes of the DXT1 block data for a surface of the given
/// dimensions, or `None` on overflow.
pub fn dxt1_size(width: u32, height: u32) -> Option<usize> {
    div_round_up(width as usize, bc1::BLOCK_WIDTH)
        .max(1)
        .checked_mul(div_round_up(height as usize, bc1::BLOCK_HEIGHT).max(1))?
        .checked_mul(bc1_rs::BYTES_PER_BLOCK)
}

/// Size in bytes of the RGB888 pixel data for a surface of the given
/// dimensions, or `None` on overflow.
pub fn rgb8_size(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(bc1_rs::BYTES_PER_PIXEL)
}

pub(crate) fn div_round_up(x: usize, d: usize) -> usize {
    (x + d - 1) / d
}

pub(crate) fn u16_at(buffer: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes(buffer[offset..offset + 2].try_into().unwrap())
}

pub(crate) fn u32_at(buffer: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(buffer[offset..offset + 4].try_into().unwrap())
}

pub(crate) fn i32_at(buffer: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes(buffer[offset..offset + 4].try_into().unwrap())
}

pub(crate) fn put_u16(buffer: &mut [u8], offset: usize, value: u16) {
    buffer[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn put_u32(buffer: &mut [u8], offset: usize, value: u32) {
    buffer[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn put_i32(buffer: &mut [u8], offset: usize, value: i32) {
    buffer[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::str::FromStr;

    #[test]
    fn dxt1_size_block_aligned() {
        assert_eq!(Some(8), dxt1_size(4, 4));
        assert_eq!(Some(16), dxt1_size(8, 4));
        assert_eq!(Some(128), dxt1_size(16, 16));
    }

    #[test]
    fn dxt1_size_at_least_one_block() {
        // Degenerate dimensions still occupy one block per axis.
        assert_eq!(Some(8), dxt1_size(0, 0));
        assert_eq!(Some(8), dxt1_size(1, 1));
    }

    #[test]
    fn rgb8_size_overflow() {
        assert_eq!(None, rgb8_size(u32::MAX, u32::MAX));
        assert_eq!(Some(96), rgb8_size(8, 4));
    }

    #[test]
    fn image_format_from_extension() {
        assert_eq!(Ok(ImageFormat::Bmp), ImageFormat::from_str("bmp"));
        assert_eq!(Ok(ImageFormat::Dds), ImageFormat::from_str("DDS"));
        assert!(ImageFormat::from_str("png").is_err());
    }

    #[test]
    fn image_format_from_path() {
        assert_eq!(
            Some(ImageFormat::Bmp),
            ImageFormat::from_path(Path::new("textures/grass.BMP"))
        );
        assert_eq!(
            Some(ImageFormat::Dds),
            ImageFormat::from_path(Path::new("grass.dds"))
        );
        assert_eq!(None, ImageFormat::from_path(Path::new("grass.png")));
        assert_eq!(None, ImageFormat::from_path(Path::new("grass")));
    }
}
