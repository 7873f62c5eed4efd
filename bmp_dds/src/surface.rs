use crate::{dxt1_size, rgb8_size, SurfaceError};

/// An uncompressed RGB888 surface with 3 bytes per pixel.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceRgb8<T> {
    /// The width of the surface in pixels.
    pub width: u32,
    /// The height of the surface in pixels.
    pub height: u32,
    /// The pixel data in red, green, blue channel order.
    pub data: T,
}

impl<T: AsRef<[u8]>> SurfaceRgb8<T> {
    pub(crate) fn validate(&self) -> Result<(), SurfaceError> {
        validate_dimensions(self.width, self.height)?;

        let expected =
            rgb8_size(self.width, self.height).ok_or(SurfaceError::PixelCountWouldOverflow {
                width: self.width,
                height: self.height,
            })?;
        let actual = self.data.as_ref().len();
        if actual < expected {
            return Err(SurfaceError::NotEnoughData { expected, actual });
        }

        Ok(())
    }
}

/// A DXT1 compressed surface with 8 bytes per 4x4 pixel block.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceDxt1<T> {
    /// The width of the surface in pixels.
    pub width: u32,
    /// The height of the surface in pixels.
    pub height: u32,
    /// The block data, one 8 byte block per 4x4 pixel region.
    pub data: T,
}

impl<T: AsRef<[u8]>> SurfaceDxt1<T> {
    pub(crate) fn validate(&self) -> Result<(), SurfaceError> {
        validate_dimensions(self.width, self.height)?;

        let expected =
            dxt1_size(self.width, self.height).ok_or(SurfaceError::PixelCountWouldOverflow {
                width: self.width,
                height: self.height,
            })?;
        let actual = self.data.as_ref().len();
        if actual < expected {
            return Err(SurfaceError::NotEnoughData { expected, actual });
        }

        Ok(())
    }
}

// The codec only works on whole 4x4 blocks.
fn validate_dimensions(width: u32, height: u32) -> Result<(), SurfaceError> {
    if width == 0 || height == 0 {
        return Err(SurfaceError::ZeroSizedSurface { width, height });
    }

    if width % 4 != 0 || height % 4 != 0 {
        return Err(SurfaceError::NonIntegralDimensionsInBlocks { width, height });
    }

    Ok(())
}
