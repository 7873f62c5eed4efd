use crate::SurfaceError;

/// Swap the red and blue channels of every 3 byte pixel in place.
///
/// Converts between the blue, green, red order stored in BMP files and
/// the red, green, blue order the block codec works in. The operation
/// is its own inverse.
pub fn swap_red_blue(data: &mut [u8]) -> Result<(), SurfaceError> {
    if data.len() % 3 != 0 {
        return Err(SurfaceError::InvalidPixelDataLength { length: data.len() });
    }

    for pixel in bytemuck::cast_slice_mut::<u8, [u8; 3]>(data) {
        pixel.swap(0, 2);
    }

    Ok(())
}
