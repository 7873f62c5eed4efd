use crate::{swap_red_blue, Bmp, ConvertError, Dds, SurfaceDxt1, SurfaceRgb8};

/// Compress a 24-bit BMP image to a DXT1 DDS texture.
pub fn dds_from_bmp(bmp: &Bmp) -> Result<Dds, ConvertError> {
    bmp.validate()?;

    // The codec works in red, green, blue order.
    let mut rgb = bmp.data.clone();
    swap_red_blue(&mut rgb)?;

    let surface = SurfaceRgb8 {
        width: bmp.info_header.width as u32,
        height: bmp.info_header.height as u32,
        data: rgb,
    };
    let encoded = surface.encode_dxt1()?;

    Ok(Dds::from_dxt1(encoded.width, encoded.height, encoded.data)?)
}

/// Decompress a DXT1 DDS texture to a 24-bit BMP image.
pub fn bmp_from_dds(dds: &Dds) -> Result<Bmp, ConvertError> {
    dds.validate()?;

    let surface = SurfaceDxt1 {
        width: dds.header.width,
        height: dds.header.height,
        data: dds.data.as_slice(),
    };
    let mut decoded = surface.decode_rgb8()?;
    swap_red_blue(&mut decoded.data)?;

    Ok(Bmp::from_bgr8(decoded.width, decoded.height, decoded.data)?)
}
