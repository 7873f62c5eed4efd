use crate::{dxt1_size, rgb8_size, SurfaceDxt1, SurfaceError, SurfaceRgb8};

// Blocks are 4x4 pixels.
pub(crate) const BLOCK_WIDTH: usize = 4;
pub(crate) const BLOCK_HEIGHT: usize = 4;

impl<T: AsRef<[u8]>> SurfaceRgb8<T> {
    /// Compress this surface to DXT1 block data.
    ///
    /// The uncompressed surface stores its scanlines bottom to top while
    /// the compressed surface stores its block rows top to bottom, so
    /// block rows are flipped as whole units during compression.
    pub fn encode_dxt1(&self) -> Result<SurfaceDxt1<Vec<u8>>, SurfaceError> {
        self.validate()?;

        let width = self.width as usize;
        let height = self.height as usize;
        let data = self.data.as_ref();

        // Validation leaves only block aligned dimensions.
        let block_cols = width / BLOCK_WIDTH;
        let block_rows = height / BLOCK_HEIGHT;

        let size =
            dxt1_size(self.width, self.height).ok_or(SurfaceError::PixelCountWouldOverflow {
                width: self.width,
                height: self.height,
            })?;
        let mut blocks = vec![0u8; size];

        let pitch = width * bc1_rs::BYTES_PER_PIXEL;
        for y in 0..block_rows {
            let flipped_y = block_rows - 1 - y;
            for x in 0..block_cols {
                let source = (y * BLOCK_HEIGHT * width + x * BLOCK_WIDTH) * bc1_rs::BYTES_PER_PIXEL;
                let block = bc1_rs::encode_block(&data[source..], pitch);

                let destination = (flipped_y * block_cols + x) * bc1_rs::BYTES_PER_BLOCK;
                blocks[destination..destination + bc1_rs::BYTES_PER_BLOCK].copy_from_slice(&block);
            }
        }

        Ok(SurfaceDxt1 {
            width: self.width,
            height: self.height,
            data: blocks,
        })
    }
}

impl<T: AsRef<[u8]>> SurfaceDxt1<T> {
    /// Decompress this surface to RGB888 pixel data.
    ///
    /// Blocks are read in stored order and written into the flipped
    /// destination block row, inverting the flip applied by
    /// [SurfaceRgb8::encode_dxt1], so the decoded surface stores its
    /// scanlines bottom to top again.
    pub fn decode_rgb8(&self) -> Result<SurfaceRgb8<Vec<u8>>, SurfaceError> {
        self.validate()?;

        let width = self.width as usize;
        let height = self.height as usize;
        let data = self.data.as_ref();

        let block_cols = width / BLOCK_WIDTH;
        let block_rows = height / BLOCK_HEIGHT;

        let size =
            rgb8_size(self.width, self.height).ok_or(SurfaceError::PixelCountWouldOverflow {
                width: self.width,
                height: self.height,
            })?;
        let mut rgb = vec![0u8; size];

        let pitch = width * bc1_rs::BYTES_PER_PIXEL;
        let mut block_start = 0;
        for y in (0..block_rows).rev() {
            for x in 0..block_cols {
                let block = data[block_start..block_start + bc1_rs::BYTES_PER_BLOCK]
                    .try_into()
                    .unwrap();

                let destination =
                    (y * BLOCK_HEIGHT * width + x * BLOCK_WIDTH) * bc1_rs::BYTES_PER_PIXEL;
                bc1_rs::decode_block(block, &mut rgb[destination..], pitch).map_err(|source| {
                    SurfaceError::CorruptBlock {
                        x: x as u32,
                        y: y as u32,
                        source,
                    }
                })?;

                block_start += bc1_rs::BYTES_PER_BLOCK;
            }
        }

        Ok(SurfaceRgb8 {
            width: self.width,
            height: self.height,
            data: rgb,
        })
    }
}
