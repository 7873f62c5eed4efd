//! The 24-bit uncompressed BMP container.

use std::io::{self, Read, Write};

use crate::{
    i32_at, put_i32, put_u16, put_u32, rgb8_size, u16_at, u32_at, ReadError, SurfaceError,
    ValidationError, ValidationFailures,
};

/// Magic signature of a BMP file, `BM` in ASCII.
pub const BMP_MAGIC: [u8; 2] = *b"BM";

/// Total size of the file and info headers preceding the pixel data.
pub const BMP_HEADER_SIZE: usize = 54;

/// Size of the info header within the 54 byte prefix.
pub const BMP_INFO_HEADER_SIZE: u32 = 40;

// 72 DPI converted to pixels per meter.
const PELS_PER_METER: i32 = 2835;

// Uncompressed RGB pixel data.
const BI_RGB: u32 = 0;

const RGB24_BITS_PER_PIXEL: u16 = 24;

/// The BMP file header fields.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BmpFileHeader {
    /// File magic, `BM` for a valid file.
    pub magic: [u8; 2],
    /// Total file size in bytes.
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    /// Offset from the start of the file to the pixel data.
    pub data_offset: u32,
}

/// The BMP info header fields.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BmpInfoHeader {
    /// Size of this header in bytes.
    pub header_size: u32,
    /// Width of the image in pixels.
    pub width: i32,
    /// Height of the image in pixels.
    pub height: i32,
    /// Number of color planes, always 1.
    pub planes: u16,
    /// Bits per pixel, 24 for the only supported format.
    pub bits_per_pixel: u16,
    /// Compression type, 0 for uncompressed RGB.
    pub compression: u32,
    /// Size of the pixel data in bytes. May be stored as zero.
    pub image_size: u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

/// A BMP file held in memory.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bmp {
    pub file_header: BmpFileHeader,
    pub info_header: BmpInfoHeader,
    /// Pixel data in blue, green, red channel order with scanlines
    /// stored bottom to top.
    pub data: Vec<u8>,
}

impl Bmp {
    /// Build a BMP around BGR pixel data in stored scanline order.
    pub fn from_bgr8(width: u32, height: u32, data: Vec<u8>) -> Result<Self, SurfaceError> {
        let overflow = SurfaceError::PixelCountWouldOverflow { width, height };

        let image_size = rgb8_size(width, height).ok_or(overflow.clone())?;
        if data.len() < image_size {
            return Err(SurfaceError::NotEnoughData {
                expected: image_size,
                actual: data.len(),
            });
        }

        let image_size = u32::try_from(image_size).map_err(|_| overflow.clone())?;
        let file_size = image_size
            .checked_add(BMP_HEADER_SIZE as u32)
            .ok_or(overflow.clone())?;
        let width = i32::try_from(width).map_err(|_| overflow.clone())?;
        let height = i32::try_from(height).map_err(|_| overflow)?;

        Ok(Bmp {
            file_header: BmpFileHeader {
                magic: BMP_MAGIC,
                file_size,
                reserved1: 0,
                reserved2: 0,
                data_offset: BMP_HEADER_SIZE as u32,
            },
            info_header: BmpInfoHeader {
                header_size: BMP_INFO_HEADER_SIZE,
                width,
                height,
                planes: 1,
                bits_per_pixel: RGB24_BITS_PER_PIXEL,
                compression: BI_RGB,
                image_size,
                x_pels_per_meter: PELS_PER_METER,
                y_pels_per_meter: PELS_PER_METER,
                colors_used: 0,
                colors_important: 0,
            },
            data,
        })
    }

    /// Read a BMP file, validating the headers before reading any pixel
    /// data.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, ReadError> {
        let mut header = [0u8; BMP_HEADER_SIZE];
        reader.read_exact(&mut header)?;

        let file_header = BmpFileHeader {
            magic: [header[0], header[1]],
            file_size: u32_at(&header, 2),
            reserved1: u16_at(&header, 6),
            reserved2: u16_at(&header, 8),
            data_offset: u32_at(&header, 10),
        };
        let info_header = BmpInfoHeader {
            header_size: u32_at(&header, 14),
            width: i32_at(&header, 18),
            height: i32_at(&header, 22),
            planes: u16_at(&header, 26),
            bits_per_pixel: u16_at(&header, 28),
            compression: u32_at(&header, 30),
            image_size: u32_at(&header, 34),
            x_pels_per_meter: i32_at(&header, 38),
            y_pels_per_meter: i32_at(&header, 42),
            colors_used: u32_at(&header, 46),
            colors_important: u32_at(&header, 50),
        };

        let mut bmp = Bmp {
            file_header,
            info_header,
            data: Vec::new(),
        };
        bmp.validate()?;

        // A zero image size means the producer left it unset.
        if bmp.info_header.image_size == 0 {
            bmp.info_header.image_size = bmp
                .file_header
                .file_size
                .saturating_sub(bmp.file_header.data_offset);
        }

        let mut data = vec![0u8; bmp.info_header.image_size as usize];
        reader.read_exact(&mut data)?;
        bmp.data = data;

        Ok(bmp)
    }

    /// Write the headers and pixel data.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut header = [0u8; BMP_HEADER_SIZE];
        header[0..2].copy_from_slice(&self.file_header.magic);
        put_u32(&mut header, 2, self.file_header.file_size);
        put_u16(&mut header, 6, self.file_header.reserved1);
        put_u16(&mut header, 8, self.file_header.reserved2);
        put_u32(&mut header, 10, self.file_header.data_offset);

        put_u32(&mut header, 14, self.info_header.header_size);
        put_i32(&mut header, 18, self.info_header.width);
        put_i32(&mut header, 22, self.info_header.height);
        put_u16(&mut header, 26, self.info_header.planes);
        put_u16(&mut header, 28, self.info_header.bits_per_pixel);
        put_u32(&mut header, 30, self.info_header.compression);
        put_u32(&mut header, 34, self.info_header.image_size);
        put_i32(&mut header, 38, self.info_header.x_pels_per_meter);
        put_i32(&mut header, 42, self.info_header.y_pels_per_meter);
        put_u32(&mut header, 46, self.info_header.colors_used);
        put_u32(&mut header, 50, self.info_header.colors_important);

        writer.write_all(&header)?;
        writer.write_all(&self.data)
    }

    /// Check the structural requirements for DXT1 compression, reporting
    /// every failed check.
    pub fn validate(&self) -> Result<(), ValidationFailures> {
        let mut failures = Vec::new();

        if self.info_header.width % 4 != 0 {
            failures.push(ValidationError::WidthNotDivisibleByBlock {
                width: self.info_header.width as i64,
            });
        }
        if self.info_header.height % 4 != 0 {
            failures.push(ValidationError::HeightNotDivisibleByBlock {
                height: self.info_header.height as i64,
            });
        }
        if self.file_header.magic != BMP_MAGIC {
            failures.push(ValidationError::NotABmp {
                magic: self.file_header.magic,
            });
        }
        if self.info_header.bits_per_pixel != RGB24_BITS_PER_PIXEL {
            failures.push(ValidationError::UnsupportedBitDepth {
                bits_per_pixel: self.info_header.bits_per_pixel,
            });
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailures { failures })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bgr8_populates_headers() {
        let bmp = Bmp::from_bgr8(8, 4, vec![0u8; 96]).unwrap();

        assert_eq!(BMP_MAGIC, bmp.file_header.magic);
        assert_eq!(150, bmp.file_header.file_size);
        assert_eq!(54, bmp.file_header.data_offset);
        assert_eq!(40, bmp.info_header.header_size);
        assert_eq!(8, bmp.info_header.width);
        assert_eq!(4, bmp.info_header.height);
        assert_eq!(1, bmp.info_header.planes);
        assert_eq!(24, bmp.info_header.bits_per_pixel);
        assert_eq!(0, bmp.info_header.compression);
        assert_eq!(96, bmp.info_header.image_size);
        assert_eq!(2835, bmp.info_header.x_pels_per_meter);
        assert_eq!(2835, bmp.info_header.y_pels_per_meter);
    }

    #[test]
    fn from_bgr8_rejects_short_data() {
        assert!(matches!(
            Bmp::from_bgr8(8, 4, vec![0u8; 95]),
            Err(SurfaceError::NotEnoughData {
                expected: 96,
                actual: 95
            })
        ));
    }

    #[test]
    fn write_exact_header_bytes() {
        let bmp = Bmp::from_bgr8(8, 4, vec![0xABu8; 96]).unwrap();

        let mut bytes = Vec::new();
        bmp.write(&mut bytes).unwrap();

        assert_eq!(BMP_HEADER_SIZE + 96, bytes.len());
        let expected = [
            b'B', b'M', // magic
            150, 0, 0, 0, // file size
            0, 0, 0, 0, // reserved
            54, 0, 0, 0, // data offset
            40, 0, 0, 0, // info header size
            8, 0, 0, 0, // width
            4, 0, 0, 0, // height
            1, 0, // planes
            24, 0, // bits per pixel
            0, 0, 0, 0, // compression
            96, 0, 0, 0, // image size
            0x13, 0x0B, 0, 0, // x pixels per meter
            0x13, 0x0B, 0, 0, // y pixels per meter
            0, 0, 0, 0, // colors used
            0, 0, 0, 0, // colors important
        ];
        assert_eq!(expected, bytes[..BMP_HEADER_SIZE]);
    }

    #[test]
    fn read_inverts_write() {
        let bmp = Bmp::from_bgr8(8, 4, (0..96).collect()).unwrap();

        let mut bytes = Vec::new();
        bmp.write(&mut bytes).unwrap();
        let read_back = Bmp::read(&mut bytes.as_slice()).unwrap();

        assert_eq!(bmp, read_back);
    }

    #[test]
    fn read_derives_missing_image_size() {
        let mut bmp = Bmp::from_bgr8(8, 4, vec![0x5Au8; 96]).unwrap();
        bmp.info_header.image_size = 0;

        let mut bytes = Vec::new();
        bmp.write(&mut bytes).unwrap();
        let read_back = Bmp::read(&mut bytes.as_slice()).unwrap();

        // Derived from the file size and data offset.
        assert_eq!(96, read_back.info_header.image_size);
        assert_eq!(vec![0x5Au8; 96], read_back.data);
    }

    #[test]
    fn validate_reports_every_failure() {
        let mut bmp = Bmp::from_bgr8(8, 4, vec![0u8; 96]).unwrap();
        bmp.file_header.magic = *b"PN";
        bmp.info_header.width = 15;
        bmp.info_header.height = 9;
        bmp.info_header.bits_per_pixel = 32;

        let failures = bmp.validate().unwrap_err().failures;
        assert_eq!(
            vec![
                ValidationError::WidthNotDivisibleByBlock { width: 15 },
                ValidationError::HeightNotDivisibleByBlock { height: 9 },
                ValidationError::NotABmp { magic: *b"PN" },
                ValidationError::UnsupportedBitDepth { bits_per_pixel: 32 },
            ],
            failures
        );
    }

    #[test]
    fn validate_accepts_negative_block_aligned_height() {
        // Top-down BMPs keep a negative height. Divisibility is the only
        // dimension requirement at this layer.
        let mut bmp = Bmp::from_bgr8(8, 4, vec![0u8; 96]).unwrap();
        bmp.info_header.height = -16;
        assert!(bmp.validate().is_ok());
    }

    #[test]
    fn read_rejects_invalid_header_without_reading_data() {
        let mut bmp = Bmp::from_bgr8(8, 4, vec![0u8; 96]).unwrap();
        bmp.info_header.bits_per_pixel = 8;

        let mut bytes = Vec::new();
        bmp.write(&mut bytes).unwrap();

        let error = Bmp::read(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(error, ReadError::Validation(_)));
    }

    #[test]
    fn read_rejects_truncated_header() {
        let error = Bmp::read(&mut [0u8; 20].as_slice()).unwrap_err();
        assert!(matches!(error, ReadError::Io(_)));
    }
}
