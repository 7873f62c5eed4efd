//! The DXT1 compressed DDS container.

use std::io::{self, Read, Write};

use crate::{
    dxt1_size, put_u32, u32_at, ReadError, SurfaceError, ValidationError, ValidationFailures,
};

/// Magic signature of a DDS file, `DDS ` in ASCII including the
/// trailing space.
pub const DDS_MAGIC: [u8; 4] = *b"DDS ";

/// Four character code of the only supported compression format.
pub const FOURCC_DXT1: [u8; 4] = *b"DXT1";

/// Declared size of the header structure following the magic.
pub const DDS_HEADER_SIZE: u32 = 124;

/// Declared size of the pixel format structure within the header.
pub const DDS_PIXEL_FORMAT_SIZE: u32 = 32;

/// Total size of the magic and header preceding the block data.
pub const DDS_PREFIX_SIZE: usize = 128;

// DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT | DDSD_LINEARSIZE
const DDS_FLAGS: u32 = 0x81007;

// The pixel format holds compressed data described by the four
// character code.
const DDPF_FOURCC: u32 = 0x4;

// DDSCAPS_TEXTURE, required for every DDS file.
const DDSCAPS_TEXTURE: u32 = 0x1000;

/// The DDS pixel format structure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DdsPixelFormat {
    /// Size of this structure, always 32.
    pub size: u32,
    /// Flags describing the kind of data in the surface.
    pub flags: u32,
    /// Four character code identifying the compression.
    pub four_cc: [u8; 4],
    /// Bits per pixel for uncompressed formats, unused here.
    pub rgb_bit_count: u32,
    pub r_bit_mask: u32,
    pub g_bit_mask: u32,
    pub b_bit_mask: u32,
    pub a_bit_mask: u32,
}

/// The 124 byte DDS header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DdsHeader {
    /// Size of this structure, always 124.
    pub size: u32,
    /// Flags indicating which fields hold valid data.
    pub flags: u32,
    /// Height of the image in pixels.
    pub height: u32,
    /// Width of the image in pixels.
    pub width: u32,
    /// Total size of the block data for compressed surfaces.
    pub pitch_or_linear_size: u32,
    /// Depth of a volume texture, unused here.
    pub depth: u32,
    /// Number of mipmap levels, unused here.
    pub mipmap_count: u32,
    pub reserved1: [u32; 11],
    pub pixel_format: DdsPixelFormat,
    /// Surface complexity flags.
    pub caps: u32,
    pub caps2: u32,
    pub caps3: u32,
    pub caps4: u32,
    pub reserved2: u32,
}

/// A DDS file held in memory.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dds {
    /// File magic, `DDS ` for a valid file.
    pub magic: [u8; 4],
    pub header: DdsHeader,
    /// DXT1 block data with block rows stored top to bottom.
    pub data: Vec<u8>,
}

impl Dds {
    /// Build a DDS around DXT1 block data.
    pub fn from_dxt1(width: u32, height: u32, data: Vec<u8>) -> Result<Self, SurfaceError> {
        let linear_size =
            dxt1_size(width, height).ok_or(SurfaceError::PixelCountWouldOverflow {
                width,
                height,
            })?;
        if data.len() < linear_size {
            return Err(SurfaceError::NotEnoughData {
                expected: linear_size,
                actual: data.len(),
            });
        }
        let linear_size = u32::try_from(linear_size)
            .map_err(|_| SurfaceError::PixelCountWouldOverflow { width, height })?;

        Ok(Dds {
            magic: DDS_MAGIC,
            header: DdsHeader {
                size: DDS_HEADER_SIZE,
                flags: DDS_FLAGS,
                height,
                width,
                pitch_or_linear_size: linear_size,
                depth: 0,
                mipmap_count: 0,
                reserved1: [0; 11],
                pixel_format: DdsPixelFormat {
                    size: DDS_PIXEL_FORMAT_SIZE,
                    flags: DDPF_FOURCC,
                    four_cc: FOURCC_DXT1,
                    rgb_bit_count: 0,
                    r_bit_mask: 0,
                    g_bit_mask: 0,
                    b_bit_mask: 0,
                    a_bit_mask: 0,
                },
                caps: DDSCAPS_TEXTURE,
                caps2: 0,
                caps3: 0,
                caps4: 0,
                reserved2: 0,
            },
            data,
        })
    }

    /// Read a DDS file, validating the header before reading any block
    /// data.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, ReadError> {
        let mut prefix = [0u8; DDS_PREFIX_SIZE];
        reader.read_exact(&mut prefix)?;

        let mut reserved1 = [0u32; 11];
        for (i, word) in reserved1.iter_mut().enumerate() {
            *word = u32_at(&prefix, 32 + i * 4);
        }

        let mut dds = Dds {
            magic: [prefix[0], prefix[1], prefix[2], prefix[3]],
            header: DdsHeader {
                size: u32_at(&prefix, 4),
                flags: u32_at(&prefix, 8),
                height: u32_at(&prefix, 12),
                width: u32_at(&prefix, 16),
                pitch_or_linear_size: u32_at(&prefix, 20),
                depth: u32_at(&prefix, 24),
                mipmap_count: u32_at(&prefix, 28),
                reserved1,
                pixel_format: DdsPixelFormat {
                    size: u32_at(&prefix, 76),
                    flags: u32_at(&prefix, 80),
                    four_cc: [prefix[84], prefix[85], prefix[86], prefix[87]],
                    rgb_bit_count: u32_at(&prefix, 88),
                    r_bit_mask: u32_at(&prefix, 92),
                    g_bit_mask: u32_at(&prefix, 96),
                    b_bit_mask: u32_at(&prefix, 100),
                    a_bit_mask: u32_at(&prefix, 104),
                },
                caps: u32_at(&prefix, 108),
                caps2: u32_at(&prefix, 112),
                caps3: u32_at(&prefix, 116),
                caps4: u32_at(&prefix, 120),
                reserved2: u32_at(&prefix, 124),
            },
            data: Vec::new(),
        };
        dds.validate()?;

        // The stored pitch is informational. Size the block data from
        // the validated dimensions instead.
        let size = dxt1_size(dds.header.width, dds.header.height).ok_or(
            SurfaceError::PixelCountWouldOverflow {
                width: dds.header.width,
                height: dds.header.height,
            },
        )?;
        let mut data = vec![0u8; size];
        reader.read_exact(&mut data)?;
        dds.data = data;

        Ok(dds)
    }

    /// Write the magic, header and block data.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut prefix = [0u8; DDS_PREFIX_SIZE];
        prefix[0..4].copy_from_slice(&self.magic);
        put_u32(&mut prefix, 4, self.header.size);
        put_u32(&mut prefix, 8, self.header.flags);
        put_u32(&mut prefix, 12, self.header.height);
        put_u32(&mut prefix, 16, self.header.width);
        put_u32(&mut prefix, 20, self.header.pitch_or_linear_size);
        put_u32(&mut prefix, 24, self.header.depth);
        put_u32(&mut prefix, 28, self.header.mipmap_count);
        for (i, word) in self.header.reserved1.iter().enumerate() {
            put_u32(&mut prefix, 32 + i * 4, *word);
        }

        put_u32(&mut prefix, 76, self.header.pixel_format.size);
        put_u32(&mut prefix, 80, self.header.pixel_format.flags);
        prefix[84..88].copy_from_slice(&self.header.pixel_format.four_cc);
        put_u32(&mut prefix, 88, self.header.pixel_format.rgb_bit_count);
        put_u32(&mut prefix, 92, self.header.pixel_format.r_bit_mask);
        put_u32(&mut prefix, 96, self.header.pixel_format.g_bit_mask);
        put_u32(&mut prefix, 100, self.header.pixel_format.b_bit_mask);
        put_u32(&mut prefix, 104, self.header.pixel_format.a_bit_mask);

        put_u32(&mut prefix, 108, self.header.caps);
        put_u32(&mut prefix, 112, self.header.caps2);
        put_u32(&mut prefix, 116, self.header.caps3);
        put_u32(&mut prefix, 120, self.header.caps4);
        put_u32(&mut prefix, 124, self.header.reserved2);

        writer.write_all(&prefix)?;
        writer.write_all(&self.data)
    }

    /// Check the structural requirements for DXT1 decompression,
    /// reporting every failed check.
    pub fn validate(&self) -> Result<(), ValidationFailures> {
        let mut failures = Vec::new();

        if self.header.width % 4 != 0 {
            failures.push(ValidationError::WidthNotDivisibleByBlock {
                width: self.header.width as i64,
            });
        }
        if self.header.height % 4 != 0 {
            failures.push(ValidationError::HeightNotDivisibleByBlock {
                height: self.header.height as i64,
            });
        }
        if self.magic != DDS_MAGIC {
            failures.push(ValidationError::NotADds { magic: self.magic });
        }
        if self.header.size != DDS_HEADER_SIZE {
            failures.push(ValidationError::InvalidHeaderSize {
                size: self.header.size,
            });
        }
        if self.header.pixel_format.size != DDS_PIXEL_FORMAT_SIZE {
            failures.push(ValidationError::InvalidPixelFormatSize {
                size: self.header.pixel_format.size,
            });
        }
        if self.header.pixel_format.flags != DDPF_FOURCC {
            failures.push(ValidationError::UncompressedPixelFormat {
                flags: self.header.pixel_format.flags,
            });
        }
        if self.header.pixel_format.four_cc != FOURCC_DXT1 {
            failures.push(ValidationError::UnsupportedFourCc {
                four_cc: self.header.pixel_format.four_cc,
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
    fn from_dxt1_populates_header() {
        let dds = Dds::from_dxt1(8, 4, vec![0u8; 16]).unwrap();

        assert_eq!(DDS_MAGIC, dds.magic);
        assert_eq!(124, dds.header.size);
        assert_eq!(0x81007, dds.header.flags);
        assert_eq!(4, dds.header.height);
        assert_eq!(8, dds.header.width);
        assert_eq!(16, dds.header.pitch_or_linear_size);
        assert_eq!([0u32; 11], dds.header.reserved1);
        assert_eq!(32, dds.header.pixel_format.size);
        assert_eq!(0x4, dds.header.pixel_format.flags);
        assert_eq!(*b"DXT1", dds.header.pixel_format.four_cc);
        assert_eq!(0x1000, dds.header.caps);
    }

    #[test]
    fn from_dxt1_rejects_short_data() {
        assert!(matches!(
            Dds::from_dxt1(8, 4, vec![0u8; 8]),
            Err(SurfaceError::NotEnoughData {
                expected: 16,
                actual: 8
            })
        ));
    }

    #[test]
    fn write_exact_prefix_bytes() {
        let dds = Dds::from_dxt1(8, 4, vec![0xCDu8; 16]).unwrap();

        let mut bytes = Vec::new();
        dds.write(&mut bytes).unwrap();

        assert_eq!(DDS_PREFIX_SIZE + 16, bytes.len());
        assert_eq!(b"DDS ", &bytes[0..4]);
        assert_eq!([124, 0, 0, 0], bytes[4..8]);
        assert_eq!([0x07, 0x10, 0x08, 0x00], bytes[8..12]);
        assert_eq!([4, 0, 0, 0], bytes[12..16]);
        assert_eq!([8, 0, 0, 0], bytes[16..20]);
        assert_eq!([16, 0, 0, 0], bytes[20..24]);
        assert_eq!([0u8; 8], bytes[24..32]);
        assert_eq!([0u8; 44], bytes[32..76]);
        assert_eq!([32, 0, 0, 0], bytes[76..80]);
        assert_eq!([4, 0, 0, 0], bytes[80..84]);
        assert_eq!(b"DXT1", &bytes[84..88]);
        assert_eq!([0u8; 20], bytes[88..108]);
        assert_eq!([0x00, 0x10, 0x00, 0x00], bytes[108..112]);
        assert_eq!([0u8; 16], bytes[112..128]);
        assert_eq!(vec![0xCDu8; 16], bytes[128..]);
    }

    #[test]
    fn read_inverts_write() {
        // All fields survive the round trip, including the fixed
        // constants.
        let dds = Dds::from_dxt1(8, 4, (0..16).collect()).unwrap();

        let mut bytes = Vec::new();
        dds.write(&mut bytes).unwrap();
        let read_back = Dds::read(&mut bytes.as_slice()).unwrap();

        assert_eq!(dds, read_back);
    }

    #[test]
    fn read_sizes_data_from_dimensions() {
        // The stored pitch is ignored in favor of the computed size.
        let mut dds = Dds::from_dxt1(8, 4, vec![0x77u8; 16]).unwrap();
        dds.header.pitch_or_linear_size = 4;

        let mut bytes = Vec::new();
        dds.write(&mut bytes).unwrap();
        let read_back = Dds::read(&mut bytes.as_slice()).unwrap();

        assert_eq!(16, read_back.data.len());
    }

    #[test]
    fn validate_reports_every_failure() {
        let mut dds = Dds::from_dxt1(8, 4, vec![0u8; 16]).unwrap();
        dds.magic = *b"DDSX";
        dds.header.width = 10;
        dds.header.size = 100;
        dds.header.pixel_format.size = 24;
        dds.header.pixel_format.flags = 0x40;
        dds.header.pixel_format.four_cc = *b"DXT5";

        let failures = dds.validate().unwrap_err().failures;
        assert_eq!(
            vec![
                ValidationError::WidthNotDivisibleByBlock { width: 10 },
                ValidationError::NotADds { magic: *b"DDSX" },
                ValidationError::InvalidHeaderSize { size: 100 },
                ValidationError::InvalidPixelFormatSize { size: 24 },
                ValidationError::UncompressedPixelFormat { flags: 0x40 },
                ValidationError::UnsupportedFourCc { four_cc: *b"DXT5" },
            ],
            failures
        );
    }

    #[test]
    fn validate_rejects_magic_missing_trailing_space() {
        let mut dds = Dds::from_dxt1(8, 4, vec![0u8; 16]).unwrap();
        dds.magic = *b"DDS\0";

        let failures = dds.validate().unwrap_err().failures;
        assert_eq!(
            vec![ValidationError::NotADds { magic: *b"DDS\0" }],
            failures
        );
    }

    #[test]
    fn read_rejects_invalid_header_without_reading_data() {
        let mut dds = Dds::from_dxt1(8, 4, vec![0u8; 16]).unwrap();
        dds.header.pixel_format.four_cc = *b"DXT3";

        let mut bytes = Vec::new();
        dds.write(&mut bytes).unwrap();

        let error = Dds::read(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(error, ReadError::Validation(_)));
    }
}
