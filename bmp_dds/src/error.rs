use thiserror::Error;

/// Errors from surface level encoding and decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("surface dimensions {width} x {height} contain no pixels")]
    ZeroSizedSurface { width: u32, height: u32 },

    #[error("surface pixel count {width} x {height} would overflow")]
    PixelCountWouldOverflow { width: u32, height: u32 },

    #[error("surface dimensions {width} x {height} are not divisible by the block dimensions 4 x 4")]
    NonIntegralDimensionsInBlocks { width: u32, height: u32 },

    #[error("expected surface to have at least {expected} bytes but found {actual}")]
    NotEnoughData { expected: usize, actual: usize },

    #[error("pixel data length {length} is not a multiple of 3")]
    InvalidPixelDataLength { length: usize },

    #[error("block at {x} x {y} could not be decoded")]
    CorruptBlock {
        x: u32,
        y: u32,
        source: bc1_rs::DecodeBlockError,
    },
}

/// A single failed structural check on a container header.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("image width {width} is not divisible by 4")]
    WidthNotDivisibleByBlock { width: i64 },

    #[error("image height {height} is not divisible by 4")]
    HeightNotDivisibleByBlock { height: i64 },

    #[error("file magic {magic:?} does not match the BMP signature \"BM\"")]
    NotABmp { magic: [u8; 2] },

    #[error("expected 24 bits per pixel but found {bits_per_pixel}")]
    UnsupportedBitDepth { bits_per_pixel: u16 },

    #[error("file magic {magic:?} does not match the DDS signature \"DDS \"")]
    NotADds { magic: [u8; 4] },

    #[error("header size {size} does not match the expected 124")]
    InvalidHeaderSize { size: u32 },

    #[error("pixel format size {size} does not match the expected 32")]
    InvalidPixelFormatSize { size: u32 },

    #[error("pixel format flags {flags:#x} do not indicate compressed data")]
    UncompressedPixelFormat { flags: u32 },

    #[error("four character code {four_cc:?} is not DXT1")]
    UnsupportedFourCc { four_cc: [u8; 4] },
}

/// Every check that failed while validating a container header.
///
/// Checks do not short circuit, so all problems with an image are
/// reported at once.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("image failed {} validation check(s)", .failures.len())]
pub struct ValidationFailures {
    pub failures: Vec<ValidationError>,
}

/// Errors from reading a container file into memory.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("error reading image file")]
    Io(#[from] std::io::Error),

    #[error("image failed validation")]
    Validation(#[from] ValidationFailures),

    #[error("error sizing image data")]
    Surface(#[from] SurfaceError),
}

/// Errors from converting between the two containers.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("image failed validation")]
    Validation(#[from] ValidationFailures),

    #[error("error converting surface")]
    Surface(#[from] SurfaceError),
}
