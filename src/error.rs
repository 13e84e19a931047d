use thiserror::Error;

/// Errors raised while configuring, running or exporting a turmite run.
///
/// None of these are recoverable: every variant ends the run.
#[derive(Debug, Error)]
pub enum TurmiteError {
    /// Palette size outside what 8-bit grayscale can encode losslessly
    #[error("palette size {size} is out of range (expected 2..=256)")]
    InvalidPaletteSize { size: usize },

    /// Two color indices would render to the same pixel value
    #[error("palette indices {first} and {second} both map to intensity {value}")]
    NonInjectivePalette { first: usize, second: usize, value: u8 },

    #[error("grid size {width}x{height} is invalid")]
    InvalidGridSize { width: i32, height: i32 },

    #[error("start position ({x}, {y}) lies outside the grid")]
    StartOutOfBounds { x: i32, y: i32 },

    #[error("coordinate ({x}, {y}) is out of bounds")]
    OutOfBounds { x: i32, y: i32 },

    /// Cell holds an index the palette does not define
    #[error("cell ({x}, {y}) holds index {index}, palette has {palette_size} colors")]
    CellOutOfPalette { x: i32, y: i32, index: u8, palette_size: usize },

    /// Pixel value read back from an image has no palette entry
    #[error("pixel at ({x}, {y}) has color {rgba:?} which is not in the palette")]
    ColorNotInPalette { x: i32, y: i32, rgba: [u8; 4] },

    #[error("image is {actual_width}x{actual_height}, expected {width}x{height}")]
    ImageSizeMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("unsupported image layout: {0}")]
    UnsupportedImage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("png encoding failed: {0}")]
    PngEncoding(#[from] png::EncodingError),

    #[error("png decoding failed: {0}")]
    PngDecoding(#[from] png::DecodingError),

    #[error("summary serialization failed: {0}")]
    Summary(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TurmiteError>;
