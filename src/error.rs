use alloc::string::String;
use enough::StopReason;

/// Errors from planar codec and IFF container operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FormError {
    #[error("unrecognized container: not an IFF FORM")]
    UnrecognizedForm,

    #[error("invalid chunk: {0}")]
    InvalidChunk(String),

    #[error("unsupported variant: {0}")]
    UnsupportedVariant(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("cursor out of bounds: offset {offset} in {len}-byte buffer")]
    OutOfBounds { offset: usize, len: usize },

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("width {0} is not a multiple of 16")]
    UnalignedWidth(u32),

    #[error("color {value:#010x} not present in palette")]
    ColorNotFound { value: u32 },

    #[error("palette entry {index} is unset or out of range")]
    BadPaletteIndex { index: usize },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for FormError {
    fn from(r: StopReason) -> Self {
        FormError::Cancelled(r)
    }
}
