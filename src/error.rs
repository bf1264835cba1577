//! Error types for the detector library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum Error {
    /// Image width or height is zero.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Pixel buffer length does not match the RGBA layout.
    #[error("pixel buffer holds {actual} bytes, expected 4*{width}*{height} = {expected}")]
    BufferMismatch {
        actual: usize,
        expected: usize,
        width: usize,
        height: usize,
    },

    /// A scalar parameter is outside its documented range.
    #[error("invalid parameter {name} = {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Cascade data is missing the two-value base-window header.
    #[error("cascade holds {len} values, expected at least 2")]
    CascadeTooShort { len: usize },

    /// The tracker has no cascade registered under this name.
    #[error("unknown cascade '{0}'")]
    UnknownCascade(String),

    /// Image decoding failed
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// File I/O operation failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results with our Error type.
pub type Result<T> = std::result::Result<T, Error>;
