use thiserror::Error;

use crate::PixelFormat;

#[derive(Debug, Error)]
pub enum HashingError {
    #[error("image decode failed: {0}")]
    Decode(String),

    #[error("pixel buffer holds {actual} bytes, {width}x{height} {format:?} needs {expected}")]
    FrameSize {
        width: u32,
        height: u32,
        format: PixelFormat,
        expected: usize,
        actual: usize,
    },

    #[error("no face found: {0}")]
    NoFace(String),
}
