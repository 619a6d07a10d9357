//! Crate-level error types.

use std::fmt;

#[cfg(feature = "viewer")]
use crate::gpu::render_context::RenderContextError;

/// Errors produced by the glimpse crate.
#[derive(Debug)]
pub enum GlimpseError {
    /// GPU context initialization failure.
    #[cfg(feature = "viewer")]
    Gpu(RenderContextError),
    /// Generic I/O failure (output directory, file writes).
    Io(std::io::Error),
    /// PNG encoder failure.
    Encode(image::ImageError),
    /// GIF sequence encoder failure, including sink writes.
    GifEncode(gif::EncodingError),
    /// Pixel buffer does not match its declared dimensions, or a frame
    /// does not match the sequence it is written into.
    InvalidFrame(String),
    /// Reading pixels back from the GPU failed.
    Readback(String),
    /// The background encode worker is no longer running.
    WorkerUnavailable,
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for GlimpseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "viewer")]
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Encode(e) => write!(f, "encode error: {e}"),
            Self::GifEncode(e) => write!(f, "GIF encode error: {e}"),
            Self::InvalidFrame(msg) => write!(f, "invalid frame: {msg}"),
            Self::Readback(msg) => write!(f, "readback error: {msg}"),
            Self::WorkerUnavailable => {
                write!(f, "encode worker is not running")
            }
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for GlimpseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "viewer")]
            Self::Gpu(e) => Some(e),
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            Self::Encode(e) => Some(e),
            Self::GifEncode(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "viewer")]
impl From<RenderContextError> for GlimpseError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for GlimpseError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<image::ImageError> for GlimpseError {
    fn from(e: image::ImageError) -> Self {
        Self::Encode(e)
    }
}

impl From<gif::EncodingError> for GlimpseError {
    fn from(e: gif::EncodingError) -> Self {
        Self::GifEncode(e)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn io_errors_keep_their_source() {
        let err = GlimpseError::from(std::io::Error::other("disk full"));
        assert!(err.to_string().contains("disk full"));
        assert!(err.source().is_some());
    }

    #[test]
    fn worker_unavailable_has_no_source() {
        let err = GlimpseError::WorkerUnavailable;
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "encode worker is not running");
    }
}
