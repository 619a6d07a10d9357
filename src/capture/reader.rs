//! Framebuffer extraction.

use super::frame::{CapturedFrame, RawFrame};
use crate::error::GlimpseError;

/// Anything that can hand over the pixels of the frame just rendered.
///
/// The renderer owns the implementation; capture code only sees this
/// trait, so the same recording logic works with a GPU readback, an
/// offscreen software target or a canned buffer in tests.
pub trait FrameSource {
    /// Read the current framebuffer.
    ///
    /// # Errors
    ///
    /// Implementations return an error when pixels cannot be read back.
    fn read_framebuffer(&mut self) -> Result<RawFrame, GlimpseError>;
}

impl<F> FrameSource for F
where
    F: FnMut() -> Result<RawFrame, GlimpseError>,
{
    fn read_framebuffer(&mut self) -> Result<RawFrame, GlimpseError> {
        self()
    }
}

/// Pulls a frame from a [`FrameSource`] and reorients it top-down.
pub struct FrameReader;

impl FrameReader {
    /// Read one frame and return it in top-down row order.
    ///
    /// # Errors
    ///
    /// Propagates source failures and returns
    /// [`GlimpseError::InvalidFrame`] when the buffer length does not
    /// match the reported dimensions.
    pub fn read(
        source: &mut dyn FrameSource,
    ) -> Result<CapturedFrame, GlimpseError> {
        let raw = source.read_framebuffer()?;
        log::debug!(
            "read {}x{} framebuffer ({:?})",
            raw.width,
            raw.height,
            raw.origin
        );
        CapturedFrame::try_from(raw)
    }
}
