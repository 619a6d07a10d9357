//! Pixel buffer types and row reorientation.

use crate::error::GlimpseError;

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Which corner the first row of a raw framebuffer starts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOrigin {
    /// First row is the bottom of the image (OpenGL `glReadPixels`).
    #[default]
    BottomLeft,
    /// First row is the top of the image (wgpu texture copies).
    TopLeft,
}

/// Framebuffer contents exactly as the graphics backend produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 rows.
    pub pixels: Vec<u8>,
    /// Row order of `pixels`.
    pub origin: RowOrigin,
}

impl RawFrame {
    /// Wrap a bottom-up RGBA8 buffer.
    #[must_use]
    pub fn bottom_up(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
            origin: RowOrigin::BottomLeft,
        }
    }

    /// Wrap a top-down RGBA8 buffer.
    #[must_use]
    pub fn top_down(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
            origin: RowOrigin::TopLeft,
        }
    }
}

/// A top-down RGBA8 image ready for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl CapturedFrame {
    /// Wrap a top-down RGBA8 buffer, checking its length.
    ///
    /// # Errors
    ///
    /// Returns [`GlimpseError::InvalidFrame`] if `pixels` is not exactly
    /// `width * height * 4` bytes.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, GlimpseError> {
        check_len(width, height, pixels.len())?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// RGBA8 bytes, top row first.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Give up ownership of the pixel bytes.
    #[must_use]
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// The same image mirrored top to bottom.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            pixels: flip_rows(&self.pixels, self.width as usize),
        }
    }
}

fn check_len(width: u32, height: u32, len: usize) -> Result<(), GlimpseError> {
    let expected = width as usize * height as usize * BYTES_PER_PIXEL;
    if len == expected {
        Ok(())
    } else {
        Err(GlimpseError::InvalidFrame(format!(
            "{width}x{height} RGBA needs {expected} bytes, got {len}"
        )))
    }
}

/// Reverse the row order of a tightly packed RGBA8 buffer.
///
/// Output row `y` is input row `height - 1 - y`. Columns and channel order
/// are untouched.
#[must_use]
pub fn flip_rows(pixels: &[u8], width: usize) -> Vec<u8> {
    let row_len = width * BYTES_PER_PIXEL;
    if row_len == 0 {
        return pixels.to_vec();
    }
    let mut out = Vec::with_capacity(pixels.len());
    for row in pixels.chunks_exact(row_len).rev() {
        out.extend_from_slice(row);
    }
    out
}

impl TryFrom<RawFrame> for CapturedFrame {
    type Error = GlimpseError;

    fn try_from(raw: RawFrame) -> Result<Self, Self::Error> {
        check_len(raw.width, raw.height, raw.pixels.len())?;
        let pixels = match raw.origin {
            RowOrigin::TopLeft => raw.pixels,
            RowOrigin::BottomLeft => flip_rows(&raw.pixels, raw.width as usize),
        };
        Ok(Self {
            width: raw.width,
            height: raw.height,
            pixels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Image whose pixels encode their own row and column.
    fn gradient(width: u32, height: u32) -> Vec<u8> {
        let mut px = Vec::new();
        for y in 0..height {
            for x in 0..width {
                px.extend_from_slice(&[y as u8, x as u8, 100 + y as u8, 255]);
            }
        }
        px
    }

    #[test]
    fn bottom_up_rows_are_reversed() {
        let raw = RawFrame::bottom_up(2, 3, gradient(2, 3));
        let frame = CapturedFrame::try_from(raw.clone()).unwrap();
        for y in 0..3usize {
            let src = 2 - y;
            let out_row = &frame.pixels()[y * 8..(y + 1) * 8];
            let in_row = &raw.pixels[src * 8..(src + 1) * 8];
            assert_eq!(out_row, in_row);
        }
    }

    #[test]
    fn no_horizontal_flip_or_channel_swap() {
        let raw = RawFrame::bottom_up(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        let frame = CapturedFrame::try_from(raw).unwrap();
        assert_eq!(frame.pixels(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn top_down_source_is_left_alone() {
        let px = gradient(3, 2);
        let frame =
            CapturedFrame::try_from(RawFrame::top_down(3, 2, px.clone()))
                .unwrap();
        assert_eq!(frame.pixels(), px.as_slice());
    }

    #[test]
    fn flipping_twice_is_identity() {
        let frame = CapturedFrame::new(4, 5, gradient(4, 5)).unwrap();
        assert_eq!(frame.flipped().flipped(), frame);
        assert_ne!(frame.flipped(), frame);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let raw = RawFrame::bottom_up(2, 2, vec![0; 15]);
        let err = CapturedFrame::try_from(raw).unwrap_err();
        assert!(matches!(err, GlimpseError::InvalidFrame(_)));
        assert!(CapturedFrame::new(1, 1, vec![0; 3]).is_err());
    }

    #[test]
    fn empty_frame_is_valid() {
        let frame =
            CapturedFrame::try_from(RawFrame::bottom_up(0, 0, Vec::new()))
                .unwrap();
        assert!(frame.pixels().is_empty());
    }
}
