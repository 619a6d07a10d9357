//! Single-frame PNG output.

use std::path::Path;

use image::{ColorType, ImageFormat};

use crate::capture::CapturedFrame;
use crate::error::GlimpseError;

/// Write `frame` to `path` as an RGBA PNG.
///
/// # Errors
///
/// Returns [`GlimpseError::Encode`] if the PNG encoder or the file write
/// fails.
pub fn write_png(frame: &CapturedFrame, path: &Path) -> Result<(), GlimpseError> {
    image::save_buffer_with_format(
        path,
        frame.pixels(),
        frame.width(),
        frame.height(),
        ColorType::Rgba8,
        ImageFormat::Png,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trips_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        let pixels: Vec<u8> = (0..2 * 2 * 4).map(|i| i as u8 * 10).collect();
        let frame = CapturedFrame::new(2, 2, pixels.clone()).unwrap();

        write_png(&frame, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.into_raw(), pixels);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("shot.png");
        let frame = CapturedFrame::new(1, 1, vec![0, 0, 0, 255]).unwrap();
        assert!(write_png(&frame, &path).is_err());
    }
}
