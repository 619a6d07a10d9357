//! Streaming animated GIF encoder.
//!
//! Every frame carries the same Graphic Control Extension: the session
//! delay, disposal "unspecified" (0), no user-input wait and no
//! transparent index. Fully transparent pixels are forced opaque before
//! quantization so the palette never gains a transparent entry.

use std::io::Write;

use gif::{DisposalMethod, Encoder, Extension, Repeat};

use crate::capture::CapturedFrame;
use crate::error::GlimpseError;

/// NeuQuant speed used when none is configured; 1 is slowest and best,
/// 30 fastest.
pub const DEFAULT_QUANTIZE_SPEED: i32 = 10;

const COMMENT: &[u8] = b"Created by glimpse";

/// NETSCAPE2.0 application-extension loop block.
///
/// Serialized as `{0x01, loop_low, loop_high}`; a count of 0 means loop
/// forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopControl {
    count: u16,
}

impl LoopControl {
    /// Play the animation endlessly.
    pub const FOREVER: Self = Self { count: 0 };
    /// Play the animation a single time.
    pub const ONCE: Self = Self { count: 1 };

    /// Pick [`Self::FOREVER`] or [`Self::ONCE`].
    #[must_use]
    pub const fn from_flag(loop_forever: bool) -> Self {
        if loop_forever {
            Self::FOREVER
        } else {
            Self::ONCE
        }
    }

    /// Loop count stored in the block (0 = forever).
    #[must_use]
    pub const fn count(self) -> u16 {
        self.count
    }

    /// The three data bytes of the loop sub-block.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 3] {
        [0x01, (self.count & 0xFF) as u8, (self.count >> 8) as u8]
    }

    const fn repeat(self) -> Repeat {
        match self.count {
            0 => Repeat::Infinite,
            n => Repeat::Finite(n),
        }
    }
}

fn aborted() -> GlimpseError {
    GlimpseError::Io(std::io::Error::other(
        "GIF sequence aborted by an earlier write failure",
    ))
}

/// The sink before the first frame fixes the logical screen size, and the
/// open encoder after.
enum Stream<W: Write> {
    Pending(W),
    Open(Encoder<W>),
    Failed,
}

/// Writes a sequence of [`CapturedFrame`]s into one animated GIF.
///
/// Every frame shares the same delay, has no transparency, and must have
/// the dimensions of the first frame written. The header, loop block and
/// comment are written together with the first frame. Any error leaves
/// the output incomplete; callers should discard it rather than retry.
pub struct SequenceEncoder<W: Write> {
    stream: Stream<W>,
    delay_cs: u16,
    loop_control: LoopControl,
    speed: i32,
    size: Option<(u32, u32)>,
    frames_written: usize,
}

impl<W: Write> SequenceEncoder<W> {
    /// Start a sequence on `sink`.
    ///
    /// `frame_delay_ms` is stored with GIF centisecond resolution
    /// (`frame_delay_ms / 10`, saturating at `u16::MAX`).
    #[must_use]
    pub fn new(sink: W, frame_delay_ms: u32, loop_forever: bool) -> Self {
        Self {
            stream: Stream::Pending(sink),
            delay_cs: u16::try_from(frame_delay_ms / 10).unwrap_or(u16::MAX),
            loop_control: LoopControl::from_flag(loop_forever),
            speed: DEFAULT_QUANTIZE_SPEED,
            size: None,
            frames_written: 0,
        }
    }

    /// Set the NeuQuant speed for frames with more than 256 colors,
    /// clamped to `1..=30`.
    #[must_use]
    pub fn with_quantize_speed(mut self, speed: i32) -> Self {
        self.speed = speed.clamp(1, 30);
        self
    }

    /// Loop block configured for this sequence.
    #[must_use]
    pub const fn loop_control(&self) -> LoopControl {
        self.loop_control
    }

    /// Per-frame delay in GIF centiseconds.
    #[must_use]
    pub const fn delay_centis(&self) -> u16 {
        self.delay_cs
    }

    /// Quantizer speed in use.
    #[must_use]
    pub const fn quantize_speed(&self) -> i32 {
        self.speed
    }

    /// Number of frames appended so far.
    #[must_use]
    pub const fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// Append one frame.
    ///
    /// # Errors
    ///
    /// Returns [`GlimpseError::InvalidFrame`] if the frame's size differs
    /// from the first frame or does not fit a GIF,
    /// [`GlimpseError::GifEncode`] on encoder or sink failure, or
    /// [`GlimpseError::Io`] once an earlier write has failed.
    pub fn write_frame(
        &mut self,
        frame: &CapturedFrame,
    ) -> Result<(), GlimpseError> {
        let dims = frame.dimensions();
        if let Some(size) = self.size.filter(|&size| size != dims) {
            return Err(GlimpseError::InvalidFrame(format!(
                "frame is {}x{} but sequence is {}x{}",
                dims.0, dims.1, size.0, size.1
            )));
        }
        let (Ok(width), Ok(height)) =
            (u16::try_from(dims.0), u16::try_from(dims.1))
        else {
            return Err(GlimpseError::InvalidFrame(format!(
                "{}x{} exceeds the GIF size limit",
                dims.0, dims.1
            )));
        };

        let mut pixels = frame.pixels().to_vec();
        for alpha in pixels.iter_mut().skip(3).step_by(4) {
            *alpha = 0xFF;
        }
        let mut gif_frame =
            gif::Frame::from_rgba_speed(width, height, &mut pixels, self.speed);
        gif_frame.delay = self.delay_cs;
        gif_frame.dispose = DisposalMethod::Any;
        gif_frame.transparent = None;
        gif_frame.needs_user_input = false;

        let encoder = self.open(width, height)?;
        let written = encoder.write_frame(&gif_frame);
        if written.is_err() {
            self.stream = Stream::Failed;
        }
        written?;
        self.size = Some(dims);
        self.frames_written += 1;
        Ok(())
    }

    /// Write the header, loop block and comment on first use.
    fn open(
        &mut self,
        width: u16,
        height: u16,
    ) -> Result<&mut Encoder<W>, GlimpseError> {
        let stream = std::mem::replace(&mut self.stream, Stream::Failed);
        self.stream = match stream {
            Stream::Pending(sink) => {
                let mut encoder = Encoder::new(sink, width, height, &[])?;
                encoder.set_repeat(self.loop_control.repeat())?;
                encoder
                    .write_raw_extension(Extension::Comment.into(), &[COMMENT])?;
                Stream::Open(encoder)
            }
            other => other,
        };
        match &mut self.stream {
            Stream::Open(encoder) => Ok(encoder),
            _ => Err(aborted()),
        }
    }

    /// Write the trailer and hand back the sink.
    ///
    /// A sequence closed before any frame was written produces no output
    /// at all. Buffering sinks still need a flush by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`GlimpseError::GifEncode`] if the trailer cannot be
    /// written, or [`GlimpseError::Io`] if an earlier write already
    /// failed.
    pub fn close(self) -> Result<W, GlimpseError> {
        log::debug!(
            "closing GIF sequence after {} frames",
            self.frames_written
        );
        match self.stream {
            Stream::Pending(sink) => Ok(sink),
            Stream::Open(encoder) => Ok(encoder.into_inner()?),
            Stream::Failed => Err(aborted()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::codecs::gif::GifDecoder;
    use image::AnimationDecoder;

    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> CapturedFrame {
        let pixels = rgba.repeat((width * height) as usize);
        CapturedFrame::new(width, height, pixels).unwrap()
    }

    fn encode(frames: &[CapturedFrame], loop_forever: bool) -> Vec<u8> {
        let mut enc = SequenceEncoder::new(Vec::new(), 50, loop_forever);
        for f in frames {
            enc.write_frame(f).unwrap();
        }
        enc.close().unwrap()
    }

    fn loop_block(gif: &[u8]) -> Option<[u8; 3]> {
        let tag = b"NETSCAPE2.0";
        let at = gif.windows(tag.len()).position(|w| w == tag)?;
        // sub-block length byte, then the three loop bytes
        let data = gif.get(at + tag.len() + 1..at + tag.len() + 4)?;
        Some([data[0], data[1], data[2]])
    }

    /// `(packed flags, delay)` of every Graphic Control Extension.
    fn control_blocks(gif: &[u8]) -> Vec<(u8, u16)> {
        gif.windows(6)
            .filter(|w| w[..3] == [0x21, 0xF9, 0x04])
            .map(|w| (w[3], u16::from_le_bytes([w[4], w[5]])))
            .collect()
    }

    /// Sink that fails once `budget` bytes have been accepted.
    struct Limited {
        written: Vec<u8>,
        budget: usize,
    }

    impl Write for Limited {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.written.len() + buf.len() > self.budget {
                return Err(std::io::Error::other("disk full"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn loop_control_bytes() {
        assert_eq!(LoopControl::FOREVER.to_bytes(), [0x01, 0x00, 0x00]);
        assert_eq!(LoopControl::ONCE.to_bytes(), [0x01, 0x01, 0x00]);
        assert_eq!(LoopControl::from_flag(true), LoopControl::FOREVER);
        assert_eq!(LoopControl::from_flag(false), LoopControl::ONCE);
    }

    #[test]
    fn loop_block_is_written_to_stream() {
        let frames = [solid(2, 2, [255, 0, 0, 255])];
        assert_eq!(
            loop_block(&encode(&frames, true)),
            Some(LoopControl::FOREVER.to_bytes())
        );
        assert_eq!(
            loop_block(&encode(&frames, false)),
            Some(LoopControl::ONCE.to_bytes())
        );
    }

    #[test]
    fn delay_is_stored_in_centiseconds() {
        let enc = SequenceEncoder::new(Vec::new(), 55, true);
        assert_eq!(enc.delay_centis(), 5);
        let enc = SequenceEncoder::new(Vec::new(), u32::MAX, true);
        assert_eq!(enc.delay_centis(), u16::MAX);
    }

    #[test]
    fn every_frame_has_plain_control_extension() {
        let mut with_hole = [10, 20, 30, 255].repeat(4);
        with_hole[3] = 0;
        let frames = [
            solid(2, 2, [10, 20, 30, 255]),
            CapturedFrame::new(2, 2, with_hole).unwrap(),
            solid(2, 2, [40, 50, 60, 0]),
        ];
        let blocks = control_blocks(&encode(&frames, true));
        assert_eq!(blocks.len(), frames.len());
        for (packed, delay) in blocks {
            assert_eq!((packed >> 2) & 0b111, 0, "disposal method");
            assert_eq!(packed & 0b10, 0, "user input flag");
            assert_eq!(packed & 0b01, 0, "transparent color flag");
            assert_eq!(delay, 5);
        }
    }

    #[test]
    fn transparent_pixels_decode_opaque() {
        let gif = encode(&[solid(2, 2, [40, 50, 60, 0])], true);
        let decoded = GifDecoder::new(Cursor::new(gif))
            .unwrap()
            .into_frames()
            .collect_frames()
            .unwrap();
        assert_eq!(decoded[0].buffer().get_pixel(1, 1).0, [40, 50, 60, 255]);
    }

    #[test]
    fn comment_and_trailer_are_written() {
        let gif = encode(&[solid(2, 2, [1, 2, 3, 255])], true);
        let at = gif.windows(2).position(|w| w == [0x21, 0xFE]).unwrap();
        assert_eq!(usize::from(gif[at + 2]), COMMENT.len());
        assert_eq!(&gif[at + 3..at + 3 + COMMENT.len()], COMMENT);
        assert_eq!(gif.last(), Some(&0x3B));
    }

    #[test]
    fn closing_empty_sequence_writes_nothing() {
        let sink = SequenceEncoder::new(Vec::new(), 50, true).close().unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn quantize_speed_is_clamped() {
        let enc = SequenceEncoder::new(Vec::new(), 50, true);
        assert_eq!(enc.quantize_speed(), DEFAULT_QUANTIZE_SPEED);
        assert_eq!(enc.with_quantize_speed(0).quantize_speed(), 1);
        let enc = SequenceEncoder::new(Vec::new(), 50, true);
        assert_eq!(enc.with_quantize_speed(99).quantize_speed(), 30);
    }

    #[test]
    fn frames_decode_in_order() {
        let colors = [
            [255, 0, 0, 255],
            [0, 255, 0, 255],
            [0, 0, 255, 255],
            [255, 255, 255, 255],
        ];
        let frames: Vec<_> = colors.iter().map(|c| solid(3, 2, *c)).collect();
        let gif = encode(&frames, true);

        let decoded = GifDecoder::new(Cursor::new(gif))
            .unwrap()
            .into_frames()
            .collect_frames()
            .unwrap();
        assert_eq!(decoded.len(), colors.len());
        for (frame, color) in decoded.iter().zip(colors) {
            assert_eq!(frame.buffer().dimensions(), (3, 2));
            assert_eq!(frame.buffer().get_pixel(0, 0).0, color);
            let (numer, denom) = frame.delay().numer_denom_ms();
            assert_eq!(numer / denom, 50);
        }
    }

    #[test]
    fn mismatched_frame_size_is_rejected() {
        let mut enc = SequenceEncoder::new(Vec::new(), 50, true);
        enc.write_frame(&solid(2, 2, [0, 0, 0, 255])).unwrap();
        let err = enc.write_frame(&solid(3, 2, [0, 0, 0, 255])).unwrap_err();
        assert!(matches!(err, GlimpseError::InvalidFrame(_)));
        assert_eq!(enc.frames_written(), 1);
    }

    #[test]
    fn failing_sink_surfaces_error() {
        let sink = Limited {
            written: Vec::new(),
            budget: 0,
        };
        let mut enc = SequenceEncoder::new(sink, 50, true);
        let err = enc.write_frame(&solid(2, 2, [9, 9, 9, 255])).unwrap_err();
        assert!(matches!(err, GlimpseError::GifEncode(_)));

        let err = enc.write_frame(&solid(2, 2, [9, 9, 9, 255])).unwrap_err();
        assert!(matches!(err, GlimpseError::Io(_)));
        assert!(enc.close().is_err());
    }

    #[test]
    fn trailer_write_failure_is_reported() {
        let frame = solid(2, 2, [7, 7, 7, 255]);
        let full = encode(std::slice::from_ref(&frame), true);

        // room for everything except the one-byte trailer
        let sink = Limited {
            written: Vec::new(),
            budget: full.len() - 1,
        };
        let mut enc = SequenceEncoder::new(sink, 50, true);
        enc.write_frame(&frame).unwrap();
        let err = enc.close().map(|_| ()).unwrap_err();
        assert!(matches!(err, GlimpseError::GifEncode(_)));
    }
}
