//! Screenshot and recording front end used by the render loop.

use std::path::{Path, PathBuf};

use super::frame::CapturedFrame;
use super::output::OutputDir;
use super::reader::{FrameReader, FrameSource};
use super::worker::{EncodeJob, EncodeWorker, PendingExport};
use crate::encode::write_png;
use crate::error::GlimpseError;
use crate::options::CaptureOptions;

/// Frames gathered between `start_recording` and `stop_recording`.
#[derive(Debug)]
struct RecordingSession {
    frames: Vec<CapturedFrame>,
    frame_delay_ms: u32,
}

impl RecordingSession {
    fn new(frame_delay_ms: u32) -> Self {
        Self {
            frames: Vec::new(),
            frame_delay_ms,
        }
    }

    fn push(&mut self, frame: CapturedFrame) {
        if let Some(first) = self.frames.first() {
            if first.dimensions() != frame.dimensions() {
                let (w, h) = frame.dimensions();
                let (sw, sh) = first.dimensions();
                log::warn!(
                    "skipping {w}x{h} frame in a {sw}x{sh} recording"
                );
                return;
            }
        }
        log::debug!("captured frame {}", self.frames.len() + 1);
        self.frames.push(frame);
    }
}

#[derive(Debug)]
enum RecorderState {
    Idle,
    Recording(RecordingSession),
}

/// Owns the recording state machine, the output directory and the
/// background encoder.
///
/// All methods run on the render thread and never block on encoding.
/// Finished sessions are handed to the encoder thread by value, so a new
/// session can start while the previous one is still being written.
pub struct ScreenshotManager {
    output: OutputDir,
    frame_delay_ms: u32,
    loop_forever: bool,
    quantize_speed: i32,
    state: RecorderState,
    worker: EncodeWorker,
}

impl ScreenshotManager {
    /// Create an idle manager and start its encoder thread.
    ///
    /// The output directory is not created until something is written.
    ///
    /// # Errors
    ///
    /// Returns [`GlimpseError::ThreadSpawn`] if the encoder thread cannot
    /// be started.
    pub fn new(options: &CaptureOptions) -> Result<Self, GlimpseError> {
        Ok(Self {
            output: OutputDir::new(&options.output_dir),
            frame_delay_ms: options.frame_delay_ms,
            loop_forever: options.loop_forever,
            quantize_speed: options.quantize_speed,
            state: RecorderState::Idle,
            worker: EncodeWorker::new()?,
        })
    }

    /// Directory screenshots and animations are written into.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        self.output.root()
    }

    /// Whether a recording session is active.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Recording(_))
    }

    /// Frames captured so far in the active session (0 when idle).
    #[must_use]
    pub fn recorded_frames(&self) -> usize {
        match &self.state {
            RecorderState::Recording(session) => session.frames.len(),
            RecorderState::Idle => 0,
        }
    }

    /// Capture the current framebuffer to a timestamped PNG.
    ///
    /// Failures are logged and reported as `None`.
    pub fn take_screenshot(
        &mut self,
        source: &mut dyn FrameSource,
    ) -> Option<PathBuf> {
        match self.write_screenshot(source) {
            Ok(path) => {
                log::info!("Screenshot saved to {}", path.display());
                Some(path)
            }
            Err(e) => {
                log::error!("failed to take screenshot: {e}");
                None
            }
        }
    }

    fn write_screenshot(
        &mut self,
        source: &mut dyn FrameSource,
    ) -> Result<PathBuf, GlimpseError> {
        let frame = FrameReader::read(source)?;
        let path = self.output.next_path("screenshot", "png")?;
        write_png(&frame, &path)?;
        Ok(path)
    }

    /// Begin a new session. Does nothing if already recording.
    pub fn start_recording(&mut self) {
        if self.is_recording() {
            return;
        }
        self.state =
            RecorderState::Recording(RecordingSession::new(self.frame_delay_ms));
        log::info!("Recording started");
    }

    /// End the active session and queue it for encoding.
    ///
    /// Resolves to `Ok(None)` straight away when idle or when the session
    /// captured nothing.
    pub fn stop_recording(&mut self) -> PendingExport {
        let RecorderState::Recording(session) =
            std::mem::replace(&mut self.state, RecorderState::Idle)
        else {
            return PendingExport::ready(Ok(None));
        };
        log::info!("Recording stopped with {} frames", session.frames.len());

        if session.frames.is_empty() {
            log::info!("No frames to save");
            return PendingExport::ready(Ok(None));
        }

        let path = match self.output.next_path("animation", "gif") {
            Ok(path) => path,
            Err(e) => {
                log::error!("failed to prepare animation output: {e}");
                return PendingExport::ready(Err(e));
            }
        };
        self.worker.submit(EncodeJob {
            frames: session.frames,
            path,
            frame_delay_ms: session.frame_delay_ms,
            loop_forever: self.loop_forever,
            quantize_speed: self.quantize_speed,
        })
    }

    /// Start recording when idle, stop it otherwise.
    ///
    /// Returns the pending export when a session was stopped.
    pub fn toggle_recording(&mut self) -> Option<PendingExport> {
        if self.is_recording() {
            Some(self.stop_recording())
        } else {
            self.start_recording();
            None
        }
    }

    /// Append the current framebuffer to the active session.
    ///
    /// Ignored when idle. A failed read is logged and the session goes on.
    pub fn capture_frame(&mut self, source: &mut dyn FrameSource) {
        let RecorderState::Recording(session) = &mut self.state else {
            return;
        };
        match FrameReader::read(source) {
            Ok(frame) => session.push(frame),
            Err(e) => log::warn!("failed to capture frame: {e}"),
        }
    }

    /// Stop the encoder after it has written every queued session.
    ///
    /// An active session is discarded, not exported; call
    /// [`stop_recording`](Self::stop_recording) first to keep it.
    pub fn shutdown(&mut self) {
        if let RecorderState::Recording(session) =
            std::mem::replace(&mut self.state, RecorderState::Idle)
        {
            log::warn!(
                "discarding unsaved recording with {} frames",
                session.frames.len()
            );
        }
        self.worker.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::codecs::gif::GifDecoder;
    use image::AnimationDecoder;

    use super::*;
    use crate::capture::RawFrame;

    fn manager(dir: &Path) -> ScreenshotManager {
        let options = CaptureOptions {
            output_dir: dir.to_path_buf(),
            ..CaptureOptions::default()
        };
        ScreenshotManager::new(&options).unwrap()
    }

    /// A 2x2 bottom-up frame filled with one gray level.
    fn gray(shade: u8) -> impl FnMut() -> Result<RawFrame, GlimpseError> {
        move || {
            Ok(RawFrame::bottom_up(
                2,
                2,
                [shade, shade, shade, 255].repeat(4),
            ))
        }
    }

    #[test]
    fn starting_twice_keeps_one_empty_session() {
        let tmp = tempfile::tempdir().unwrap();
        let mut m = manager(tmp.path());
        m.start_recording();
        m.start_recording();
        assert!(m.is_recording());
        assert_eq!(m.recorded_frames(), 0);
    }

    #[test]
    fn stop_while_idle_is_a_no_op() {
        let tmp = tempfile::tempdir().unwrap();
        let mut m = manager(tmp.path().join("out").as_path());
        let mut pending = m.stop_recording();
        assert!(matches!(pending.try_take(), Some(Ok(None))));
        assert!(!m.is_recording());
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn empty_session_saves_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut m = manager(tmp.path());
        m.start_recording();
        assert_eq!(m.stop_recording().wait().unwrap(), None);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn capture_while_idle_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let mut m = manager(tmp.path());
        m.capture_frame(&mut gray(10));
        assert_eq!(m.recorded_frames(), 0);
    }

    #[test]
    fn frames_are_encoded_in_capture_order() {
        let tmp = tempfile::tempdir().unwrap();
        let mut m = manager(tmp.path());
        let shades = [0u8, 60, 120, 180, 240];

        m.start_recording();
        for shade in shades {
            m.capture_frame(&mut gray(shade));
        }
        assert_eq!(m.recorded_frames(), shades.len());

        let path = m.stop_recording().wait().unwrap().unwrap();
        assert!(!m.is_recording());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("animation_") && name.ends_with(".gif"));

        let bytes = std::fs::read(&path).unwrap();
        let frames = GifDecoder::new(Cursor::new(bytes))
            .unwrap()
            .into_frames()
            .collect_frames()
            .unwrap();
        assert_eq!(frames.len(), shades.len());
        for (frame, shade) in frames.iter().zip(shades) {
            assert_eq!(frame.buffer().get_pixel(1, 1).0, [shade, shade, shade, 255]);
        }
    }

    #[test]
    fn mismatched_frame_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let mut m = manager(tmp.path());
        m.start_recording();
        m.capture_frame(&mut gray(1));
        m.capture_frame(&mut || -> Result<RawFrame, GlimpseError> {
            Ok(RawFrame::bottom_up(1, 1, vec![0, 0, 0, 255]))
        });
        m.capture_frame(&mut gray(2));
        assert_eq!(m.recorded_frames(), 2);
    }

    #[test]
    fn failed_capture_keeps_session_running() {
        let tmp = tempfile::tempdir().unwrap();
        let mut m = manager(tmp.path());
        m.start_recording();
        m.capture_frame(&mut || -> Result<RawFrame, GlimpseError> {
            Err(GlimpseError::Readback("lost device".to_owned()))
        });
        m.capture_frame(&mut gray(3));
        assert!(m.is_recording());
        assert_eq!(m.recorded_frames(), 1);
    }

    #[test]
    fn next_session_starts_while_previous_encodes() {
        let tmp = tempfile::tempdir().unwrap();
        let mut m = manager(tmp.path());

        m.start_recording();
        m.capture_frame(&mut gray(50));
        let first = m.stop_recording();

        m.start_recording();
        assert_eq!(m.recorded_frames(), 0);
        m.capture_frame(&mut gray(90));
        m.capture_frame(&mut gray(90));
        let second = m.stop_recording();

        let a = first.wait().unwrap().unwrap();
        let b = second.wait().unwrap().unwrap();
        assert_ne!(a, b);
        assert!(a.is_file() && b.is_file());
    }

    #[test]
    fn toggle_alternates_states() {
        let tmp = tempfile::tempdir().unwrap();
        let mut m = manager(tmp.path());
        assert!(m.toggle_recording().is_none());
        assert!(m.is_recording());
        let pending = m.toggle_recording().unwrap();
        assert!(!m.is_recording());
        assert_eq!(pending.wait().unwrap(), None);
    }

    #[test]
    fn screenshot_writes_top_down_png() {
        let tmp = tempfile::tempdir().unwrap();
        let shots = tmp.path().join("shots");
        let mut m = manager(&shots);

        // Bottom row red, top row blue.
        let mut source = || -> Result<RawFrame, GlimpseError> {
            Ok(RawFrame::bottom_up(
                1,
                2,
                vec![255, 0, 0, 255, 0, 0, 255, 255],
            ))
        };
        let path = m.take_screenshot(&mut source).unwrap();
        assert_eq!(path.parent(), Some(shots.as_path()));

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(img.get_pixel(0, 1).0, [255, 0, 0, 255]);
    }

    #[test]
    fn screenshot_failure_returns_none() {
        let tmp = tempfile::tempdir().unwrap();
        let mut m = manager(tmp.path());
        let mut source = || -> Result<RawFrame, GlimpseError> {
            Ok(RawFrame::bottom_up(2, 2, vec![0; 3]))
        };
        assert!(m.take_screenshot(&mut source).is_none());
    }

    #[test]
    fn shutdown_waits_for_queued_exports() {
        let tmp = tempfile::tempdir().unwrap();
        let mut m = manager(tmp.path());
        m.start_recording();
        m.capture_frame(&mut gray(7));
        let pending = m.stop_recording();
        m.shutdown();
        assert!(pending.wait().unwrap().unwrap().is_file());
    }
}
