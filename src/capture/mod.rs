//! Frame capture: framebuffer readback, screenshots and GIF recording.
//!
//! The render loop hands a [`FrameSource`] to the [`ScreenshotManager`]
//! once per tick. [`FrameReader`] turns whatever the source returns into a
//! top-down [`CapturedFrame`]; the manager either writes it straight to a
//! PNG or appends it to the active recording. Stopping a recording moves
//! its frames to the background [`EncodeWorker`] and returns a
//! [`PendingExport`] the caller can poll or ignore.

/// Raw and reoriented pixel buffers.
pub mod frame;
/// Recording state machine and screenshot front end.
pub mod manager;
/// Timestamped output paths.
pub mod output;
/// Frame source trait and the reorienting reader.
pub mod reader;
/// Per-tick capture decimation.
pub mod throttle;
/// Background GIF encoding.
pub mod worker;

pub use frame::{flip_rows, CapturedFrame, RawFrame, RowOrigin, BYTES_PER_PIXEL};
pub use manager::ScreenshotManager;
pub use output::OutputDir;
pub use reader::{FrameReader, FrameSource};
pub use throttle::CaptureThrottle;
pub use worker::{EncodeJob, EncodeWorker, ExportResult, PendingExport};
