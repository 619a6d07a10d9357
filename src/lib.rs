// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![warn(unused_results)]
#![warn(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Test code may unwrap and panic freely
#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]

//! Interactive 3D viewer core with frame capture and GIF recording.
//!
//! Glimpse turns continuous user input into a stable view/projection
//! transform, and streams rendered frames into PNG screenshots or animated
//! GIF recordings without stalling the render loop.
//!
//! # Key entry points
//!
//! - [`camera::Camera`] - free-flying perspective camera
//! - [`capture::ScreenshotManager`] - screenshots and the recording state
//!   machine
//! - [`encode::SequenceEncoder`] - streaming GIF writer with loop control
//! - [`options::Options`] - runtime configuration (camera, capture,
//!   display, keybindings)
//! - `Viewer` - winit window running the whole pipeline (`viewer` feature)
//!
//! # Architecture
//!
//! Capture runs synchronously on the render thread: a
//! [`capture::FrameSource`] yields raw pixels, [`capture::FrameReader`]
//! reorients them top-down, and the manager either writes a PNG or appends
//! the frame to the active session. Stopping a session moves its frames to
//! a background encoder thread that writes the GIF in submission order and
//! reports back through a [`capture::PendingExport`].

pub mod camera;
pub mod capture;
pub mod encode;
pub mod error;
#[cfg(feature = "viewer")]
pub mod gpu;
pub mod input;
pub mod options;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use camera::Camera;
pub use capture::{CapturedFrame, FrameReader, FrameSource, ScreenshotManager};
pub use encode::SequenceEncoder;
pub use error::GlimpseError;
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
