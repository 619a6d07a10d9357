//! Shared utilities for the viewer.

/// Frame timing and FPS tracking.
pub mod frame_clock;

pub use frame_clock::FrameClock;
