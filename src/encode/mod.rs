//! Image encoders for captured frames.
//!
//! Stills go out as PNG; recording sessions become one animated GIF with
//! a uniform inter-frame delay.

/// Streaming animated GIF encoder with loop control.
pub mod sequence;
/// Single-frame PNG writer.
pub mod still;

pub use sequence::{LoopControl, SequenceEncoder};
pub use still::write_png;
