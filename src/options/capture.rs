use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Screenshot and recording parameters.
pub struct CaptureOptions {
    /// Directory screenshots and animations are written into. Created on
    /// first use.
    pub output_dir: PathBuf,
    /// Delay between animation frames in milliseconds.
    pub frame_delay_ms: u32,
    /// Record every Nth rendered frame.
    pub capture_interval: u32,
    /// Loop the animation forever instead of playing it once.
    pub loop_forever: bool,
    /// GIF color quantizer speed, 1 (best) to 30 (fastest). Only frames
    /// with more than 256 colors are quantized.
    pub quantize_speed: i32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("screenshots"),
            frame_delay_ms: 50,
            capture_interval: 2,
            loop_forever: true,
            quantize_speed: 10,
        }
    }
}
