use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Window and presentation settings.
pub struct DisplayOptions {
    /// Initial window width in logical pixels.
    pub width: u32,
    /// Initial window height in logical pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
    /// Frame rate cap (0 = unlimited).
    pub target_fps: u32,
    /// Background color, linear RGBA.
    pub clear_color: [f64; 4],
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            title: "Glimpse".to_owned(),
            target_fps: 0,
            clear_color: [0.07, 0.13, 0.17, 1.0],
        }
    }
}

impl DisplayOptions {
    /// Width over height, falling back to 1 for a degenerate size.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}
