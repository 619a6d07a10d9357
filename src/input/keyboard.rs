//! Bindable key actions.

use serde::{Deserialize, Serialize};

/// Viewer actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML files stay readable:
/// ```toml
/// [keybindings.bindings]
/// screenshot = "F2"
/// toggle_recording = "F3"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Move along the view direction.
    MoveForward,
    /// Move against the view direction.
    MoveBackward,
    /// Strafe left.
    MoveLeft,
    /// Strafe right.
    MoveRight,
    /// Turn left about world up.
    LookLeft,
    /// Turn right about world up.
    LookRight,
    /// Tilt the view up.
    LookUp,
    /// Tilt the view down.
    LookDown,
    /// Narrow the field of view.
    ZoomIn,
    /// Widen the field of view.
    ZoomOut,
    /// Restore the starting position, orientation and zoom.
    ResetCamera,
    /// Save the current frame as a PNG.
    Screenshot,
    /// Start or stop GIF recording.
    ToggleRecording,
    /// Close the viewer.
    Quit,
}

impl KeyAction {
    /// Whether holding the key should keep applying the action.
    ///
    /// Camera motion repeats; one-shot actions fire once per press.
    #[must_use]
    pub fn repeats(self) -> bool {
        !matches!(
            self,
            Self::ResetCamera | Self::Screenshot | Self::ToggleRecording | Self::Quit
        )
    }
}
