//! Pointer events the input processor understands.

/// A pointer event, already detached from the windowing library.
///
/// The viewer translates winit events into these and hands them to
/// [`InputProcessor::handle_event`](super::InputProcessor::handle_event);
/// tests build them directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The cursor is now at this window position.
    CursorMoved {
        /// Physical pixels from the left edge.
        x: f32,
        /// Physical pixels from the top edge.
        y: f32,
    },
    /// A mouse button went down or up.
    MouseButton {
        /// The button.
        button: MouseButton,
        /// Down (`true`) or up (`false`).
        pressed: bool,
    },
    /// Wheel movement in lines; pixel-precise devices are scaled to lines
    /// by the caller.
    Scroll {
        /// Lines scrolled; positive zooms in.
        delta: f32,
    },
}

/// Mouse buttons the viewer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Drags rotate the camera.
    Left,
    /// Unused.
    Right,
    /// Unused.
    Middle,
    /// Back, forward and vendor buttons.
    Other,
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => Self::Left,
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            _ => Self::Other,
        }
    }
}
