//! Converts raw platform events into viewer commands.
//!
//! The `InputProcessor` owns all transient input state (drag tracking,
//! last cursor position) and the key-binding map. It is the only thing
//! between raw window events and the viewer's command dispatch.

use glam::Vec2;

use super::command::{CameraCommand, ViewerCommand};
use super::event::{InputEvent, MouseButton};
use super::keyboard::KeyAction;
use crate::options::{CameraOptions, KeybindingOptions};

/// Converts raw window events into [`ViewerCommand`]s.
///
/// # Usage
///
/// ```ignore
/// if let Some(cmd) = input.handle_event(InputEvent::Scroll { delta: 1.0 }) {
///     viewer.execute(cmd);
/// }
/// if let Some(cmd) = input.handle_key("F2", false) {
///     viewer.execute(cmd);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct InputProcessor {
    key_bindings: KeybindingOptions,
    move_speed: f32,
    rotate_speed: f32,
    mouse_sensitivity: f32,
    zoom_step: f32,
    /// Whether the primary mouse button is currently held.
    dragging: bool,
    /// Cursor position at the previous drag event. `None` right after the
    /// press, so the first move only records where the drag starts.
    last_cursor: Option<Vec2>,
}

impl InputProcessor {
    /// Create a processor using the given speeds and key map.
    #[must_use]
    pub fn new(camera: &CameraOptions, key_bindings: KeybindingOptions) -> Self {
        Self {
            key_bindings,
            move_speed: camera.move_speed,
            rotate_speed: camera.rotate_speed,
            mouse_sensitivity: camera.mouse_sensitivity,
            zoom_step: camera.zoom_step,
            dragging: false,
            last_cursor: None,
        }
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeybindingOptions {
        &self.key_bindings
    }

    /// Whether a left-button drag is in progress.
    #[must_use]
    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// Look up a key press. `repeat` marks auto-repeat events from a held
    /// key, which only re-trigger camera motion.
    #[must_use]
    pub fn handle_key(&self, key: &str, repeat: bool) -> Option<ViewerCommand> {
        let action = self.key_bindings.lookup(key)?;
        if repeat && !action.repeats() {
            return None;
        }
        Some(self.command_for(action))
    }

    fn command_for(&self, action: KeyAction) -> ViewerCommand {
        let camera = match action {
            KeyAction::MoveForward => CameraCommand::Forward(self.move_speed),
            KeyAction::MoveBackward => CameraCommand::Backward(self.move_speed),
            KeyAction::MoveLeft => CameraCommand::Left(self.move_speed),
            KeyAction::MoveRight => CameraCommand::Right(self.move_speed),
            KeyAction::LookLeft => CameraCommand::Turn {
                yaw: self.rotate_speed,
                pitch: 0.0,
            },
            KeyAction::LookRight => CameraCommand::Turn {
                yaw: -self.rotate_speed,
                pitch: 0.0,
            },
            KeyAction::LookUp => CameraCommand::Turn {
                yaw: 0.0,
                pitch: -self.rotate_speed,
            },
            KeyAction::LookDown => CameraCommand::Turn {
                yaw: 0.0,
                pitch: self.rotate_speed,
            },
            KeyAction::ZoomIn => CameraCommand::Zoom(self.zoom_step),
            KeyAction::ZoomOut => CameraCommand::Zoom(-self.zoom_step),
            KeyAction::ResetCamera => CameraCommand::Reset,
            KeyAction::Screenshot => return ViewerCommand::Screenshot,
            KeyAction::ToggleRecording => return ViewerCommand::ToggleRecording,
            KeyAction::Quit => return ViewerCommand::Quit,
        };
        ViewerCommand::Camera(camera)
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<ViewerCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.handle_cursor_moved(Vec2::new(x, y))
            }
            InputEvent::MouseButton { button, pressed } => {
                if button == MouseButton::Left {
                    self.dragging = pressed;
                    self.last_cursor = None;
                }
                None
            }
            InputEvent::Scroll { delta } => Some(ViewerCommand::Camera(
                CameraCommand::Zoom(delta * self.zoom_step),
            )),
        }
    }

    /// Drag rotates: moving the cursor right turns right, moving it down
    /// tilts the view up.
    fn handle_cursor_moved(&mut self, pos: Vec2) -> Option<ViewerCommand> {
        if !self.dragging {
            return None;
        }
        let last = self.last_cursor.replace(pos)?;
        let delta = pos - last;
        if delta == Vec2::ZERO {
            return None;
        }
        Some(ViewerCommand::Camera(CameraCommand::Turn {
            yaw: -delta.x * self.mouse_sensitivity,
            pitch: -delta.y * self.mouse_sensitivity,
        }))
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new(&CameraOptions::default(), KeybindingOptions::default())
    }
}
