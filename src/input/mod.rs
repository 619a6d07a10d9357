//! Input handling: event types, key actions, and the input processor
//! that converts raw window events into viewer commands.

/// Commands produced by input and applied by the viewer.
pub mod command;
/// Platform-agnostic input events.
pub mod event;
/// Bindable key actions.
pub mod keyboard;
/// Converts raw events into viewer commands.
pub mod processor;

pub use command::{CameraCommand, ViewerCommand};
pub use event::{InputEvent, MouseButton};
pub use keyboard::KeyAction;
pub use processor::InputProcessor;
