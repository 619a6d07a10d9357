//! Camera system for 3D scene viewing.
//!
//! Provides a free-flying perspective camera driven by movement, rotation
//! and zoom commands, plus the uniform type used to upload its matrix.

/// Core camera state, transforms and GPU uniform type.
pub mod core;

pub use self::core::{Camera, CameraUniform, MIN_ZOOM, WORLD_UP};
