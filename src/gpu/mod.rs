//! GPU resources for the interactive viewer.
//!
//! Provides wgpu device/surface initialization, the demo scene renderer,
//! offscreen targets, and the readback path that feeds captured frames to
//! [`crate::capture`].

/// Offscreen capture and pixel readback.
pub mod readback;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Scene pipelines, camera uniform and depth buffer.
pub mod scene;
/// Color and depth render targets.
pub mod texture;

pub use readback::{GpuFrameSource, Readback};
pub use render_context::{RenderContext, RenderContextError};
pub use scene::SceneRenderer;
pub use texture::RenderTarget;
