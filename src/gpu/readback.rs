//! Reading rendered frames back from the GPU.
//!
//! The scene is drawn into an offscreen [`CAPTURE_FORMAT`] target, copied
//! into a mappable staging buffer and mapped synchronously. Texture rows
//! come back top-down, padded to wgpu's 256-byte copy alignment; the
//! padding is stripped before the frame is handed to capture code.

use std::sync::mpsc;

use super::render_context::RenderContext;
use super::scene::SceneRenderer;
use super::texture::{RenderTarget, CAPTURE_FORMAT};
use crate::capture::{FrameSource, RawFrame, BYTES_PER_PIXEL};
use crate::error::GlimpseError;

/// Bytes per staging-buffer row for a `width`-pixel RGBA8 image.
#[must_use]
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL as u32;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Copy the first `width * 4` bytes of each padded row into a tight buffer.
#[must_use]
pub fn strip_row_padding(
    data: &[u8],
    width: u32,
    height: u32,
    padded_row: u32,
) -> Vec<u8> {
    let row_len = width as usize * BYTES_PER_PIXEL;
    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in data.chunks(padded_row as usize).take(height as usize) {
        pixels.extend_from_slice(&row[..row_len.min(row.len())]);
    }
    pixels
}

/// Offscreen capture target and its staging buffer.
///
/// Sized to the viewport; call [`resize`](Self::resize) when it changes.
pub struct Readback {
    target: RenderTarget,
    staging: wgpu::Buffer,
    padded_row: u32,
}

impl Readback {
    /// Allocate capture resources for a `width` x `height` viewport.
    #[must_use]
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let target = RenderTarget::color(device, width, height, CAPTURE_FORMAT);
        let (width, height) = target.size();
        let padded_row = padded_bytes_per_row(width);
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Capture Staging Buffer"),
            size: u64::from(padded_row) * u64::from(height),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            target,
            staging,
            padded_row,
        }
    }

    /// Reallocate for a new viewport size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.target.size() != (width.max(1), height.max(1)) {
            *self = Self::new(device, width, height);
        }
    }

    /// Render the scene offscreen and read the pixels back.
    ///
    /// Blocks until the GPU has finished the copy.
    ///
    /// # Errors
    ///
    /// Returns [`GlimpseError::Readback`] if polling or mapping fails.
    pub fn capture(
        &self,
        context: &RenderContext,
        scene: &mut SceneRenderer,
    ) -> Result<RawFrame, GlimpseError> {
        let (width, height) = self.target.size();
        let mut encoder = context.create_encoder("Capture Encoder");
        scene.draw(
            &context.device,
            &mut encoder,
            &self.target.view,
            CAPTURE_FORMAT,
        );
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        context.submit(encoder);

        let pixels = self.map_staging(context)?;
        Ok(RawFrame::top_down(width, height, pixels))
    }

    fn map_staging(
        &self,
        context: &RenderContext,
    ) -> Result<Vec<u8>, GlimpseError> {
        let slice = self.staging.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = context
            .device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| GlimpseError::Readback(e.to_string()))?;
        rx.recv()
            .map_err(|_| {
                GlimpseError::Readback("map callback dropped".to_owned())
            })?
            .map_err(|e| GlimpseError::Readback(e.to_string()))?;

        let (width, height) = self.target.size();
        let pixels = {
            let data = slice.get_mapped_range();
            strip_row_padding(&data, width, height, self.padded_row)
        };
        self.staging.unmap();
        Ok(pixels)
    }
}

/// [`FrameSource`] that renders the current scene into the capture target.
pub struct GpuFrameSource<'a> {
    /// Device and queue to render with.
    pub context: &'a RenderContext,
    /// Scene to draw, with its camera uniform already up to date.
    pub scene: &'a mut SceneRenderer,
    /// Capture target and staging buffer.
    pub readback: &'a Readback,
}

impl FrameSource for GpuFrameSource<'_> {
    fn read_framebuffer(&mut self) -> Result<RawFrame, GlimpseError> {
        self.readback.capture(self.context, self.scene)
    }
}
