//! The demo scene: a colored cube viewed through the camera uniform.

use wgpu::util::DeviceExt;

use super::texture::{RenderTarget, DEPTH_FORMAT};
use crate::camera::CameraUniform;

/// Vertices drawn per frame (6 faces x 2 triangles).
const CUBE_VERTICES: u32 = 36;

/// Draws the scene into any color target.
///
/// Holds one pipeline per color format it has drawn into, so the window
/// surface and the capture target can use different formats while sharing
/// the camera uniform and depth buffer.
pub struct SceneRenderer {
    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: Vec<(wgpu::TextureFormat, wgpu::RenderPipeline)>,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    depth: RenderTarget,
    clear_color: wgpu::Color,
}

impl SceneRenderer {
    /// Create the scene resources for a `width` x `height` viewport.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        (width, height): (u32, u32),
        clear_color: [f64; 4],
    ) -> Self {
        let shader = device.create_shader_module(wgpu::include_wgsl!(
            "../../assets/shaders/scene.wgsl"
        ));

        let camera_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::bytes_of(&CameraUniform {
                    view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
                }),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let camera_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Camera Bind Group"),
                layout: &camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
            });

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Scene Pipeline Layout"),
                bind_group_layouts: &[&camera_layout],
                push_constant_ranges: &[],
            });

        let [r, g, b, a] = clear_color;
        Self {
            shader,
            pipeline_layout,
            pipelines: Vec::new(),
            camera_buffer,
            camera_bind_group,
            depth: RenderTarget::depth(device, width, height),
            clear_color: wgpu::Color { r, g, b, a },
        }
    }

    /// Recreate the depth buffer for a new viewport size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.depth.size() != (width.max(1), height.max(1)) {
            self.depth = RenderTarget::depth(device, width, height);
        }
    }

    /// Upload the camera matrix for the next draws.
    pub fn update_camera(&self, queue: &wgpu::Queue, uniform: &CameraUniform) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(uniform));
    }

    /// Record a pass that clears `target` and draws the scene into it.
    pub fn draw(
        &mut self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        format: wgpu::TextureFormat,
    ) {
        let index = self.pipeline_index(device, format);
        let pipeline = &self.pipelines[index].1;

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                },
            ),
            ..Default::default()
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.draw(0..CUBE_VERTICES, 0..1);
    }

    fn pipeline_index(
        &mut self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
    ) -> usize {
        if let Some(i) = self.pipelines.iter().position(|(f, _)| *f == format) {
            return i;
        }
        log::debug!("creating scene pipeline for {format:?}");
        let pipeline = self.create_pipeline(device, format);
        self.pipelines.push((format, pipeline));
        self.pipelines.len() - 1
    }

    fn create_pipeline(
        &self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}
