use std::time::{Duration, Instant};

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use scrollfx::FrameState;
use tracing::{debug, warn};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::camera::PerspectiveCamera;
use crate::mesh::WireframeMesh;
use crate::types::{AdapterProfile, RendererConfig};

use super::context::GpuContext;
use super::pipeline::WireframePipeline;
use super::uniforms::SceneUniforms;

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let extent = wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: extent,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Owns every GPU resource needed to draw the sphere into a window surface.
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: WireframePipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    multisample_target: Option<MultisampleTarget>,
    camera: PerspectiveCamera,
    uniforms: SceneUniforms,
    frame_count: u64,
    frames_since_last_update: u32,
    last_fps_update: Instant,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        aspect: f32,
        config: &RendererConfig,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(
            target,
            initial_size,
            config.antialiasing,
            config.gpu_power,
        )?;
        let device = &context.device;

        let pipeline =
            WireframePipeline::new(device, context.surface_format, context.sample_count)?;

        let mesh = WireframeMesh::icosphere(config.mesh);
        debug!(
            detail = config.mesh.detail,
            vertices = mesh.vertices.len(),
            edges = mesh.edge_count(),
            "built icosphere wireframe"
        );
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("icosphere vertices"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("icosphere edges"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let camera = PerspectiveCamera::new(config.camera, aspect);
        let uniforms = SceneUniforms::new(&camera, &config.settings.initial_uniforms());
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("scene uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene uniform bind group"),
            layout: &pipeline.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let multisample_target = (context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                device,
                context.surface_format,
                context.size,
                context.sample_count,
            )
        });

        let index_count = mesh.indices.len() as u32;
        Ok(Self {
            context,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            vertex_buffer,
            index_buffer,
            index_count,
            multisample_target,
            camera,
            uniforms,
            frame_count: 0,
            frames_since_last_update: 0,
            last_fps_update: Instant::now(),
        })
    }

    pub(crate) fn adapter_profile(&self) -> &AdapterProfile {
        &self.context.adapter_profile
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>, aspect: f32) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.context.resize(new_size);
        self.camera.set_aspect(aspect);
        self.uniforms.set_camera(&self.camera);
        debug!(
            width = self.context.size.width,
            height = self.context.size.height,
            aspect = self.camera.aspect(),
            "surface resized"
        );
        self.multisample_target = (self.context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                &self.context.device,
                self.context.surface_format,
                self.context.size,
                self.context.sample_count,
            )
        });
    }

    /// Reconfigures the surface at its current size after `Lost`/`Outdated`.
    pub(crate) fn recover_surface(&mut self) {
        self.context.reconfigure();
    }

    pub(crate) fn render(&mut self, frame_state: &FrameState) -> Result<(), wgpu::SurfaceError> {
        let acquire_start = Instant::now();
        let frame = self.context.surface.get_current_texture()?;
        let acquire = acquire_start.elapsed();
        if acquire > Duration::from_millis(100) {
            warn!(
                acquire_ms = acquire.as_millis() as u64,
                "acquiring the next surface texture was slow"
            );
        }

        self.uniforms
            .set_model(frame_state.scale, frame_state.rotation);
        self.uniforms.set_parameters(&frame_state.uniforms);
        self.context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniforms),
        );

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });

        {
            let (attachment_view, resolve_target) =
                if let Some(msaa) = self.multisample_target.as_ref() {
                    (&msaa.view, Some(&view))
                } else {
                    (&view, None)
                };
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("wireframe pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        self.record_frame(frame_state);
        Ok(())
    }

    fn record_frame(&mut self, frame_state: &FrameState) {
        self.frame_count += 1;
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_fps_update);
        if elapsed >= Duration::from_secs(1) {
            let fps = self.frames_since_last_update as f32 / elapsed.as_secs_f32();
            debug!(
                fps = fps.round(),
                frame_count = self.frame_count,
                soft_offset = frame_state.soft_offset,
                normalized = frame_state.normalized,
                "render stats"
            );
            self.frames_since_last_update = 0;
            self.last_fps_update = now;
        }
    }
}
