use std::time::{Duration, Instant};

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, error, info, warn};
use winit::dpi::PhysicalSize;

use crate::compile::{build_program, ShaderError, UniformLocation};
use crate::render_loop::{FrameRequest, FrameSink};
use crate::shaders::CLOUD_SHIFT_UNIFORM;
use crate::types::{AdapterProfile, RendererConfig, ShaderFailurePolicy};

use super::context::GpuContext;
use super::geometry::QuadGeometry;
use super::pipeline::CloudPipeline;
use super::uniforms::UniformBlock;

/// Background shown behind (or instead of) the clouds.
const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

/// Every GPU resource the render loop touches, created once and owned here.
pub(crate) struct GpuState {
    context: GpuContext,
    geometry: QuadGeometry,
    uniforms: Option<UniformBlock>,
    pipeline: Option<CloudPipeline>,
    last_stats: Instant,
    frames_since_stats: u32,
}

impl GpuState {
    /// Brings up the device, uploads the quad, and builds the cloud program.
    ///
    /// Initialisation failures are returned as errors. Shader failures follow
    /// `config.shader_failure`: with [`ShaderFailurePolicy::Continue`] they are
    /// logged and the state renders cleared frames without a pipeline.
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        config: &RendererConfig,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size, config.gpu_power, config.vsync)?;
        let geometry = QuadGeometry::upload(&context.device);

        let (uniforms, pipeline) = match Self::build_pipeline(&context) {
            Ok((uniforms, pipeline)) => (uniforms, Some(pipeline)),
            Err(err) => match config.shader_failure {
                ShaderFailurePolicy::Abort => return Err(err.into()),
                ShaderFailurePolicy::Continue => {
                    error!("{err}");
                    warn!("continuing without a cloud pipeline; frames will only be cleared");
                    (None, None)
                }
            },
        };

        Ok(Self {
            context,
            geometry,
            uniforms,
            pipeline,
            last_stats: Instant::now(),
            frames_since_stats: 0,
        })
    }

    fn build_pipeline(
        context: &GpuContext,
    ) -> Result<(Option<UniformBlock>, CloudPipeline), ShaderError> {
        let program = build_program()?;
        let location = program.uniform_location(CLOUD_SHIFT_UNIFORM);
        log_uniform_location(location);

        let uniforms = location.map(|location| UniformBlock::new(&context.device, location));
        let pipeline = CloudPipeline::new(
            &context.device,
            context.surface_format,
            &program,
            uniforms.as_ref(),
        )?;
        info!("cloud shader program linked");
        Ok((uniforms, pipeline))
    }

    pub(crate) fn adapter_profile(&self) -> &AdapterProfile {
        &self.context.adapter_profile
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    pub(crate) fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    fn record_stats(&mut self, frame: &FrameRequest) {
        self.frames_since_stats += 1;
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_stats);
        if elapsed >= Duration::from_secs(1) {
            let fps = self.frames_since_stats as f32 / elapsed.as_secs_f32();
            debug!(
                fps = fps.round(),
                frame = frame.frame_index,
                cloud_shift = frame.cloud_shift,
                "render stats"
            );
            self.frames_since_stats = 0;
            self.last_stats = now;
        }
    }
}

impl FrameSink for GpuState {
    type Error = wgpu::SurfaceError;

    fn draw_frame(&mut self, frame: &FrameRequest) -> Result<(), Self::Error> {
        let surface_texture = self.context.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if let Some(uniforms) = &self.uniforms {
            uniforms.write_f32(&self.context.queue, frame.cloud_shift);
        }

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("cloud encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cloud pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = &self.pipeline {
                pipeline.bind(&mut render_pass, self.uniforms.as_ref());
                render_pass.set_vertex_buffer(0, self.geometry.buffer.slice(..));
                render_pass.draw(0..frame.vertex_count.min(self.geometry.vertex_count), 0..1);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        self.record_stats(frame);
        Ok(())
    }
}

fn log_uniform_location(location: Option<UniformLocation>) {
    match location {
        Some(location) => debug!(
            uniform = CLOUD_SHIFT_UNIFORM,
            group = location.group,
            binding = location.binding,
            offset = location.offset,
            "resolved uniform location"
        ),
        None => warn!(
            uniform = CLOUD_SHIFT_UNIFORM,
            "uniform not found in linked program; animation will not be uploaded"
        ),
    }
}
