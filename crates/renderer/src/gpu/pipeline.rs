use std::borrow::Cow;

use crate::compile::{LinkedProgram, ShaderError, ShaderStageKind};
use crate::mesh::vertex_layout;

use super::uniforms::UniformBlock;

/// The linked cloud program as a `wgpu` render pipeline.
pub(crate) struct CloudPipeline {
    pub pipeline: wgpu::RenderPipeline,
    /// Placeholder groups below the uniform block's group, bound alongside it.
    empty_groups: Vec<wgpu::BindGroup>,
}

impl CloudPipeline {
    /// Builds GPU modules and the render pipeline for `program`.
    ///
    /// Runs inside a validation error scope so driver-side failures surface as
    /// [`ShaderError::Link`] instead of reaching the uncaptured-error handler.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        program: &LinkedProgram,
        uniforms: Option<&UniformBlock>,
    ) -> Result<Self, ShaderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vertex_module = create_module(device, program.vertex_source(), ShaderStageKind::Vertex);
        let fragment_module =
            create_module(device, program.fragment_source(), ShaderStageKind::Fragment);

        let empty_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("empty layout"),
            entries: &[],
        });
        let leading_groups = uniforms.map(UniformBlock::group).unwrap_or(0) as usize;
        let empty_groups: Vec<wgpu::BindGroup> = (0..leading_groups)
            .map(|_| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("empty bind group"),
                    layout: &empty_layout,
                    entries: &[],
                })
            })
            .collect();
        let mut bind_group_layouts: Vec<&wgpu::BindGroupLayout> =
            vec![&empty_layout; leading_groups];
        if let Some(block) = uniforms {
            bind_group_layouts.push(&block.layout);
        }

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cloud pipeline layout"),
            bind_group_layouts: &bind_group_layouts,
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cloud pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: &[vertex_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Link {
                log: error.to_string(),
            });
        }

        Ok(Self {
            pipeline,
            empty_groups,
        })
    }

    /// Binds the pipeline and every bind group it expects.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>, uniforms: Option<&UniformBlock>) {
        pass.set_pipeline(&self.pipeline);
        for (index, group) in self.empty_groups.iter().enumerate() {
            pass.set_bind_group(index as u32, group, &[]);
        }
        if let Some(block) = uniforms {
            pass.set_bind_group(block.group(), &block.bind_group, &[]);
        }
    }
}

fn create_module(device: &wgpu::Device, source: &str, stage: ShaderStageKind) -> wgpu::ShaderModule {
    let label = match stage {
        ShaderStageKind::Vertex => "cloud vertex",
        ShaderStageKind::Fragment => "cloud fragment",
    };
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(source.to_owned()),
            stage: stage.as_naga(),
            defines: &[],
        },
    })
}
