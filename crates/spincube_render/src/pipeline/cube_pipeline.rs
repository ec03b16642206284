//! Render pipeline for the cube
//!
//! Positions and colors live in two vertex buffers, triangles in a `u16`
//! index buffer. Attribute locations and uniform offsets come from the
//! linked [`ShaderProgram`], never from constants.

use std::fmt;

use spincube_core::CubeGeometry;
use wgpu::util::DeviceExt;

use super::types::{
    CubeUniforms, COLOR_ATTRIBUTE, FIXED_POINT_UNIFORM, POSITION_ATTRIBUTE,
    ROTATION_ANGLE_UNIFORM, ROTATION_AXIS_UNIFORM,
};
use crate::program::{AttributeBinding, ShaderProgram, UniformBlock, UniformLocation};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Errors from resolving the program interface or uploading geometry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The vertex stage has no attribute with this name
    MissingAttribute(String),
    /// No uniform with this name in either stage
    MissingUniform(String),
    /// Attribute type cannot be fed from `f32` vertex data
    AttributeFormat { name: String },
    /// Uniform slot too small for the value written to it
    UniformSize { name: String, expected: u32, found: u32 },
    /// Rotation uniforms must share one buffer in bind group 0
    UniformLayout,
    /// Geometry indices out of range or streams of different length
    InvalidGeometry,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::MissingAttribute(name) => write!(f, "Missing vertex attribute: {}", name),
            PipelineError::MissingUniform(name) => write!(f, "Missing uniform: {}", name),
            PipelineError::AttributeFormat { name } => {
                write!(f, "Attribute {} is not a 32-bit float type", name)
            }
            PipelineError::UniformSize { name, expected, found } => write!(
                f,
                "Uniform {} is {} bytes, expected at least {}",
                name, found, expected
            ),
            PipelineError::UniformLayout => {
                write!(f, "Rotation uniforms must share one buffer in group 0")
            }
            PipelineError::InvalidGeometry => write!(f, "Invalid cube geometry"),
        }
    }
}

impl std::error::Error for PipelineError {}

/// Vertex format for a buffer of `components` floats feeding `binding`
pub fn vertex_format(binding: AttributeBinding, components: u32) -> Option<wgpu::VertexFormat> {
    if binding.kind != naga::ScalarKind::Float || binding.width != 4 {
        return None;
    }
    match components {
        1 => Some(wgpu::VertexFormat::Float32),
        2 => Some(wgpu::VertexFormat::Float32x2),
        3 => Some(wgpu::VertexFormat::Float32x3),
        4 => Some(wgpu::VertexFormat::Float32x4),
        _ => None,
    }
}

/// Attribute and uniform bindings the cube needs, resolved by name
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CubeBindings {
    pub position: AttributeBinding,
    pub position_format: wgpu::VertexFormat,
    pub color: AttributeBinding,
    pub color_format: wgpu::VertexFormat,
    pub fixed_point: UniformLocation,
    pub rotation_axis: UniformLocation,
    pub rotation_angle: UniformLocation,
    pub block: UniformBlock,
}

impl CubeBindings {
    /// Lay out `uniforms` at the reflected offsets of the uniform block
    pub fn encode(&self, uniforms: &CubeUniforms) -> Vec<u8> {
        let mut bytes = vec![0u8; self.block.size as usize];
        let mut put = |location: &UniformLocation, data: &[u8]| {
            let start = location.offset as usize;
            bytes[start..start + data.len()].copy_from_slice(data);
        };
        put(&self.fixed_point, bytemuck::cast_slice(&uniforms.fixed_point));
        put(&self.rotation_axis, bytemuck::cast_slice(&uniforms.rotation_axis));
        put(&self.rotation_angle, bytemuck::bytes_of(&uniforms.rotation_angle));
        bytes
    }
}

fn require_attribute(
    program: &ShaderProgram,
    name: &str,
    components: u32,
) -> Result<(AttributeBinding, wgpu::VertexFormat), PipelineError> {
    let binding = program
        .attribute(name)
        .ok_or_else(|| PipelineError::MissingAttribute(name.to_string()))?;
    let format = vertex_format(binding, components).ok_or_else(|| PipelineError::AttributeFormat {
        name: name.to_string(),
    })?;
    Ok((binding, format))
}

fn require_uniform(
    program: &ShaderProgram,
    name: &str,
    bytes: u32,
) -> Result<UniformLocation, PipelineError> {
    let location = program
        .uniform(name)
        .ok_or_else(|| PipelineError::MissingUniform(name.to_string()))?;
    if location.size < bytes {
        return Err(PipelineError::UniformSize {
            name: name.to_string(),
            expected: bytes,
            found: location.size,
        });
    }
    Ok(location)
}

/// Resolve `a_position`, `a_color`, and the three rotation uniforms
pub fn resolve_bindings(program: &ShaderProgram) -> Result<CubeBindings, PipelineError> {
    let (position, position_format) = require_attribute(program, POSITION_ATTRIBUTE, 3)?;
    let (color, color_format) = require_attribute(program, COLOR_ATTRIBUTE, 4)?;

    let fixed_point = require_uniform(program, FIXED_POINT_UNIFORM, 12)?;
    let rotation_axis = require_uniform(program, ROTATION_AXIS_UNIFORM, 12)?;
    let rotation_angle = require_uniform(program, ROTATION_ANGLE_UNIFORM, 4)?;

    let slot = (fixed_point.group, fixed_point.binding);
    if slot.0 != 0
        || (rotation_axis.group, rotation_axis.binding) != slot
        || (rotation_angle.group, rotation_angle.binding) != slot
    {
        return Err(PipelineError::UniformLayout);
    }
    let block = program
        .uniform_block(slot.0, slot.1)
        .ok_or(PipelineError::UniformLayout)?;

    Ok(CubeBindings {
        position,
        position_format,
        color,
        color_format,
        fixed_point,
        rotation_axis,
        rotation_angle,
        block,
    })
}

/// Render pipeline, geometry buffers, and rotation uniforms
#[allow(dead_code)] // bind_group_layout kept alive alongside the bind group
pub struct CubePipeline {
    pipeline: wgpu::RenderPipeline,
    bindings: CubeBindings,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    position_buffer: wgpu::Buffer,
    color_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    depth_texture: Option<wgpu::TextureView>,
    depth_size: (u32, u32),
}

impl CubePipeline {
    /// Resolve bindings, upload `geometry`, and build the pipeline
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        program: &ShaderProgram,
        geometry: &CubeGeometry,
    ) -> Result<Self, PipelineError> {
        if !geometry.is_valid() {
            return Err(PipelineError::InvalidGeometry);
        }
        let bindings = resolve_bindings(program)?;

        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Position Buffer"),
            contents: geometry.position_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Color Buffer"),
            contents: geometry.color_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: geometry.index_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });
        log::debug!(
            "Uploaded cube: {} vertices, {} indices",
            geometry.vertex_count(),
            geometry.index_count()
        );

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Uniform Buffer"),
            contents: &bindings.encode(&CubeUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Cube Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: bindings.block.binding,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Cube Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: bindings.block.binding,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cube Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let modules = program.create_modules(device);

        let position_attributes = [wgpu::VertexAttribute {
            format: bindings.position_format,
            offset: 0,
            shader_location: bindings.position.location,
        }];
        let color_attributes = [wgpu::VertexAttribute {
            format: bindings.color_format,
            offset: 0,
            shader_location: bindings.color.location,
        }];
        let buffers = [
            wgpu::VertexBufferLayout {
                array_stride: bindings.position_format.size(),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &position_attributes,
            },
            wgpu::VertexBufferLayout {
                array_stride: bindings.color_format.size(),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &color_attributes,
            },
        ];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Cube Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &modules.vertex,
                entry_point: Some(program.vertex().entry_point()),
                buffers: &buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &modules.fragment,
                entry_point: Some(program.fragment().entry_point()),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Both windings are drawn; the depth test hides back faces
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        Ok(Self {
            pipeline,
            bindings,
            bind_group_layout,
            uniform_buffer,
            bind_group,
            position_buffer,
            color_buffer,
            index_buffer,
            index_count: geometry.index_count(),
            depth_texture: None,
            depth_size: (0, 0),
        })
    }

    /// Number of indices drawn per frame
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    fn write_uniform(&self, queue: &wgpu::Queue, location: &UniformLocation, data: &[u8]) {
        queue.write_buffer(&self.uniform_buffer, location.offset as wgpu::BufferAddress, data);
    }

    pub fn write_fixed_point(&self, queue: &wgpu::Queue, point: [f32; 3]) {
        self.write_uniform(queue, &self.bindings.fixed_point, bytemuck::cast_slice(&point));
    }

    pub fn write_axis(&self, queue: &wgpu::Queue, axis: [f32; 3]) {
        self.write_uniform(queue, &self.bindings.rotation_axis, bytemuck::cast_slice(&axis));
    }

    pub fn write_angle(&self, queue: &wgpu::Queue, angle: f32) {
        self.write_uniform(queue, &self.bindings.rotation_angle, bytemuck::bytes_of(&angle));
    }

    /// Ensure depth texture exists and is the right size
    pub fn ensure_depth_texture(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.depth_texture.is_none() || self.depth_size != (width, height) {
            let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });

            self.depth_texture = Some(depth_texture.create_view(&wgpu::TextureViewDescriptor::default()));
            self.depth_size = (width, height);
        }
    }

    /// Clear color and depth, then draw `index_count` indices
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        clear_color: wgpu::Color,
        index_count: u32,
    ) {
        let Some(depth_view) = self.depth_texture.as_ref() else {
            log::warn!("Depth texture not created, skipping draw");
            return;
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Cube Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.position_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.color_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..index_count.min(self.index_count), 0, 0..1);
    }
}
