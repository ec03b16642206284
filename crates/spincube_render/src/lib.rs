//! Rendering library for spincube
//!
//! This crate provides the wgpu side of the cube renderer.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`program::ShaderProgram`] - Compiled and linked WGSL stages with name lookup
//! - [`pipeline::CubePipeline`] - Buffers, uniforms, and the indexed draw

pub mod context;
pub mod program;
pub mod pipeline;

pub use context::{RenderContext, RenderContextError};
pub use program::{
    compile, init_shaders, link, AttributeBinding, CompiledStage, ProgramError, ShaderModules,
    ShaderProgram, UniformBlock, UniformLocation,
};
pub use pipeline::{CubePipeline, CubeUniforms, PipelineError};
