//! Rendering pipeline components
//!
//! Buffers, uniforms, and the render pipeline that draws the cube.

pub mod types;
pub mod cube_pipeline;

pub use types::{
    CubeUniforms, COLOR_ATTRIBUTE, FIXED_POINT_UNIFORM, POSITION_ATTRIBUTE,
    ROTATION_ANGLE_UNIFORM, ROTATION_AXIS_UNIFORM,
};

pub use cube_pipeline::{resolve_bindings, vertex_format, CubeBindings, CubePipeline, PipelineError};
