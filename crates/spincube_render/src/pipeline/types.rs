//! GPU-compatible data types for the cube pipeline
//!
//! `CubeUniforms` mirrors the `Uniforms` struct in `vertex.wgsl`. The
//! pipeline still writes each field at the offset reflected from the shader,
//! so this type only seeds the buffer.

use bytemuck::{Pod, Zeroable};

/// Vertex attribute carrying the cube positions
pub const POSITION_ATTRIBUTE: &str = "a_position";
/// Vertex attribute carrying the per-face colors
pub const COLOR_ATTRIBUTE: &str = "a_color";
/// Point the cube rotates about
pub const FIXED_POINT_UNIFORM: &str = "u_fixedPoint";
/// Axis of rotation (normalized in the shader)
pub const ROTATION_AXIS_UNIFORM: &str = "u_rotationAxis";
/// Accumulated angle in radians
pub const ROTATION_ANGLE_UNIFORM: &str = "u_rotationAngle";

/// Uniform block for the rotation
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CubeUniforms {
    /// Center of rotation
    pub fixed_point: [f32; 3],
    /// Rotation angle in radians
    pub rotation_angle: f32,
    /// Rotation axis, not necessarily unit length
    pub rotation_axis: [f32; 3],
    /// Padding to the 16-byte struct alignment
    pub _padding: f32,
}

impl CubeUniforms {
    pub fn new(fixed_point: [f32; 3], rotation_axis: [f32; 3], rotation_angle: f32) -> Self {
        Self {
            fixed_point,
            rotation_angle,
            rotation_axis,
            _padding: 0.0,
        }
    }
}

impl Default for CubeUniforms {
    fn default() -> Self {
        Self::new([0.0; 3], [1.0, 1.0, 1.0], 0.0)
    }
}
