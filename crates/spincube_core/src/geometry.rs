//! Cube geometry
//!
//! Four vertices per face so every face can carry its own flat color.
//! Positions span the unit cube centered on the origin.

/// Vertex positions, 4 per face: front, back, top, bottom, right, left
pub const CUBE_POSITIONS: &[[f32; 3]] = &[
    // Front face
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
    // Back face
    [-0.5, -0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [0.5, 0.5, -0.5],
    [0.5, -0.5, -0.5],
    // Top face
    [-0.5, 0.5, -0.5],
    [-0.5, 0.5, 0.5],
    [0.5, 0.5, 0.5],
    [0.5, 0.5, -0.5],
    // Bottom face
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [0.5, -0.5, 0.5],
    [-0.5, -0.5, 0.5],
    // Right face
    [0.5, -0.5, -0.5],
    [0.5, 0.5, -0.5],
    [0.5, 0.5, 0.5],
    [0.5, -0.5, 0.5],
    // Left face
    [-0.5, -0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [-0.5, 0.5, 0.5],
    [-0.5, 0.5, -0.5],
];

const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
const MAGENTA: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
const CYAN: [f32; 4] = [0.0, 1.0, 1.0, 1.0];

/// RGBA color per vertex, matching [`CUBE_POSITIONS`] face by face
pub const CUBE_COLORS: &[[f32; 4]] = &[
    RED, RED, RED, RED,
    GREEN, GREEN, GREEN, GREEN,
    BLUE, BLUE, BLUE, BLUE,
    YELLOW, YELLOW, YELLOW, YELLOW,
    MAGENTA, MAGENTA, MAGENTA, MAGENTA,
    CYAN, CYAN, CYAN, CYAN,
];

/// Two triangles per face
pub const CUBE_INDICES: &[u16] = &[
    0, 1, 2, 0, 2, 3, // front
    4, 5, 6, 4, 6, 7, // back
    8, 9, 10, 8, 10, 11, // top
    12, 13, 14, 12, 14, 15, // bottom
    16, 17, 18, 16, 18, 19, // right
    20, 21, 22, 20, 22, 23, // left
];

/// Immutable indexed geometry with separate position and color streams
#[derive(Clone, Copy, Debug)]
pub struct CubeGeometry {
    pub positions: &'static [[f32; 3]],
    pub colors: &'static [[f32; 4]],
    pub indices: &'static [u16],
}

/// The cube drawn by the application
pub const CUBE: CubeGeometry = CubeGeometry {
    positions: CUBE_POSITIONS,
    colors: CUBE_COLORS,
    indices: CUBE_INDICES,
};

impl CubeGeometry {
    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of indices (the count passed to the indexed draw)
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Position stream as raw bytes for buffer upload
    pub fn position_bytes(&self) -> &'static [u8] {
        bytemuck::cast_slice(self.positions)
    }

    /// Color stream as raw bytes for buffer upload
    pub fn color_bytes(&self) -> &'static [u8] {
        bytemuck::cast_slice(self.colors)
    }

    /// Index list as raw bytes for buffer upload
    pub fn index_bytes(&self) -> &'static [u8] {
        bytemuck::cast_slice(self.indices)
    }

    /// Check that every index refers to an existing vertex and the streams agree
    pub fn is_valid(&self) -> bool {
        let count = self.vertex_count();
        self.colors.len() == count
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < count)
    }
}
