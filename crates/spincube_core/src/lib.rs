//! Core types for spincube
//!
//! This crate holds everything that does not need a GPU:
//!
//! - [`CubeGeometry`] - The static 24-vertex, 36-index colored cube
//! - [`RotationState`] - Angle, axis, and fixed point driving the vertex shader
//! - [`RenderLoop`] - The per-frame tick over a [`FrameSink`]
//! - [`Driver`] - Runs ticks once per host frame signal
//! - [`FactDisplay`] - The axis/angle/speed read-outs
//! - [`preprocess`] - `#include` resolution for shader sources

mod geometry;
mod rotation;
mod display;
mod render_loop;
mod driver;
pub mod preprocess;

pub use geometry::{CubeGeometry, CUBE, CUBE_POSITIONS, CUBE_COLORS, CUBE_INDICES};
pub use rotation::{wrapped_degrees, RotationState, DIAGONAL_AXIS};
pub use display::{FactDisplay, format_axis, format_angle_degrees, format_speed};
pub use render_loop::{FrameSink, RenderLoop};
pub use driver::{Driver, FrameScheduler};
pub use preprocess::{
    FetchError, FileFetcher, MemoryFetcher, PreprocessError, Preprocessor, SourceFetcher,
};
