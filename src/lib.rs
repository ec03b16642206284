//! Spinning cube
//!
//! A cube rotating about a user-controlled axis, drawn with wgpu.

pub mod config;
pub mod input;
pub mod systems;
