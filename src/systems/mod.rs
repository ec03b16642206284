//! Application systems
//!
//! Window and GPU systems used by the application loop.

mod render;
mod window;

pub use render::{load_program, load_shader_sources, InitError, RenderError, RenderSystem};
pub use window::{title_for, RedrawScheduler, WindowError, WindowSystem};
