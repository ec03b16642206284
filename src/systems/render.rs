//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Startup: context, shader sources, program, pipeline
//! - Uniform writes and the per-frame draw

use std::sync::Arc;
use winit::window::Window;
use spincube_core::{FileFetcher, FrameSink, PreprocessError, Preprocessor, CUBE};
use spincube_render::{
    init_shaders, CubePipeline, PipelineError, RenderContext, RenderContextError, ShaderProgram,
};
use crate::config::{AppConfig, ShaderConfig};

/// Startup failures; each one halts the application
#[derive(Debug)]
pub enum InitError {
    /// No device or surface could be acquired
    ContextUnavailable(RenderContextError),
    /// A shader source or one of its includes could not be loaded
    ShaderSource(PreprocessError),
    /// Compilation or linking failed (the diagnostic has been logged)
    ShaderProgram,
    /// Attribute or uniform bindings could not be resolved
    Pipeline(PipelineError),
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitError::ContextUnavailable(e) => write!(f, "Graphics context unavailable: {}", e),
            InitError::ShaderSource(e) => write!(f, "Failed to load shader source: {}", e),
            InitError::ShaderProgram => write!(f, "Shader program could not be built"),
            InitError::Pipeline(e) => write!(f, "Failed to set up the cube pipeline: {}", e),
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InitError::ContextUnavailable(e) => Some(e),
            InitError::ShaderSource(e) => Some(e),
            InitError::ShaderProgram => None,
            InitError::Pipeline(e) => Some(e),
        }
    }
}

impl From<RenderContextError> for InitError {
    fn from(e: RenderContextError) -> Self {
        InitError::ContextUnavailable(e)
    }
}

impl From<PreprocessError> for InitError {
    fn from(e: PreprocessError) -> Self {
        InitError::ShaderSource(e)
    }
}

impl From<PipelineError> for InitError {
    fn from(e: PipelineError) -> Self {
        InitError::Pipeline(e)
    }
}

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// Surface was lost or outdated and has been reconfigured
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

/// Fetch and preprocess both shader sources
pub fn load_shader_sources(config: &ShaderConfig) -> Result<(String, String), PreprocessError> {
    let preprocessor = Preprocessor::new(FileFetcher::new(&config.root))
        .with_max_substitutions(config.max_substitutions);
    let vertex = preprocessor.load(&config.vertex)?;
    let fragment = preprocessor.load(&config.fragment)?;
    log::info!(
        "Loaded shaders {} and {} from {}",
        config.vertex,
        config.fragment,
        config.root
    );
    Ok((vertex, fragment))
}

/// Load, preprocess, compile, and link the configured shaders
pub fn load_program(config: &ShaderConfig) -> Result<ShaderProgram, InitError> {
    let (vertex, fragment) = load_shader_sources(config)?;
    init_shaders(&vertex, &fragment).ok_or(InitError::ShaderProgram)
}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    pipeline: CubePipeline,
    clear_color: wgpu::Color,
}

impl RenderSystem {
    /// Acquire the context, build the program, and upload the cube
    pub fn initialize(window: Arc<Window>, config: &AppConfig) -> Result<Self, InitError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, config.window.vsync))?;
        let program = load_program(&config.shaders)?;

        let mut pipeline = CubePipeline::new(&context.device, context.format(), &program, &CUBE)?;
        pipeline.ensure_depth_texture(
            &context.device,
            context.config.width,
            context.config.height,
        );
        log::info!("Cube pipeline ready ({} indices)", pipeline.index_count());

        Ok(Self {
            context,
            pipeline,
            clear_color: config.rendering.clear_color(),
        })
    }

    /// Number of indices drawn per frame
    pub fn index_count(&self) -> u32 {
        self.pipeline.index_count()
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context
            .resize(winit::dpi::PhysicalSize::new(width, height));
        self.pipeline.ensure_depth_texture(
            &self.context.device,
            self.context.config.width,
            self.context.config.height,
        );
    }
}

impl FrameSink for RenderSystem {
    type Error = RenderError;

    fn push_fixed_point(&mut self, point: [f32; 3]) {
        self.pipeline.write_fixed_point(&self.context.queue, point);
    }

    fn push_axis(&mut self, axis: [f32; 3]) {
        self.pipeline.write_axis(&self.context.queue, axis);
    }

    fn push_angle(&mut self, angle: f32) {
        self.pipeline.write_angle(&self.context.queue, angle);
    }

    fn draw_indexed(&mut self, index_count: u32) -> Result<(), RenderError> {
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                self.context.reconfigure();
                return Err(RenderError::SurfaceLost);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.pipeline
            .render(&mut encoder, &view, self.clear_color, index_count);

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
