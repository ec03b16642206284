//! WGPU context management
//!
//! Owns the device, queue, and the window surface the cube is drawn to.

use std::fmt;
use std::sync::Arc;
use winit::{dpi::PhysicalSize, window::Window};

/// Errors that can occur while acquiring the graphics context
#[derive(Debug)]
pub enum RenderContextError {
    /// Failed to create a wgpu surface from the window
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No adapter can present to the surface
    NoAdapter,
    /// Device request failed (limits or features not met)
    DeviceRequest(wgpu::RequestDeviceError),
    /// Surface configuration not supported by the selected adapter
    UnsupportedSurface,
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderContextError::SurfaceCreation(e) => write!(f, "Surface creation failed: {}", e),
            RenderContextError::NoAdapter => write!(f, "No compatible GPU adapter found"),
            RenderContextError::DeviceRequest(e) => write!(f, "Device request failed: {}", e),
            RenderContextError::UnsupportedSurface => {
                write!(f, "Surface configuration not supported by adapter")
            }
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderContextError::SurfaceCreation(e) => Some(e),
            RenderContextError::DeviceRequest(e) => Some(e),
            RenderContextError::NoAdapter | RenderContextError::UnsupportedSurface => None,
        }
    }
}

/// Device, queue, and configured surface
pub struct RenderContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
}

impl RenderContext {
    /// Create a context, presenting with or without vsync
    pub async fn with_vsync(window: Arc<Window>, vsync: bool) -> Result<Self, RenderContextError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let surface = instance
            .create_surface(window)
            .map_err(RenderContextError::SurfaceCreation)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderContextError::NoAdapter)?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Cube Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(RenderContextError::DeviceRequest)?;

        let mut config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or(RenderContextError::UnsupportedSurface)?;
        config.present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
        })
    }

    /// Reconfigure the surface for a new size. Zero sizes are ignored.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reapply the current configuration after the surface was lost
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Surface texture format
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }
}
