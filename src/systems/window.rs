//! Window management system
//!
//! Handles window creation, fullscreen toggle, title updates, and redraw
//! scheduling.

use std::sync::Arc;
use winit::{
    event_loop::ActiveEventLoop,
    window::{Fullscreen, Window},
};
use spincube_core::{FactDisplay, FrameScheduler};
use crate::config::WindowConfig;

/// Manages the application window
pub struct WindowSystem {
    window: Arc<Window>,
    base_title: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let mut attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.width,
                config.height,
            ));

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            base_title: config.title.clone(),
        })
    }

    /// Get window reference (for RenderContext creation)
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&self) {
        let new_fullscreen = if self.window.fullscreen().is_some() {
            None
        } else {
            Some(Fullscreen::Borderless(None))
        };
        self.window.set_fullscreen(new_fullscreen);
    }

    /// Show the read-outs in the window title
    pub fn update_title(&self, display: &FactDisplay) {
        self.window.set_title(&title_for(&self.base_title, display));
    }

    /// Scheduler that asks this window for the next redraw
    pub fn scheduler(&self) -> RedrawScheduler {
        RedrawScheduler {
            window: Arc::clone(&self.window),
        }
    }
}

/// Window title carrying the axis, angle, and speed read-outs
pub fn title_for(base_title: &str, display: &FactDisplay) -> String {
    format!("{} | {}", base_title, display.summary())
}

/// Frame scheduler backed by `Window::request_redraw`
pub struct RedrawScheduler {
    window: Arc<Window>,
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&self) {
        self.window.request_redraw();
    }
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}
