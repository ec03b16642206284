//! Spinning cube
//!
//! Draws a cube rotating about a user-controlled axis. The keyboard drives
//! the axis and speed controls; the window title shows the current axis,
//! angle, and speed.

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use spincube::config::AppConfig;
use spincube::input::{InputAction, InputMapper};
use spincube::systems::{RedrawScheduler, RenderError, RenderSystem, WindowSystem};
use spincube_core::{Driver, RenderLoop};
use spincube_input::ControlPanel;

/// Everything that exists once startup succeeded
struct Running {
    window: WindowSystem,
    renderer: RenderSystem,
    render_loop: RenderLoop,
    driver: Driver<RedrawScheduler>,
}

/// Startup state machine
enum LoopPhase {
    Uninitialized,
    Running(Box<Running>),
    /// Startup failed; the event loop is exiting
    Halted,
}

/// Main application state
struct App {
    config: AppConfig,
    panel: ControlPanel,
    phase: LoopPhase,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let panel = config.controls.to_panel();
        Self {
            config,
            panel,
            phase: LoopPhase::Uninitialized,
        }
    }

    /// Create the window and renderer, push the initial uniforms, and
    /// request the first frame
    fn start(&self, event_loop: &ActiveEventLoop) -> Result<Running, Box<dyn std::error::Error>> {
        let window = WindowSystem::create(event_loop, &self.config.window)?;
        let mut renderer = RenderSystem::initialize(window.window().clone(), &self.config)?;

        let mut render_loop = RenderLoop::new(renderer.index_count());
        render_loop.begin(&mut renderer);

        // Apply the controls once
        render_loop.set_axis(&mut renderer, self.panel.axis());
        window.update_title(&render_loop.display(&self.panel.speed_text()));

        let mut driver = Driver::new(window.scheduler());
        driver.start();

        Ok(Running {
            window,
            renderer,
            render_loop,
            driver,
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.phase, LoopPhase::Uninitialized) {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => {
                log::info!("Running");
                self.phase = LoopPhase::Running(Box::new(running));
            }
            Err(e) => {
                log::error!("Initialization failed: {}", e);
                self.phase = LoopPhase::Halted;
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let LoopPhase::Running(running) = &mut self.phase else {
            return;
        };
        let Running {
            window,
            renderer,
            render_loop,
            driver,
        } = running.as_mut();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                renderer.resize(physical_size.width, physical_size.height);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match InputMapper::map_keyboard(key, event.state) {
                        Some(InputAction::Exit) => {
                            event_loop.exit();
                            return;
                        }
                        Some(InputAction::ToggleFullscreen) => {
                            window.toggle_fullscreen();
                            return;
                        }
                        None => {}
                    }

                    if let Some(change) = self.panel.process_keyboard(key, event.state) {
                        if change.axis {
                            render_loop.set_axis(renderer, self.panel.axis());
                        }
                        if change.any() {
                            let display = render_loop.display(&self.panel.speed_text());
                            log::debug!("Controls: {}", display.summary());
                            window.update_title(&display);
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                let speed = self.panel.speed();
                let speed_text = self.panel.speed_text();
                let result = driver.on_frame(|| render_loop.tick(renderer, speed, &speed_text));

                match result {
                    Ok(display) => window.update_title(&display),
                    Err(RenderError::SurfaceLost) => {
                        log::warn!("Surface lost, skipping frame");
                    }
                    Err(RenderError::OutOfMemory) => {
                        log::error!("GPU out of memory");
                        event_loop.exit();
                    }
                    Err(e) => log::error!("{}", e),
                }
            }

            _ => {}
        }
    }
}

fn main() {
    let config = AppConfig::load();

    // Initialize logging; RUST_LOG overrides the configured level
    let log_level = config
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
    log::info!("Starting spincube");

    let config = config.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            return;
        }
    };

    let mut app = App::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}
