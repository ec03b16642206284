//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. Built-in defaults
//! 2. `config/default.toml` (version controlled)
//! 3. `config/user.toml` (gitignored, user overrides)
//! 4. Environment variables (`SPINCUBE_SECTION__KEY`)

use figment::{Figment, providers::{Format, Serialized, Toml, Env}};
use serde::{Serialize, Deserialize};
use spincube_core::preprocess::DEFAULT_MAX_SUBSTITUTIONS;
use spincube_input::{ControlPanel, RangeControl};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Shader source configuration
    #[serde(default)]
    pub shaders: ShaderConfig,
    /// Control panel ranges and initial values
    #[serde(default)]
    pub controls: ControlsConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. built-in defaults
    /// 2. `config/default.toml`
    /// 3. `config/user.toml`
    /// 4. Environment variables (`SPINCUBE_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Optional, gitignored
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // SPINCUBE_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("SPINCUBE_").split("__"));

        let config: AppConfig = figment.extract()?;
        config.controls.validate()?;
        Ok(config)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Spinning Cube".to_string(),
            width: 800,
            height: 800,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Shader source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShaderConfig {
    /// Directory shader paths are resolved against
    pub root: String,
    /// Vertex shader file, relative to `root`
    pub vertex: String,
    /// Fragment shader file, relative to `root`
    pub fragment: String,
    /// Upper bound on `#include` substitutions per source
    pub max_substitutions: usize,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            root: "assets/shaders".to_string(),
            vertex: "vertex.wgsl".to_string(),
            fragment: "fragment.wgsl".to_string(),
            max_substitutions: DEFAULT_MAX_SUBSTITUTIONS,
        }
    }
}

/// Control panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsConfig {
    pub axis_x: RangeControl,
    pub axis_y: RangeControl,
    pub axis_z: RangeControl,
    /// Radians added to the angle each frame
    pub speed: RangeControl,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        let axis = RangeControl::new(-1.0, 1.0, 0.1, 1.0);
        Self {
            axis_x: axis.clone(),
            axis_y: axis.clone(),
            axis_z: axis,
            speed: RangeControl::new(0.0, 0.1, 0.005, 0.01),
        }
    }
}

impl ControlsConfig {
    /// Reject ranges whose bounds are not finite numbers
    pub fn validate(&self) -> Result<(), ConfigError> {
        let controls = [
            ("axis_x", &self.axis_x),
            ("axis_y", &self.axis_y),
            ("axis_z", &self.axis_z),
            ("speed", &self.speed),
        ];
        for (name, control) in controls {
            if !control.has_finite_bounds() {
                return Err(ConfigError {
                    message: format!(
                        "controls.{}: min and max must be finite (got {} and {})",
                        name, control.min, control.max
                    ),
                });
            }
        }
        Ok(())
    }

    /// Build the control panel these settings describe
    pub fn to_panel(&self) -> ControlPanel {
        ControlPanel::from_controls(&self.axis_x, &self.axis_y, &self.axis_z, &self.speed)
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderingConfig {
    /// Background color [r, g, b, a]
    pub background_color: [f32; 4],
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            background_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl RenderingConfig {
    pub fn clear_color(&self) -> wgpu::Color {
        let bg = &self.background_color;
        wgpu::Color {
            r: bg[0] as f64,
            g: bg[1] as f64,
            b: bg[2] as f64,
            a: bg[3] as f64,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
