//! Input mapping from raw events to semantic actions
//!
//! Maps keyboard input to application-level actions like Exit and
//! ToggleFullscreen. Axis and speed keys are NOT mapped here - they go
//! directly to the ControlPanel.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions triggered by application keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Exit application (Escape)
    Exit,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
}

/// Maps raw input events to semantic actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `Some(action)` for application keys, `None` for control keys
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Escape => Some(InputAction::Exit),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            _ => None,
        }
    }
}
