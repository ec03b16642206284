//! Control panel for the rotation axis and speed
//!
//! Controls:
//! - Q/A: axis X up/down
//! - W/S: axis Y up/down
//! - E/D: axis Z up/down
//! - Up/Down arrows: speed up/down
//! - 1/2/3/4: axis presets X, Y, Z, and the cube diagonal

use winit::event::ElementState;
use winit::keyboard::KeyCode;

use crate::range_control::RangeControl;

/// One of the four controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlId {
    AxisX,
    AxisY,
    AxisZ,
    Speed,
}

/// Preset rotation axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPreset {
    /// Rotate about the X axis
    X,
    /// Rotate about the Y axis
    Y,
    /// Rotate about the Z axis
    Z,
    /// Rotate about the cube's main diagonal
    Diagonal,
}

impl AxisPreset {
    pub fn axis(self) -> [f64; 3] {
        match self {
            AxisPreset::X => [1.0, 0.0, 0.0],
            AxisPreset::Y => [0.0, 1.0, 0.0],
            AxisPreset::Z => [0.0, 0.0, 1.0],
            AxisPreset::Diagonal => [1.0, 1.0, 1.0],
        }
    }
}

/// Something a key can do to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    StepUp(ControlId),
    StepDown(ControlId),
    Preset(AxisPreset),
}

/// What an applied action changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelChange {
    pub axis: bool,
    pub speed: bool,
}

impl PanelChange {
    pub fn any(&self) -> bool {
        self.axis || self.speed
    }
}

/// The four range controls
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanel {
    axis_x: RangeControl,
    axis_y: RangeControl,
    axis_z: RangeControl,
    speed: RangeControl,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlPanel {
    /// Axes in -1..1 step 0.1 at 1; speed in 0..0.1 step 0.005 at 0.01
    pub fn new() -> Self {
        Self {
            axis_x: RangeControl::new(-1.0, 1.0, 0.1, 1.0),
            axis_y: RangeControl::new(-1.0, 1.0, 0.1, 1.0),
            axis_z: RangeControl::new(-1.0, 1.0, 0.1, 1.0),
            speed: RangeControl::new(0.0, 0.1, 0.005, 0.01),
        }
    }

    /// Build from arbitrary controls, repairing inconsistent ranges
    pub fn from_controls(
        axis_x: &RangeControl,
        axis_y: &RangeControl,
        axis_z: &RangeControl,
        speed: &RangeControl,
    ) -> Self {
        Self {
            axis_x: axis_x.normalized(),
            axis_y: axis_y.normalized(),
            axis_z: axis_z.normalized(),
            speed: speed.normalized(),
        }
    }

    /// Builder: set the initial axis
    pub fn with_axis(mut self, axis: [f64; 3]) -> Self {
        self.set_axis(axis);
        self
    }

    /// Builder: set the initial speed
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed.set(speed);
        self
    }

    pub fn control(&self, id: ControlId) -> &RangeControl {
        match id {
            ControlId::AxisX => &self.axis_x,
            ControlId::AxisY => &self.axis_y,
            ControlId::AxisZ => &self.axis_z,
            ControlId::Speed => &self.speed,
        }
    }

    fn control_mut(&mut self, id: ControlId) -> &mut RangeControl {
        match id {
            ControlId::AxisX => &mut self.axis_x,
            ControlId::AxisY => &mut self.axis_y,
            ControlId::AxisZ => &mut self.axis_z,
            ControlId::Speed => &mut self.speed,
        }
    }

    /// The rotation axis as read from the three axis controls
    pub fn axis(&self) -> [f32; 3] {
        [
            self.axis_x.value as f32,
            self.axis_y.value as f32,
            self.axis_z.value as f32,
        ]
    }

    /// Per-frame angle increment in radians
    pub fn speed(&self) -> f64 {
        self.speed.value
    }

    /// The speed control's value as displayed
    pub fn speed_text(&self) -> String {
        self.speed.value_text()
    }

    /// Set all three axis controls, returning whether any changed
    pub fn set_axis(&mut self, axis: [f64; 3]) -> bool {
        let x = self.axis_x.set(axis[0]);
        let y = self.axis_y.set(axis[1]);
        let z = self.axis_z.set(axis[2]);
        x || y || z
    }

    /// Apply an action and report what changed
    pub fn apply(&mut self, action: ControlAction) -> PanelChange {
        let (id, changed) = match action {
            ControlAction::StepUp(id) => (Some(id), self.control_mut(id).step_up()),
            ControlAction::StepDown(id) => (Some(id), self.control_mut(id).step_down()),
            ControlAction::Preset(preset) => (None, self.set_axis(preset.axis())),
        };
        match id {
            Some(ControlId::Speed) => PanelChange {
                axis: false,
                speed: changed,
            },
            _ => PanelChange {
                axis: changed,
                speed: false,
            },
        }
    }

    /// Map a key to the action it triggers
    pub fn map_key(key: KeyCode) -> Option<ControlAction> {
        use ControlAction::*;
        match key {
            KeyCode::KeyQ => Some(StepUp(ControlId::AxisX)),
            KeyCode::KeyA => Some(StepDown(ControlId::AxisX)),
            KeyCode::KeyW => Some(StepUp(ControlId::AxisY)),
            KeyCode::KeyS => Some(StepDown(ControlId::AxisY)),
            KeyCode::KeyE => Some(StepUp(ControlId::AxisZ)),
            KeyCode::KeyD => Some(StepDown(ControlId::AxisZ)),
            KeyCode::ArrowUp => Some(StepUp(ControlId::Speed)),
            KeyCode::ArrowDown => Some(StepDown(ControlId::Speed)),
            KeyCode::Digit1 => Some(Preset(AxisPreset::X)),
            KeyCode::Digit2 => Some(Preset(AxisPreset::Y)),
            KeyCode::Digit3 => Some(Preset(AxisPreset::Z)),
            KeyCode::Digit4 => Some(Preset(AxisPreset::Diagonal)),
            _ => None,
        }
    }

    /// Process keyboard input
    ///
    /// Returns `None` for keys the panel does not use and for releases.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> Option<PanelChange> {
        if state != ElementState::Pressed {
            return None;
        }
        Self::map_key(key).map(|action| self.apply(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let panel = ControlPanel::new();
        assert_eq!(panel.axis(), [1.0, 1.0, 1.0]);
        assert_eq!(panel.speed(), 0.01);
        assert_eq!(panel.speed_text(), "0.01");
        let speed = panel.control(ControlId::Speed);
        assert_eq!((speed.min, speed.max, speed.step), (0.0, 0.1, 0.005));
    }

    #[test]
    fn test_preset_x_gives_unit_x_axis() {
        let mut panel = ControlPanel::new();
        let change = panel.apply(ControlAction::Preset(AxisPreset::X));
        assert_eq!(change, PanelChange { axis: true, speed: false });
        assert_eq!(panel.axis(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_repeated_preset_reports_no_change() {
        let mut panel = ControlPanel::new();
        let change = panel.apply(ControlAction::Preset(AxisPreset::Diagonal));
        assert!(!change.any());
    }

    #[test]
    fn test_speed_steps() {
        let mut panel = ControlPanel::new();
        let change = panel.apply(ControlAction::StepUp(ControlId::Speed));
        assert_eq!(change, PanelChange { axis: false, speed: true });
        assert_eq!(panel.speed_text(), "0.015");

        panel.apply(ControlAction::StepDown(ControlId::Speed));
        panel.apply(ControlAction::StepDown(ControlId::Speed));
        panel.apply(ControlAction::StepDown(ControlId::Speed));
        assert_eq!(panel.speed(), 0.0);
        assert_eq!(panel.speed_text(), "0");
    }

    #[test]
    fn test_axis_keys() {
        let mut panel = ControlPanel::new();
        let change = panel.process_keyboard(KeyCode::KeyA, ElementState::Pressed);
        assert_eq!(change, Some(PanelChange { axis: true, speed: false }));
        assert_eq!(panel.axis(), [0.9, 1.0, 1.0]);

        panel.process_keyboard(KeyCode::KeyS, ElementState::Pressed);
        panel.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        assert_eq!(panel.axis(), [0.9, 0.9, 0.9]);

        // Already at the top of the range
        let change = panel.process_keyboard(KeyCode::KeyQ, ElementState::Pressed);
        assert_eq!(change, Some(PanelChange { axis: true, speed: false }));
        let change = panel.process_keyboard(KeyCode::KeyQ, ElementState::Pressed);
        assert_eq!(change, Some(PanelChange::default()));
    }

    #[test]
    fn test_release_and_unknown_keys_ignored() {
        let mut panel = ControlPanel::new();
        assert_eq!(panel.process_keyboard(KeyCode::KeyQ, ElementState::Released), None);
        assert_eq!(panel.process_keyboard(KeyCode::KeyF, ElementState::Pressed), None);
        assert_eq!(panel.process_keyboard(KeyCode::Escape, ElementState::Pressed), None);
        assert_eq!(panel, ControlPanel::new());
    }

    #[test]
    fn test_digit_presets() {
        let mut panel = ControlPanel::new();
        panel.process_keyboard(KeyCode::Digit2, ElementState::Pressed);
        assert_eq!(panel.axis(), [0.0, 1.0, 0.0]);
        panel.process_keyboard(KeyCode::Digit3, ElementState::Pressed);
        assert_eq!(panel.axis(), [0.0, 0.0, 1.0]);
        panel.process_keyboard(KeyCode::Digit4, ElementState::Pressed);
        assert_eq!(panel.axis(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_from_controls_and_builders() {
        let axis = RangeControl::new(-2.0, 2.0, 0.5, 0.0);
        let speed = RangeControl::new(0.0, 1.0, 0.05, 0.1);
        let panel = ControlPanel::from_controls(&axis, &axis, &axis, &speed)
            .with_axis([2.0, -0.4, 9.0])
            .with_speed(0.27);
        assert_eq!(panel.axis(), [2.0, -0.5, 2.0]);
        assert_eq!(panel.speed(), 0.25);
    }
}
