//! Rotation state
//!
//! The host only accumulates the angle and stores the axis; the rotation
//! itself happens in the vertex shader.

/// Axis along the main diagonal of the cube
pub const DIAGONAL_AXIS: [f32; 3] = [1.0, 1.0, 1.0];

/// Degrees of `angle` (radians) reduced modulo 360, keeping the sign
pub fn wrapped_degrees(angle: f64) -> f64 {
    (angle * 180.0 / std::f64::consts::PI) % 360.0
}

/// Angle, axis, and fixed point of the cube's rotation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationState {
    /// Accumulated angle in radians. Never wrapped.
    pub angle: f64,
    /// Rotation axis as set by the controls. Not normalized.
    pub axis: [f32; 3],
    /// Point the cube rotates around
    pub fixed_point: [f32; 3],
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationState {
    /// Angle zero about the main diagonal, centered on the origin
    pub fn new() -> Self {
        Self {
            angle: 0.0,
            axis: DIAGONAL_AXIS,
            fixed_point: [0.0, 0.0, 0.0],
        }
    }

    /// Add one frame's increment to the angle and return the new angle
    pub fn advance(&mut self, speed: f64) -> f64 {
        self.angle += speed;
        self.angle
    }

    /// Replace the axis verbatim
    pub fn set_axis(&mut self, axis: [f32; 3]) {
        self.axis = axis;
    }

    /// Angle in the precision the shader uniform takes
    pub fn angle_f32(&self) -> f32 {
        self.angle as f32
    }

    /// Angle in degrees, reduced modulo 360 with the sign of the angle
    pub fn display_degrees(&self) -> f64 {
        wrapped_degrees(self.angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = RotationState::new();
        assert_eq!(state.angle, 0.0);
        assert_eq!(state.axis, [1.0, 1.0, 1.0]);
        assert_eq!(state.fixed_point, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_advance_accumulates_without_wrapping() {
        let mut state = RotationState::new();
        for _ in 0..100 {
            state.advance(0.5);
        }
        // 50 radians is far past 2*pi and stays unwrapped
        assert_eq!(state.angle, 50.0);
    }

    #[test]
    fn test_set_axis_is_not_normalized() {
        let mut state = RotationState::new();
        state.set_axis([2.0, 0.0, 0.0]);
        assert_eq!(state.axis, [2.0, 0.0, 0.0]);
        state.set_axis([0.0, 0.0, 0.0]);
        assert_eq!(state.axis, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_display_degrees_wraps() {
        let mut state = RotationState::new();
        state.angle = std::f64::consts::PI * 3.0; // 540 degrees
        assert!((state.display_degrees() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_degrees_keeps_sign() {
        let mut state = RotationState::new();
        state.angle = -std::f64::consts::PI * 2.5; // -450 degrees
        assert!((state.display_degrees() + 90.0).abs() < 1e-9);
    }
}
