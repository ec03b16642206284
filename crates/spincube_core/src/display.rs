//! Text read-outs for the current axis, angle, and speed

use crate::rotation::{wrapped_degrees, RotationState};

/// Format the axis as `[x,y,z] (normalized)` with two decimals per component
///
/// The label is descriptive; the components are printed as stored.
pub fn format_axis(axis: [f32; 3]) -> String {
    format!(
        "[{},{},{}] (normalized)",
        fixed2(axis[0] as f64),
        fixed2(axis[1] as f64),
        fixed2(axis[2] as f64)
    )
}

/// Format an angle in radians as degrees modulo 360
pub fn format_angle_degrees(angle: f64) -> String {
    format!("{} degrees", fixed2(wrapped_degrees(angle)))
}

/// Format the speed control's value text
pub fn format_speed(speed_text: &str) -> String {
    format!("{} (radians per frame)", speed_text)
}

/// Two decimals, ties rounded away from zero
fn fixed2(value: f64) -> String {
    // -0.0 + 0.0 == +0.0, so a zero never prints with a sign
    let rounded = (value * 100.0).round() / 100.0 + 0.0;
    format!("{:.2}", rounded)
}

/// The three read-outs shown to the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactDisplay {
    pub rotation_axis: String,
    pub rotation_angle: String,
    pub rotation_speed: String,
}

impl FactDisplay {
    /// Build the read-outs from raw values
    pub fn new(axis: [f32; 3], angle: f64, speed_text: &str) -> Self {
        Self {
            rotation_axis: format_axis(axis),
            rotation_angle: format_angle_degrees(angle),
            rotation_speed: format_speed(speed_text),
        }
    }

    /// Build the read-outs from the rotation state
    pub fn from_state(state: &RotationState, speed_text: &str) -> Self {
        Self::new(state.axis, state.angle, speed_text)
    }

    /// Single-line summary, used for the window title
    pub fn summary(&self) -> String {
        format!(
            "axis {} | angle {} | speed {}",
            self.rotation_axis, self.rotation_angle, self.rotation_speed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_axis_format() {
        assert_eq!(format_axis([1.0, 0.0, 0.0]), "[1.00,0.00,0.00] (normalized)");
        assert_eq!(format_axis([-0.5, 1.0, 0.25]), "[-0.50,1.00,0.25] (normalized)");
    }

    #[test]
    fn test_axis_format_rounds_ties_away_from_zero() {
        assert_eq!(
            format_axis([0.125, -0.125, 0.375]),
            "[0.13,-0.13,0.38] (normalized)"
        );
        assert_eq!(format_axis([-0.001, 0.0, 0.0]), "[0.00,0.00,0.00] (normalized)");
    }

    #[test]
    fn test_axis_format_does_not_normalize() {
        assert_eq!(format_axis([1.0, 1.0, 1.0]), "[1.00,1.00,1.00] (normalized)");
    }

    #[test]
    fn test_angle_format() {
        assert_eq!(format_angle_degrees(0.0), "0.00 degrees");
        assert_eq!(format_angle_degrees(PI / 2.0), "90.00 degrees");
        assert_eq!(format_angle_degrees(PI * 2.5), "90.00 degrees");
    }

    #[test]
    fn test_angle_format_negative() {
        assert_eq!(format_angle_degrees(-PI / 2.0), "-90.00 degrees");
        assert_eq!(format_angle_degrees(-PI * 2.5), "-90.00 degrees");
        assert_eq!(format_angle_degrees(-0.0), "0.00 degrees");
    }

    #[test]
    fn test_speed_format() {
        assert_eq!(format_speed("0.01"), "0.01 (radians per frame)");
    }

    #[test]
    fn test_summary_contains_all_parts() {
        let display = FactDisplay::new([0.0, 1.0, 0.0], PI, "0.05");
        let summary = display.summary();
        assert!(summary.contains("[0.00,1.00,0.00] (normalized)"));
        assert!(summary.contains("180.00 degrees"));
        assert!(summary.contains("0.05 (radians per frame)"));
    }
}
