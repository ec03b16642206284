//! A numeric range control with min, max, step, and value
//!
//! Behaves like an HTML range input: the value stays inside `[min, max]`
//! and on the grid `min + k * step`, rounded to the decimal places of `min`
//! and `step` so repeated stepping does not drift.

use serde::{Deserialize, Serialize};

/// A bounded, stepped value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeControl {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
}

impl RangeControl {
    /// Create a control; `value` is clamped and snapped to the grid
    pub fn new(min: f64, max: f64, step: f64, value: f64) -> Self {
        let mut control = Self {
            min,
            max,
            step,
            value,
        };
        control.value = control.snap(value);
        control
    }

    /// The same control with its bounds and value made consistent
    ///
    /// Swapped bounds are reordered, a non-finite bound collapses onto the
    /// other one (or zero), and a non-positive step becomes the whole range.
    pub fn normalized(&self) -> Self {
        let lo = finite_or(self.min, finite_or(self.max, 0.0));
        let hi = finite_or(self.max, lo);
        let (min, max) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let step = if self.step > 0.0 && self.step.is_finite() {
            self.step
        } else {
            (max - min).max(1.0)
        };
        Self::new(min, max, step, self.value)
    }

    /// Number of decimal places grid points can carry
    pub fn decimals(&self) -> usize {
        decimal_places(self.step).max(decimal_places(self.min))
    }

    /// Whether both bounds are finite numbers
    pub fn has_finite_bounds(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    fn round(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.decimals() as i32);
        // + 0.0 turns -0.0 into 0.0
        (value * scale).round() / scale + 0.0
    }

    /// Clamp `value` into range and onto the step grid
    pub fn snap(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.round(self.min);
        }
        // max/min rather than clamp: unnormalized bounds must not panic
        let clamped = value.max(self.min).min(self.max);
        let steps = ((clamped - self.min) / self.step).round();
        let mut snapped = self.round(self.min + steps * self.step);
        if snapped > self.max {
            snapped = self.round(self.min + (steps - 1.0) * self.step);
        }
        snapped
    }

    /// Set the value, returning whether it changed
    pub fn set(&mut self, value: f64) -> bool {
        let snapped = self.snap(value);
        let changed = snapped != self.value;
        self.value = snapped;
        changed
    }

    /// Move one step up, returning whether the value changed
    pub fn step_up(&mut self) -> bool {
        self.set(self.value + self.step)
    }

    /// Move one step down, returning whether the value changed
    pub fn step_down(&mut self) -> bool {
        self.set(self.value - self.step)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// The value as shown to the user: shortest form, no trailing zeros
    pub fn value_text(&self) -> String {
        format!("{}", self.value)
    }
}

fn decimal_places(value: f64) -> usize {
    let text = value.to_string();
    text.split_once('.').map(|(_, frac)| frac.len()).unwrap_or(0)
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_and_snaps() {
        assert_eq!(RangeControl::new(-1.0, 1.0, 0.1, 3.0).value, 1.0);
        assert_eq!(RangeControl::new(-1.0, 1.0, 0.1, -7.0).value, -1.0);
        assert_eq!(RangeControl::new(-1.0, 1.0, 0.1, 0.26).value, 0.3);
        assert_eq!(RangeControl::new(0.0, 0.1, 0.005, 0.0101).value, 0.01);
    }

    #[test]
    fn test_decimals() {
        assert_eq!(RangeControl::new(-1.0, 1.0, 0.1, 0.0).decimals(), 1);
        assert_eq!(RangeControl::new(0.0, 0.1, 0.005, 0.0).decimals(), 3);
        assert_eq!(RangeControl::new(0.0, 10.0, 1.0, 0.0).decimals(), 0);
    }

    #[test]
    fn test_stepping_does_not_drift() {
        let mut control = RangeControl::new(-1.0, 1.0, 0.1, 1.0);
        for _ in 0..7 {
            control.step_down();
        }
        assert_eq!(control.value, 0.3);
        assert_eq!(control.value_text(), "0.3");
        for _ in 0..13 {
            control.step_down();
        }
        assert_eq!(control.value, -1.0);
    }

    #[test]
    fn test_step_at_bound_reports_no_change() {
        let mut control = RangeControl::new(-1.0, 1.0, 0.1, 1.0);
        assert!(!control.step_up());
        assert!(control.step_down());
        assert_eq!(control.value, 0.9);
    }

    #[test]
    fn test_value_text() {
        assert_eq!(RangeControl::new(-1.0, 1.0, 0.1, 1.0).value_text(), "1");
        assert_eq!(RangeControl::new(0.0, 0.1, 0.005, 0.01).value_text(), "0.01");
        assert_eq!(RangeControl::new(-1.0, 1.0, 0.1, -0.5).value_text(), "-0.5");
        assert_eq!(RangeControl::new(-1.0, 1.0, 0.1, -0.01).value_text(), "0");
    }

    #[test]
    fn test_max_off_grid_snaps_below() {
        let control = RangeControl::new(0.0, 1.0, 0.3, 1.0);
        assert_eq!(control.value, 0.9);
    }

    #[test]
    fn test_normalized_repairs_bounds_and_step() {
        let control = RangeControl {
            min: 1.0,
            max: -1.0,
            step: 0.0,
            value: 0.4,
        }
        .normalized();
        assert_eq!((control.min, control.max), (-1.0, 1.0));
        assert!(control.step > 0.0);
        assert!(control.value >= -1.0 && control.value <= 1.0);
    }

    #[test]
    fn test_decimals_include_min() {
        assert_eq!(RangeControl::new(0.05, 1.0, 0.1, 0.05).decimals(), 2);
    }

    #[test]
    fn test_off_decimal_min_stays_on_grid() {
        assert_eq!(RangeControl::new(0.05, 1.0, 0.1, 0.05).value, 0.05);

        let mut control = RangeControl::new(0.05, 1.0, 0.1, 0.55);
        assert_eq!(control.value, 0.55);
        assert!(control.step_down());
        assert_eq!(control.value, 0.45);
        assert!(control.step_up());
        assert!(control.step_up());
        assert_eq!(control.value, 0.65);
    }

    #[test]
    fn test_normalized_replaces_nan_bound() {
        let control: RangeControl =
            toml::from_str("min = nan\nmax = 0.1\nstep = 0.005\nvalue = 0.01").unwrap();
        assert!(!control.has_finite_bounds());

        let control = control.normalized();
        assert!(control.has_finite_bounds());
        assert_eq!((control.min, control.max), (0.1, 0.1));
        assert_eq!(control.value, 0.1);
    }

    #[test]
    fn test_normalized_with_both_bounds_infinite() {
        let control = RangeControl {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            step: 0.1,
            value: 0.5,
        }
        .normalized();
        assert_eq!((control.min, control.max), (0.0, 0.0));
        assert_eq!(control.value, 0.0);
    }

    #[test]
    fn test_snap_with_nan_bound_does_not_panic() {
        let control = RangeControl {
            min: f64::NAN,
            max: 1.0,
            step: 0.1,
            value: 0.5,
        };
        let _ = control.snap(0.5);
    }

    #[test]
    fn test_nan_snaps_to_min() {
        let mut control = RangeControl::new(0.0, 0.1, 0.005, 0.01);
        control.set(f64::NAN);
        assert_eq!(control.value, 0.0);
    }

    #[test]
    fn test_deserialize_from_toml() {
        let control: RangeControl =
            toml::from_str("min = 0.0\nmax = 0.1\nstep = 0.005\nvalue = 0.02").unwrap();
        assert_eq!(control, RangeControl::new(0.0, 0.1, 0.005, 0.02));
    }
}
