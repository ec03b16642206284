//! Rotation controls
//!
//! This crate provides the control panel that sets the cube's rotation
//! axis and speed: four range controls and the keys that move them.

mod range_control;
mod control_panel;

pub use range_control::RangeControl;
pub use control_panel::{AxisPreset, ControlAction, ControlId, ControlPanel, PanelChange};
