//! Per-frame render loop
//!
//! The loop owns the rotation state and talks to the GPU only through a
//! [`FrameSink`], so ticks can be driven without a device.

use crate::display::FactDisplay;
use crate::rotation::RotationState;

/// Destination for uniforms and draw calls
pub trait FrameSink {
    type Error;

    /// Write the fixed-point uniform
    fn push_fixed_point(&mut self, point: [f32; 3]);
    /// Write the rotation-axis uniform
    fn push_axis(&mut self, axis: [f32; 3]);
    /// Write the rotation-angle uniform
    fn push_angle(&mut self, angle: f32);
    /// Clear color and depth, then draw `index_count` indices as triangles
    fn draw_indexed(&mut self, index_count: u32) -> Result<(), Self::Error>;
}

/// Rotation state plus the draw it drives each frame
#[derive(Clone, Debug)]
pub struct RenderLoop {
    state: RotationState,
    index_count: u32,
    frames: u64,
}

impl RenderLoop {
    /// Create a loop drawing `index_count` indices per frame
    pub fn new(index_count: u32) -> Self {
        Self {
            state: RotationState::new(),
            index_count,
            frames: 0,
        }
    }

    /// Current rotation state
    pub fn state(&self) -> &RotationState {
        &self.state
    }

    /// Number of frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Push the initial fixed point and axis
    pub fn begin<S: FrameSink>(&mut self, sink: &mut S) {
        sink.push_fixed_point(self.state.fixed_point);
        sink.push_axis(self.state.axis);
    }

    /// Overwrite the axis and its uniform immediately
    pub fn set_axis<S: FrameSink>(&mut self, sink: &mut S, axis: [f32; 3]) {
        self.state.set_axis(axis);
        sink.push_axis(axis);
    }

    /// Run one frame: advance the angle by `speed`, push it, draw, and return
    /// the refreshed read-outs
    ///
    /// The angle is advanced even when the draw fails.
    pub fn tick<S: FrameSink>(
        &mut self,
        sink: &mut S,
        speed: f64,
        speed_text: &str,
    ) -> Result<FactDisplay, S::Error> {
        self.state.advance(speed);
        sink.push_angle(self.state.angle_f32());
        sink.draw_indexed(self.index_count)?;
        self.frames += 1;

        let display = FactDisplay::from_state(&self.state, speed_text);
        log::trace!("frame {}: {}", self.frames, display.summary());
        Ok(display)
    }

    /// Read-outs for the current state without drawing
    pub fn display(&self, speed_text: &str) -> FactDisplay {
        FactDisplay::from_state(&self.state, speed_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        FixedPoint([f32; 3]),
        Axis([f32; 3]),
        Angle(f32),
        Draw(u32),
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<Call>,
        fail_draws: bool,
    }

    impl FrameSink for RecordingSink {
        type Error = &'static str;

        fn push_fixed_point(&mut self, point: [f32; 3]) {
            self.calls.push(Call::FixedPoint(point));
        }

        fn push_axis(&mut self, axis: [f32; 3]) {
            self.calls.push(Call::Axis(axis));
        }

        fn push_angle(&mut self, angle: f32) {
            self.calls.push(Call::Angle(angle));
        }

        fn draw_indexed(&mut self, index_count: u32) -> Result<(), Self::Error> {
            if self.fail_draws {
                return Err("surface lost");
            }
            self.calls.push(Call::Draw(index_count));
            Ok(())
        }
    }

    #[test]
    fn test_begin_pushes_fixed_point_and_axis() {
        let mut sink = RecordingSink::default();
        let mut render_loop = RenderLoop::new(36);
        render_loop.begin(&mut sink);
        assert_eq!(
            sink.calls,
            vec![Call::FixedPoint([0.0, 0.0, 0.0]), Call::Axis([1.0, 1.0, 1.0])]
        );
    }

    #[test]
    fn test_tick_pushes_angle_then_draws_all_indices() {
        let mut sink = RecordingSink::default();
        let mut render_loop = RenderLoop::new(36);
        render_loop.tick(&mut sink, 0.5, "0.5").unwrap();
        assert_eq!(sink.calls, vec![Call::Angle(0.5), Call::Draw(36)]);
    }

    #[test]
    fn test_n_ticks_accumulate_exactly() {
        let mut sink = RecordingSink::default();
        let mut render_loop = RenderLoop::new(36);
        let speed = 0.25;
        let n = 1000;
        for _ in 0..n {
            render_loop.tick(&mut sink, speed, "0.25").unwrap();
        }
        assert_eq!(render_loop.state().angle, n as f64 * speed);
        assert_eq!(render_loop.frames(), n);
    }

    #[test]
    fn test_displayed_angle_wraps_but_state_does_not() {
        let mut sink = RecordingSink::default();
        let mut render_loop = RenderLoop::new(36);
        let speed = 0.5;
        let mut display = render_loop.display("0.5");
        for _ in 0..40 {
            display = render_loop.tick(&mut sink, speed, "0.5").unwrap();
        }
        let angle = render_loop.state().angle;
        assert_eq!(angle, 20.0);
        let expected = (20.0 * 180.0 / PI) % 360.0;
        assert_eq!(display.rotation_angle, format!("{:.2} degrees", expected));
    }

    #[test]
    fn test_negative_speed_displays_negative_degrees() {
        let mut sink = RecordingSink::default();
        let mut render_loop = RenderLoop::new(36);
        for _ in 0..8 {
            render_loop.tick(&mut sink, -0.5, "-0.5").unwrap();
        }
        assert_eq!(render_loop.state().angle, -4.0);
        let expected = (-4.0 * 180.0 / PI) % 360.0;
        assert!(expected < 0.0);
        assert_eq!(
            render_loop.display("-0.5").rotation_angle,
            format!("{:.2} degrees", expected)
        );
    }

    #[test]
    fn test_set_axis_pushes_immediately_and_is_not_normalized() {
        let mut sink = RecordingSink::default();
        let mut render_loop = RenderLoop::new(36);
        render_loop.set_axis(&mut sink, [1.0, 0.0, 0.0]);
        assert_eq!(render_loop.state().axis, [1.0, 0.0, 0.0]);
        assert_eq!(sink.calls, vec![Call::Axis([1.0, 0.0, 0.0])]);
        assert_eq!(
            render_loop.display("0.01").rotation_axis,
            "[1.00,0.00,0.00] (normalized)"
        );

        render_loop.set_axis(&mut sink, [3.0, 4.0, 0.0]);
        assert_eq!(render_loop.state().axis, [3.0, 4.0, 0.0]);
    }

    #[test]
    fn test_failed_draw_still_advances_angle() {
        let mut sink = RecordingSink {
            fail_draws: true,
            ..Default::default()
        };
        let mut render_loop = RenderLoop::new(36);
        assert!(render_loop.tick(&mut sink, 0.5, "0.5").is_err());
        assert_eq!(render_loop.state().angle, 0.5);
        assert_eq!(render_loop.frames(), 0);
    }
}
