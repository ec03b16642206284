//! Frame driver
//!
//! Wraps the host's "call me on the next display refresh" primitive so the
//! render tick can be driven by a real window or synchronously in tests.

/// Host primitive that schedules the next frame callback
pub trait FrameScheduler {
    fn request_frame(&self);
}

/// Invokes a tick once per host frame signal and schedules the next one
pub struct Driver<S> {
    scheduler: S,
    ticks: u64,
    started: bool,
}

impl<S: FrameScheduler> Driver<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            ticks: 0,
            started: false,
        }
    }

    /// Request the first frame. Later calls do nothing.
    pub fn start(&mut self) {
        if !self.started {
            self.started = true;
            self.scheduler.request_frame();
        }
    }

    /// Handle one frame signal: run `tick`, then schedule the next frame
    pub fn on_frame<R>(&mut self, tick: impl FnOnce() -> R) -> R {
        let result = tick();
        self.ticks += 1;
        self.scheduler.request_frame();
        result
    }

    /// Drive `n` frames back to back, passing the frame number to `tick`
    pub fn run_ticks(&mut self, n: u64, mut tick: impl FnMut(u64)) {
        for _ in 0..n {
            let frame = self.ticks;
            self.on_frame(|| tick(frame));
        }
    }

    /// Frames handled so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}
