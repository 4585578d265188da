use crate::spin::SphereSpin;
use foundation::time::Time;

/// Fixed-timestep clock driving the globe's animation.
///
/// The automatic spin advances per tick rather than per wall-clock sample,
/// so identical tick sequences replay identically no matter how the browser
/// schedules animation frames.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameClock {
    ticks: u64,
    dt_s: f64,
}

impl FrameClock {
    pub fn new(dt_s: f64) -> Self {
        Self { ticks: 0, dt_s }
    }

    pub fn dt_s(&self) -> f64 {
        self.dt_s
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Engine time at the current tick (seconds).
    pub fn time(&self) -> Time {
        Time(self.ticks as f64 * self.dt_s)
    }

    /// Advances one frame: counts the tick and applies one timestep of
    /// automatic spin. Returns the new engine time.
    pub fn tick(&mut self, spin: &mut SphereSpin) -> Time {
        self.ticks += 1;
        spin.advance(self.dt_s);
        self.time()
    }
}
