//! Sample-rate timer abstraction.
//!
//! On target the ESP-IDF general-purpose timer calls a [`SampleHandler`]
//! from its alarm interrupt (see `hal::tone`). On the host a
//! [`SteppedClock`] calls the same handler one tick at a time, so phase
//! progression can be tested deterministically.

use crate::config::SAMPLE_RATE_HZ;

/// Analog output device fed once per sample tick.
pub trait SampleOutput {
    /// Write a 12-bit output code.
    fn write_code(&mut self, code: u16);
}

/// Handler registered with the sample timer.
///
/// Runs in interrupt context: no blocking, no allocation, no logging.
pub trait SampleHandler {
    fn on_tick(&mut self);
}

/// Manually-steppable stand-in for the hardware sample timer.
pub struct SteppedClock<H: SampleHandler> {
    handler: H,
    rate_hz: u32,
    ticks: u64,
}

impl<H: SampleHandler> SteppedClock<H> {
    /// Clock running at the alarm sample rate.
    pub fn new(handler: H) -> Self {
        Self::with_rate(handler, SAMPLE_RATE_HZ)
    }

    pub fn with_rate(handler: H, rate_hz: u32) -> Self {
        Self {
            handler,
            rate_hz: rate_hz.max(1),
            ticks: 0,
        }
    }

    /// Fire the handler once.
    #[inline]
    pub fn step(&mut self) {
        self.handler.on_tick();
        self.ticks += 1;
    }

    /// Fire the handler `n` times.
    pub fn advance(&mut self, n: u32) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Fire the handler as many times as the timer would in `us` microseconds.
    ///
    /// Returns the number of ticks fired.
    pub fn advance_us(&mut self, us: u64) -> u64 {
        let n = us * self.rate_hz as u64 / 1_000_000;
        for _ in 0..n {
            self.step();
        }
        n
    }

    /// Ticks fired since creation
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn rate_hz(&self) -> u32 {
        self.rate_hz
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }
}
