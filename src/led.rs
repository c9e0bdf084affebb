//! LED pattern driver
//!
//! Turns the current security mode into blink cadences. All timing is
//! counted in foreground ticks, so cadences only hold while the foreground
//! period stays fixed.
//!
//! - Disarmed: both LEDs toggle every `disarmed_toggle` ticks while touched
//! - Armed: A off / B on at `armed_half_period`, swapped at twice that
//! - AlarmSounding: latched LED toggles every `alarm_toggle` ticks
//! - Undefined mode: both off

use crate::board::{LedChannel, Leds};
use crate::config::{AlarmConfig, Thresholds};
use crate::security::{SecurityMode, TouchLatch};

/// LED pattern driver
pub struct LedPatternDriver {
    thresholds: Thresholds,
    /// Ticks since the last cadence wrap or mode change
    counter: u32,
}

impl LedPatternDriver {
    pub fn new(config: &AlarmConfig) -> Self {
        Self {
            thresholds: config.thresholds(),
            counter: 0,
        }
    }

    /// Ticks counted in the current cadence window
    #[inline]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    #[inline]
    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Restart the cadence (call on every mode change)
    #[inline]
    pub fn reset(&mut self) {
        self.counter = 0;
    }

    /// Periodic tick, after the state machine has run
    ///
    /// # Arguments
    /// * `mode` - Current mode, `None` if undefined
    /// * `latch` - Pad that tripped the alarm
    /// * `touching` - Raw touch signal (not the latch)
    pub fn tick<L: Leds + ?Sized>(
        &mut self,
        mode: Option<SecurityMode>,
        latch: TouchLatch,
        touching: bool,
        leds: &mut L,
    ) {
        match mode {
            Some(SecurityMode::Disarmed) => {
                if touching {
                    self.counter += 1;
                    if self.counter >= u32::from(self.thresholds.disarmed_toggle) {
                        leds.toggle_led(LedChannel::A);
                        leds.toggle_led(LedChannel::B);
                        self.counter = 0;
                    }
                }
            }
            Some(SecurityMode::Armed) => {
                let half = u32::from(self.thresholds.armed_half_period);
                self.counter += 1;
                if self.counter == half {
                    leds.set_led(LedChannel::A, false);
                    leds.set_led(LedChannel::B, true);
                } else if self.counter >= half * 2 {
                    leds.set_led(LedChannel::A, true);
                    leds.set_led(LedChannel::B, false);
                    self.counter = 0;
                }
            }
            Some(SecurityMode::AlarmSounding) => {
                self.counter += 1;
                if self.counter >= u32::from(self.thresholds.alarm_toggle) {
                    if let Some(channel) = latch.led() {
                        leds.toggle_led(channel);
                    }
                    self.counter = 0;
                }
            }
            None => {
                leds.set_led(LedChannel::A, false);
                leds.set_led(LedChannel::B, false);
            }
        }
    }
}
