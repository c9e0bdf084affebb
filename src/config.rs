//! Module: config
//!
//! Purpose: Static configuration for the alarm core.
//!
//! All LED cadences are stored in milliseconds and converted to foreground
//! tick thresholds here, so the rest of the crate never hard-codes a tick
//! count. The cadences only hold if the foreground period is exactly
//! [`POLL_PERIOD_MS`]; the board's wait primitive is responsible for that.

use crate::board::Key;

/// Number of samples in one period of the alarm tone.
pub const SAMPLES_PER_PERIOD: usize = 64;

/// Fundamental frequency of the alarm tone.
pub const TONE_HZ: u32 = 300;

/// Sample-timer rate: one table entry per tick, one table per tone period.
pub const SAMPLE_RATE_HZ: u32 = TONE_HZ * SAMPLES_PER_PERIOD as u32;

/// Foreground polling period.
pub const POLL_PERIOD_MS: u32 = 10;

/// Highest touch-electrode channel that fits in the touch flag word.
pub const MAX_TOUCH_CHANNEL: u8 = 15;

/// Longest cadence in foreground ticks. The armed blink counts to twice
/// its half period, which must still fit in a `u16` threshold.
pub const MAX_CADENCE_TICKS: u32 = u16::MAX as u32 / 2;

/// Configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// C01: Foreground period is zero
    ZeroPeriod,
    /// C02: Cadence is not a whole number of foreground ticks
    CadenceNotAligned,
    /// C03: Cadence shorter than one foreground tick
    CadenceTooShort,
    /// C04: Arm and disarm share the same key
    KeyConflict,
    /// C05: Pad channel out of range or shared by both pads
    BadPadChannel,
    /// C06: Cadence longer than `MAX_CADENCE_TICKS` foreground ticks
    CadenceTooLong,
}

impl ConfigError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ZeroPeriod => "C01",
            Self::CadenceNotAligned => "C02",
            Self::CadenceTooShort => "C03",
            Self::KeyConflict => "C04",
            Self::BadPadChannel => "C05",
            Self::CadenceTooLong => "C06",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::ZeroPeriod => "poll period is zero",
            Self::CadenceNotAligned => "cadence not a multiple of poll period",
            Self::CadenceTooShort => "cadence shorter than poll period",
            Self::KeyConflict => "arm and disarm keys are equal",
            Self::BadPadChannel => "invalid pad channel",
            Self::CadenceTooLong => "cadence too long for tick counter",
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// LED cadences in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CadenceConfig {
    /// Disarmed: both LEDs toggle at this interval while a pad is touched.
    pub disarmed_toggle_ms: u32,
    /// Armed: LEDs swap at this interval (full blink period is twice this).
    pub armed_half_period_ms: u32,
    /// AlarmSounding: latched LED toggles at this interval.
    pub alarm_toggle_ms: u32,
}

impl CadenceConfig {
    pub const DEFAULT: Self = Self {
        disarmed_toggle_ms: 250,
        armed_half_period_ms: 250,
        alarm_toggle_ms: 50,
    };
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Tick thresholds derived from [`CadenceConfig`] for a given period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thresholds {
    pub disarmed_toggle: u16,
    /// First armed threshold; the second one is twice this value.
    pub armed_half_period: u16,
    pub alarm_toggle: u16,
}

/// Alarm core configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlarmConfig {
    /// Foreground polling period in milliseconds.
    pub poll_period_ms: u32,
    pub cadence: CadenceConfig,
    /// Key that arms the system from Disarmed.
    pub arm_key: Key,
    /// Key that disarms the system from Armed or AlarmSounding.
    pub disarm_key: Key,
    /// Touch-electrode channel of Pad1 (bit in the touch flag word).
    pub pad1_channel: u8,
    /// Touch-electrode channel of Pad2.
    pub pad2_channel: u8,
}

impl AlarmConfig {
    pub const DEFAULT: Self = Self {
        poll_period_ms: POLL_PERIOD_MS,
        cadence: CadenceConfig::DEFAULT,
        arm_key: Key::A,
        disarm_key: Key::D,
        pad1_channel: 9,
        pad2_channel: 10,
    };

    /// Default cadences with a different foreground period.
    pub fn with_poll_period(poll_period_ms: u32) -> Self {
        Self {
            poll_period_ms,
            ..Self::DEFAULT
        }
    }

    /// Check the configuration for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_period_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }

        for ms in [
            self.cadence.disarmed_toggle_ms,
            self.cadence.armed_half_period_ms,
            self.cadence.alarm_toggle_ms,
        ] {
            if ms < self.poll_period_ms {
                return Err(ConfigError::CadenceTooShort);
            }
            if ms % self.poll_period_ms != 0 {
                return Err(ConfigError::CadenceNotAligned);
            }
            if ms / self.poll_period_ms > MAX_CADENCE_TICKS {
                return Err(ConfigError::CadenceTooLong);
            }
        }

        if self.arm_key == self.disarm_key {
            return Err(ConfigError::KeyConflict);
        }

        if self.pad1_channel == self.pad2_channel
            || self.pad1_channel > MAX_TOUCH_CHANNEL
            || self.pad2_channel > MAX_TOUCH_CHANNEL
        {
            return Err(ConfigError::BadPadChannel);
        }

        Ok(())
    }

    /// Convert a cadence to foreground ticks (at least one).
    ///
    /// Saturates at `u16::MAX`; `validate()` rejects cadences that would.
    #[inline]
    pub fn ticks_for_ms(&self, ms: u32) -> u16 {
        let period = self.poll_period_ms.max(1);
        (ms / period).clamp(1, u16::MAX as u32) as u16
    }

    /// Tick thresholds for the LED pattern driver.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            disarmed_toggle: self.ticks_for_ms(self.cadence.disarmed_toggle_ms),
            armed_half_period: self.ticks_for_ms(self.cadence.armed_half_period_ms),
            alarm_toggle: self.ticks_for_ms(self.cadence.alarm_toggle_ms),
        }
    }
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
