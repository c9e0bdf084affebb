//! Sample timer and analog output for the alarm tone.
//!
//! The ESP32-S3 has no DAC, so the 12-bit output is an LEDC channel at
//! 12-bit resolution followed by an RC low-pass on the board.
//!
//! The APB clock does not divide evenly into 19.2 kHz: with a divider of 2
//! the alarm count rounds to 2083 (19 203 Hz, tone 300.05 Hz).

use esp_idf_svc::hal::gpio::OutputPin;
use esp_idf_svc::hal::ledc::{
    config::TimerConfig as LedcTimerConfig, LedcChannel, LedcDriver, LedcTimer, LedcTimerDriver,
    Resolution,
};
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::timer::{config::Config as TimerConfig, Timer, TimerDriver};
use esp_idf_svc::hal::units::Hertz;

use super::HalError;
use crate::audio::table::{dac_code, CENTER_SAMPLE};
use crate::config::SAMPLE_RATE_HZ;
use crate::timer::{SampleHandler, SampleOutput};

/// Timer clock divider (APB 80 MHz / 2).
const TIMER_DIVIDER: u32 = 2;

/// LEDC channel used as a 12-bit analog output.
pub struct AnalogOut {
    channel: LedcDriver<'static>,
    // Dropping the timer driver would stop the PWM
    _timer: LedcTimerDriver<'static>,
}

impl AnalogOut {
    /// Configure the LEDC timer and channel, output at the center level.
    pub fn new<T, C>(
        timer: impl Peripheral<P = T> + 'static,
        channel: impl Peripheral<P = C> + 'static,
        pin: impl Peripheral<P = impl OutputPin> + 'static,
    ) -> Result<Self, HalError>
    where
        T: LedcTimer + 'static,
        C: LedcChannel<SpeedMode = T::SpeedMode>,
    {
        let timer = LedcTimerDriver::new(
            timer,
            &LedcTimerConfig::default()
                .frequency(Hertz(SAMPLE_RATE_HZ))
                .resolution(Resolution::Bits12),
        )
        .map_err(HalError::Output)?;

        let mut channel = LedcDriver::new(channel, &timer, pin).map_err(HalError::Output)?;
        channel
            .set_duty(dac_code(CENTER_SAMPLE) as u32)
            .map_err(HalError::Output)?;

        Ok(Self {
            channel,
            _timer: timer,
        })
    }
}

impl SampleOutput for AnalogOut {
    #[inline]
    fn write_code(&mut self, code: u16) {
        let _ = self.channel.set_duty(code as u32);
    }
}

/// Start the sample timer and register `handler` as its interrupt callback.
///
/// The returned driver must be kept alive; dropping it stops the timer.
pub fn start_sample_timer<T, H>(
    timer: impl Peripheral<P = T> + 'static,
    mut handler: H,
) -> Result<TimerDriver<'static>, HalError>
where
    T: Timer,
    H: SampleHandler + Send + 'static,
{
    let config = TimerConfig::new().divider(TIMER_DIVIDER).auto_reload(true);
    let mut driver = TimerDriver::new(timer, &config).map_err(HalError::Timer)?;

    let alarm = (driver.tick_hz() + SAMPLE_RATE_HZ as u64 / 2) / SAMPLE_RATE_HZ as u64;

    driver.set_counter(0).map_err(HalError::Timer)?;
    driver.set_alarm(alarm).map_err(HalError::Timer)?;

    // SAFETY: the callback only touches state it owns plus the atomic
    // tone control word; it never blocks.
    unsafe {
        driver
            .subscribe(move || handler.on_tick())
            .map_err(HalError::Timer)?;
    }

    driver.enable_interrupt().map_err(HalError::Timer)?;
    driver.enable_alarm(true).map_err(HalError::Timer)?;
    driver.enable(true).map_err(HalError::Timer)?;

    Ok(driver)
}
