//! Capacitive touch acquisition (ESP32-S3 touch sensor, timer FSM mode).
//!
//! A channel counts as touched when its raw reading rises more than
//! `1/THRESHOLD_DIV` above the baseline taken at start-up.

use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::sys::{self, esp};

use super::HalError;
use crate::board::TouchSample;

/// Touched when raw > baseline + baseline / THRESHOLD_DIV.
const THRESHOLD_DIV: u32 = 50;

/// Settling time before the baseline is sampled.
const SETTLE_MS: u32 = 50;

/// Touch scanner for a fixed set of electrode channels.
pub struct TouchPads<const N: usize> {
    channels: [u8; N],
    baseline: [u32; N],
}

impl<const N: usize> TouchPads<N> {
    /// Configure the channels, start the measurement FSM, take a baseline.
    ///
    /// Pads must not be touched during start-up.
    pub fn new(channels: [u8; N]) -> Result<Self, HalError> {
        // SAFETY: plain driver calls, made once before any reader exists
        unsafe {
            esp!(sys::touch_pad_init()).map_err(HalError::Touch)?;
            for &ch in &channels {
                esp!(sys::touch_pad_config(ch as sys::touch_pad_t)).map_err(HalError::Touch)?;
            }
            esp!(sys::touch_pad_set_fsm_mode(
                sys::touch_fsm_mode_t_TOUCH_FSM_MODE_TIMER
            ))
            .map_err(HalError::Touch)?;
            esp!(sys::touch_pad_fsm_start()).map_err(HalError::Touch)?;
        }

        FreeRtos::delay_ms(SETTLE_MS);

        let mut pads = Self {
            channels,
            baseline: [0; N],
        };
        for i in 0..N {
            pads.baseline[i] = pads.read_raw(i).map_err(HalError::Touch)?;
        }
        Ok(pads)
    }

    fn read_raw(&self, i: usize) -> Result<u32, sys::EspError> {
        let mut raw = 0u32;
        // SAFETY: `raw` outlives the call
        esp!(unsafe {
            sys::touch_pad_read_raw_data(self.channels[i] as sys::touch_pad_t, &mut raw)
        })?;
        Ok(raw)
    }

    /// Read all channels once. Read errors count as "not touched".
    pub fn scan(&mut self) -> TouchSample {
        let mut flags = 0u16;
        for i in 0..N {
            let Ok(raw) = self.read_raw(i) else {
                continue;
            };
            let base = self.baseline[i];
            if raw > base + base / THRESHOLD_DIV {
                flags |= 1 << self.channels[i];
            }
        }
        TouchSample::from_flags(flags)
    }
}
