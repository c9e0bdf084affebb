//! Alarm tone synthesizer
//!
//! Split in two halves so each field has exactly one writer:
//! - [`ToneControl`]: the enable flag, written by the foreground only
//! - [`ToneGenerator`]: the phase index, written by the sample interrupt only
//!
//! The foreground never touches the phase. Turning the tone on raises a
//! restart request in the same atomic update as the enable bit, and the
//! interrupt resets its phase when it sees the request.

use core::sync::atomic::{AtomicU8, Ordering};

use super::table::{dac_code, CENTER_SAMPLE, SAMPLE_TABLE, TABLE_SIZE};
use crate::timer::{SampleHandler, SampleOutput};

const ENABLED: u8 = 0b01;
const RESTART: u8 = 0b10;

/// Output gate state as seen by the interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Emitting the center sample
    Silent,
    /// Emitting the waveform
    Sounding,
}

/// Foreground side of the synthesizer.
///
/// Lives in a `static` and is shared by reference with the interrupt.
pub struct ToneControl {
    ctl: AtomicU8,
}

impl ToneControl {
    /// Create control word (tone off)
    pub const fn new() -> Self {
        Self {
            ctl: AtomicU8::new(0),
        }
    }

    /// Turn the tone on or off.
    ///
    /// An off→on edge also requests a phase restart. Both bits land in a
    /// single atomic update, so the interrupt either sees the old word or
    /// the complete new one.
    #[inline]
    pub fn set_enabled(&self, on: bool) {
        let _ = self
            .ctl
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |ctl| {
                Some(match (ctl & ENABLED != 0, on) {
                    (false, true) => ENABLED | RESTART,
                    (true, true) => ctl,
                    (_, false) => 0,
                })
            });
    }

    /// Flip the tone state, returning the new state.
    #[inline]
    pub fn toggle(&self) -> bool {
        let on = !self.is_enabled();
        self.set_enabled(on);
        on
    }

    /// Current requested state
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.ctl.load(Ordering::Acquire) & ENABLED != 0
    }

    /// Interrupt side: read the flag and consume any restart request.
    #[inline]
    fn observe(&self) -> (bool, bool) {
        let ctl = self.ctl.fetch_and(!RESTART, Ordering::AcqRel);
        (ctl & ENABLED != 0, ctl & RESTART != 0)
    }
}

impl Default for ToneControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt side of the synthesizer.
pub struct ToneGenerator<'a> {
    control: &'a ToneControl,
    /// Table index of the next sample, always < TABLE_SIZE
    phase: u8,
    gate: Gate,
}

impl<'a> ToneGenerator<'a> {
    /// Create generator at phase 0, silent
    pub fn new(control: &'a ToneControl) -> Self {
        Self {
            control,
            phase: 0,
            gate: Gate::Silent,
        }
    }

    /// Produce the sample for this tick.
    ///
    /// Enabled: emit `SAMPLE_TABLE[phase]` and advance the phase.
    /// Disabled: emit the center sample and leave the phase alone.
    #[inline]
    pub fn next_sample(&mut self) -> u16 {
        let (enabled, restart) = self.control.observe();

        if restart {
            self.phase = 0;
        }

        if !enabled {
            self.gate = Gate::Silent;
            return CENTER_SAMPLE;
        }

        self.gate = Gate::Sounding;
        let sample = SAMPLE_TABLE[self.phase as usize];
        self.phase = ((self.phase as usize + 1) % TABLE_SIZE) as u8;
        sample
    }

    /// Index of the next sample to be played
    #[inline]
    pub fn phase(&self) -> usize {
        self.phase as usize
    }

    /// Gate state after the last tick
    #[inline]
    pub fn gate(&self) -> Gate {
        self.gate
    }
}

/// Sample-timer handler: generator plus output device.
pub struct ToneIsr<'a, O: SampleOutput> {
    generator: ToneGenerator<'a>,
    output: O,
}

impl<'a, O: SampleOutput> ToneIsr<'a, O> {
    pub fn new(control: &'a ToneControl, output: O) -> Self {
        Self {
            generator: ToneGenerator::new(control),
            output,
        }
    }

    pub fn generator(&self) -> &ToneGenerator<'a> {
        &self.generator
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

impl<O: SampleOutput> SampleHandler for ToneIsr<'_, O> {
    #[inline]
    fn on_tick(&mut self) {
        let sample = self.generator.next_sample();
        self.output.write_code(dac_code(sample));
    }
}
