//! Cooperative foreground loop.
//!
//! One fixed period, run to completion, no suspension points inside a
//! tick. Order per tick is fixed:
//!
//! 1. collaborators (keypad, touch) via [`Board::scan_inputs`]
//! 2. security state machine (display, tone enable)
//! 3. LED pattern driver
//!
//! The LED driver must see transitions applied in the same tick, so the
//! order must not change.

use crate::audio::ToneControl;
use crate::board::Board;
use crate::config::AlarmConfig;
use crate::fault::{FaultCode, FaultState};
use crate::led::LedPatternDriver;
use crate::logging::LogStream;
use crate::security::{SecurityStateMachine, TickOutcome};
use crate::{fg_info, fg_warn};

/// Foreground task set.
pub struct Foreground<'a> {
    machine: SecurityStateMachine,
    leds: LedPatternDriver,
    tone: &'a ToneControl,
    log: &'a LogStream,
    faults: &'a FaultState,
    period_ms: u32,
    ticks: u32,
    /// Next transition is a fresh entry (boot or recovery), not a mode change
    fresh_entry: bool,
}

impl<'a> Foreground<'a> {
    pub fn new(
        config: AlarmConfig,
        tone: &'a ToneControl,
        log: &'a LogStream,
        faults: &'a FaultState,
    ) -> Self {
        Self {
            machine: SecurityStateMachine::new(config),
            leds: LedPatternDriver::new(&config),
            tone,
            log,
            faults,
            period_ms: config.poll_period_ms,
            ticks: 0,
            fresh_entry: true,
        }
    }

    /// Run one foreground period.
    pub fn tick<B: Board + ?Sized>(&mut self, board: &mut B) -> TickOutcome {
        let now_ms = self.uptime_ms();

        let inputs = board.scan_inputs();

        let outcome = self.machine.tick(&inputs, &mut *board, self.tone);

        if let Some(bad) = outcome.recovered {
            self.faults.record_recovered(FaultCode::InvalidMode, bad as u32);
            fg_warn!(self.log, now_ms, "invalid mode {:#04x}, reset to DISARMED", bad);
            self.fresh_entry = true;
        }

        if let Some(t) = outcome.transition {
            self.leds.reset();
            if core::mem::take(&mut self.fresh_entry) {
                fg_info!(self.log, now_ms, "mode {}", t.to.label());
            } else {
                fg_info!(self.log, now_ms, "{} -> {}", t.from.label(), t.to.label());
            }
        }

        self.leds.tick(
            self.machine.mode(),
            self.machine.latch(),
            inputs.touch.any,
            &mut *board,
        );

        self.ticks = self.ticks.wrapping_add(1);
        outcome
    }

    /// Run forever: wait for the period, then tick.
    pub fn run<B: Board + ?Sized>(&mut self, board: &mut B) -> ! {
        loop {
            board.wait_for_period();
            self.tick(board);
        }
    }

    /// Periods completed since start.
    #[inline]
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Uptime derived from the tick count.
    #[inline]
    pub fn uptime_ms(&self) -> u32 {
        self.ticks.wrapping_mul(self.period_ms)
    }

    pub fn machine(&self) -> &SecurityStateMachine {
        &self.machine
    }

    /// Mutable access for fault injection.
    pub fn machine_mut(&mut self) -> &mut SecurityStateMachine {
        &mut self.machine
    }

    pub fn leds(&self) -> &LedPatternDriver {
        &self.leds
    }
}
