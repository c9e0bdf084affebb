//! Security mode state machine.
//!
//! Pure logic: consumes one [`Inputs`] per foreground tick, writes the
//! status line and the tone enable flag on mode entry. Fully testable on
//! host with fake sinks.
//!
//! # Transitions
//!
//! | Mode          | Trigger            | Next          |
//! |---------------|--------------------|---------------|
//! | Disarmed      | arm key            | Armed         |
//! | Armed         | touch Pad1 / Pad2  | AlarmSounding |
//! | Armed         | disarm key         | Disarmed      |
//! | AlarmSounding | disarm key         | Disarmed      |
//!
//! In Armed a touch wins over the disarm key in the same tick.
//!
//! Entry actions run once per transition, gated by comparing the current
//! mode with the last mode whose entry actions were applied. A tick that
//! starts with entry actions pending applies them and ignores its inputs.

use crate::audio::ToneControl;
use crate::board::{Inputs, LedChannel, StatusDisplay};
use crate::config::AlarmConfig;

/// Display row used for the status line.
pub const STATUS_ROW: u8 = 1;

/// Security mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SecurityMode {
    Disarmed = 0,
    Armed = 1,
    AlarmSounding = 2,
}

impl SecurityMode {
    /// Decode a stored mode byte. `None` for anything undefined.
    #[inline]
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Disarmed),
            1 => Some(Self::Armed),
            2 => Some(Self::AlarmSounding),
            _ => None,
        }
    }

    /// Status line text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Disarmed => "DISARMED",
            Self::Armed => "ARMED",
            Self::AlarmSounding => "ALARM",
        }
    }
}

/// Which pad tripped the alarm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TouchLatch {
    #[default]
    None,
    Pad1,
    Pad2,
}

impl TouchLatch {
    /// LED that pulses while the alarm sounds.
    pub fn led(self) -> Option<LedChannel> {
        match self {
            Self::None => None,
            Self::Pad1 => Some(LedChannel::A),
            Self::Pad2 => Some(LedChannel::B),
        }
    }
}

/// A mode change whose entry actions were applied this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: SecurityMode,
    pub to: SecurityMode,
}

/// Result of one state machine tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Entry actions fired this tick.
    pub transition: Option<Transition>,
    /// An undefined mode byte was found and reset. Carries the bad value.
    pub recovered: Option<u8>,
}

/// Security state machine.
pub struct SecurityStateMachine {
    config: AlarmConfig,
    /// Stored as a raw byte so a corrupted value is detectable.
    current: u8,
    /// Last mode whose entry actions were applied.
    previous: SecurityMode,
    latch: TouchLatch,
}

impl SecurityStateMachine {
    /// Start Disarmed. `previous` starts at AlarmSounding so the first
    /// tick paints the status line and forces the tone off.
    pub fn new(config: AlarmConfig) -> Self {
        Self {
            config,
            current: SecurityMode::Disarmed as u8,
            previous: SecurityMode::AlarmSounding,
            latch: TouchLatch::None,
        }
    }

    /// Current mode, `None` if the stored byte is undefined.
    #[inline]
    pub fn mode(&self) -> Option<SecurityMode> {
        SecurityMode::from_u8(self.current)
    }

    /// Last mode whose entry actions were applied.
    #[inline]
    pub fn previous(&self) -> SecurityMode {
        self.previous
    }

    #[inline]
    pub fn latch(&self) -> TouchLatch {
        self.latch
    }

    pub fn config(&self) -> &AlarmConfig {
        &self.config
    }

    /// Overwrite the stored mode byte. Fault injection only.
    pub fn corrupt_mode(&mut self, raw: u8) {
        self.current = raw;
    }

    /// Advance one foreground tick.
    pub fn tick<D: StatusDisplay + ?Sized>(
        &mut self,
        inputs: &Inputs,
        display: &mut D,
        tone: &ToneControl,
    ) -> TickOutcome {
        let mode = match self.mode() {
            Some(mode) => mode,
            None => {
                // Unreachable in normal operation. Force Disarmed and make
                // sure its entry actions (tone off included) run next tick.
                let bad = self.current;
                self.current = SecurityMode::Disarmed as u8;
                self.previous = SecurityMode::AlarmSounding;
                return TickOutcome {
                    transition: None,
                    recovered: Some(bad),
                };
            }
        };

        if self.previous != mode {
            // Entry actions still pending (first tick, or the tick after a
            // recovery). Apply them and read no triggers this tick.
            return TickOutcome {
                transition: self.settle(mode, display, tone),
                recovered: None,
            };
        }

        let next = self.evaluate(mode, inputs);
        self.current = next as u8;

        TickOutcome {
            transition: self.settle(next, display, tone),
            recovered: None,
        }
    }

    fn evaluate(&mut self, mode: SecurityMode, inputs: &Inputs) -> SecurityMode {
        match mode {
            SecurityMode::Disarmed => {
                if inputs.key == Some(self.config.arm_key) {
                    SecurityMode::Armed
                } else {
                    mode
                }
            }
            SecurityMode::Armed => {
                let touch = &inputs.touch;
                if touch.is_touched(self.config.pad1_channel) {
                    self.latch = TouchLatch::Pad1;
                    SecurityMode::AlarmSounding
                } else if touch.is_touched(self.config.pad2_channel) {
                    self.latch = TouchLatch::Pad2;
                    SecurityMode::AlarmSounding
                } else if inputs.key == Some(self.config.disarm_key) {
                    SecurityMode::Disarmed
                } else {
                    mode
                }
            }
            SecurityMode::AlarmSounding => {
                if inputs.key == Some(self.config.disarm_key) {
                    SecurityMode::Disarmed
                } else {
                    mode
                }
            }
        }
    }

    /// Run entry actions if `mode` has not been entered yet.
    fn settle<D: StatusDisplay + ?Sized>(
        &mut self,
        mode: SecurityMode,
        display: &mut D,
        tone: &ToneControl,
    ) -> Option<Transition> {
        let from = self.previous;
        if from == mode {
            return None;
        }

        display.clear_line(STATUS_ROW);
        display.move_cursor(STATUS_ROW, 1);
        display.write_str(mode.label());

        // Tone is on exactly while AlarmSounding
        if from == SecurityMode::AlarmSounding || mode == SecurityMode::AlarmSounding {
            tone.set_enabled(mode == SecurityMode::AlarmSounding);
        }

        match mode {
            SecurityMode::Disarmed | SecurityMode::Armed => self.latch = TouchLatch::None,
            SecurityMode::AlarmSounding => {}
        }

        self.previous = mode;
        Some(Transition { from, to: mode })
    }
}
