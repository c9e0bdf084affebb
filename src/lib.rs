//! # TouchAlarm
//!
//! Control core of a touch-pad security alarm.
//!
//! ## Architecture
//!
//! Two execution contexts, nothing else:
//! - Sample timer interrupt (19.2 kHz): [`ToneIsr`] writes one tone sample
//!   per tick to the analog output
//! - Foreground loop (10 ms): [`Foreground`] scans inputs, runs the
//!   [`SecurityStateMachine`], then the [`LedPatternDriver`]
//!
//! The only shared state is [`ToneControl`]: the foreground writes the enable
//! flag, the interrupt owns the phase. No locks.

#![cfg_attr(not(test), no_std)]

pub mod audio;
pub mod board;
pub mod config;
pub mod fault;
pub mod foreground;
pub mod led;
pub mod logging;
pub mod security;
pub mod timer;
pub mod uart_logger;

#[cfg(target_os = "espidf")]
pub mod hal;

pub use audio::{ToneControl, ToneGenerator, ToneIsr};
pub use board::{Board, Inputs, Key, LedChannel, Leds, StatusDisplay, TouchSample};
pub use config::{AlarmConfig, ConfigError};
pub use fault::{FaultCode, FaultState};
pub use foreground::Foreground;
pub use led::LedPatternDriver;
pub use logging::LogStream;
pub use security::{SecurityMode, SecurityStateMachine, TouchLatch};
pub use timer::{SampleHandler, SampleOutput, SteppedClock};
