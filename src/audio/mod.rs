//! Alarm tone subsystem
//!
//! Architecture:
//! - 64-entry tone table, one entry per sample tick (300 Hz @ 19.2 kHz)
//! - Foreground owns the enable flag, the sample interrupt owns the phase
//! - 12-bit analog output, center level while silent

pub mod table;
pub mod synth;

pub use table::{dac_code, CENTER_SAMPLE, DAC_MAX, SAMPLE_TABLE, TABLE_SIZE};
pub use synth::{Gate, ToneControl, ToneGenerator, ToneIsr};
