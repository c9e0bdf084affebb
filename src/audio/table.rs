//! Alarm tone lookup table
//!
//! 64-entry table covering one period of a 300 Hz tone with
//! 2nd, 3rd, 4th and 8th harmonics. Values are unsigned 16-bit
//! with 0x8000 as mid-scale.

use crate::config::SAMPLES_PER_PERIOD;

/// Number of entries in the tone table
pub const TABLE_SIZE: usize = SAMPLES_PER_PERIOD;

/// One period of the alarm tone.
///
/// Index 0 is exactly mid-scale so it doubles as the silence level.
pub static SAMPLE_TABLE: [u16; TABLE_SIZE] = [
    0x8000, 0xAAD5, 0xC8B7, 0xD332, 0xCD26, 0xC061, 0xB77B, 0xB79E,
    0xBDCD, 0xC145, 0xB96D, 0xA3CD, 0x865B, 0x6CB9, 0x61EA, 0x6A13,
    0x8000, 0x97E2, 0xA5BA, 0xA3C9, 0x955A, 0x8454, 0x7B21, 0x7E71,
    0x8A9A, 0x9603, 0x972D, 0x8AB5, 0x75BE, 0x633E, 0x5DB7, 0x690C,
    0x8000, 0x96F3, 0xA248, 0x9CC1, 0x8A41, 0x754A, 0x68D2, 0x69FC,
    0x7565, 0x818E, 0x84DE, 0x7BAB, 0x6AA5, 0x5C36, 0x5A45, 0x681D,
    0x8000, 0x95EC, 0x9E15, 0x9346, 0x79A4, 0x5C32, 0x4692, 0x3EBA,
    0x4232, 0x4861, 0x4884, 0x3F9E, 0x32D9, 0x2CCD, 0x3748, 0x552A,
];

/// Sample emitted while the tone is off.
pub const CENTER_SAMPLE: u16 = 0x8000;

/// Output code width of the analog device.
pub const DAC_BITS: u32 = 12;

/// Largest output code.
pub const DAC_MAX: u16 = (1 << DAC_BITS) - 1;

/// Convert a table sample to a 12-bit output code (drop the low 4 bits).
#[inline]
pub const fn dac_code(sample: u16) -> u16 {
    sample >> (16 - DAC_BITS)
}
