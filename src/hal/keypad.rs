//! 4x4 matrix keypad scanner.
//!
//! Rows are driven low one at a time, columns read with pull-ups. A key is
//! reported once, after it has been seen on two consecutive scans, and not
//! again until every key has been released.

use esp_idf_svc::hal::delay::Ets;
use esp_idf_svc::hal::gpio::{AnyIOPin, AnyOutputPin, Input, Output, PinDriver, Pull};

use super::HalError;
use crate::board::Key;

const LAYOUT: [[u8; 4]; 4] = [
    *b"123A",
    *b"456B",
    *b"789C",
    *b"*0#D",
];

/// Matrix keypad with press-once debouncing.
pub struct Keypad {
    rows: [PinDriver<'static, AnyOutputPin, Output>; 4],
    cols: [PinDriver<'static, AnyIOPin, Input>; 4],
    last: Option<Key>,
    reported: bool,
}

impl Keypad {
    pub fn new(rows: [AnyOutputPin; 4], cols: [AnyIOPin; 4]) -> Result<Self, HalError> {
        let [r0, r1, r2, r3] = rows;
        let [c0, c1, c2, c3] = cols;
        let rows = [row(r0)?, row(r1)?, row(r2)?, row(r3)?];
        let cols = [col(c0)?, col(c1)?, col(c2)?, col(c3)?];
        Ok(Self {
            rows,
            cols,
            last: None,
            reported: false,
        })
    }

    fn raw_key(&mut self) -> Option<Key> {
        let mut found = None;
        for r in 0..4 {
            let _ = self.rows[r].set_low();
            Ets::delay_us(2);
            for c in 0..4 {
                if found.is_none() && self.cols[c].is_low() {
                    found = Key::from_ascii(LAYOUT[r][c]);
                }
            }
            let _ = self.rows[r].set_high();
        }
        found
    }

    /// Scan once; returns a key on the scan its press becomes stable.
    pub fn scan(&mut self) -> Option<Key> {
        let key = self.raw_key();
        let stable = key.is_some() && key == self.last;
        self.last = key;

        if key.is_none() {
            self.reported = false;
            return None;
        }
        if stable && !self.reported {
            self.reported = true;
            return key;
        }
        None
    }
}

fn row(pin: AnyOutputPin) -> Result<PinDriver<'static, AnyOutputPin, Output>, HalError> {
    let mut p = PinDriver::output(pin).map_err(HalError::Gpio)?;
    p.set_high().map_err(HalError::Gpio)?;
    Ok(p)
}

fn col(pin: AnyIOPin) -> Result<PinDriver<'static, AnyIOPin, Input>, HalError> {
    let mut p = PinDriver::input(pin).map_err(HalError::Gpio)?;
    p.set_pull(Pull::Up).map_err(HalError::Gpio)?;
    Ok(p)
}
