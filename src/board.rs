//! Collaborator interfaces for the foreground loop.
//!
//! Keypad scanning, touch acquisition, the character display and the LED
//! pins are plain I/O. The core only sees the types and traits below;
//! `hal` provides the ESP32-S3 implementation and tests provide fakes.

/// Keypad key (4x4 matrix alphabet).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Digit key 0-9.
    Digit(u8),
    A,
    B,
    C,
    D,
    Star,
    Pound,
}

impl Key {
    /// Map an ASCII keypad character to a key.
    pub fn from_ascii(c: u8) -> Option<Self> {
        match c {
            b'0'..=b'9' => Some(Key::Digit(c - b'0')),
            b'A' | b'a' => Some(Key::A),
            b'B' | b'b' => Some(Key::B),
            b'C' | b'c' => Some(Key::C),
            b'D' | b'd' => Some(Key::D),
            b'*' => Some(Key::Star),
            b'#' => Some(Key::Pound),
            _ => None,
        }
    }
}

/// One touch-sensor reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchSample {
    /// One bit per electrode channel, set while that electrode is touched.
    pub flags: u16,
    /// Raw "something is being touched" signal.
    pub any: bool,
}

impl TouchSample {
    /// No touch on any electrode.
    pub const NONE: Self = Self { flags: 0, any: false };

    /// Build a sample from the flag word; `any` follows the flags.
    #[inline]
    pub const fn from_flags(flags: u16) -> Self {
        Self {
            flags,
            any: flags != 0,
        }
    }

    /// Check a single electrode channel.
    #[inline]
    pub fn is_touched(&self, channel: u8) -> bool {
        channel < 16 && self.flags & (1 << channel) != 0
    }
}

/// Everything the collaborators produce in one foreground tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Inputs {
    /// At most one key per tick.
    pub key: Option<Key>,
    pub touch: TouchSample,
}

impl Inputs {
    /// A tick with a key press and no touch.
    pub const fn key(key: Key) -> Self {
        Self {
            key: Some(key),
            touch: TouchSample::NONE,
        }
    }

    /// A tick with a touch reading and no key.
    pub const fn touch(flags: u16) -> Self {
        Self {
            key: None,
            touch: TouchSample::from_flags(flags),
        }
    }
}

/// LED channel. Pad1 maps to A, Pad2 to B.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedChannel {
    A,
    B,
}

/// Character display sink.
pub trait StatusDisplay {
    /// Blank a display row (1-based).
    fn clear_line(&mut self, row: u8);
    /// Move the cursor (1-based row and column).
    fn move_cursor(&mut self, row: u8, col: u8);
    /// Write text at the cursor.
    fn write_str(&mut self, text: &str);
}

/// Two independently addressable indicator LEDs.
pub trait Leds {
    fn set_led(&mut self, channel: LedChannel, on: bool);
    fn toggle_led(&mut self, channel: LedChannel);
}

/// Board glue seen by the foreground loop.
pub trait Board: StatusDisplay + Leds {
    /// Block until the next foreground period starts.
    fn wait_for_period(&mut self);

    /// Run the keypad and touch scanners once and return their results.
    fn scan_inputs(&mut self) -> Inputs;
}

/// Character framebuffer implementing [`StatusDisplay`].
///
/// Rows and columns are 1-based like the LCD they stand in for. Text past
/// the end of a row is cut off. `dirty` tracks rows changed since the last
/// [`LineBuffer::take_dirty`].
pub struct LineBuffer<const ROWS: usize, const COLS: usize> {
    cells: [[u8; COLS]; ROWS],
    row: usize,
    col: usize,
    dirty: u8,
}

impl<const ROWS: usize, const COLS: usize> LineBuffer<ROWS, COLS> {
    pub const fn new() -> Self {
        assert!(ROWS <= 8, "dirty mask holds 8 rows");
        Self {
            cells: [[b' '; COLS]; ROWS],
            row: 0,
            col: 0,
            dirty: 0,
        }
    }

    /// Row text with trailing blanks removed (1-based).
    pub fn row(&self, row: u8) -> &str {
        let Some(cells) = (row as usize).checked_sub(1).and_then(|r| self.cells.get(r)) else {
            return "";
        };
        let end = cells.iter().rposition(|&c| c != b' ').map_or(0, |i| i + 1);
        core::str::from_utf8(&cells[..end]).unwrap_or("")
    }

    /// Rows changed since the last call, as a bit mask (bit 0 = row 1).
    pub fn take_dirty(&mut self) -> u8 {
        core::mem::take(&mut self.dirty)
    }
}

impl<const ROWS: usize, const COLS: usize> Default for LineBuffer<ROWS, COLS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROWS: usize, const COLS: usize> StatusDisplay for LineBuffer<ROWS, COLS> {
    fn clear_line(&mut self, row: u8) {
        if let Some(r) = (row as usize).checked_sub(1).filter(|&r| r < ROWS) {
            self.cells[r] = [b' '; COLS];
            self.row = r;
            self.col = 0;
            self.dirty |= 1 << r;
        }
    }

    fn move_cursor(&mut self, row: u8, col: u8) {
        self.row = (row as usize).saturating_sub(1).min(ROWS - 1);
        self.col = (col as usize).saturating_sub(1).min(COLS);
    }

    fn write_str(&mut self, text: &str) {
        for &b in text.as_bytes() {
            if self.col >= COLS {
                break;
            }
            // LCD charset is ASCII
            self.cells[self.row][self.col] = if b.is_ascii() { b } else { b'?' };
            self.col += 1;
        }
        self.dirty |= 1 << self.row;
    }
}
