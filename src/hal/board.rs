//! ESP32-S3 board glue for the foreground loop.
//!
//! The character display is a 2x16 framebuffer mirrored to the console
//! UART; dirty rows and pending log entries are written out at the start of
//! each wait, so the tick itself never touches the serial port.

use esp_idf_svc::hal::uart::UartTxDriver;
use esp_idf_svc::sys;

use super::gpio::{DebugPin, LedPins};
use super::keypad::Keypad;
use super::touch::TouchPads;
use crate::board::{Board, Inputs, LedChannel, Leds, LineBuffer, StatusDisplay};
use crate::logging::{BufWriter, LogStream};
use crate::uart_logger::{self, LogSink};

pub const LCD_ROWS: usize = 2;
pub const LCD_COLS: usize = 16;

/// Board peripherals used by the foreground loop.
pub struct EspBoard {
    pub leds: LedPins,
    pub display: LineBuffer<LCD_ROWS, LCD_COLS>,
    keypad: Keypad,
    touch: TouchPads<2>,
    uart: UartTxDriver<'static>,
    log: &'static LogStream,
    log_budget: usize,
    /// High while the foreground tick runs
    probe: DebugPin,
    last_wake: sys::TickType_t,
    period_ticks: sys::TickType_t,
}

impl EspBoard {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        leds: LedPins,
        keypad: Keypad,
        touch: TouchPads<2>,
        uart: UartTxDriver<'static>,
        log: &'static LogStream,
        log_budget: usize,
        probe: DebugPin,
        period_ms: u32,
    ) -> Self {
        let period_ticks = (period_ms * sys::configTICK_RATE_HZ / 1000).max(1);
        Self {
            leds,
            display: LineBuffer::new(),
            keypad,
            touch,
            uart,
            log,
            log_budget,
            probe,
            // SAFETY: reading the scheduler tick count has no preconditions
            last_wake: unsafe { sys::xTaskGetTickCount() },
            period_ticks: period_ticks as sys::TickType_t,
        }
    }

    /// Write changed display rows to the console.
    fn flush_display(&mut self) {
        let dirty = self.display.take_dirty();
        for r in 0..LCD_ROWS as u8 {
            if dirty & (1 << r) == 0 {
                continue;
            }
            let mut line = [0u8; LCD_COLS + 8];
            let len = {
                let mut w = BufWriter::new(&mut line);
                let _ = core::fmt::write(
                    &mut w,
                    format_args!("LCD{}| {}\n", r + 1, self.display.row(r + 1)),
                );
                w.len()
            };
            self.uart.write_line(&line[..len]);
        }
    }
}

impl StatusDisplay for EspBoard {
    fn clear_line(&mut self, row: u8) {
        self.display.clear_line(row);
    }

    fn move_cursor(&mut self, row: u8, col: u8) {
        self.display.move_cursor(row, col);
    }

    fn write_str(&mut self, text: &str) {
        self.display.write_str(text);
    }
}

impl Leds for EspBoard {
    fn set_led(&mut self, channel: LedChannel, on: bool) {
        self.leds.set_led(channel, on);
    }

    fn toggle_led(&mut self, channel: LedChannel) {
        self.leds.toggle_led(channel);
    }
}

impl Board for EspBoard {
    fn wait_for_period(&mut self) {
        self.probe.set(false);
        self.flush_display();
        uart_logger::drain(self.log, self.log_budget, &mut self.uart);

        // Fixed period measured from the previous wake, not from now
        // SAFETY: last_wake is owned by this board and only used here
        unsafe {
            sys::xTaskDelayUntil(&mut self.last_wake, self.period_ticks);
        }
        self.probe.set(true);
    }

    fn scan_inputs(&mut self) -> Inputs {
        Inputs {
            key: self.keypad.scan(),
            touch: self.touch.scan(),
        }
    }
}
