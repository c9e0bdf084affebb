//! Log output over the console UART.
//!
//! The ring is drained from inside the board's wait-for-period, so the
//! foreground never stalls on the serial port. Each call writes at most
//! `budget` entries; whatever is left waits for the next period.
//!
//! # Hardware Setup
//!
//! ```text
//! ESP32-S3 GPIO43 (U0TXD) ──────▶ USB-UART RX
//!                                  └─▶ PC Serial Monitor
//! ```

use core::fmt::Write;

use crate::logging::{BufWriter, LogEntry, LogStream};

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::peripheral::Peripheral;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::uart::{self, UartTxDriver};

/// Formatted line buffer size.
pub const LINE_LEN: usize = 96;

/// UART configuration for logging.
pub struct UartLoggerConfig {
    pub baud_rate: u32,
    pub tx_pin: u8,
    /// Entries written per drain call.
    pub budget: usize,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
            tx_pin: 43,
            budget: 4,
        }
    }
}

/// Byte sink for formatted log lines.
pub trait LogSink {
    fn write_line(&mut self, line: &[u8]);
}

/// Format log entry to a line.
///
/// Format: `[timestamp_ms] LEVEL: message\n`
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    let mut writer = BufWriter::new(buf);
    let _ = write!(
        writer,
        "[{:8}] {}: {}\n",
        entry.timestamp_ms,
        entry.level.as_str(),
        entry.text()
    );
    writer.len()
}

/// Write up to `budget` entries from `stream` to `sink`.
///
/// Reports and resets the drop counter once the ring is empty.
/// Returns the number of entries written.
pub fn drain<const N: usize, S: LogSink + ?Sized>(
    stream: &LogStream<N>,
    budget: usize,
    sink: &mut S,
) -> usize {
    let mut line = [0u8; LINE_LEN];
    let mut written = 0;

    while written < budget {
        let Some(entry) = stream.drain() else {
            break;
        };
        let len = format_log_entry(&entry, &mut line);
        sink.write_line(&line[..len]);
        written += 1;
    }

    if stream.pending() == 0 {
        let dropped = stream.dropped();
        if dropped > 0 {
            let mut writer = BufWriter::new(&mut line);
            let _ = write!(writer, "[WARN] Dropped: {}\n", dropped);
            let len = writer.len();
            sink.write_line(&line[..len]);
            stream.reset_dropped();
        }
    }

    written
}

#[cfg(target_os = "espidf")]
impl LogSink for UartTxDriver<'_> {
    fn write_line(&mut self, line: &[u8]) {
        let _ = self.write(line);
    }
}

/// Initialize UART0 TX-only for logging output.
#[cfg(target_os = "espidf")]
pub fn init_uart_logger<'d>(
    uart: impl Peripheral<P = esp_idf_svc::hal::uart::UART0> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    config: &UartLoggerConfig,
) -> Result<UartTxDriver<'d>, esp_idf_svc::sys::EspError> {
    let uart_config = uart::config::Config::default()
        .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;

    #[derive(Default)]
    struct Lines(Vec<String>);

    impl LogSink for Lines {
        fn write_line(&mut self, line: &[u8]) {
            self.0.push(String::from_utf8(line.to_vec()).unwrap());
        }
    }

    #[test]
    fn test_format_log_entry() {
        let mut entry = LogEntry::default();
        entry.timestamp_ms = 1234567;
        entry.level = LogLevel::Info;
        entry.len = 11;
        entry.msg[..11].copy_from_slice(b"Hello world");

        let mut buf = [0u8; LINE_LEN];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert_eq!(formatted, "[ 1234567] INFO: Hello world\n");
    }

    #[test]
    fn test_drain_respects_budget() {
        let stream = LogStream::<8>::new();
        for i in 0..5 {
            stream.push(i * 10, LogLevel::Info, b"entry");
        }

        let mut sink = Lines::default();
        assert_eq!(drain(&stream, 2, &mut sink), 2);
        assert_eq!(sink.0.len(), 2);
        assert_eq!(stream.pending(), 3);

        assert_eq!(drain(&stream, 10, &mut sink), 3);
        assert_eq!(stream.pending(), 0);
        assert!(sink.0[4].contains("[      40]"));
    }

    #[test]
    fn test_drain_reports_drops_when_empty() {
        let stream = LogStream::<2>::new();
        for i in 0..4 {
            stream.push(i, LogLevel::Error, b"e");
        }
        assert_eq!(stream.dropped(), 2);

        let mut sink = Lines::default();
        drain(&stream, 8, &mut sink);

        assert_eq!(sink.0.len(), 3);
        assert_eq!(sink.0[2], "[WARN] Dropped: 2\n");
        assert_eq!(stream.dropped(), 0);
    }
}
