//! TouchAlarm - Main entry point
//!
//! On target:
//! 1. Bring up the console UART, LEDs, keypad and touch pads
//! 2. Start the 19.2 kHz sample timer with the tone interrupt
//! 3. Run the 10 ms foreground loop forever
//!
//! Any peripheral that fails to come up halts the firmware.
//!
//! On the host the same core runs against a scripted board, with the
//! sample interrupt driven by a stepped clock.

use touch_alarm::{FaultState, LogStream, ToneControl};

static TONE: ToneControl = ToneControl::new();
static LOG_STREAM: LogStream = LogStream::new();
static FAULT_STATE: FaultState = FaultState::new();

const VERSION: &str = env!("VERSION_STRING");

#[cfg(target_os = "espidf")]
fn main() {
    use esp_idf_svc::hal::gpio::{IOPin, OutputPin};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::sys;
    use touch_alarm::board::StatusDisplay;
    use touch_alarm::hal::gpio::{DebugPin, LedPins, Probed};
    use touch_alarm::hal::keypad::Keypad;
    use touch_alarm::hal::tone::{start_sample_timer, AnalogOut};
    use touch_alarm::hal::touch::TouchPads;
    use touch_alarm::hal::{EspBoard, HalError};
    use touch_alarm::uart_logger::{self, init_uart_logger, UartLoggerConfig};
    use touch_alarm::{fg_error, fg_info, AlarmConfig, Foreground, ToneIsr};

    sys::link_patches();

    let config = AlarmConfig::DEFAULT;
    let log_config = UartLoggerConfig::default();

    let Ok(peripherals) = Peripherals::take() else {
        halt();
    };
    let pins = peripherals.pins;

    let Ok(mut uart) = init_uart_logger(peripherals.uart0, pins.gpio43, &log_config) else {
        halt();
    };

    if let Err(e) = config.validate() {
        fg_error!(LOG_STREAM, 0, "config: {}", e);
        uart_logger::drain(&LOG_STREAM, usize::MAX, &mut uart);
        halt();
    }

    let parts = (|| -> Result<_, HalError> {
        let output = AnalogOut::new(
            peripherals.ledc.timer0,
            peripherals.ledc.channel0,
            pins.gpio17,
        )?;
        let isr_probe = DebugPin::new(pins.gpio2.downgrade_output())?;
        let handler = Probed::new(isr_probe, ToneIsr::new(&TONE, output));
        let sample_timer = start_sample_timer(peripherals.timer00, handler)?;

        let leds = LedPins::new(pins.gpio4.downgrade_output(), pins.gpio5.downgrade_output())?;
        let keypad = Keypad::new(
            [
                pins.gpio11.downgrade_output(),
                pins.gpio12.downgrade_output(),
                pins.gpio13.downgrade_output(),
                pins.gpio14.downgrade_output(),
            ],
            [
                pins.gpio15.downgrade(),
                pins.gpio16.downgrade(),
                pins.gpio18.downgrade(),
                pins.gpio21.downgrade(),
            ],
        )?;
        let touch = TouchPads::new([config.pad1_channel, config.pad2_channel])?;
        let fg_probe = DebugPin::new(pins.gpio1.downgrade_output())?;

        Ok((sample_timer, leds, keypad, touch, fg_probe))
    })();

    let (_sample_timer, leds, keypad, touch, fg_probe) = match parts {
        Ok(parts) => parts,
        Err(e) => {
            FAULT_STATE.set(e.fault_code(), 0);
            fg_error!(LOG_STREAM, 0, "{}", e);
            uart_logger::drain(&LOG_STREAM, usize::MAX, &mut uart);
            halt();
        }
    };

    let mut board = EspBoard::new(
        leds,
        keypad,
        touch,
        uart,
        &LOG_STREAM,
        log_config.budget,
        fg_probe,
        config.poll_period_ms,
    );

    board.move_cursor(2, 1);
    board.write_str(VERSION);
    fg_info!(LOG_STREAM, 0, "{}", VERSION);

    let mut foreground = Foreground::new(config, &TONE, &LOG_STREAM, &FAULT_STATE);
    foreground.run(&mut board);

    /// Stop for good: no foreground loop, no recovery.
    fn halt() -> ! {
        loop {
            // SAFETY: plain FreeRTOS delay
            unsafe { sys::vTaskDelay(1000) };
        }
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    host::run();
}

/// Scripted run on the host: arm, trip pad 2, disarm.
#[cfg(not(target_os = "espidf"))]
mod host {
    use super::{FAULT_STATE, LOG_STREAM, TONE, VERSION};
    use std::io::Write;
    use touch_alarm::board::{Board, Inputs, Key, LedChannel, Leds, LineBuffer, StatusDisplay};
    use touch_alarm::config::SAMPLE_RATE_HZ;
    use touch_alarm::uart_logger::{self, LogSink};
    use touch_alarm::{AlarmConfig, Foreground, SampleOutput, SteppedClock, ToneIsr};

    struct Stdout;

    impl LogSink for Stdout {
        fn write_line(&mut self, line: &[u8]) {
            let _ = std::io::stdout().write_all(line);
        }
    }

    /// Counts output codes away from the center level.
    #[derive(Default)]
    struct Meter {
        active: u64,
    }

    impl SampleOutput for Meter {
        fn write_code(&mut self, code: u16) {
            if code != touch_alarm::audio::dac_code(touch_alarm::audio::CENTER_SAMPLE) {
                self.active += 1;
            }
        }
    }

    struct ScriptBoard {
        script: Vec<(u32, Inputs)>,
        tick: u32,
        display: LineBuffer<2, 16>,
        leds: [bool; 2],
    }

    impl StatusDisplay for ScriptBoard {
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

    impl Leds for ScriptBoard {
        fn set_led(&mut self, channel: LedChannel, on: bool) {
            self.leds[channel as usize] = on;
        }
        fn toggle_led(&mut self, channel: LedChannel) {
            self.leds[channel as usize] ^= true;
        }
    }

    impl Board for ScriptBoard {
        fn wait_for_period(&mut self) {
            self.tick += 1;
        }

        fn scan_inputs(&mut self) -> Inputs {
            self.script
                .iter()
                .find(|(t, _)| *t == self.tick)
                .map(|(_, i)| *i)
                .unwrap_or_default()
        }
    }

    pub fn run() {
        let config = AlarmConfig::DEFAULT;
        let touch_pad2 = 1 << config.pad2_channel;
        let mut board = ScriptBoard {
            script: vec![
                (5, Inputs::key(Key::A)),
                (60, Inputs::touch(touch_pad2)),
                (120, Inputs::key(Key::D)),
            ],
            tick: 0,
            display: LineBuffer::new(),
            leds: [false; 2],
        };

        let mut clock = SteppedClock::new(ToneIsr::new(&TONE, Meter::default()));
        let samples_per_tick = SAMPLE_RATE_HZ * config.poll_period_ms / 1000;

        let mut foreground = Foreground::new(config, &TONE, &LOG_STREAM, &FAULT_STATE);
        println!("{}", VERSION);

        for _ in 0..150 {
            board.wait_for_period();
            foreground.tick(&mut board);
            clock.advance(samples_per_tick);
            uart_logger::drain(&LOG_STREAM, usize::MAX, &mut Stdout);
        }

        println!(
            "status '{}', tone samples {}, faults {}",
            board.display.row(1),
            clock.handler().output().active,
            FAULT_STATE.count()
        );
    }
}
