//! Foreground loop tests against a scripted board

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};

use touch_alarm::board::{Board, Inputs, Key, LedChannel, Leds, LineBuffer, StatusDisplay};
use touch_alarm::logging::LogLevel;
use touch_alarm::security::{SecurityMode, TouchLatch};
use touch_alarm::{AlarmConfig, FaultCode, FaultState, Foreground, LogStream, ToneControl};

/// Board fake: inputs come from a queue, outputs are recorded
#[derive(Default)]
struct FakeBoard {
    inputs: VecDeque<Inputs>,
    display: LineBuffer<2, 16>,
    leds: [bool; 2],
    led_calls: u32,
    waits: u32,
    /// Board calls in order
    events: Vec<&'static str>,
    /// Stop `run` by panicking once this many waits have completed
    wait_limit: Option<u32>,
}

impl FakeBoard {
    fn push(&mut self, inputs: Inputs) {
        self.inputs.push_back(inputs);
    }
}

impl StatusDisplay for FakeBoard {
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

impl Leds for FakeBoard {
    fn set_led(&mut self, channel: LedChannel, on: bool) {
        self.leds[channel as usize] = on;
        self.led_calls += 1;
    }
    fn toggle_led(&mut self, channel: LedChannel) {
        self.leds[channel as usize] ^= true;
        self.led_calls += 1;
    }
}

impl Board for FakeBoard {
    fn wait_for_period(&mut self) {
        if self.wait_limit == Some(self.waits) {
            panic!("wait limit reached");
        }
        self.waits += 1;
        self.events.push("wait");
    }
    fn scan_inputs(&mut self) -> Inputs {
        self.events.push("scan");
        self.inputs.pop_front().unwrap_or_default()
    }
}

struct Harness {
    tone: ToneControl,
    log: LogStream,
    faults: FaultState,
}

impl Harness {
    fn new() -> Self {
        Self {
            tone: ToneControl::new(),
            log: LogStream::new(),
            faults: FaultState::new(),
        }
    }

    fn foreground(&self) -> Foreground<'_> {
        Foreground::new(AlarmConfig::DEFAULT, &self.tone, &self.log, &self.faults)
    }

    fn log_lines(&self) -> Vec<(LogLevel, String)> {
        std::iter::from_fn(|| self.log.drain())
            .map(|e| (e.level, e.text().to_string()))
            .collect()
    }
}

fn run(fg: &mut Foreground<'_>, board: &mut FakeBoard, ticks: u32) {
    for _ in 0..ticks {
        fg.tick(board);
    }
}

#[test]
fn test_startup_tick() {
    let h = Harness::new();
    let mut fg = h.foreground();
    let mut board = FakeBoard::default();

    fg.tick(&mut board);

    assert_eq!(fg.ticks(), 1);
    assert_eq!(board.display.row(1), "DISARMED");
    assert!(!h.tone.is_enabled());
    assert_eq!(
        h.log_lines(),
        vec![(LogLevel::Info, "mode DISARMED".to_string())]
    );
}

#[test]
fn test_arm_trip_disarm() {
    let h = Harness::new();
    let mut fg = h.foreground();
    let mut board = FakeBoard::default();

    fg.tick(&mut board);
    board.push(Inputs::key(Key::A));
    fg.tick(&mut board);
    assert_eq!(board.display.row(1), "ARMED");

    board.push(Inputs::touch(1 << AlarmConfig::DEFAULT.pad2_channel));
    fg.tick(&mut board);
    assert_eq!(board.display.row(1), "ALARM");
    assert!(h.tone.is_enabled());
    assert_eq!(fg.machine().latch(), TouchLatch::Pad2);

    // Pad2 drives LED B every 5 ticks, A stays put
    let a_before = board.leds[0];
    run(&mut fg, &mut board, 4);
    assert!(board.leds[1]);
    run(&mut fg, &mut board, 5);
    assert!(!board.leds[1]);
    assert_eq!(board.leds[0], a_before);

    board.push(Inputs::key(Key::D));
    fg.tick(&mut board);
    assert_eq!(board.display.row(1), "DISARMED");
    assert!(!h.tone.is_enabled());
    assert_eq!(fg.machine().latch(), TouchLatch::None);

    let messages: Vec<_> = h.log_lines().into_iter().map(|(_, m)| m).collect();
    assert_eq!(
        messages,
        vec![
            "mode DISARMED",
            "DISARMED -> ARMED",
            "ARMED -> ALARM",
            "ALARM -> DISARMED"
        ]
    );
}

#[test]
fn test_transition_restarts_led_cadence() {
    let h = Harness::new();
    let mut fg = h.foreground();
    let mut board = FakeBoard::default();

    fg.tick(&mut board);
    board.push(Inputs::key(Key::A));
    fg.tick(&mut board);
    // The arming tick already counts as the first armed tick
    assert_eq!(fg.leds().counter(), 1);

    run(&mut fg, &mut board, 20);
    assert_eq!(fg.leds().counter(), 21);

    board.push(Inputs::touch(1 << AlarmConfig::DEFAULT.pad1_channel));
    fg.tick(&mut board);
    assert_eq!(fg.leds().counter(), 1);
}

#[test]
fn test_armed_blink_through_foreground() {
    let h = Harness::new();
    let mut fg = h.foreground();
    let mut board = FakeBoard::default();

    fg.tick(&mut board);
    board.push(Inputs::key(Key::A));
    fg.tick(&mut board);
    run(&mut fg, &mut board, 24);
    assert_eq!(board.leds, [false, true]);
    run(&mut fg, &mut board, 25);
    assert_eq!(board.leds, [true, false]);
    assert_eq!(fg.leds().counter(), 0);
}

#[test]
fn test_invalid_mode_recovery() {
    let h = Harness::new();
    let mut fg = h.foreground();
    let mut board = FakeBoard::default();

    fg.tick(&mut board);
    board.push(Inputs::key(Key::A));
    fg.tick(&mut board);
    board.push(Inputs::touch(1 << AlarmConfig::DEFAULT.pad1_channel));
    fg.tick(&mut board);
    assert!(h.tone.is_enabled());
    h.log_lines();

    fg.machine_mut().corrupt_mode(7);
    let outcome = fg.tick(&mut board);
    assert_eq!(outcome.recovered, Some(7));
    assert_eq!(h.faults.count(), 1);
    assert_eq!(h.faults.code(), FaultCode::InvalidMode);
    assert_eq!(h.faults.data(), 7);
    assert!(!h.faults.is_active());

    fg.tick(&mut board);
    assert_eq!(fg.machine().mode(), Some(SecurityMode::Disarmed));
    assert!(!h.tone.is_enabled());
    assert_eq!(board.display.row(1), "DISARMED");

    let lines = h.log_lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].0, LogLevel::Warn);
    assert!(lines[0].1.starts_with("invalid mode 0x07"));
    assert_eq!(lines[1], (LogLevel::Info, "mode DISARMED".to_string()));
}

#[test]
fn test_uptime_follows_ticks() {
    let h = Harness::new();
    let mut fg = h.foreground();
    let mut board = FakeBoard::default();

    run(&mut fg, &mut board, 42);
    assert_eq!(fg.ticks(), 42);
    assert_eq!(fg.uptime_ms(), 420);
    assert_eq!(board.waits, 0);
}

#[test]
fn test_run_waits_before_each_tick() {
    let h = Harness::new();
    let mut fg = h.foreground();
    let mut board = FakeBoard {
        wait_limit: Some(3),
        ..Default::default()
    };
    board.push(Inputs::default());
    board.push(Inputs::key(Key::A));

    let stopped = panic::catch_unwind(AssertUnwindSafe(|| {
        fg.run(&mut board);
    }));

    assert!(stopped.is_err());
    assert_eq!(
        board.events,
        vec!["wait", "scan", "wait", "scan", "wait", "scan"]
    );
    assert_eq!(fg.ticks(), 3);
    assert_eq!(fg.machine().mode(), Some(SecurityMode::Armed));
    assert_eq!(board.display.row(1), "ARMED");
}
