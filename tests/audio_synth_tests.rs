//! Tone synthesizer tests

use touch_alarm::audio::{Gate, ToneControl, ToneGenerator, CENTER_SAMPLE, SAMPLE_TABLE};

#[test]
fn test_starts_disabled_at_phase_zero() {
    let control = ToneControl::new();
    let gen = ToneGenerator::new(&control);

    assert!(!control.is_enabled());
    assert_eq!(gen.phase(), 0);
    assert_eq!(gen.gate(), Gate::Silent);
}

#[test]
fn test_silent_emits_center_and_holds_phase() {
    let control = ToneControl::new();
    let mut gen = ToneGenerator::new(&control);

    for _ in 0..100 {
        assert_eq!(gen.next_sample(), CENTER_SAMPLE);
    }
    assert_eq!(gen.phase(), 0);
    assert_eq!(gen.gate(), Gate::Silent);
}

#[test]
fn test_enabled_walks_the_table() {
    let control = ToneControl::new();
    let mut gen = ToneGenerator::new(&control);
    control.set_enabled(true);

    for (i, &expected) in SAMPLE_TABLE.iter().enumerate() {
        assert_eq!(gen.next_sample(), expected, "sample {}", i);
        assert_eq!(gen.phase(), (i + 1) % 64);
    }
    assert_eq!(gen.gate(), Gate::Sounding);
}

#[test]
fn test_phase_is_periodic() {
    let control = ToneControl::new();
    let mut gen = ToneGenerator::new(&control);
    control.set_enabled(true);

    // Start somewhere in the middle
    for _ in 0..23 {
        gen.next_sample();
    }
    let start = gen.phase();

    for _ in 0..64 {
        gen.next_sample();
    }
    assert_eq!(gen.phase(), start);
}

#[test]
fn test_reenable_restarts_at_table_start() {
    let control = ToneControl::new();
    let mut gen = ToneGenerator::new(&control);

    control.set_enabled(true);
    for _ in 0..37 {
        gen.next_sample();
    }
    assert_eq!(gen.phase(), 37);

    control.set_enabled(false);
    assert_eq!(gen.next_sample(), CENTER_SAMPLE);
    assert_eq!(gen.next_sample(), CENTER_SAMPLE);

    control.set_enabled(true);
    assert_eq!(gen.next_sample(), SAMPLE_TABLE[0]);
    assert_eq!(gen.next_sample(), SAMPLE_TABLE[1]);
}

#[test]
fn test_off_on_between_samples_still_restarts() {
    let control = ToneControl::new();
    let mut gen = ToneGenerator::new(&control);

    control.set_enabled(true);
    for _ in 0..10 {
        gen.next_sample();
    }

    // Both edges land before the interrupt runs again
    control.set_enabled(false);
    control.set_enabled(true);
    assert_eq!(gen.next_sample(), SAMPLE_TABLE[0]);
}

#[test]
fn test_repeated_enable_does_not_restart() {
    let control = ToneControl::new();
    let mut gen = ToneGenerator::new(&control);

    control.set_enabled(true);
    for _ in 0..5 {
        gen.next_sample();
    }

    control.set_enabled(true);
    assert_eq!(gen.next_sample(), SAMPLE_TABLE[5]);
}

#[test]
fn test_toggle() {
    let control = ToneControl::new();

    assert!(control.toggle());
    assert!(control.is_enabled());
    assert!(!control.toggle());
    assert!(!control.is_enabled());
}

#[test]
fn test_enable_seen_from_another_thread() {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;

    static CONTROL: ToneControl = ToneControl::new();
    let done = Arc::new(AtomicBool::new(false));

    let isr = {
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut gen = ToneGenerator::new(&CONTROL);
            let mut sounding = 0u32;
            while !done.load(Ordering::Acquire) {
                let sample = gen.next_sample();
                assert!(gen.phase() < 64);
                if gen.gate() == Gate::Silent {
                    assert_eq!(sample, CENTER_SAMPLE);
                } else {
                    sounding += 1;
                }
            }
            sounding
        })
    };

    for _ in 0..1000 {
        CONTROL.set_enabled(true);
        CONTROL.set_enabled(false);
    }
    CONTROL.set_enabled(true);
    thread::sleep(std::time::Duration::from_millis(5));
    done.store(true, Ordering::Release);

    assert!(isr.join().unwrap() > 0);
}
