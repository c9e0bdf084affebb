//! Board collaborator type tests

use touch_alarm::board::{Inputs, Key, LineBuffer, StatusDisplay, TouchSample};

#[test]
fn test_key_from_ascii() {
    assert_eq!(Key::from_ascii(b'0'), Some(Key::Digit(0)));
    assert_eq!(Key::from_ascii(b'9'), Some(Key::Digit(9)));
    assert_eq!(Key::from_ascii(b'A'), Some(Key::A));
    assert_eq!(Key::from_ascii(b'd'), Some(Key::D));
    assert_eq!(Key::from_ascii(b'*'), Some(Key::Star));
    assert_eq!(Key::from_ascii(b'#'), Some(Key::Pound));
    assert_eq!(Key::from_ascii(b'E'), None);
    assert_eq!(Key::from_ascii(b' '), None);
}

#[test]
fn test_touch_sample() {
    assert_eq!(TouchSample::default(), TouchSample::NONE);
    assert!(!TouchSample::NONE.any);

    let s = TouchSample::from_flags(1 << 10);
    assert!(s.any);
    assert!(s.is_touched(10));
    assert!(!s.is_touched(9));
    assert!(!s.is_touched(16));
    assert!(!s.is_touched(200));
}

#[test]
fn test_inputs_constructors() {
    let k = Inputs::key(Key::B);
    assert_eq!(k.key, Some(Key::B));
    assert!(!k.touch.any);

    let t = Inputs::touch(0b11);
    assert_eq!(t.key, None);
    assert!(t.touch.is_touched(0));
    assert!(t.touch.is_touched(1));
}

#[test]
fn test_line_buffer_write_and_clear() {
    let mut lcd: LineBuffer<2, 16> = LineBuffer::new();
    assert_eq!(lcd.row(1), "");
    assert_eq!(lcd.take_dirty(), 0);

    lcd.move_cursor(1, 1);
    lcd.write_str("DISARMED");
    assert_eq!(lcd.row(1), "DISARMED");
    assert_eq!(lcd.take_dirty(), 0b01);

    // Shorter text over a cleared line leaves no residue
    lcd.clear_line(1);
    lcd.move_cursor(1, 1);
    lcd.write_str("ARMED");
    assert_eq!(lcd.row(1), "ARMED");
    assert_eq!(lcd.row(2), "");
    assert_eq!(lcd.take_dirty(), 0b01);
}

#[test]
fn test_line_buffer_truncates() {
    let mut lcd: LineBuffer<2, 16> = LineBuffer::new();
    lcd.move_cursor(2, 1);
    lcd.write_str("TouchAlarm v0.1.0-gabcdef");
    assert_eq!(lcd.row(2), "TouchAlarm v0.1.");
    assert_eq!(lcd.take_dirty(), 0b10);

    lcd.move_cursor(1, 15);
    lcd.write_str("XYZ");
    assert_eq!(lcd.row(1), "              XY");
}

#[test]
fn test_line_buffer_out_of_range() {
    let mut lcd: LineBuffer<2, 16> = LineBuffer::new();
    lcd.clear_line(0);
    lcd.clear_line(3);
    assert_eq!(lcd.take_dirty(), 0);
    assert_eq!(lcd.row(0), "");
    assert_eq!(lcd.row(5), "");

    // Rows past the end clamp to the last row
    lcd.move_cursor(9, 1);
    lcd.write_str("hi");
    assert_eq!(lcd.row(2), "hi");
}

#[test]
fn test_line_buffer_non_ascii() {
    let mut lcd: LineBuffer<1, 8> = LineBuffer::new();
    lcd.move_cursor(1, 1);
    lcd.write_str("a\u{e9}b");
    // Each byte of the two-byte character becomes '?'
    assert_eq!(lcd.row(1), "a??b");
}
