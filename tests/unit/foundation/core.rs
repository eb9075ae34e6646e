use super::*;

#[test]
fn channels_above_16_bits_are_rejected() {
    assert_eq!(
        Rgb48::from_channels(1, 2, 3),
        Some(Rgb48::new(1, 2, 3))
    );
    assert_eq!(Rgb48::from_channels(0x1_0000, 0, 0), None);
    assert_eq!(Rgb48::from_channels(0, -1, 0), None);
}

#[test]
fn rgb8_widening_and_narrowing_agree() {
    let c = Rgb48::from_rgb8(0x12, 0xab, 0xff);
    assert_eq!(c, Rgb48::new(0x1212, 0xabab, 0xffff));
    assert_eq!(c.to_rgb24(), Rgb24([0x12, 0xab, 0xff]));
    assert_eq!(c.to_rgb24().hex(), "#12abff");
}

#[test]
fn gray_keeps_black_and_white_fixed() {
    assert_eq!(Rgb48::BLACK.to_gray(), Rgb48::BLACK);
    assert_eq!(Rgb48::WHITE.to_gray(), Rgb48::WHITE);
}
