use super::*;

#[test]
fn unknown_justification_characters_resolve_to_defaults() {
    assert_eq!(HJust::from_char('q'), HJust::Left);
    assert_eq!(HJust::from_char('r'), HJust::Right);
    assert_eq!(VJust::from_char('?'), VJust::Baseline);
    assert_eq!(VJust::from_char('C'), VJust::CapLine);
}

#[test]
fn string_width_scales_with_size_and_length() {
    let m = FontMetrics::generic("Helvetica", 10.0);
    assert!((m.string_width("abcd") - 4.0 * 5.56).abs() < 1e-9);
    assert_eq!(m.string_width(""), 0.0);
}

#[test]
fn baseline_shift_places_top_below_cursor() {
    let m = FontMetrics::generic("Helvetica", 1.0);
    assert!(VJust::Top.baseline_shift(&m) < 0.0);
    assert!(VJust::Bottom.baseline_shift(&m) > 0.0);
    assert_eq!(VJust::Baseline.baseline_shift(&m), 0.0);
}
