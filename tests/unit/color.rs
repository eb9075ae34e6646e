use std::sync::{Arc, Mutex};

use super::*;
use crate::message::Severity;

#[test]
fn fill_level_one_is_the_nominal_color() {
    let c = Rgb48::new(0x1234, 0x8000, 0xfffe);
    assert_eq!(desaturate(c, 1), Some(c));
}

#[test]
fn fill_level_max_is_white_for_any_color() {
    for c in [Rgb48::BLACK, Rgb48::new(0x1234, 0x8000, 0xfffe), Rgb48::WHITE] {
        assert_eq!(desaturate(c, 0xffff), Some(Rgb48::WHITE));
    }
}

#[test]
fn fill_level_zero_means_no_fill_and_midpoint_is_halfway() {
    assert_eq!(desaturate(Rgb48::BLACK, 0), None);
    let half = desaturate(Rgb48::BLACK, 0x8000).unwrap();
    assert!((i32::from(half.r) - 0x8000).abs() <= 1);
}

#[test]
fn color_names_and_hex() {
    assert_eq!(parse_color_name("Red"), Some(Rgb48::new(0xffff, 0, 0)));
    assert_eq!(parse_color_name(" dark gray "), parse_color_name("darkgray"));
    assert_eq!(
        parse_color_name("#00ff80"),
        Some(Rgb48::new(0, 0xffff, 0x8080))
    );
    assert_eq!(parse_color_name("#00ff8"), None);
    assert_eq!(parse_color_name("no-such-color"), None);
}

#[test]
fn nearest_index_never_picks_white_for_non_white_input() {
    let palette = [Rgb24::WHITE, Rgb24([0, 0, 0]), Rgb24([255, 0, 0])];
    assert_eq!(nearest_index(&palette, Rgb24([250, 250, 250])), Some(2));
    assert_eq!(nearest_index(&palette, Rgb24::WHITE), Some(0));
    assert_eq!(nearest_index(&palette, Rgb24([20, 10, 10])), Some(1));
    assert_eq!(nearest_index(&[], Rgb24([1, 2, 3])), None);
}

#[test]
fn color_table_overflow_falls_back_to_nearest_and_warns_once() {
    let warnings = Arc::new(Mutex::new(0));
    let counter = warnings.clone();
    let messenger = Messenger::new(Some(Arc::new(move |sev: Severity, _: &str| {
        assert_eq!(sev, Severity::Warning);
        *counter.lock().unwrap() += 1;
    })));

    let mut table = ColorTable::new(2);
    assert_eq!(table.lookup_or_insert(Rgb24([0, 0, 0]), &messenger), 0);
    assert_eq!(table.lookup_or_insert(Rgb24([200, 0, 0]), &messenger), 1);
    assert_eq!(table.lookup_or_insert(Rgb24([0, 0, 0]), &messenger), 0);

    assert_eq!(table.lookup_or_insert(Rgb24([190, 10, 0]), &messenger), 1);
    assert_eq!(table.lookup_or_insert(Rgb24([10, 0, 5]), &messenger), 0);
    assert_eq!(table.entries().len(), 2);
    assert_eq!(*warnings.lock().unwrap(), 1);
}
