use super::*;

#[test]
fn iround_saturates_and_handles_nan() {
    assert_eq!(iround(2.5), 3);
    assert_eq!(iround(-2.4), -2);
    assert_eq!(iround(1e300), i32::MAX);
    assert_eq!(iround(f64::NAN), 0);
}

#[test]
fn quarter_turn_detection() {
    assert!(is_quarter_turn(0.0));
    assert!(is_quarter_turn(-270.0));
    assert!(is_quarter_turn(450.0));
    assert!(!is_quarter_turn(45.0));
}

#[test]
fn bisector_projection_moves_center_onto_bisector() {
    let c = project_onto_bisector(Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(3.0, 5.0));
    assert!((c.x - 1.0).abs() < 1e-12);
    assert!((c.y - 5.0).abs() < 1e-12);
}
