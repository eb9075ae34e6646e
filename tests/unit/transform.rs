use super::*;

fn close(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

#[test]
fn space_maps_window_corners_onto_unit_square() {
    let mut t = Transform::new(Affine::IDENTITY);
    t.space(-10.0, 5.0, 30.0, 25.0).unwrap();

    assert!(close(t.to_ndc(Point::new(-10.0, 5.0)), Point::new(0.0, 0.0)));
    assert!(close(t.to_ndc(Point::new(30.0, 5.0)), Point::new(1.0, 0.0)));
    assert!(close(t.to_ndc(Point::new(-10.0, 25.0)), Point::new(0.0, 1.0)));
    assert!(close(t.to_ndc(Point::new(30.0, 25.0)), Point::new(1.0, 1.0)));
}

#[test]
fn degenerate_space_is_rejected_and_leaves_mapping_intact() {
    let mut t = Transform::new(Affine::IDENTITY);
    t.space(0.0, 0.0, 4.0, 4.0).unwrap();
    let before = t.clone();

    let err = t.space(0.0, 0.0, 0.0, 0.0).unwrap_err();
    assert!(matches!(err, PlotError::SingularTransform(_)));
    assert_eq!(t, before);
}

#[test]
fn space2_accepts_parallelograms() {
    let mut t = Transform::new(Affine::IDENTITY);
    t.space2(0.0, 0.0, 2.0, 1.0, 1.0, 2.0).unwrap();
    assert!(close(t.to_ndc(Point::new(2.0, 1.0)), Point::new(1.0, 0.0)));
    assert!(close(t.to_ndc(Point::new(1.0, 2.0)), Point::new(0.0, 1.0)));
    assert!(!t.flags().axes_preserved);
}

#[test]
fn flags_follow_device_matrix() {
    // y-flipping device frame, 100 device units per NDC unit
    let mut t = Transform::new(Affine::new([100.0, 0.0, 0.0, -100.0, 0.0, 100.0]));
    let f = t.flags();
    assert!(f.uniform && f.axes_preserved && !f.nonreflecting);

    t.space(0.0, 0.0, 2.0, 1.0).unwrap();
    assert!(!t.flags().uniform);

    t.space(0.0, 0.0, 1.0, 1.0).unwrap();
    t.concat([0.0, 1.0, -1.0, 0.0, 0.0, 0.0]).unwrap();
    let f = t.flags();
    assert!(f.uniform);
    assert!(!f.axes_preserved);
}

#[test]
fn norm_and_singular_values() {
    let (lo, hi) = singular_values(Affine::scale_non_uniform(2.0, 8.0));
    assert!((lo - 2.0).abs() < 1e-12 && (hi - 8.0).abs() < 1e-12);
    assert!((matrix_norm(Affine::scale_non_uniform(2.0, 8.0)) - 4.0).abs() < 1e-12);

    let (lo, hi) = singular_values(Affine::rotate(0.7) * Affine::scale(3.0));
    assert!((lo - 3.0).abs() < 1e-9 && (hi - 3.0).abs() < 1e-9);
}

#[test]
fn concat_applies_new_matrix_in_user_space_first() {
    let mut t = Transform::new(Affine::IDENTITY);
    t.space(0.0, 0.0, 10.0, 10.0).unwrap();
    t.concat([1.0, 0.0, 0.0, 1.0, 5.0, 0.0]).unwrap();
    assert!(close(t.to_ndc(Point::new(0.0, 0.0)), Point::new(0.5, 0.0)));
}
