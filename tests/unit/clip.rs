use super::*;

fn unit_box() -> ClipRect {
    ClipRect::new(0.0, 0.0, 10.0, 10.0)
}

#[test]
fn inside_segment_is_accepted_unchanged() {
    let r = unit_box().clip_line(Point::new(1.0, 2.0), Point::new(9.0, 8.0));
    assert_eq!(
        r,
        Clipped::Accepted {
            p0: Point::new(1.0, 2.0),
            p1: Point::new(9.0, 8.0),
            first_moved: false,
            second_moved: false,
        }
    );
}

#[test]
fn outside_segment_is_rejected() {
    assert_eq!(
        unit_box().clip_line(Point::new(-5.0, -1.0), Point::new(20.0, -3.0)),
        Clipped::Rejected
    );
    // both endpoints out on different sides, but the segment misses the corner
    assert_eq!(
        unit_box().clip_line(Point::new(-3.0, 8.0), Point::new(1.0, 12.0)),
        Clipped::Rejected
    );
}

#[test]
fn crossing_one_edge_moves_exactly_one_endpoint_onto_it() {
    let r = unit_box().clip_line(Point::new(-5.0, 5.0), Point::new(5.0, 5.0));
    assert_eq!(
        r,
        Clipped::Accepted {
            p0: Point::new(0.0, 5.0),
            p1: Point::new(5.0, 5.0),
            first_moved: true,
            second_moved: false,
        }
    );
}

#[test]
fn crossing_two_edges_moves_both_endpoints() {
    match unit_box().clip_line(Point::new(-10.0, -10.0), Point::new(20.0, 20.0)) {
        Clipped::Accepted {
            p0,
            p1,
            first_moved,
            second_moved,
        } => {
            assert!(first_moved && second_moved);
            assert_eq!(p0, Point::new(0.0, 0.0));
            assert_eq!(p1, Point::new(10.0, 10.0));
        }
        Clipped::Rejected => panic!("diagonal through the box must be accepted"),
    }
}
