use super::*;
use crate::capability::Capability;

fn identity() -> TransformFlags {
    TransformFlags {
        uniform: true,
        axes_preserved: true,
        nonreflecting: true,
    }
}

fn near(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

#[test]
fn arc_center_is_projected_onto_the_bisector() {
    let req = CurveRequest::arc(
        Point::new(0.0, 0.0),
        Point::new(1.0, 5.0),
        Point::new(2.0, 0.0),
    )
    .unwrap();
    let CurveRequest::Arc { center, .. } = req else {
        panic!("expected an arc");
    };
    assert!((center.x - 1.0).abs() < 1e-12);
    let r0 = (Point::new(0.0, 0.0) - center).hypot();
    let r1 = (Point::new(2.0, 0.0) - center).hypot();
    assert!((r0 - r1).abs() < 1e-12);

    let req = CurveRequest::arc(
        Point::new(0.0, 0.0),
        Point::new(3.0, 2.0),
        Point::new(2.0, 0.0),
    )
    .unwrap();
    let CurveRequest::Arc { center, .. } = req else {
        panic!("expected an arc");
    };
    assert!(near(center, Point::new(1.0, 2.0)));
}

#[test]
fn coincident_arc_endpoints_degenerate() {
    let p = Point::new(1.0, 1.0);
    assert_eq!(CurveRequest::arc(p, Point::new(0.0, 0.0), p), None);
    assert_eq!(
        CurveRequest::ellarc(Point::new(1.0, 0.0), Point::new(0.0, 0.0), Point::new(2.0, 0.0)),
        None
    );
}

#[test]
fn arc_orientation_follows_cross_product() {
    let c = Point::new(0.0, 0.0);
    assert!(arc_is_ccw(Point::new(1.0, 0.0), c, Point::new(0.0, 1.0)));
    assert!(!arc_is_ccw(Point::new(0.0, 1.0), c, Point::new(1.0, 0.0)));
    // half turn: counterclockwise by convention
    assert!(arc_is_ccw(Point::new(1.0, 0.0), c, Point::new(-1.0, 0.0)));

    let reflecting = TransformFlags {
        nonreflecting: false,
        ..identity()
    };
    assert!(!device_ccw(true, reflecting));
    assert!(device_ccw(true, identity()));
}

#[test]
fn rotated_ellipse_on_axis_preserving_backend_is_not_a_primitive() {
    let caps = Capabilities {
        ellipses: Capability::AxisPreservingOnly,
        ..Capabilities::polylines_only()
    };
    let path = ellipse(Point::new(0.0, 0.0), 2.0, 1.0, 45.0, false, &caps, identity());
    let Path::Segments(list) = path else {
        panic!("rotated ellipse must be decomposed");
    };
    assert!(list.closed);
    assert!(list.segments.iter().all(|s| matches!(s, Segment::Line(_))));
    assert!(near(list.end(), list.start));

    let path = ellipse(Point::new(0.0, 0.0), 2.0, 1.0, 90.0, false, &caps, identity());
    assert!(matches!(path, Path::Ellipse { .. }));
}

#[test]
fn ellipse_falls_back_to_elliptic_arcs_then_cubics() {
    let arcs = Capabilities {
        ellarcs: Capability::Any,
        ..Capabilities::polylines_only()
    };
    let Path::Segments(list) = ellipse(Point::ZERO, 2.0, 1.0, 30.0, false, &arcs, identity())
    else {
        panic!("expected segments");
    };
    assert_eq!(list.segments.len(), 4);
    assert!(list.segments.iter().all(|s| matches!(s, Segment::EllArc { .. })));

    let cubics = Capabilities {
        cubics: Capability::Any,
        ..Capabilities::polylines_only()
    };
    let Path::Segments(list) = ellipse(Point::ZERO, 2.0, 1.0, 30.0, true, &cubics, identity())
    else {
        panic!("expected segments");
    };
    assert_eq!(list.segments.len(), 4);
    assert!(list.segments.iter().all(|s| matches!(s, Segment::Cubic { .. })));
}

#[test]
fn polygon_circle_vertices_lie_on_the_circle() {
    let caps = Capabilities::polylines_only();
    let c = Point::new(3.0, -1.0);
    let Path::Segments(list) = circle(c, 2.0, false, &caps, identity()) else {
        panic!("expected segments");
    };
    for s in &list.segments {
        assert!(((s.end() - c).hypot() - 2.0).abs() < 1e-9);
    }
    // counterclockwise: the first vertex after the start turns upward
    assert!(list.segments[0].end().y > c.y);
}

#[test]
fn box_decomposition_honors_orientation() {
    let caps = Capabilities::polylines_only();
    let Path::Segments(ccw) = rect(Point::ZERO, Point::new(2.0, 1.0), false, &caps, identity())
    else {
        panic!("expected segments");
    };
    assert_eq!(ccw.segments[0], Segment::Line(Point::new(2.0, 0.0)));

    let Path::Segments(cw) = rect(Point::ZERO, Point::new(2.0, 1.0), true, &caps, identity())
    else {
        panic!("expected segments");
    };
    assert_eq!(cw.segments[0], Segment::Line(Point::new(0.0, 1.0)));
    assert_eq!(cw.end(), Point::ZERO);
}

#[test]
fn arc_cubics_end_exactly_at_the_requested_point() {
    let caps = Capabilities {
        cubics: Capability::Any,
        ..Capabilities::polylines_only()
    };
    let start = Point::new(1.0, 0.0);
    let req = CurveRequest::arc(start, Point::ZERO, Point::new(-1.0, 0.0)).unwrap();
    let segs = req.decompose(start, &caps, identity(), true);
    assert!(!segs.is_empty());
    assert!(segs.iter().all(|s| matches!(s, Segment::Cubic { .. })));
    assert_eq!(segs.last().unwrap().end(), Point::new(-1.0, 0.0));
    // counterclockwise half turn passes through the top of the circle
    assert!(segs.iter().all(|s| s.end().y >= -1e-9));
}

#[test]
fn flatten_closes_primitives_on_their_start_point() {
    let square = Path::Box {
        p0: Point::new(0.0, 0.0),
        p1: Point::new(2.0, 1.0),
        clockwise: false,
    };
    let pts = flatten(&square);
    assert_eq!(pts.len(), 5);
    assert_eq!(pts[0], Point::new(0.0, 0.0));
    assert_eq!(pts[1], Point::new(2.0, 0.0));
    assert_eq!(*pts.last().unwrap(), Point::new(0.0, 0.0));

    let c = Path::Circle {
        center: Point::new(1.0, 1.0),
        radius: 2.0,
        clockwise: false,
    };
    let pts = flatten(&c);
    assert!(pts.len() > 8);
    assert!(near(pts[0], *pts.last().unwrap()));
    assert!(pts.iter().all(|p| ((*p - Point::new(1.0, 1.0)).hypot() - 2.0).abs() < 1e-9));
}

#[test]
fn flatten_samples_curved_segments() {
    let mut list = SegmentList::new(Point::new(1.0, 0.0));
    list.segments.push(Segment::Arc {
        center: Point::ZERO,
        end: Point::new(-1.0, 0.0),
        ccw: true,
    });
    let pts = flatten(&Path::Segments(list));
    assert!(pts.len() > 3);
    assert!(pts.iter().all(|p| p.y >= -1e-9));
    assert_eq!(*pts.last().unwrap(), Point::new(-1.0, 0.0));
}
