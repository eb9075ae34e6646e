//! Capability-driven geometric decomposition.
//!
//! Shapes a backend cannot draw directly are rewritten into simpler segments: elliptic arcs,
//! circular arcs, cubic Beziers, or an inscribed polyline as the universal fallback.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use kurbo::{ParamCurve, PathEl};
use serde::{Deserialize, Serialize};

use crate::capability::{Capabilities, ShapeContext, ShapeKind, Strategy};
use crate::foundation::core::{Point, Vec2};
use crate::foundation::math::{cross, is_quarter_turn, project_onto_bisector};
use crate::path::{Path, Segment, SegmentList};
use crate::transform::TransformFlags;

/// Cubic control-handle length for a quarter circle of unit radius.
const KAPPA: f64 = 0.552_284_749_830_793_4;
/// Polygon resolution for circular arcs: one chord per this many radians.
const ARC_CHORD_ANGLE: f64 = PI / 16.0;
/// Chords per quarter of an ellipse or elliptic arc.
const QUARTER_CHORDS: usize = 8;
/// Chords per Bezier segment.
const BEZIER_CHORDS: usize = 16;

/// A curved segment as requested by the caller, before decomposition.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum CurveRequest {
    Arc { center: Point, end: Point, ccw: bool },
    EllArc { center: Point, end: Point },
    Quad { ctrl: Point, end: Point },
    Cubic { c1: Point, c2: Point, end: Point },
}

impl CurveRequest {
    /// A circular arc from `start` to `end` around `center`.
    ///
    /// The center is first moved to the nearest point on the perpendicular bisector of the
    /// chord so both endpoints sit at the same radius. The shorter arc is taken; a half turn
    /// (center on the chord) is counterclockwise. Returns `None` for coincident endpoints.
    pub fn arc(start: Point, center: Point, end: Point) -> Option<Self> {
        if start == end {
            return None;
        }
        let center = project_onto_bisector(start, end, center);
        Some(CurveRequest::Arc {
            center,
            end,
            ccw: arc_is_ccw(start, center, end),
        })
    }

    /// A quarter ellipse from `start` to `end`; `None` when the two radii are collinear.
    pub fn ellarc(start: Point, center: Point, end: Point) -> Option<Self> {
        if cross(start - center, end - center) == 0.0 {
            return None;
        }
        Some(CurveRequest::EllArc { center, end })
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            CurveRequest::Arc { .. } => ShapeKind::Arc,
            CurveRequest::EllArc { .. } => ShapeKind::EllArc,
            CurveRequest::Quad { .. } => ShapeKind::Quad,
            CurveRequest::Cubic { .. } => ShapeKind::Cubic,
        }
    }

    fn aligned(&self, start: Point) -> bool {
        match *self {
            CurveRequest::EllArc { center, end } => {
                let (a, b) = (start - center, end - center);
                (a.x == 0.0 && b.y == 0.0) || (a.y == 0.0 && b.x == 0.0)
            }
            _ => true,
        }
    }

    pub fn strategy(
        &self,
        start: Point,
        caps: &Capabilities,
        flags: TransformFlags,
        standalone: bool,
    ) -> Strategy {
        let ctx = ShapeContext {
            flags,
            aligned: self.aligned(start),
            standalone,
        };
        caps.select(self.kind(), &ctx)
    }

    /// Express the request as segments the backend accepts.
    pub fn decompose(
        &self,
        start: Point,
        caps: &Capabilities,
        flags: TransformFlags,
        standalone: bool,
    ) -> Vec<Segment> {
        let strategy = self.strategy(start, caps, flags, standalone);
        match (*self, strategy) {
            (CurveRequest::Arc { center, end, ccw }, Strategy::Primitive) => {
                vec![Segment::Arc { center, end, ccw }]
            }
            (CurveRequest::Arc { center, end, ccw }, Strategy::Cubics) => {
                arc_cubics(start, center, end, ccw)
            }
            (CurveRequest::Arc { center, end, ccw }, _) => arc_polygon(start, center, end, ccw),

            (CurveRequest::EllArc { center, end }, Strategy::Primitive) => {
                vec![Segment::EllArc { center, end }]
            }
            (CurveRequest::EllArc { center, end }, Strategy::Cubics) => {
                vec![quarter_cubic(center, start - center, end - center)]
            }
            (CurveRequest::EllArc { center, end }, _) => {
                quarter_polygon(center, start - center, end - center)
            }

            (CurveRequest::Quad { ctrl, end }, Strategy::Primitive) => {
                vec![Segment::Quad { ctrl, end }]
            }
            (CurveRequest::Quad { ctrl, end }, Strategy::Cubics) => {
                let c = kurbo::QuadBez::new(start, ctrl, end).raise();
                vec![Segment::Cubic {
                    c1: c.p1,
                    c2: c.p2,
                    end,
                }]
            }
            (CurveRequest::Quad { ctrl, end }, _) => {
                sample_curve(&kurbo::QuadBez::new(start, ctrl, end), end)
            }

            (CurveRequest::Cubic { c1, c2, end }, Strategy::Primitive) => {
                vec![Segment::Cubic { c1, c2, end }]
            }
            (CurveRequest::Cubic { c1, c2, end }, _) => {
                sample_curve(&kurbo::CubicBez::new(start, c1, c2, end), end)
            }
        }
    }
}

/// Orientation of the shorter arc from `start` to `end` around `center`, in user space.
///
/// Collinear points (a half turn) count as counterclockwise.
pub fn arc_is_ccw(start: Point, center: Point, end: Point) -> bool {
    cross(start - center, end - center) >= 0.0
}

/// Orientation as seen in device space: a reflecting transform reverses the sense.
pub fn device_ccw(ccw: bool, flags: TransformFlags) -> bool {
    if flags.nonreflecting { ccw } else { !ccw }
}

/// Signed sweep of a circular arc in radians (positive is counterclockwise).
pub fn arc_sweep(start: Point, center: Point, end: Point, ccw: bool) -> f64 {
    let a0 = (start - center).atan2();
    let a1 = (end - center).atan2();
    if ccw {
        let s = (a1 - a0).rem_euclid(TAU);
        if s == 0.0 { TAU } else { s }
    } else {
        let s = (a0 - a1).rem_euclid(TAU);
        -(if s == 0.0 { TAU } else { s })
    }
}

fn arc_cubics(start: Point, center: Point, end: Point, ccw: bool) -> Vec<Segment> {
    let radius = (start - center).hypot();
    let arc = kurbo::Arc {
        center,
        radii: Vec2::new(radius, radius),
        start_angle: (start - center).atan2(),
        sweep_angle: arc_sweep(start, center, end, ccw),
        x_rotation: 0.0,
    };
    let mut segs: Vec<Segment> = arc
        .append_iter(radius * 1e-4)
        .filter_map(|el| match el {
            PathEl::CurveTo(c1, c2, p) => Some(Segment::Cubic { c1, c2, end: p }),
            PathEl::LineTo(p) => Some(Segment::Line(p)),
            _ => None,
        })
        .collect();
    snap_end(&mut segs, end);
    segs
}

fn arc_polygon(start: Point, center: Point, end: Point, ccw: bool) -> Vec<Segment> {
    let radius = (start - center).hypot();
    let a0 = (start - center).atan2();
    let sweep = arc_sweep(start, center, end, ccw);
    let n = ((sweep.abs() / ARC_CHORD_ANGLE).ceil() as usize).max(1);
    let mut segs: Vec<Segment> = (1..=n)
        .map(|i| {
            let a = a0 + sweep * i as f64 / n as f64;
            Segment::Line(center + Vec2::from_angle(a) * radius)
        })
        .collect();
    snap_end(&mut segs, end);
    segs
}

/// One cubic for the quarter ellipse `center + cos(t) a + sin(t) b`, `t` in `[0, pi/2]`.
fn quarter_cubic(center: Point, a: Vec2, b: Vec2) -> Segment {
    let start = center + a;
    let end = center + b;
    Segment::Cubic {
        c1: start + b * KAPPA,
        c2: end + a * KAPPA,
        end,
    }
}

fn quarter_polygon(center: Point, a: Vec2, b: Vec2) -> Vec<Segment> {
    let mut segs: Vec<Segment> = (1..=QUARTER_CHORDS)
        .map(|i| {
            let t = FRAC_PI_2 * i as f64 / QUARTER_CHORDS as f64;
            Segment::Line(center + a * t.cos() + b * t.sin())
        })
        .collect();
    snap_end(&mut segs, center + b);
    segs
}

fn sample_curve(curve: &impl ParamCurve, end: Point) -> Vec<Segment> {
    let mut segs: Vec<Segment> = (1..=BEZIER_CHORDS)
        .map(|i| Segment::Line(curve.eval(i as f64 / BEZIER_CHORDS as f64)))
        .collect();
    snap_end(&mut segs, end);
    segs
}

// Floating-point evaluation must not move the logical endpoint.
fn snap_end(segs: &mut [Segment], end: Point) {
    if let Some(last) = segs.last_mut() {
        match last {
            Segment::Line(p) => *p = end,
            Segment::Arc { end: e, .. }
            | Segment::EllArc { end: e, .. }
            | Segment::Quad { end: e, .. }
            | Segment::Cubic { end: e, .. } => *e = end,
        }
    }
}

/// Build an ellipse, as a primitive when the backend allows, otherwise decomposed.
pub fn ellipse(
    center: Point,
    rx: f64,
    ry: f64,
    angle_deg: f64,
    clockwise: bool,
    caps: &Capabilities,
    flags: TransformFlags,
) -> Path {
    let ctx = ShapeContext {
        flags,
        aligned: is_quarter_turn(angle_deg),
        standalone: true,
    };
    let strategy = caps.select(ShapeKind::Ellipse, &ctx);
    tracing::trace!(?strategy, angle_deg, "ellipse");
    if strategy == Strategy::Primitive {
        return Path::Ellipse {
            center,
            rx,
            ry,
            angle_deg,
            clockwise,
        };
    }
    let theta = angle_deg.to_radians();
    let u = Vec2::from_angle(theta) * rx;
    let v = Vec2::from_angle(theta + FRAC_PI_2) * ry;
    Path::Segments(closed_conic(center, u, v, clockwise, strategy))
}

/// Build a circle, as a primitive when the backend allows, otherwise decomposed.
pub fn circle(
    center: Point,
    radius: f64,
    clockwise: bool,
    caps: &Capabilities,
    flags: TransformFlags,
) -> Path {
    let ctx = ShapeContext {
        flags,
        aligned: true,
        standalone: true,
    };
    let strategy = caps.select(ShapeKind::Circle, &ctx);
    tracing::trace!(?strategy, "circle");
    if strategy == Strategy::Primitive {
        return Path::Circle {
            center,
            radius,
            clockwise,
        };
    }
    let u = Vec2::new(radius, 0.0);
    let v = Vec2::new(0.0, radius);
    Path::Segments(closed_conic(center, u, v, clockwise, strategy))
}

/// Closed conic through the four points `center +/- u`, `center +/- v`, starting at `center + u`.
fn closed_conic(center: Point, u: Vec2, v: Vec2, clockwise: bool, strategy: Strategy) -> SegmentList {
    let v = if clockwise { -v } else { v };
    let radii = [u, v, -u, -v];
    let mut list = SegmentList::new(center + u);
    list.closed = true;
    for i in 0..4 {
        let a = radii[i];
        let b = radii[(i + 1) % 4];
        let end = center + b;
        match strategy {
            Strategy::EllipticArcs => list.segments.push(Segment::EllArc { center, end }),
            Strategy::CircularArcs => list.segments.push(Segment::Arc {
                center,
                end,
                ccw: !clockwise,
            }),
            Strategy::Cubics => list.segments.push(quarter_cubic(center, a, b)),
            _ => list.segments.extend(quarter_polygon(center, a, b)),
        }
    }
    list
}

/// Build an axis-aligned box with opposite corners `p0` and `p1`.
pub fn rect(
    p0: Point,
    p1: Point,
    clockwise: bool,
    caps: &Capabilities,
    flags: TransformFlags,
) -> Path {
    let ctx = ShapeContext {
        flags,
        aligned: true,
        standalone: true,
    };
    if caps.select(ShapeKind::Box, &ctx) == Strategy::Primitive {
        return Path::Box { p0, p1, clockwise };
    }
    Path::Segments(rect_polygon(p0, p1, clockwise))
}

fn rect_polygon(p0: Point, p1: Point, clockwise: bool) -> SegmentList {
    let (a, b) = (Point::new(p1.x, p0.y), Point::new(p0.x, p1.y));
    let corners = if clockwise { [b, p1, a, p0] } else { [a, p1, b, p0] };
    SegmentList {
        start: p0,
        segments: corners.into_iter().map(Segment::Line).collect(),
        closed: true,
    }
}

/// Flatten any path into a user-space polyline, for backends that rasterize or plot with
/// straight strokes only. Closed paths end on their start point.
pub fn flatten(path: &Path) -> Vec<Point> {
    let owned;
    let list = match *path {
        Path::Segments(ref list) => list,
        Path::Box { p0, p1, clockwise } => {
            owned = rect_polygon(p0, p1, clockwise);
            &owned
        }
        Path::Circle {
            center,
            radius,
            clockwise,
        } => {
            let (u, v) = (Vec2::new(radius, 0.0), Vec2::new(0.0, radius));
            owned = closed_conic(center, u, v, clockwise, Strategy::Polygon);
            &owned
        }
        Path::Ellipse {
            center,
            rx,
            ry,
            angle_deg,
            clockwise,
        } => {
            let theta = angle_deg.to_radians();
            let u = Vec2::from_angle(theta) * rx;
            let v = Vec2::from_angle(theta + FRAC_PI_2) * ry;
            owned = closed_conic(center, u, v, clockwise, Strategy::Polygon);
            &owned
        }
    };

    let mut points = vec![list.start];
    let mut prev = list.start;
    for seg in &list.segments {
        let lines = match *seg {
            Segment::Line(p) => vec![Segment::Line(p)],
            Segment::Arc { center, end, ccw } => arc_polygon(prev, center, end, ccw),
            Segment::EllArc { center, end } => quarter_polygon(center, prev - center, end - center),
            Segment::Quad { ctrl, end } => sample_curve(&kurbo::QuadBez::new(prev, ctrl, end), end),
            Segment::Cubic { c1, c2, end } => {
                sample_curve(&kurbo::CubicBez::new(prev, c1, c2, end), end)
            }
        };
        points.extend(lines.iter().map(Segment::end));
        prev = seg.end();
    }
    if list.closed && prev != list.start {
        points.push(list.start);
    }
    points
}

#[cfg(test)]
#[path = "../../tests/unit/path/decompose.rs"]
mod tests;
