//! Path model and the path-under-construction buffer.
//!
//! Paths are stored in user coordinates; backends map them through the transform carried by
//! the drawing state at paint time.

pub mod decompose;

use serde::{Deserialize, Serialize};

use crate::capability::Capabilities;
use crate::foundation::core::Point;
use crate::transform::TransformFlags;

pub use decompose::CurveRequest;

/// One segment of a segment list. The start point is the previous segment's end.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Segment {
    Line(Point),
    /// Circular arc, less than or equal to a half turn, in user space.
    Arc { center: Point, end: Point, ccw: bool },
    /// Quarter ellipse whose conjugate radii are `start - center` and `end - center`.
    EllArc { center: Point, end: Point },
    Quad { ctrl: Point, end: Point },
    Cubic { c1: Point, c2: Point, end: Point },
}

impl Segment {
    pub fn end(&self) -> Point {
        match *self {
            Segment::Line(p) => p,
            Segment::Arc { end, .. }
            | Segment::EllArc { end, .. }
            | Segment::Quad { end, .. }
            | Segment::Cubic { end, .. } => end,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentList {
    pub start: Point,
    pub segments: Vec<Segment>,
    pub closed: bool,
}

impl SegmentList {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            segments: Vec::new(),
            closed: false,
        }
    }

    pub fn end(&self) -> Point {
        self.segments.last().map_or(self.start, Segment::end)
    }
}

/// A finished simple path: a segment list or a primitive closed shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Path {
    Segments(SegmentList),
    Box {
        p0: Point,
        p1: Point,
        clockwise: bool,
    },
    Circle {
        center: Point,
        radius: f64,
        clockwise: bool,
    },
    Ellipse {
        center: Point,
        rx: f64,
        ry: f64,
        angle_deg: f64,
        clockwise: bool,
    },
}

impl Path {
    /// Where the cursor rests after this path is flushed. Closed primitives leave it at
    /// their center.
    pub fn exit_point(&self) -> Point {
        match self {
            Path::Segments(list) => list.end(),
            Path::Box { p0, p1, .. } => p0.midpoint(*p1),
            Path::Circle { center, .. } | Path::Ellipse { center, .. } => *center,
        }
    }

    pub fn is_closed(&self) -> bool {
        match self {
            Path::Segments(list) => list.closed,
            _ => true,
        }
    }
}

/// The simple path currently under construction in a drawing state.
///
/// A curve that opens an otherwise empty path is kept in the form a standalone path allows;
/// the original request is stashed so the curve can be re-expressed if a second segment
/// later joins and the backend cannot mix curves into longer paths.
#[derive(Clone, Debug, PartialEq)]
pub struct PathBuilder {
    list: SegmentList,
    stash: Option<CurveRequest>,
}

impl PathBuilder {
    pub fn new(start: Point) -> Self {
        Self {
            list: SegmentList::new(start),
            stash: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.list.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.list.segments.len()
    }

    pub fn is_closed(&self) -> bool {
        self.list.closed
    }

    pub fn current_point(&self) -> Point {
        self.list.end()
    }

    pub fn has_stash(&self) -> bool {
        self.stash.is_some()
    }

    pub fn close(&mut self) {
        self.list.closed = true;
    }

    pub fn add_line(&mut self, to: Point, caps: &Capabilities, flags: TransformFlags) {
        self.unstash(caps, flags);
        self.list.segments.push(Segment::Line(to));
    }

    pub fn add_curve(&mut self, req: CurveRequest, caps: &Capabilities, flags: TransformFlags) {
        let start = self.current_point();
        if self.is_empty() {
            let alone = req.decompose(start, caps, flags, true);
            if req.strategy(start, caps, flags, true) != req.strategy(start, caps, flags, false) {
                tracing::trace!(?req, "curve stashed as standalone path");
                self.stash = Some(req);
            }
            self.list.segments.extend(alone);
        } else {
            self.unstash(caps, flags);
            let segs = req.decompose(start, caps, flags, false);
            self.list.segments.extend(segs);
        }
    }

    fn unstash(&mut self, caps: &Capabilities, flags: TransformFlags) {
        if let Some(req) = self.stash.take() {
            let segs = req.decompose(self.list.start, caps, flags, false);
            self.list.segments = segs;
        }
    }

    pub fn finish(self) -> SegmentList {
        self.list
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/builder.rs"]
mod tests;
