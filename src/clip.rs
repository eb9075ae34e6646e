//! Cohen-Sutherland clipping of a segment against an axis-aligned rectangle.

use crate::foundation::core::Point;

const LEFT: u8 = 0b0001;
const RIGHT: u8 = 0b0010;
const BOTTOM: u8 = 0b0100;
const TOP: u8 = 0b1000;

/// Inclusive clipping rectangle in device coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipRect {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

/// Outcome of clipping one segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Clipped {
    /// Some part of the segment is visible. The flags record which endpoints were moved.
    Accepted {
        p0: Point,
        p1: Point,
        first_moved: bool,
        second_moved: bool,
    },
    Rejected,
}

impl ClipRect {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    fn outcode(&self, p: Point) -> u8 {
        let mut code = 0;
        if p.x < self.xmin {
            code |= LEFT;
        } else if p.x > self.xmax {
            code |= RIGHT;
        }
        if p.y < self.ymin {
            code |= BOTTOM;
        } else if p.y > self.ymax {
            code |= TOP;
        }
        code
    }

    pub fn clip_line(&self, mut p0: Point, mut p1: Point) -> Clipped {
        let mut code0 = self.outcode(p0);
        let mut code1 = self.outcode(p1);
        let mut first_moved = false;
        let mut second_moved = false;

        loop {
            if code0 | code1 == 0 {
                return Clipped::Accepted {
                    p0,
                    p1,
                    first_moved,
                    second_moved,
                };
            }
            if code0 & code1 != 0 {
                return Clipped::Rejected;
            }

            let out = if code0 != 0 { code0 } else { code1 };
            let (dx, dy) = (p1.x - p0.x, p1.y - p0.y);
            // The AND test above guarantees the segment spans the chosen edge, so the
            // corresponding delta is nonzero.
            let p = if out & TOP != 0 {
                Point::new(p0.x + dx * (self.ymax - p0.y) / dy, self.ymax)
            } else if out & BOTTOM != 0 {
                Point::new(p0.x + dx * (self.ymin - p0.y) / dy, self.ymin)
            } else if out & RIGHT != 0 {
                Point::new(self.xmax, p0.y + dy * (self.xmax - p0.x) / dx)
            } else {
                Point::new(self.xmin, p0.y + dy * (self.xmin - p0.x) / dx)
            };

            if out == code0 {
                p0 = p;
                code0 = self.outcode(p0);
                first_moved = true;
            } else {
                p1 = p;
                code1 = self.outcode(p1);
                second_moved = true;
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/clip.rs"]
mod tests;
