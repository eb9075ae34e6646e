use crate::backend::{Backend, PaintContext};
use crate::capability::Capabilities;
use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::PlotResult;
use crate::path::{CurveRequest, Path, PathBuilder, decompose};
use crate::state::StateStack;
use crate::text::{HJust, VJust};
use crate::transform::TransformFlags;

use super::{Plotter, not_open};

impl<B: Backend> Plotter<B> {
    /// Paint the pending path, if any.
    pub fn endpath(&mut self) -> PlotResult<()> {
        self.ensure_open("endpath")?;
        self.flush_path()
    }

    /// Finish the current simple path without painting; `endpath` paints all finished
    /// subpaths together as one compound path.
    pub fn endsubpath(&mut self) -> PlotResult<()> {
        self.ensure_open("endsubpath")?;
        let state = self.top_mut()?;
        if let Some(builder) = state.path.take()
            && !builder.is_empty()
        {
            state.subpaths.push(Path::Segments(builder.finish()));
        }
        Ok(())
    }

    /// Close the current simple path back to its start point.
    pub fn closepath(&mut self) -> PlotResult<()> {
        self.ensure_open("closepath")?;
        let state = self.top_mut()?;
        if let Some(builder) = state.path.as_mut()
            && !builder.is_empty()
        {
            builder.close();
        }
        Ok(())
    }

    /// Move the cursor. A path in progress is flushed first.
    pub fn fmove(&mut self, x: f64, y: f64) -> PlotResult<()> {
        self.ensure_open("fmove")?;
        let pending = self
            .top()?
            .path
            .as_ref()
            .is_some_and(|p| !p.is_empty());
        if pending {
            self.flush_path()?;
        }
        let state = self.top_mut()?;
        state.path = None;
        state.pos = Point::new(x, y);
        Ok(())
    }

    /// Continue the path with a line segment to `(x, y)`.
    pub fn fcont(&mut self, x: f64, y: f64) -> PlotResult<()> {
        self.ensure_open("fcont")?;
        self.prepare_segment()?;
        let to = Point::new(x, y);
        self.with_builder(|b, caps, flags| b.add_line(to, caps, flags))
    }

    /// Line segment from `(x0, y0)` to `(x1, y1)`; joins the current path when it starts at
    /// the cursor.
    pub fn fline(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> PlotResult<()> {
        self.ensure_open("fline")?;
        self.move_if_detached(Point::new(x0, y0))?;
        self.fcont(x1, y1)
    }

    /// Circular arc centered near `(xc, yc)` from `(x0, y0)` to `(x1, y1)`, taking the
    /// shorter way round.
    pub fn farc(&mut self, xc: f64, yc: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> PlotResult<()> {
        self.ensure_open("farc")?;
        let p0 = Point::new(x0, y0);
        self.move_if_detached(p0)?;
        match CurveRequest::arc(p0, Point::new(xc, yc), Point::new(x1, y1)) {
            Some(req) => self.add_curve(req),
            None => self.fcont(x1, y1),
        }
    }

    /// Quarter ellipse centered at `(xc, yc)` with conjugate radii ending at `(x0, y0)` and
    /// `(x1, y1)`.
    pub fn fellarc(
        &mut self,
        xc: f64,
        yc: f64,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    ) -> PlotResult<()> {
        self.ensure_open("fellarc")?;
        let p0 = Point::new(x0, y0);
        self.move_if_detached(p0)?;
        match CurveRequest::ellarc(p0, Point::new(xc, yc), Point::new(x1, y1)) {
            Some(req) => self.add_curve(req),
            None => self.fcont(x1, y1),
        }
    }

    /// Quadratic Bezier from `(x0, y0)` through control `(x1, y1)` to `(x2, y2)`.
    pub fn fbezier2(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    ) -> PlotResult<()> {
        self.ensure_open("fbezier2")?;
        let p0 = Point::new(x0, y0);
        let ctrl = Point::new(x1, y1);
        let end = Point::new(x2, y2);
        self.move_if_detached(p0)?;
        if p0 == ctrl && ctrl == end {
            return self.fcont(x2, y2);
        }
        self.add_curve(CurveRequest::Quad { ctrl, end })
    }

    /// Cubic Bezier from `(x0, y0)` with controls `(x1, y1)`, `(x2, y2)` to `(x3, y3)`.
    #[allow(clippy::too_many_arguments)]
    pub fn fbezier3(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    ) -> PlotResult<()> {
        self.ensure_open("fbezier3")?;
        let p0 = Point::new(x0, y0);
        let c1 = Point::new(x1, y1);
        let c2 = Point::new(x2, y2);
        let end = Point::new(x3, y3);
        self.move_if_detached(p0)?;
        if p0 == c1 && c1 == c2 && c2 == end {
            return self.fcont(x3, y3);
        }
        self.add_curve(CurveRequest::Cubic { c1, c2, end })
    }

    /// Axis-aligned box with opposite corners `(x0, y0)` and `(x1, y1)`. Leaves the cursor
    /// at the box center.
    pub fn fbox(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> PlotResult<()> {
        self.ensure_open("fbox")?;
        let (p0, p1) = (Point::new(x0, y0), Point::new(x1, y1));
        self.draw_closed(p0.midpoint(p1), p0 == p1, |caps, flags, cw| {
            decompose::rect(p0, p1, cw, caps, flags)
        })
    }

    /// Circle of radius `r`. Leaves the cursor at the center.
    pub fn fcircle(&mut self, xc: f64, yc: f64, r: f64) -> PlotResult<()> {
        self.ensure_open("fcircle")?;
        let c = Point::new(xc, yc);
        let r = r.abs();
        self.draw_closed(c, r == 0.0, |caps, flags, cw| {
            decompose::circle(c, r, cw, caps, flags)
        })
    }

    /// Ellipse with semi-axes `rx`, `ry`, the first rotated `angle_deg` from the x axis.
    /// Leaves the cursor at the center.
    pub fn fellipse(
        &mut self,
        xc: f64,
        yc: f64,
        rx: f64,
        ry: f64,
        angle_deg: f64,
    ) -> PlotResult<()> {
        self.ensure_open("fellipse")?;
        let c = Point::new(xc, yc);
        let (rx, ry) = (rx.abs(), ry.abs());
        self.draw_closed(c, rx == 0.0 && ry == 0.0, |caps, flags, cw| {
            decompose::ellipse(c, rx, ry, angle_deg, cw, caps, flags)
        })
    }

    /// A single point in the pen color.
    pub fn fpoint(&mut self, x: f64, y: f64) -> PlotResult<()> {
        self.ensure_open("fpoint")?;
        self.flush_path()?;
        let p = Point::new(x, y);
        self.paint_point_at(p)?;
        self.top_mut()?.pos = p;
        Ok(())
    }

    /// Draw `text` left-justified on the baseline at the cursor.
    pub fn label(&mut self, text: &str) -> PlotResult<()> {
        self.alabel('l', 'x', text)
    }

    /// Draw `text` at the cursor, justified by `h` (`l`, `c`, `r`) and `v` (`b`, `x`, `c`,
    /// `C`, `t`). The cursor then advances to the right end of the string.
    pub fn alabel(&mut self, h: char, v: char, text: &str) -> PlotResult<()> {
        self.ensure_open("alabel")?;
        self.flush_path()?;
        let (h, v) = (HJust::from_char(h), VJust::from_char(v));
        let metrics = self.font_metrics()?;
        let pen = self.resolve_pen()?;
        let line = self.device_line()?;

        let state = self.stack.as_ref().map(StateStack::top).ok_or_else(not_open)?;
        let ctx = PaintContext {
            state,
            pen,
            fill: None,
            background: None,
            line: &line,
            fill_rule: state.fill_rule,
            messenger: &self.messenger,
        };
        self.backend.paint_text(&ctx, text, h, v, &metrics)?;

        let state = self.top_mut()?;
        let advance = metrics.string_width(text) * (1.0 - h.fraction());
        state.pos += Vec2::from_angle(state.font.angle_deg.to_radians()) * advance;
        Ok(())
    }

    /// Width of `text` in user units with the current font.
    pub fn flabelwidth(&mut self, text: &str) -> PlotResult<f64> {
        self.ensure_open("flabelwidth")?;
        Ok(self.font_metrics()?.string_width(text))
    }

    // ---- helpers ----

    fn move_if_detached(&mut self, p: Point) -> PlotResult<()> {
        if self.top()?.pos != p {
            self.fmove(p.x, p.y)?;
        }
        Ok(())
    }

    /// Start a new subpath after `closepath`, and bound the length of unfilled paths.
    fn prepare_segment(&mut self) -> PlotResult<()> {
        let max = self.max_line_length;
        let state = self.top_mut()?;
        let Some(builder) = state.path.as_ref() else {
            return Ok(());
        };
        if builder.is_closed() {
            if let Some(b) = state.path.take() {
                state.subpaths.push(Path::Segments(b.finish()));
            }
            return Ok(());
        }
        if builder.len() >= max && state.fill_type == 0 && state.subpaths.is_empty() {
            tracing::debug!(max, "path reached MAX_LINE_LENGTH, flushing");
            self.flush_path()?;
        }
        Ok(())
    }

    fn with_builder(
        &mut self,
        f: impl FnOnce(&mut PathBuilder, &Capabilities, TransformFlags),
    ) -> PlotResult<()> {
        let caps = self.backend.capabilities();
        let state = self.stack.as_mut().map(StateStack::top_mut).ok_or_else(not_open)?;
        let flags = state.transform.flags();
        let pos = state.pos;
        let builder = state.path.get_or_insert_with(|| PathBuilder::new(pos));
        f(builder, caps, flags);
        state.pos = builder.current_point();
        Ok(())
    }

    fn add_curve(&mut self, req: CurveRequest) -> PlotResult<()> {
        self.prepare_segment()?;
        self.with_builder(|b, caps, flags| b.add_curve(req, caps, flags))
    }

    /// Flush, then paint one closed shape on its own and park the cursor at `center`.
    /// Shapes collapsed to a single point are painted as that point.
    fn draw_closed(
        &mut self,
        center: Point,
        collapsed: bool,
        build: impl FnOnce(&Capabilities, TransformFlags, bool) -> Path,
    ) -> PlotResult<()> {
        self.flush_path()?;
        if collapsed {
            self.paint_point_at(center)?;
        } else {
            let state = self.top()?;
            let path = build(
                self.backend.capabilities(),
                state.transform.flags(),
                state.clockwise(),
            );
            self.emit(std::slice::from_ref(&path))?;
        }
        self.top_mut()?.pos = center;
        Ok(())
    }

    fn paint_point_at(&mut self, p: Point) -> PlotResult<()> {
        let pen = self.resolve_pen()?;
        if pen.is_none() {
            return Ok(());
        }
        let line = self.device_line()?;
        let state = self.stack.as_ref().map(StateStack::top).ok_or_else(not_open)?;
        let ctx = PaintContext {
            state,
            pen,
            fill: None,
            background: None,
            line: &line,
            fill_rule: state.fill_rule,
            messenger: &self.messenger,
        };
        self.backend.paint_point(&ctx, p)
    }
}
