//! HP-GL and HP-GL/2 pen-plotter output.
//!
//! Coordinates are integer plotter units (40 per millimetre). Circles, circular arcs and
//! boxes are sent as plotter instructions while the transform keeps them axis-aligned;
//! colors are quantized to the eight pens of a standard carousel.

use std::io::Write;

use crate::backend::{Backend, DeviceLine, PaintContext};
use crate::capability::{Capabilities, Capability, FontClasses};
use crate::color::{DeviceColor, nearest_index};
use crate::foundation::core::{Affine, Point, Rgb24, Rgb48, Vec2};
use crate::foundation::error::PlotResult;
use crate::foundation::math::iround;
use crate::message::Messenger;
use crate::params::PlotterParams;
use crate::path::decompose::{arc_sweep, device_ccw, flatten};
use crate::path::{Path, Segment, SegmentList};
use crate::state::{FillRule, LineMode};
use crate::text::{FontMetrics, HJust, VJust};

/// Plotter units per millimetre.
const UNITS_PER_MM: f64 = 40.0;

/// Pen colors of the carousel, by pen number. Pen 0 is the empty slot.
pub const PEN_PALETTE: [Rgb24; 8] = [
    Rgb24([255, 255, 255]),
    Rgb24([0, 0, 0]),
    Rgb24([255, 0, 0]),
    Rgb24([0, 255, 0]),
    Rgb24([255, 255, 0]),
    Rgb24([0, 0, 255]),
    Rgb24([255, 0, 255]),
    Rgb24([0, 255, 255]),
];

/// Page sizes in millimetres.
const PAGE_SIZES: &[(&str, f64, f64)] = &[
    ("letter", 215.9, 279.4),
    ("legal", 215.9, 355.6),
    ("tabloid", 279.4, 431.8),
    ("a4", 210.0, 297.0),
    ("a3", 297.0, 420.0),
    ("b5", 176.0, 250.0),
];

/// Side of the square plotting area for the named page, in plotter units.
fn plot_side(pagesize: &str) -> f64 {
    let key = pagesize.trim().to_ascii_lowercase();
    let (_, w, h) = PAGE_SIZES
        .iter()
        .find(|(n, _, _)| *n == key)
        .copied()
        .unwrap_or(PAGE_SIZES[0]);
    w.min(h) * 0.8 * UNITS_PER_MM
}

pub struct HpglBackend {
    out: Box<dyn Write>,
    caps: Capabilities,
    version: u8,
    side: f64,
    /// Instructions of the current page, written out at `close_page`.
    buf: String,
    /// Pen currently in the holder; 0 means none.
    pen: u16,
    pen_down: bool,
}

impl HpglBackend {
    pub fn new(out: Box<dyn Write>, params: &PlotterParams) -> Self {
        let version = match params.get("HPGL_VERSION").as_deref().map(str::trim) {
            Some("1") => 1,
            _ => 2,
        };
        let side = plot_side(&params.get("PAGESIZE").unwrap_or_default());
        let hpgl2 = version == 2;
        let caps = Capabilities {
            boxes: Capability::AxisPreservingOnly,
            circles: Capability::AxisPreservingOnly,
            ellipses: Capability::Unsupported,
            arcs: Capability::AxisPreservingOnly,
            ellarcs: Capability::Unsupported,
            quads: Capability::Unsupported,
            cubics: Capability::Unsupported,
            mixed_paths: true,
            wide_lines: hpgl2,
            dash_arrays: false,
            odd_even_fill: hpgl2,
            nonzero_fill: hpgl2,
            settable_background: false,
            fonts: FontClasses {
                stroked: true,
                postscript: false,
                stick: true,
            },
        };
        Self {
            out,
            caps,
            version,
            side,
            buf: String::new(),
            pen: 0,
            pen_down: false,
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Append instructions to the current page.
    fn cmd(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    fn select_pen(&mut self, pen: u16) {
        if self.pen != pen {
            self.cmd(&format!("SP{pen};"));
            self.pen = pen;
        }
    }

    fn pen_up(&mut self, p: Point) {
        self.cmd(&format!("PU{},{};", iround(p.x), iround(p.y)));
        self.pen_down = false;
    }

    fn pen_down_to(&mut self, p: Point) {
        self.cmd(&format!("PD{},{};", iround(p.x), iround(p.y)));
        self.pen_down = true;
    }

    fn trace_segments(&mut self, ctx: &PaintContext<'_>, list: &SegmentList) {
        let flags = ctx.state.transform.flags();
        self.pen_up(ctx.to_device(list.start));
        let mut prev = list.start;
        for seg in &list.segments {
            match *seg {
                Segment::Line(p) => self.pen_down_to(ctx.to_device(p)),
                Segment::Arc { center, end, ccw } => {
                    let turn = arc_sweep(prev, center, end, ccw).abs().to_degrees();
                    let sweep = if device_ccw(ccw, flags) { turn } else { -turn };
                    let c = ctx.to_device(center);
                    if !self.pen_down {
                        self.cmd("PD;");
                        self.pen_down = true;
                    }
                    self.cmd(&format!("AA{},{},{:.2};", iround(c.x), iround(c.y), sweep));
                }
                // Not advertised; flatten whatever slipped through.
                Segment::EllArc { .. } | Segment::Quad { .. } | Segment::Cubic { .. } => {
                    let mut piece = SegmentList::new(prev);
                    piece.segments.push(*seg);
                    for p in flatten(&Path::Segments(piece)).into_iter().skip(1) {
                        self.pen_down_to(ctx.to_device(p));
                    }
                }
            }
            prev = seg.end();
        }
        if list.closed && prev != list.start {
            self.pen_down_to(ctx.to_device(list.start));
        }
    }

    fn trace_polyline(&mut self, ctx: &PaintContext<'_>, path: &Path) {
        let mut pts = flatten(path).into_iter().map(|p| ctx.to_device(p));
        if let Some(first) = pts.next() {
            self.pen_up(first);
            for p in pts {
                self.pen_down_to(p);
            }
        }
    }

    fn trace(&mut self, ctx: &PaintContext<'_>, path: &Path) {
        match path {
            Path::Segments(list) => self.trace_segments(ctx, list),
            other => self.trace_polyline(ctx, other),
        }
    }

    fn pen_number(c: Option<DeviceColor>) -> Option<u16> {
        match c {
            Some(DeviceColor::Indexed(n)) if n != 0 => Some(n),
            _ => None,
        }
    }

    /// Fill then edge `paths` using polygon mode.
    fn polygon(&mut self, ctx: &PaintContext<'_>, paths: &[Path]) {
        let fill = Self::pen_number(ctx.fill).filter(|_| self.version == 2);
        let edge = Self::pen_number(ctx.pen);
        if fill.is_none() && edge.is_none() {
            return;
        }
        if fill.is_none() {
            if let Some(pen) = edge {
                self.select_pen(pen);
                for p in paths {
                    self.trace(ctx, p);
                }
                self.pen_up_here();
            }
            return;
        }

        if let Some(start) = paths.first().and_then(|p| flatten(p).first().copied()) {
            self.pen_up(ctx.to_device(start));
        }
        self.cmd("PM0;");
        for (i, p) in paths.iter().enumerate() {
            if i > 0 {
                self.cmd("PM1;");
            }
            self.trace(ctx, p);
        }
        self.cmd("PM2;");
        if let Some(pen) = fill {
            self.select_pen(pen);
            let rule = match ctx.fill_rule {
                FillRule::OddEven => 0,
                FillRule::NonZero => 1,
            };
            self.cmd(&format!("FP{rule};"));
        }
        if let Some(pen) = edge {
            self.select_pen(pen);
            self.cmd("EP;");
        }
    }

    fn pen_up_here(&mut self) {
        if self.pen_down {
            self.cmd("PU;");
            self.pen_down = false;
        }
    }
}

fn line_type(mode: LineMode) -> &'static str {
    match mode {
        LineMode::Solid => "LT;",
        LineMode::Disconnected => "LT0;",
        LineMode::Dotted => "LT1;",
        LineMode::ShortDashed => "LT2;",
        LineMode::LongDashed => "LT3;",
        LineMode::DotDashed => "LT4;",
        LineMode::DotDotDashed => "LT5;",
        LineMode::DotDotDotDashed => "LT6;",
    }
}

/// Strip characters the label terminator would swallow.
fn label_text(s: &str) -> String {
    s.chars().filter(|&c| c != '\u{3}' && !c.is_control()).collect()
}

impl Backend for HpglBackend {
    fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    fn ndc_to_device(&self) -> Affine {
        Affine::scale(self.side)
    }

    fn open_page(&mut self, page: u32, _messenger: &Messenger) -> PlotResult<()> {
        self.buf.clear();
        self.pen = 0;
        self.pen_down = false;
        if page == 1 {
            self.cmd("IN;");
        }
        self.cmd("SP1;");
        self.pen = 1;
        Ok(())
    }

    fn close_page(&mut self, _messenger: &Messenger) -> PlotResult<()> {
        self.pen_up_here();
        self.cmd("SP0;PG0;\n");
        let page = std::mem::take(&mut self.buf);
        self.write_bytes(page.as_bytes())
    }

    fn paint_path(&mut self, ctx: &PaintContext<'_>, path: &Path) -> PlotResult<()> {
        let fill = Self::pen_number(ctx.fill).filter(|_| self.version == 2);
        let edge = Self::pen_number(ctx.pen);
        match *path {
            Path::Box { p0, p1, .. } => {
                let (a, b) = (ctx.to_device(p0), ctx.to_device(p1));
                if let Some(pen) = fill {
                    self.select_pen(pen);
                    self.pen_up(a);
                    self.cmd(&format!("RA{},{};", iround(b.x), iround(b.y)));
                }
                if let Some(pen) = edge {
                    self.select_pen(pen);
                    self.pen_up(a);
                    self.cmd(&format!("EA{},{};", iround(b.x), iround(b.y)));
                }
            }
            Path::Circle { center, radius, .. } => {
                let c = ctx.to_device(center);
                let r = iround(radius * ctx.state.transform.device_norm());
                if let Some(pen) = fill {
                    self.select_pen(pen);
                    self.pen_up(c);
                    self.cmd(&format!("WG{r},0,360;"));
                }
                if let Some(pen) = edge {
                    self.select_pen(pen);
                    self.pen_up(c);
                    self.cmd(&format!("CI{r};"));
                }
            }
            _ => self.polygon(ctx, std::slice::from_ref(path)),
        }
        Ok(())
    }

    fn paint_paths(&mut self, ctx: &PaintContext<'_>, paths: &[Path]) -> PlotResult<()> {
        self.polygon(ctx, paths);
        Ok(())
    }

    fn paint_point(&mut self, ctx: &PaintContext<'_>, p: Point) -> PlotResult<()> {
        if let Some(pen) = Self::pen_number(ctx.pen) {
            self.select_pen(pen);
            self.pen_up(ctx.to_device(p));
            self.cmd("PD;PU;");
        }
        Ok(())
    }

    fn paint_text(
        &mut self,
        ctx: &PaintContext<'_>,
        text: &str,
        h: HJust,
        v: VJust,
        metrics: &FontMetrics,
    ) -> PlotResult<()> {
        let Some(pen) = Self::pen_number(ctx.pen) else {
            return Ok(());
        };
        self.select_pen(pen);
        let t = &ctx.state.transform;
        let dir = t.vec_to_device(Vec2::from_angle(ctx.state.font.angle_deg.to_radians()));
        let size_cm = metrics.true_size * t.device_norm() / UNITS_PER_MM / 10.0;
        let origin = match (h, v) {
            (HJust::Left, VJust::Bottom | VJust::Baseline) => 1,
            (HJust::Left, VJust::Center) => 2,
            (HJust::Left, _) => 3,
            (HJust::Center, VJust::Bottom | VJust::Baseline) => 4,
            (HJust::Center, VJust::Center) => 5,
            (HJust::Center, _) => 6,
            (HJust::Right, VJust::Bottom | VJust::Baseline) => 7,
            (HJust::Right, VJust::Center) => 8,
            (HJust::Right, _) => 9,
        };
        self.pen_up(ctx.to_device(ctx.state.pos));
        self.cmd(&format!(
            "DI{:.4},{:.4};SI{:.3},{:.3};LO{origin};LB{}\u{3};",
            dir.x,
            dir.y,
            size_cm * 0.5,
            size_cm * 0.7,
            label_text(text)
        ));
        Ok(())
    }

    fn resolve_pen_color(&mut self, color: Rgb48, _messenger: &Messenger) -> DeviceColor {
        let idx = nearest_index(&PEN_PALETTE, color.to_rgb24()).unwrap_or(1);
        DeviceColor::Indexed(idx as u16)
    }

    fn resolve_fill_color(&mut self, color: Rgb48, messenger: &Messenger) -> DeviceColor {
        self.resolve_pen_color(color, messenger)
    }

    fn sync_line_attributes(&mut self, line: &DeviceLine) -> PlotResult<()> {
        if self.version == 2 {
            let mm = line.device_width / UNITS_PER_MM;
            self.cmd(&format!("PW{mm:.4};"));
        }
        self.cmd(line_type(line.mode));
        Ok(())
    }

    fn retrieve_font(&mut self, name: &str, size: f64, _angle_deg: f64) -> Option<FontMetrics> {
        let lower = name.to_ascii_lowercase();
        (lower.starts_with("hershey") || lower.starts_with("stick"))
            .then(|| FontMetrics::proportional(name, size, 0.7, 0.2, 0.7, 0.5))
    }

    fn default_font(&self) -> &str {
        "Stick"
    }

    fn write_bytes(&mut self, buf: &[u8]) -> PlotResult<()> {
        self.out.write_all(buf)?;
        Ok(())
    }

    fn flush(&mut self) -> PlotResult<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backend/hpgl.rs"]
mod tests;
