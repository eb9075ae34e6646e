//! SVG output. Geometry is written in user coordinates inside a `matrix(...)` transform,
//! so every primitive except elliptic arcs is expressed natively.

use std::io::Write;

use simple_xml_builder::XMLElement;

use crate::backend::{Backend, DeviceLine, PaintContext, fmt_num, rgb_of};
use crate::capability::{Capabilities, Capability};
use crate::foundation::core::{Affine, Point, Vec2};
use crate::foundation::error::PlotResult;
use crate::message::Messenger;
use crate::params::PlotterParams;
use crate::path::{Path, Segment, SegmentList};
use crate::state::{CapStyle, FillRule, JoinStyle};
use crate::text::{FontMetrics, HJust, VJust};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n";

pub struct SvgBackend {
    out: Box<dyn Write>,
    caps: Capabilities,
    width: u32,
    height: u32,
    body: Vec<XMLElement>,
    background: Option<String>,
    /// Only the first page is kept; later pages are drawn into the void.
    recording: bool,
}

impl SvgBackend {
    pub fn new(out: Box<dyn Write>, params: &PlotterParams) -> Self {
        let (width, height) = params.size("BITMAPSIZE").unwrap_or((570, 570));
        Self {
            out,
            caps: Capabilities {
                ellarcs: Capability::Unsupported,
                ..Capabilities::everything()
            },
            width,
            height,
            body: Vec::new(),
            background: None,
            recording: false,
        }
    }

    fn push(&mut self, element: XMLElement) {
        if self.recording {
            self.body.push(element);
        }
    }
}

fn matrix(a: Affine) -> String {
    let c = a.as_coeffs().map(fmt_num);
    format!("matrix({})", c.join(" "))
}

fn pt(p: Point) -> String {
    format!("{},{}", fmt_num(p.x), fmt_num(p.y))
}

fn segment_data(d: &mut String, list: &SegmentList) {
    d.push_str(&format!("M{}", pt(list.start)));
    let mut prev = list.start;
    for seg in &list.segments {
        let step = match *seg {
            Segment::Line(p) => format!(" L{}", pt(p)),
            Segment::Arc { center, end, ccw } => {
                let r = fmt_num((end - center).hypot());
                format!(" A{r},{r} 0 0,{} {}", u8::from(ccw), pt(end))
            }
            // Not advertised as a primitive; approximate with the cubic through the quarter.
            Segment::EllArc { center, end } => {
                let (a, b) = (prev - center, end - center);
                let k = 0.552_284_749_830_793_4;
                format!(" C{} {} {}", pt(prev + b * k), pt(end + a * k), pt(end))
            }
            Segment::Quad { ctrl, end } => format!(" Q{} {}", pt(ctrl), pt(end)),
            Segment::Cubic { c1, c2, end } => format!(" C{} {} {}", pt(c1), pt(c2), pt(end)),
        };
        d.push_str(&step);
        prev = seg.end();
    }
    if list.closed {
        d.push_str(" Z");
    }
}

/// SVG path data for any path, primitives included.
fn path_data(d: &mut String, path: &Path) {
    match *path {
        Path::Segments(ref list) => segment_data(d, list),
        Path::Box { p0, p1, clockwise } => {
            let (a, b) = (Point::new(p1.x, p0.y), Point::new(p0.x, p1.y));
            let (q1, q3) = if clockwise { (b, a) } else { (a, b) };
            d.push_str(&format!(
                "M{} L{} L{} L{} Z",
                pt(p0),
                pt(q1),
                pt(p1),
                pt(q3)
            ));
        }
        Path::Circle {
            center,
            radius,
            clockwise,
        } => conic_data(d, center, radius, radius, 0.0, clockwise),
        Path::Ellipse {
            center,
            rx,
            ry,
            angle_deg,
            clockwise,
        } => conic_data(d, center, rx, ry, angle_deg, clockwise),
    }
}

fn conic_data(d: &mut String, c: Point, rx: f64, ry: f64, angle_deg: f64, clockwise: bool) {
    let u = Vec2::from_angle(angle_deg.to_radians()) * rx;
    let sweep = u8::from(!clockwise);
    let (rx, ry, rot) = (fmt_num(rx), fmt_num(ry), fmt_num(angle_deg));
    d.push_str(&format!(
        "M{} A{rx},{ry} {rot} 0,{sweep} {} A{rx},{ry} {rot} 0,{sweep} {} Z",
        pt(c + u),
        pt(c - u),
        pt(c + u)
    ));
}

fn add_stroke(el: &mut XMLElement, ctx: &PaintContext<'_>) {
    let Some(pen) = ctx.pen else {
        el.add_attribute("stroke", "none");
        return;
    };
    let line: &DeviceLine = ctx.line;
    // Hairlines are drawn one device unit wide whatever the transform.
    let width = if line.user_width > 0.0 {
        fmt_num(line.user_width)
    } else {
        fmt_num(1.0 / ctx.state.transform.device_norm().max(f64::EPSILON))
    };
    let cap = match line.cap {
        CapStyle::Butt => "butt",
        CapStyle::Round | CapStyle::Triangular => "round",
        CapStyle::Projecting => "square",
    };
    let join = match line.join {
        JoinStyle::Miter => "miter",
        JoinStyle::Round | JoinStyle::Triangular => "round",
        JoinStyle::Bevel => "bevel",
    };
    el.add_attribute("stroke", &rgb_of(pen).hex());
    el.add_attribute("stroke-width", &width);
    el.add_attribute("stroke-linecap", cap);
    el.add_attribute("stroke-linejoin", join);
    if line.join == JoinStyle::Miter {
        el.add_attribute("stroke-miterlimit", &fmt_num(line.miter_limit));
    }
    let dashes = line.dash_lengths();
    if !dashes.is_empty() {
        let list: Vec<String> = dashes.iter().map(|&v| fmt_num(v)).collect();
        el.add_attribute("stroke-dasharray", &list.join(","));
        if line.dash_offset() != 0.0 {
            el.add_attribute("stroke-dashoffset", &fmt_num(line.dash_offset()));
        }
    }
}

fn add_fill(el: &mut XMLElement, ctx: &PaintContext<'_>) {
    match ctx.fill {
        None => el.add_attribute("fill", "none"),
        Some(fill) => {
            let rule = match ctx.fill_rule {
                FillRule::OddEven => "evenodd",
                FillRule::NonZero => "nonzero",
            };
            el.add_attribute("fill", &rgb_of(fill).hex());
            el.add_attribute("fill-rule", rule);
        }
    }
}

/// A shape element placed in user space.
fn shape(name: &str, transform: &str) -> XMLElement {
    let mut el = XMLElement::new(name);
    el.add_attribute("transform", transform);
    el
}

/// Attach the current fill and stroke.
fn finish_shape(mut el: XMLElement, ctx: &PaintContext<'_>) -> XMLElement {
    add_fill(&mut el, ctx);
    add_stroke(&mut el, ctx);
    el
}

impl Backend for SvgBackend {
    fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    fn ndc_to_device(&self) -> Affine {
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        Affine::new([w, 0.0, 0.0, -h, 0.0, h])
    }

    fn open_page(&mut self, page: u32, _messenger: &Messenger) -> PlotResult<()> {
        self.recording = page == 1;
        if self.recording {
            self.body.clear();
            self.background = None;
        } else {
            tracing::debug!(page, "svg keeps only the first page");
        }
        Ok(())
    }

    fn close_page(&mut self, _messenger: &Messenger) -> PlotResult<()> {
        if !self.recording {
            return Ok(());
        }
        self.recording = false;
        let (w, h) = (self.width.to_string(), self.height.to_string());
        let mut root = XMLElement::new("svg");
        root.add_attribute("version", "1.1");
        root.add_attribute("xmlns", "http://www.w3.org/2000/svg");
        root.add_attribute("width", &w);
        root.add_attribute("height", &h);
        root.add_attribute("viewBox", &format!("0 0 {w} {h}"));
        if let Some(bg) = &self.background {
            let mut rect = XMLElement::new("rect");
            rect.add_attribute("x", "0");
            rect.add_attribute("y", "0");
            rect.add_attribute("width", "100%");
            rect.add_attribute("height", "100%");
            rect.add_attribute("fill", bg);
            root.add_child(rect);
        }
        for el in self.body.drain(..) {
            root.add_child(el);
        }
        let doc = format!("{XML_DECLARATION}{root}");
        self.write_bytes(doc.as_bytes())
    }

    fn erase_page(&mut self, ctx: &PaintContext<'_>) -> PlotResult<()> {
        if self.recording {
            self.body.clear();
            self.background = ctx.background.map(|c| rgb_of(c).hex());
        }
        Ok(())
    }

    fn paint_path(&mut self, ctx: &PaintContext<'_>, path: &Path) -> PlotResult<()> {
        let transform = matrix(ctx.user_to_device());
        let el = match *path {
            Path::Box { p0, p1, .. } => {
                let mut el = shape("rect", &transform);
                el.add_attribute("x", &fmt_num(p0.x.min(p1.x)));
                el.add_attribute("y", &fmt_num(p0.y.min(p1.y)));
                el.add_attribute("width", &fmt_num((p1.x - p0.x).abs()));
                el.add_attribute("height", &fmt_num((p1.y - p0.y).abs()));
                el
            }
            Path::Circle { center, radius, .. } => {
                let mut el = shape("circle", &transform);
                el.add_attribute("cx", &fmt_num(center.x));
                el.add_attribute("cy", &fmt_num(center.y));
                el.add_attribute("r", &fmt_num(radius));
                el
            }
            Path::Ellipse {
                center,
                rx,
                ry,
                angle_deg,
                ..
            } => {
                let (cx, cy) = (fmt_num(center.x), fmt_num(center.y));
                let rotated = format!("{transform} rotate({} {cx} {cy})", fmt_num(angle_deg));
                let mut el = shape("ellipse", &rotated);
                el.add_attribute("cx", &cx);
                el.add_attribute("cy", &cy);
                el.add_attribute("rx", &fmt_num(rx));
                el.add_attribute("ry", &fmt_num(ry));
                el
            }
            Path::Segments(_) => {
                let mut d = String::new();
                path_data(&mut d, path);
                let mut el = shape("path", &transform);
                el.add_attribute("d", &d);
                el
            }
        };
        self.push(finish_shape(el, ctx));
        Ok(())
    }

    fn paint_paths(&mut self, ctx: &PaintContext<'_>, paths: &[Path]) -> PlotResult<()> {
        let mut d = String::new();
        for (i, p) in paths.iter().enumerate() {
            if i > 0 {
                d.push(' ');
            }
            path_data(&mut d, p);
        }
        let mut el = shape("path", &matrix(ctx.user_to_device()));
        el.add_attribute("d", &d);
        self.push(finish_shape(el, ctx));
        Ok(())
    }

    fn paint_point(&mut self, ctx: &PaintContext<'_>, p: Point) -> PlotResult<()> {
        let Some(pen) = ctx.pen else {
            return Ok(());
        };
        let d = ctx.to_device(p);
        let mut el = XMLElement::new("circle");
        el.add_attribute("cx", &fmt_num(d.x));
        el.add_attribute("cy", &fmt_num(d.y));
        el.add_attribute("r", "0.5");
        el.add_attribute("fill", &rgb_of(pen).hex());
        el.add_attribute("stroke", "none");
        self.push(el);
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
        let Some(pen) = ctx.pen else {
            return Ok(());
        };
        if text.is_empty() {
            return Ok(());
        }
        let pos = ctx.state.pos;
        let anchor = match h {
            HJust::Left => "start",
            HJust::Center => "middle",
            HJust::Right => "end",
        };
        let transform = format!(
            "{} translate({} {}) rotate({}) scale(1,-1)",
            matrix(ctx.user_to_device()),
            fmt_num(pos.x),
            fmt_num(pos.y),
            fmt_num(ctx.state.font.angle_deg)
        );
        let mut el = XMLElement::new("text");
        el.add_attribute("transform", &transform);
        el.add_attribute("x", "0");
        // Text is laid out y-down, so the baseline shift changes sign.
        el.add_attribute("y", &fmt_num(-v.baseline_shift(metrics)));
        el.add_attribute("font-family", &metrics.name);
        el.add_attribute("font-size", &fmt_num(metrics.true_size));
        el.add_attribute("text-anchor", anchor);
        el.add_attribute("fill", &rgb_of(pen).hex());
        el.add_attribute("stroke", "none");
        el.add_text(text);
        self.push(el);
        Ok(())
    }

    fn retrieve_font(&mut self, name: &str, size: f64, _angle_deg: f64) -> Option<FontMetrics> {
        // Viewers substitute unknown families themselves.
        Some(FontMetrics::generic(name, size))
    }

    fn default_font(&self) -> &str {
        "Helvetica"
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
#[path = "../../tests/unit/backend/svg.rs"]
mod tests;
