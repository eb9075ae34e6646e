use crate::backend::Backend;
use crate::color::parse_color_name;
use crate::foundation::core::Rgb48;
use crate::foundation::error::PlotResult;
use crate::state::{
    CapStyle, DEFAULT_MITER_LIMIT, DashArray, DrawingState, FillRule, JoinStyle, LineMode,
    Orientation,
};

use super::Plotter;

impl<B: Backend> Plotter<B> {
    /// Flush the pending path, then apply `f` to the top state.
    fn set_attr(&mut self, op: &str, f: impl FnOnce(&mut DrawingState)) -> PlotResult<()> {
        self.ensure_open(op)?;
        self.flush_path()?;
        f(self.top_mut()?);
        Ok(())
    }

    // ---- colors ----

    /// Pen color, 16 bits per channel. Out-of-range channels select black.
    pub fn pencolor(&mut self, r: i32, g: i32, b: i32) -> PlotResult<()> {
        let c = Rgb48::from_channels(r, g, b).unwrap_or(Rgb48::BLACK);
        self.set_attr("pencolor", |s| s.pen_color = c)
    }

    /// Fill color, 16 bits per channel. Out-of-range channels select black.
    pub fn fillcolor(&mut self, r: i32, g: i32, b: i32) -> PlotResult<()> {
        let c = Rgb48::from_channels(r, g, b).unwrap_or(Rgb48::BLACK);
        self.set_attr("fillcolor", |s| s.fill_color = c)
    }

    /// Background color used by `erase`. Does not end the current path.
    pub fn bgcolor(&mut self, r: i32, g: i32, b: i32) -> PlotResult<()> {
        self.ensure_open("bgcolor")?;
        let c = Rgb48::from_channels(r, g, b).unwrap_or(Rgb48::WHITE);
        self.top_mut()?.bg_color = c;
        Ok(())
    }

    /// Set pen and fill color together.
    pub fn color(&mut self, r: i32, g: i32, b: i32) -> PlotResult<()> {
        self.pencolor(r, g, b)?;
        self.fillcolor(r, g, b)
    }

    fn named(&self, name: &str, fallback: Rgb48) -> Rgb48 {
        parse_color_name(name).unwrap_or_else(|| {
            self.messenger
                .warning(&format!("color name \"{name}\" not recognized, using default"));
            fallback
        })
    }

    pub fn pencolorname(&mut self, name: &str) -> PlotResult<()> {
        self.ensure_open("pencolorname")?;
        let c = self.named(name, Rgb48::BLACK);
        self.set_attr("pencolorname", |s| s.pen_color = c)
    }

    pub fn fillcolorname(&mut self, name: &str) -> PlotResult<()> {
        self.ensure_open("fillcolorname")?;
        let c = self.named(name, Rgb48::BLACK);
        self.set_attr("fillcolorname", |s| s.fill_color = c)
    }

    pub fn bgcolorname(&mut self, name: &str) -> PlotResult<()> {
        self.ensure_open("bgcolorname")?;
        let c = self.named(name, Rgb48::WHITE);
        self.top_mut()?.bg_color = c;
        Ok(())
    }

    pub fn colorname(&mut self, name: &str) -> PlotResult<()> {
        self.pencolorname(name)?;
        self.fillcolorname(name)
    }

    /// 0 turns stroking off; any other level strokes with the pen color.
    pub fn pentype(&mut self, level: i32) -> PlotResult<()> {
        let level = u16::try_from(level).unwrap_or(1);
        self.set_attr("pentype", |s| s.pen_type = level)
    }

    /// 0 turns filling off, 1 fills with the nominal color, and higher levels desaturate it
    /// toward white up to 0xffff.
    pub fn filltype(&mut self, level: i32) -> PlotResult<()> {
        let level = u16::try_from(level).unwrap_or(0);
        self.set_attr("filltype", |s| s.fill_type = level)
    }

    // ---- line style ----

    /// Line width in user units. A negative width restores the default.
    pub fn flinewidth(&mut self, width: f64) -> PlotResult<()> {
        let width = (width >= 0.0).then_some(width);
        self.set_attr("flinewidth", |s| s.line.width = width)
    }

    /// Select a named line mode. Unknown names select solid. Clears any dash array.
    pub fn linemod(&mut self, name: &str) -> PlotResult<()> {
        let mode = LineMode::from_name(Some(name));
        self.set_attr("linemod", |s| {
            s.line.mode = mode;
            s.line.dash = None;
        })
    }

    /// Dash pattern in user units. Negative entries or an all-zero pattern mean solid.
    pub fn flinedash(&mut self, dashes: &[f64], offset: f64) -> PlotResult<()> {
        let valid = !dashes.is_empty()
            && dashes.iter().all(|&d| d >= 0.0)
            && dashes.iter().any(|&d| d > 0.0);
        let dash = valid.then(|| DashArray {
            dashes: dashes.to_vec(),
            offset,
        });
        self.set_attr("flinedash", |s| {
            if dash.is_none() {
                s.line.mode = LineMode::Solid;
            }
            s.line.dash = dash;
        })
    }

    pub fn capmod(&mut self, name: &str) -> PlotResult<()> {
        let cap = CapStyle::from_name(Some(name));
        self.set_attr("capmod", |s| s.line.cap = cap)
    }

    pub fn joinmod(&mut self, name: &str) -> PlotResult<()> {
        let join = JoinStyle::from_name(Some(name));
        self.set_attr("joinmod", |s| s.line.join = join)
    }

    /// Values below 1 restore the default limit.
    pub fn fmiterlimit(&mut self, limit: f64) -> PlotResult<()> {
        let limit = if limit >= 1.0 { limit } else { DEFAULT_MITER_LIMIT };
        self.set_attr("fmiterlimit", |s| s.line.miter_limit = limit)
    }

    /// `even-odd` / `alternate` or `nonzero-winding` / `winding`.
    pub fn fillmod(&mut self, name: &str) -> PlotResult<()> {
        let rule = FillRule::from_name(Some(name));
        self.set_attr("fillmod", |s| s.fill_rule = rule)
    }

    /// Tracing direction for boxes, circles and ellipses: negative means clockwise.
    pub fn orientation(&mut self, direction: i32) -> PlotResult<()> {
        let o = if direction < 0 {
            Orientation::Clockwise
        } else {
            Orientation::CounterClockwise
        };
        self.set_attr("orientation", |s| s.orientation = o)
    }

    // ---- font ----

    /// Select a font family; returns the size actually used.
    pub fn fontname(&mut self, name: &str) -> PlotResult<f64> {
        let name = name.trim();
        let name = if name.is_empty() {
            self.backend.default_font().to_owned()
        } else {
            name.to_owned()
        };
        self.set_attr("fontname", |s| {
            s.font.name = name;
            s.font.metrics = None;
        })?;
        Ok(self.font_metrics()?.true_size)
    }

    /// Font size in user units; a negative size restores the default. Returns the size
    /// actually used.
    pub fn ffontsize(&mut self, size: f64) -> PlotResult<f64> {
        let size = (size >= 0.0).then_some(size);
        self.set_attr("ffontsize", |s| {
            s.font.size = size;
            s.font.metrics = None;
        })?;
        Ok(self.font_metrics()?.true_size)
    }

    /// Text rotation in degrees counterclockwise; returns the font size actually used.
    pub fn ftextangle(&mut self, angle_deg: f64) -> PlotResult<f64> {
        let angle = if angle_deg.is_finite() { angle_deg % 360.0 } else { 0.0 };
        self.set_attr("ftextangle", |s| {
            s.font.angle_deg = angle;
            s.font.metrics = None;
        })?;
        Ok(self.font_metrics()?.true_size)
    }
}
