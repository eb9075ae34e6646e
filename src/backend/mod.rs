//! The hook interface every output format implements, and the built-in formats.

pub mod bitmap;
pub mod hpgl;
pub mod meta;
pub mod svg;

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::capability::Capabilities;
use crate::color::DeviceColor;
use crate::foundation::core::{Affine, Point, Rgb24, Rgb48};
use crate::foundation::error::PlotResult;
use crate::message::Messenger;
use crate::params::PlotterParams;
use crate::path::Path;
use crate::state::{CapStyle, DashArray, DrawingState, FillRule, JoinStyle, LineMode};
use crate::text::{FontMetrics, HJust, VJust};

/// Line attributes after capability degradation, as pushed to a backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceLine {
    /// Width in user units.
    pub user_width: f64,
    /// Width in device units; 0 asks for the thinnest line the device can draw.
    pub device_width: f64,
    pub mode: LineMode,
    /// Only set on backends that support dash arrays.
    pub dash: Option<DashArray>,
    pub cap: CapStyle,
    pub join: JoinStyle,
    pub miter_limit: f64,
}

impl DeviceLine {
    /// On/off dash lengths in user units; empty for a solid line.
    pub fn dash_lengths(&self) -> Vec<f64> {
        match &self.dash {
            Some(d) => d.dashes.clone(),
            None => self
                .mode
                .pattern()
                .iter()
                .map(|k| k * self.user_width)
                .collect(),
        }
    }

    pub fn dash_offset(&self) -> f64 {
        self.dash.as_ref().map_or(0.0, |d| d.offset)
    }
}

/// Everything a paint hook may consult: the drawing state plus resolved device values.
pub struct PaintContext<'a> {
    pub state: &'a DrawingState,
    /// `None` when stroking is disabled.
    pub pen: Option<DeviceColor>,
    /// `None` when filling is disabled.
    pub fill: Option<DeviceColor>,
    /// Only resolved for `erase_page`.
    pub background: Option<DeviceColor>,
    pub line: &'a DeviceLine,
    /// Fill rule after falling back to what the backend supports.
    pub fill_rule: FillRule,
    pub messenger: &'a Messenger,
}

impl PaintContext<'_> {
    pub fn to_device(&self, p: Point) -> Point {
        self.state.transform.to_device(p)
    }

    pub fn user_to_device(&self) -> Affine {
        self.state.transform.user_to_device()
    }
}

/// Output-format hooks consumed by the plotting core.
///
/// The core guarantees that paint hooks are only called between `open_page` and
/// `close_page`, that colors are resolved right before use, and that
/// `sync_line_attributes` runs only when the line attributes changed. Warnings and errors
/// go through the [`Messenger`] handed to each hook.
pub trait Backend {
    fn capabilities(&self) -> &Capabilities;

    /// Map from the normalized unit square onto device coordinates.
    fn ndc_to_device(&self) -> Affine;

    fn open_page(&mut self, page: u32, messenger: &Messenger) -> PlotResult<()>;

    fn close_page(&mut self, messenger: &Messenger) -> PlotResult<()>;

    /// Clear the page to `ctx.background`.
    fn erase_page(&mut self, _ctx: &PaintContext<'_>) -> PlotResult<()> {
        Ok(())
    }

    fn paint_path(&mut self, ctx: &PaintContext<'_>, path: &Path) -> PlotResult<()>;

    /// Paint a compound path: simple paths that together bound one region.
    fn paint_paths(&mut self, ctx: &PaintContext<'_>, paths: &[Path]) -> PlotResult<()> {
        for p in paths {
            self.paint_path(ctx, p)?;
        }
        Ok(())
    }

    fn paint_point(&mut self, ctx: &PaintContext<'_>, p: Point) -> PlotResult<()>;

    /// Render `text` at the cursor with the resolved font.
    fn paint_text(
        &mut self,
        ctx: &PaintContext<'_>,
        text: &str,
        h: HJust,
        v: VJust,
        metrics: &FontMetrics,
    ) -> PlotResult<()>;

    fn resolve_pen_color(&mut self, color: Rgb48, _messenger: &Messenger) -> DeviceColor {
        DeviceColor::Rgb(color.to_rgb24())
    }

    fn resolve_fill_color(&mut self, color: Rgb48, _messenger: &Messenger) -> DeviceColor {
        DeviceColor::Rgb(color.to_rgb24())
    }

    fn resolve_background_color(&mut self, color: Rgb48, _messenger: &Messenger) -> DeviceColor {
        DeviceColor::Rgb(color.to_rgb24())
    }

    fn sync_line_attributes(&mut self, _line: &DeviceLine) -> PlotResult<()> {
        Ok(())
    }

    /// Metrics for the requested font, or `None` when the backend does not have it.
    fn retrieve_font(&mut self, name: &str, size: f64, angle_deg: f64) -> Option<FontMetrics>;

    /// Font family used when a request cannot be satisfied.
    fn default_font(&self) -> &str;

    fn write_bytes(&mut self, buf: &[u8]) -> PlotResult<()>;

    fn flush(&mut self) -> PlotResult<()>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn capabilities(&self) -> &Capabilities {
        (**self).capabilities()
    }

    fn ndc_to_device(&self) -> Affine {
        (**self).ndc_to_device()
    }

    fn open_page(&mut self, page: u32, messenger: &Messenger) -> PlotResult<()> {
        (**self).open_page(page, messenger)
    }

    fn close_page(&mut self, messenger: &Messenger) -> PlotResult<()> {
        (**self).close_page(messenger)
    }

    fn erase_page(&mut self, ctx: &PaintContext<'_>) -> PlotResult<()> {
        (**self).erase_page(ctx)
    }

    fn paint_path(&mut self, ctx: &PaintContext<'_>, path: &Path) -> PlotResult<()> {
        (**self).paint_path(ctx, path)
    }

    fn paint_paths(&mut self, ctx: &PaintContext<'_>, paths: &[Path]) -> PlotResult<()> {
        (**self).paint_paths(ctx, paths)
    }

    fn paint_point(&mut self, ctx: &PaintContext<'_>, p: Point) -> PlotResult<()> {
        (**self).paint_point(ctx, p)
    }

    fn paint_text(
        &mut self,
        ctx: &PaintContext<'_>,
        text: &str,
        h: HJust,
        v: VJust,
        metrics: &FontMetrics,
    ) -> PlotResult<()> {
        (**self).paint_text(ctx, text, h, v, metrics)
    }

    fn resolve_pen_color(&mut self, color: Rgb48, messenger: &Messenger) -> DeviceColor {
        (**self).resolve_pen_color(color, messenger)
    }

    fn resolve_fill_color(&mut self, color: Rgb48, messenger: &Messenger) -> DeviceColor {
        (**self).resolve_fill_color(color, messenger)
    }

    fn resolve_background_color(&mut self, color: Rgb48, messenger: &Messenger) -> DeviceColor {
        (**self).resolve_background_color(color, messenger)
    }

    fn sync_line_attributes(&mut self, line: &DeviceLine) -> PlotResult<()> {
        (**self).sync_line_attributes(line)
    }

    fn retrieve_font(&mut self, name: &str, size: f64, angle_deg: f64) -> Option<FontMetrics> {
        (**self).retrieve_font(name, size, angle_deg)
    }

    fn default_font(&self) -> &str {
        (**self).default_font()
    }

    fn write_bytes(&mut self, buf: &[u8]) -> PlotResult<()> {
        (**self).write_bytes(buf)
    }

    fn flush(&mut self) -> PlotResult<()> {
        (**self).flush()
    }
}

/// Built-in output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    Svg,
    Png,
    Hpgl,
    Meta,
}

/// Create a backend writing to `out`, configured from `params`.
pub fn create_backend(
    kind: BackendKind,
    out: Box<dyn Write>,
    params: &PlotterParams,
) -> Box<dyn Backend> {
    match kind {
        BackendKind::Svg => Box::new(svg::SvgBackend::new(out, params)),
        BackendKind::Png => Box::new(bitmap::BitmapBackend::new(out, params)),
        BackendKind::Hpgl => Box::new(hpgl::HpglBackend::new(out, params)),
        BackendKind::Meta => Box::new(meta::MetaBackend::new(out, params)),
    }
}

/// 24-bit form of a device color on backends that resolve to RGB.
pub(crate) fn rgb_of(c: DeviceColor) -> Rgb24 {
    match c {
        DeviceColor::Rgb(rgb) => rgb,
        DeviceColor::Indexed(_) => Rgb24([0, 0, 0]),
    }
}

/// Significant digits kept by [`fmt_num`].
const SIG_DIGITS: i32 = 12;

/// Shortest decimal form of `v` at twelve significant digits. The precision is relative, so
/// coefficients of very large or very small coordinate windows survive.
pub(crate) fn fmt_num(v: f64) -> String {
    if v == 0.0 || !v.is_finite() {
        return "0".to_owned();
    }
    let decimals = (SIG_DIGITS - 1 - v.abs().log10().floor() as i32).max(0) as usize;
    let s = format!("{v:.decimals$}");
    if !s.contains('.') {
        return s;
    }
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_owned() } else { s.to_owned() }
}

#[cfg(test)]
#[path = "../../tests/unit/backend/mod.rs"]
mod tests;
