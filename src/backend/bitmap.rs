//! Raster output encoded as PNG. Every shape reaches this backend as a polyline; lines are
//! clipped to the canvas and drawn one pixel wide.

use std::io::{Cursor, Write};

use crate::backend::{Backend, PaintContext};
use crate::capability::Capabilities;
use crate::clip::{ClipRect, Clipped};
use crate::color::{ColorTable, DeviceColor};
use crate::foundation::core::{Affine, Point, Rgb24, Rgb48};
use crate::foundation::error::{PlotError, PlotResult};
use crate::foundation::math::iround;
use crate::message::Messenger;
use crate::params::PlotterParams;
use crate::path::{Path, decompose};
use crate::state::FillRule;
use crate::text::{FontMetrics, HJust, VJust};

/// Size of the per-document color table.
pub const COLOR_TABLE_SIZE: usize = 256;

/// Largest canvas accepted from `BITMAPSIZE`, in pixels.
pub const MAX_CANVAS_PIXELS: u64 = 1 << 24;

const DEFAULT_SIZE: (u32, u32) = (570, 570);

pub struct BitmapBackend {
    out: Box<dyn Write>,
    caps: Capabilities,
    width: u32,
    height: u32,
    /// One color-table index per pixel, row-major from the top-left corner.
    pixels: Vec<u16>,
    table: ColorTable,
    recording: bool,
    text_warned: bool,
    /// Reported through the messenger when the first page opens.
    size_warning: Option<String>,
}

impl BitmapBackend {
    pub fn new(out: Box<dyn Write>, params: &PlotterParams) -> Self {
        let (w, h) = params.size("BITMAPSIZE").unwrap_or(DEFAULT_SIZE);
        let (width, height, size_warning) = if u64::from(w) * u64::from(h) > MAX_CANVAS_PIXELS {
            let msg = format!(
                "bitmap size {w}x{h} is too large, using {}x{}",
                DEFAULT_SIZE.0, DEFAULT_SIZE.1
            );
            (DEFAULT_SIZE.0, DEFAULT_SIZE.1, Some(msg))
        } else {
            (w, h, None)
        };
        Self {
            out,
            caps: Capabilities::polylines_only(),
            width,
            height,
            pixels: Vec::new(),
            table: ColorTable::new(COLOR_TABLE_SIZE),
            recording: false,
            text_warned: false,
            size_warning,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Color of the pixel at column `x`, row `y` (row 0 is the top).
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb24> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self
            .pixels
            .get(y as usize * self.width as usize + x as usize)?;
        self.table.get(*idx)
    }

    pub fn color_table(&self) -> &ColorTable {
        &self.table
    }

    fn index(&mut self, color: Rgb48, messenger: &Messenger) -> DeviceColor {
        DeviceColor::Indexed(self.table.lookup_or_insert(color.to_rgb24(), messenger))
    }

    fn set(&mut self, x: i32, y: i32, idx: u16) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let i = y as usize * self.width as usize + x as usize;
        self.pixels[i] = idx;
    }

    fn clip_rect(&self) -> ClipRect {
        ClipRect::new(
            0.0,
            0.0,
            f64::from(self.width) - 1.0,
            f64::from(self.height) - 1.0,
        )
    }

    /// Bresenham line between two device points, clipped to the canvas.
    fn draw_line(&mut self, p0: Point, p1: Point, idx: u16) {
        let Clipped::Accepted { p0, p1, .. } = self.clip_rect().clip_line(p0, p1) else {
            return;
        };
        let (mut x0, mut y0) = (iround(p0.x), iround(p0.y));
        let (x1, y1) = (iround(p1.x), iround(p1.y));
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set(x0, y0, idx);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Scanline fill of the region bounded by `rings`, sampled at pixel centers.
    fn fill_rings(&mut self, rings: &[Vec<Point>], rule: FillRule, idx: u16) {
        let edges: Vec<(Point, Point)> = rings
            .iter()
            .flat_map(|ring| {
                let n = ring.len();
                (0..n).map(move |i| (ring[i], ring[(i + 1) % n]))
            })
            .filter(|(a, b)| a.y != b.y)
            .collect();
        if edges.is_empty() {
            return;
        }
        let (ymin, ymax) = edges.iter().fold((f64::MAX, f64::MIN), |(lo, hi), (a, b)| {
            (lo.min(a.y).min(b.y), hi.max(a.y).max(b.y))
        });
        let top = (ymin.ceil().max(0.0)) as i32;
        let bottom = (ymax.floor().min(f64::from(self.height) - 1.0)) as i32;

        let mut crossings: Vec<(f64, i32)> = Vec::new();
        for y in top..=bottom {
            let sy = f64::from(y);
            crossings.clear();
            for (a, b) in &edges {
                let (lo, hi, dir) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
                // Half-open in y so shared vertices are counted once.
                if sy >= lo.y && sy < hi.y {
                    let t = (sy - lo.y) / (hi.y - lo.y);
                    crossings.push((lo.x + t * (hi.x - lo.x), dir));
                }
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                let (x0, dir) = pair[0];
                let x1 = pair[1].0;
                winding += dir;
                let inside = match rule {
                    FillRule::OddEven => winding % 2 != 0,
                    FillRule::NonZero => winding != 0,
                };
                if inside {
                    let left = x0.ceil().max(0.0) as i32;
                    let right = x1.floor().min(f64::from(self.width) - 1.0) as i32;
                    for x in left..=right {
                        self.set(x, y, idx);
                    }
                }
            }
        }
    }

    fn paint_rings(&mut self, ctx: &PaintContext<'_>, paths: &[Path]) {
        let rings: Vec<Vec<Point>> = paths
            .iter()
            .map(|p| {
                decompose::flatten(p)
                    .into_iter()
                    .map(|q| ctx.to_device(q))
                    .collect()
            })
            .collect();
        if let Some(DeviceColor::Indexed(idx)) = ctx.fill {
            self.fill_rings(&rings, ctx.fill_rule, idx);
        }
        if let Some(DeviceColor::Indexed(idx)) = ctx.pen {
            for ring in &rings {
                for pair in ring.windows(2) {
                    self.draw_line(pair[0], pair[1], idx);
                }
            }
        }
    }

    fn encode_png(&self) -> PlotResult<Vec<u8>> {
        let mut raw = Vec::with_capacity(self.pixels.len() * 3);
        for &idx in &self.pixels {
            raw.extend_from_slice(&self.table.get(idx).unwrap_or(Rgb24::WHITE).0);
        }
        let img = image::RgbImage::from_raw(self.width, self.height, raw)
            .ok_or_else(|| PlotError::encode("pixel buffer does not match the canvas size"))?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| PlotError::encode(format!("png: {e}")))?;
        Ok(buf)
    }
}

impl Backend for BitmapBackend {
    fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    fn ndc_to_device(&self) -> Affine {
        let (w, h) = (f64::from(self.width) - 1.0, f64::from(self.height) - 1.0);
        Affine::new([w, 0.0, 0.0, -h, 0.0, h])
    }

    fn open_page(&mut self, page: u32, messenger: &Messenger) -> PlotResult<()> {
        if let Some(msg) = self.size_warning.take() {
            messenger.warning(&msg);
        }
        self.recording = page == 1;
        if self.recording {
            self.table = ColorTable::new(COLOR_TABLE_SIZE);
            let white = self.table.lookup_or_insert(Rgb24::WHITE, messenger);
            self.pixels = vec![white; self.width as usize * self.height as usize];
            self.text_warned = false;
        } else {
            tracing::debug!(page, "png keeps only the first page");
        }
        Ok(())
    }

    fn close_page(&mut self, _messenger: &Messenger) -> PlotResult<()> {
        if !self.recording {
            return Ok(());
        }
        self.recording = false;
        let png = self.encode_png()?;
        tracing::debug!(bytes = png.len(), colors = self.table.entries().len(), "png encoded");
        self.write_bytes(&png)
    }

    fn erase_page(&mut self, ctx: &PaintContext<'_>) -> PlotResult<()> {
        if self.recording
            && let Some(DeviceColor::Indexed(idx)) = ctx.background
        {
            self.pixels.fill(idx);
        }
        Ok(())
    }

    fn paint_path(&mut self, ctx: &PaintContext<'_>, path: &Path) -> PlotResult<()> {
        if self.recording {
            self.paint_rings(ctx, std::slice::from_ref(path));
        }
        Ok(())
    }

    fn paint_paths(&mut self, ctx: &PaintContext<'_>, paths: &[Path]) -> PlotResult<()> {
        if self.recording {
            self.paint_rings(ctx, paths);
        }
        Ok(())
    }

    fn paint_point(&mut self, ctx: &PaintContext<'_>, p: Point) -> PlotResult<()> {
        if self.recording
            && let Some(DeviceColor::Indexed(idx)) = ctx.pen
        {
            let d = ctx.to_device(p);
            self.set(iround(d.x), iround(d.y), idx);
        }
        Ok(())
    }

    fn paint_text(
        &mut self,
        ctx: &PaintContext<'_>,
        _text: &str,
        _h: HJust,
        _v: VJust,
        _metrics: &FontMetrics,
    ) -> PlotResult<()> {
        if !self.text_warned {
            self.text_warned = true;
            ctx.messenger
                .warning("png output has no fonts; labels are not drawn");
        }
        Ok(())
    }

    fn resolve_pen_color(&mut self, color: Rgb48, messenger: &Messenger) -> DeviceColor {
        self.index(color, messenger)
    }

    fn resolve_fill_color(&mut self, color: Rgb48, messenger: &Messenger) -> DeviceColor {
        self.index(color, messenger)
    }

    fn resolve_background_color(&mut self, color: Rgb48, messenger: &Messenger) -> DeviceColor {
        self.index(color, messenger)
    }

    fn retrieve_font(&mut self, name: &str, size: f64, _angle_deg: f64) -> Option<FontMetrics> {
        Some(FontMetrics::generic(name, size))
    }

    fn default_font(&self) -> &str {
        "HersheySerif"
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
#[path = "../../tests/unit/backend/bitmap.rs"]
mod tests;
