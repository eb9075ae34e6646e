//! Device-independent metafile: every hook invocation is recorded as a [`MetaOp`] and
//! written out as one JSON object per line when the page closes.
//!
//! The recorded stream is also the easiest way to see exactly what the core hands a
//! backend, which is what the integration tests rely on.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::backend::{Backend, DeviceLine, PaintContext};
use crate::capability::Capabilities;
use crate::color::{ColorRole, DeviceColor};
use crate::foundation::core::{Affine, Point, Rgb48};
use crate::foundation::error::{PlotError, PlotResult};
use crate::message::Messenger;
use crate::params::PlotterParams;
use crate::path::Path;
use crate::state::FillRule;
use crate::text::{FontMetrics, HJust, VJust};

/// One recorded backend call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MetaOp {
    OpenPage {
        page: u32,
    },
    ClosePage,
    ErasePage {
        background: Option<DeviceColor>,
    },
    ResolveColor {
        role: ColorRole,
        color: Rgb48,
    },
    SyncLine {
        line: DeviceLine,
    },
    PaintPath {
        path: Path,
        pen: Option<DeviceColor>,
        fill: Option<DeviceColor>,
        fill_rule: FillRule,
        /// User-to-device matrix in effect.
        matrix: [f64; 6],
    },
    PaintPaths {
        paths: Vec<Path>,
        pen: Option<DeviceColor>,
        fill: Option<DeviceColor>,
        fill_rule: FillRule,
        matrix: [f64; 6],
    },
    PaintPoint {
        point: Point,
        pen: Option<DeviceColor>,
    },
    PaintText {
        text: String,
        at: Point,
        h: HJust,
        v: VJust,
        font: String,
        size: f64,
        angle_deg: f64,
    },
}

pub struct MetaBackend {
    out: Box<dyn Write>,
    caps: Capabilities,
    /// Pretty-print each page as one JSON array instead of JSON lines.
    portable: bool,
    ops: Vec<MetaOp>,
    /// Index of the first op not yet written.
    written: usize,
}

impl MetaBackend {
    pub fn new(out: Box<dyn Write>, params: &PlotterParams) -> Self {
        Self {
            out,
            caps: Capabilities::everything(),
            portable: params.flag("META_PORTABLE"),
            ops: Vec::new(),
            written: 0,
        }
    }

    /// Declare a different set of drawable primitives, to exercise the decomposition paths.
    pub fn with_capabilities(mut self, caps: Capabilities) -> Self {
        self.caps = caps;
        self
    }

    /// Every op recorded so far, across pages.
    pub fn ops(&self) -> &[MetaOp] {
        &self.ops
    }

    /// Only the paint ops, in order.
    pub fn paints(&self) -> impl Iterator<Item = &MetaOp> {
        self.ops.iter().filter(|op| {
            matches!(
                op,
                MetaOp::PaintPath { .. }
                    | MetaOp::PaintPaths { .. }
                    | MetaOp::PaintPoint { .. }
                    | MetaOp::PaintText { .. }
            )
        })
    }

    fn encode_page(&self) -> PlotResult<Vec<u8>> {
        let page = &self.ops[self.written..];
        let mut buf = Vec::new();
        if self.portable {
            serde_json::to_writer_pretty(&mut buf, page)
                .map_err(|e| PlotError::encode(format!("metafile: {e}")))?;
            buf.push(b'\n');
        } else {
            for op in page {
                serde_json::to_writer(&mut buf, op)
                    .map_err(|e| PlotError::encode(format!("metafile: {e}")))?;
                buf.push(b'\n');
            }
        }
        Ok(buf)
    }
}

impl Backend for MetaBackend {
    fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    fn ndc_to_device(&self) -> Affine {
        Affine::IDENTITY
    }

    fn open_page(&mut self, page: u32, _messenger: &Messenger) -> PlotResult<()> {
        self.ops.push(MetaOp::OpenPage { page });
        Ok(())
    }

    fn close_page(&mut self, _messenger: &Messenger) -> PlotResult<()> {
        self.ops.push(MetaOp::ClosePage);
        let bytes = self.encode_page()?;
        self.written = self.ops.len();
        self.write_bytes(&bytes)
    }

    fn erase_page(&mut self, ctx: &PaintContext<'_>) -> PlotResult<()> {
        self.ops.push(MetaOp::ErasePage {
            background: ctx.background,
        });
        Ok(())
    }

    fn paint_path(&mut self, ctx: &PaintContext<'_>, path: &Path) -> PlotResult<()> {
        self.ops.push(MetaOp::PaintPath {
            path: path.clone(),
            pen: ctx.pen,
            fill: ctx.fill,
            fill_rule: ctx.fill_rule,
            matrix: ctx.user_to_device().as_coeffs(),
        });
        Ok(())
    }

    fn paint_paths(&mut self, ctx: &PaintContext<'_>, paths: &[Path]) -> PlotResult<()> {
        self.ops.push(MetaOp::PaintPaths {
            paths: paths.to_vec(),
            pen: ctx.pen,
            fill: ctx.fill,
            fill_rule: ctx.fill_rule,
            matrix: ctx.user_to_device().as_coeffs(),
        });
        Ok(())
    }

    fn paint_point(&mut self, ctx: &PaintContext<'_>, p: Point) -> PlotResult<()> {
        self.ops.push(MetaOp::PaintPoint {
            point: p,
            pen: ctx.pen,
        });
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
        self.ops.push(MetaOp::PaintText {
            text: text.to_owned(),
            at: ctx.state.pos,
            h,
            v,
            font: metrics.name.clone(),
            size: metrics.true_size,
            angle_deg: ctx.state.font.angle_deg,
        });
        Ok(())
    }

    fn resolve_pen_color(&mut self, color: Rgb48, _messenger: &Messenger) -> DeviceColor {
        self.ops.push(MetaOp::ResolveColor {
            role: ColorRole::Pen,
            color,
        });
        DeviceColor::Rgb(color.to_rgb24())
    }

    fn resolve_fill_color(&mut self, color: Rgb48, _messenger: &Messenger) -> DeviceColor {
        self.ops.push(MetaOp::ResolveColor {
            role: ColorRole::Fill,
            color,
        });
        DeviceColor::Rgb(color.to_rgb24())
    }

    fn resolve_background_color(&mut self, color: Rgb48, _messenger: &Messenger) -> DeviceColor {
        self.ops.push(MetaOp::ResolveColor {
            role: ColorRole::Background,
            color,
        });
        DeviceColor::Rgb(color.to_rgb24())
    }

    fn sync_line_attributes(&mut self, line: &DeviceLine) -> PlotResult<()> {
        self.ops.push(MetaOp::SyncLine { line: line.clone() });
        Ok(())
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
#[path = "../../tests/unit/backend/meta.rs"]
mod tests;
