//! The device-independent plotting core.
//!
//! A [`Plotter`] owns one backend, one drawing-state stack and one message sink. Drawing
//! calls accumulate geometry in the top drawing state; the path is flushed to the backend
//! when it is explicitly ended, when the cursor jumps, when a path-relevant attribute
//! changes, when a non-path object is drawn, or when the state is restored.

mod attrs;
mod draw;
mod legacy;

use crate::backend::{Backend, DeviceLine, PaintContext};
use crate::color::{DeviceColor, ResolvedColor, desaturate, parse_color_name};
use crate::foundation::core::{Point, Rgb48};
use crate::foundation::error::{PlotError, PlotResult};
use crate::message::{MessageHandler, Messenger};
use crate::params::PlotterParams;
use crate::path::Path;
use crate::state::{DrawingState, FillRule, LineMode, StateStack};
use crate::text::FontMetrics;
use crate::transform::Transform;

pub struct Plotter<B: Backend = Box<dyn Backend>> {
    backend: B,
    messenger: Messenger,
    params: PlotterParams,
    /// `None` while no page is open.
    stack: Option<StateStack>,
    /// Line attributes last pushed to the backend on this page.
    synced_line: Option<DeviceLine>,
    max_line_length: usize,
    emulate_color: bool,
    page: u32,
}

fn not_open() -> PlotError {
    PlotError::invalid_operation("plotter is not open")
}

impl<B: Backend> Plotter<B> {
    pub fn new(backend: B, params: PlotterParams) -> Self {
        Self::build(backend, params, Messenger::default())
    }

    /// Like [`Plotter::new`], reporting through `handler` instead of the process-wide sink.
    pub fn with_handler(backend: B, params: PlotterParams, handler: MessageHandler) -> Self {
        Self::build(backend, params, Messenger::new(Some(handler)))
    }

    fn build(backend: B, params: PlotterParams, messenger: Messenger) -> Self {
        let max_line_length = params
            .usize_or_default("MAX_LINE_LENGTH")
            .filter(|&n| n > 0)
            .unwrap_or(500);
        let emulate_color = params.flag("EMULATE_COLOR");
        Self {
            backend,
            messenger,
            params,
            stack: None,
            synced_line: None,
            max_line_length,
            emulate_color,
            page: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.stack.is_some()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn params(&self) -> &PlotterParams {
        &self.params
    }

    /// The current (top) drawing state, while a page is open.
    pub fn state(&self) -> Option<&DrawingState> {
        self.stack.as_ref().map(StateStack::top)
    }

    /// Number of drawing states on the stack; 0 while closed.
    pub fn depth(&self) -> usize {
        self.stack.as_ref().map_or(0, StateStack::depth)
    }

    pub fn position(&self) -> Option<Point> {
        self.state().map(|s| s.pos)
    }

    /// Report `err` through the message sink and return it.
    fn fail<T>(&self, err: PlotError) -> PlotResult<T> {
        self.messenger.error(&err.to_string());
        Err(err)
    }

    fn ensure_open(&self, op: &str) -> PlotResult<()> {
        if self.stack.is_none() {
            return self.fail(PlotError::invalid_operation(format!(
                "{op}: plotter is not open"
            )));
        }
        Ok(())
    }

    fn top(&self) -> PlotResult<&DrawingState> {
        self.stack.as_ref().map(StateStack::top).ok_or_else(not_open)
    }

    fn top_mut(&mut self) -> PlotResult<&mut DrawingState> {
        self.stack
            .as_mut()
            .map(StateStack::top_mut)
            .ok_or_else(not_open)
    }

    /// Begin a page with a fresh drawing state.
    #[tracing::instrument(skip(self), fields(page = self.page + 1))]
    pub fn openpl(&mut self) -> PlotResult<()> {
        if self.stack.is_some() {
            return self.fail(PlotError::invalid_operation(
                "openpl: plotter is already open",
            ));
        }
        self.page += 1;
        self.backend.open_page(self.page, &self.messenger)?;

        let mut bottom = DrawingState::new(Transform::new(self.backend.ndc_to_device()));
        if let Some(name) = self.params.get("BG_COLOR") {
            match parse_color_name(&name) {
                Some(c) => bottom.bg_color = c,
                None => self
                    .messenger
                    .warning(&format!("BG_COLOR \"{name}\" is not a known color, using white")),
            }
        }
        self.stack = Some(StateStack::new(bottom));
        self.synced_line = None;
        tracing::debug!("page opened");
        self.erase_page()
    }

    /// Finish the page: flush paths, unwind every saved state, close the page and flush the
    /// output. The drawing-state stack is released even when closing fails.
    #[tracing::instrument(skip(self), fields(page = self.page))]
    pub fn closepl(&mut self) -> PlotResult<()> {
        self.ensure_open("closepl")?;

        let mut result = Ok(());
        while self.depth() > 1 {
            if let Err(e) = self.restorestate() {
                result = Err(e);
                break;
            }
        }
        let result = result
            .and_then(|()| self.flush_path())
            .and_then(|()| self.backend.close_page(&self.messenger))
            .and_then(|()| self.backend.flush());

        self.stack = None;
        self.synced_line = None;
        if let Err(e) = &result {
            self.messenger.error(&format!("closepl: {e}"));
        }
        tracing::debug!(ok = result.is_ok(), "page closed");
        result
    }

    /// Flush buffered output without ending the page.
    pub fn flushpl(&mut self) -> PlotResult<()> {
        self.ensure_open("flushpl")?;
        self.backend.flush()
    }

    pub fn savestate(&mut self) -> PlotResult<()> {
        self.ensure_open("savestate")?;
        if let Some(stack) = self.stack.as_mut() {
            stack.save();
        }
        Ok(())
    }

    /// Pop the top drawing state after flushing its path. The bottom state cannot be popped.
    pub fn restorestate(&mut self) -> PlotResult<()> {
        self.ensure_open("restorestate")?;
        if self.depth() <= 1 {
            return self.fail(PlotError::invalid_operation(
                "restorestate: no saved drawing state to restore",
            ));
        }
        self.flush_path()?;
        if let Some(stack) = self.stack.as_mut() {
            stack.restore();
        }
        Ok(())
    }

    /// Repaint the page with the background color.
    pub fn erase(&mut self) -> PlotResult<()> {
        self.ensure_open("erase")?;
        self.flush_path()?;
        self.erase_page()
    }

    fn erase_page(&mut self) -> PlotResult<()> {
        if !self.backend.capabilities().settable_background {
            return Ok(());
        }
        let background = Some(self.resolve_background()?);
        let line = self.device_line()?;
        let state = self.stack.as_ref().map(StateStack::top).ok_or_else(not_open)?;
        let ctx = PaintContext {
            state,
            pen: None,
            fill: None,
            background,
            line: &line,
            fill_rule: state.fill_rule,
            messenger: &self.messenger,
        };
        self.backend.erase_page(&ctx)
    }

    // ---- coordinate space ----

    fn update_transform(
        &mut self,
        op: &str,
        f: impl FnOnce(&mut Transform) -> PlotResult<()>,
    ) -> PlotResult<()> {
        self.ensure_open(op)?;
        self.flush_path()?;
        let state = self.top_mut()?;
        let mut t = state.transform.clone();
        match f(&mut t) {
            Ok(()) => {
                state.transform = t;
                state.font.metrics = None;
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Map the user window with corners `(x0, y0)` and `(x1, y1)` onto the display.
    pub fn fspace(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> PlotResult<()> {
        self.update_transform("fspace", |t| t.space(x0, y0, x1, y1))
    }

    /// Map the parallelogram `(x0, y0)`, `(x1, y1)`, `(x2, y2)` onto the display.
    #[allow(clippy::too_many_arguments)]
    pub fn fspace2(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    ) -> PlotResult<()> {
        self.update_transform("fspace2", |t| t.space2(x0, y0, x1, y1, x2, y2))
    }

    pub fn fsetmatrix(&mut self, m: [f64; 6]) -> PlotResult<()> {
        self.update_transform("fsetmatrix", |t| t.set_matrix(m))
    }

    pub fn fconcat(&mut self, m: [f64; 6]) -> PlotResult<()> {
        self.update_transform("fconcat", |t| t.concat(m))
    }

    pub fn ftranslate(&mut self, x: f64, y: f64) -> PlotResult<()> {
        self.fconcat([1.0, 0.0, 0.0, 1.0, x, y])
    }

    pub fn fscale(&mut self, x: f64, y: f64) -> PlotResult<()> {
        self.fconcat([x, 0.0, 0.0, y, 0.0, 0.0])
    }

    pub fn frotate(&mut self, deg: f64) -> PlotResult<()> {
        let (s, c) = deg.to_radians().sin_cos();
        self.fconcat([c, s, -s, c, 0.0, 0.0])
    }

    // ---- flush machinery ----

    /// Paint and clear whatever path is pending in the top state. A no-op when nothing is
    /// pending, so repeated calls never emit twice.
    fn flush_path(&mut self) -> PlotResult<()> {
        let state = self.top_mut()?;
        if let Some(builder) = state.path.take()
            && !builder.is_empty()
        {
            state.subpaths.push(Path::Segments(builder.finish()));
        }
        if state.subpaths.is_empty() {
            return Ok(());
        }
        let paths = std::mem::take(&mut state.subpaths);
        self.emit(&paths)
    }

    /// Resolve colors and line attributes, then hand `paths` to the backend.
    fn emit(&mut self, paths: &[Path]) -> PlotResult<()> {
        let pen = self.resolve_pen()?;
        let fill = self.resolve_fill()?;
        let line = self.device_line()?;
        self.sync_line(&line)?;

        let fill_rule = self.effective_fill_rule()?;
        let state = self.stack.as_ref().map(StateStack::top).ok_or_else(not_open)?;
        let ctx = PaintContext {
            state,
            pen,
            fill,
            background: None,
            line: &line,
            fill_rule,
            messenger: &self.messenger,
        };
        tracing::debug!(paths = paths.len(), "flushing path");
        match paths {
            [one] => self.backend.paint_path(&ctx, one),
            many => self.backend.paint_paths(&ctx, many),
        }
    }

    fn logical(&self, c: Rgb48) -> Rgb48 {
        if self.emulate_color { c.to_gray() } else { c }
    }

    fn resolve_pen(&mut self) -> PlotResult<Option<DeviceColor>> {
        let (pen_type, color) = {
            let s = self.top()?;
            (s.pen_type, s.pen_color)
        };
        if pen_type == 0 {
            return Ok(None);
        }
        let logical = self.logical(color);
        let state = self.stack.as_mut().map(StateStack::top_mut).ok_or_else(not_open)?;
        if let Some(r) = state.pen_resolved
            && r.logical == logical
        {
            return Ok(Some(r.device));
        }
        let device = self.backend.resolve_pen_color(logical, &self.messenger);
        state.pen_resolved = Some(ResolvedColor { logical, device });
        Ok(Some(device))
    }

    fn resolve_fill(&mut self) -> PlotResult<Option<DeviceColor>> {
        let (fill_type, color) = {
            let s = self.top()?;
            (s.fill_type, s.fill_color)
        };
        let Some(color) = desaturate(color, fill_type) else {
            return Ok(None);
        };
        let logical = self.logical(color);
        let state = self.stack.as_mut().map(StateStack::top_mut).ok_or_else(not_open)?;
        if let Some(r) = state.fill_resolved
            && r.logical == logical
        {
            return Ok(Some(r.device));
        }
        let device = self.backend.resolve_fill_color(logical, &self.messenger);
        state.fill_resolved = Some(ResolvedColor { logical, device });
        Ok(Some(device))
    }

    fn resolve_background(&mut self) -> PlotResult<DeviceColor> {
        let logical = self.logical(self.top()?.bg_color);
        let state = self.stack.as_mut().map(StateStack::top_mut).ok_or_else(not_open)?;
        if let Some(r) = state.bg_resolved
            && r.logical == logical
        {
            return Ok(r.device);
        }
        let device = self
            .backend
            .resolve_background_color(logical, &self.messenger);
        state.bg_resolved = Some(ResolvedColor { logical, device });
        Ok(device)
    }

    /// Line attributes of the top state, degraded to what the backend can draw.
    fn device_line(&self) -> PlotResult<DeviceLine> {
        let state = self.top()?;
        let caps = self.backend.capabilities();
        let user_width = state.line_width();
        let device_width = if caps.wide_lines {
            user_width * state.transform.device_norm()
        } else {
            0.0
        };
        let (mode, dash) = match &state.line.dash {
            Some(d) if caps.dash_arrays => (state.line.mode, Some(d.clone())),
            Some(_) => (LineMode::ShortDashed, None),
            None => (state.line.mode, None),
        };
        Ok(DeviceLine {
            user_width,
            device_width,
            mode,
            dash,
            cap: state.line.cap,
            join: state.line.join,
            miter_limit: state.line.miter_limit,
        })
    }

    fn sync_line(&mut self, line: &DeviceLine) -> PlotResult<()> {
        if self.synced_line.as_ref() == Some(line) {
            return Ok(());
        }
        self.backend.sync_line_attributes(line)?;
        self.synced_line = Some(line.clone());
        Ok(())
    }

    fn effective_fill_rule(&self) -> PlotResult<FillRule> {
        let wanted = self.top()?.fill_rule;
        let caps = self.backend.capabilities();
        Ok(match wanted {
            FillRule::OddEven if !caps.odd_even_fill && caps.nonzero_fill => FillRule::NonZero,
            FillRule::NonZero if !caps.nonzero_fill && caps.odd_even_fill => FillRule::OddEven,
            other => other,
        })
    }

    /// Metrics of the current font, retrieving them from the backend on first use.
    fn font_metrics(&mut self) -> PlotResult<FontMetrics> {
        let state = self.top()?;
        if let Some(m) = &state.font.metrics {
            return Ok(m.clone());
        }
        let name = state.font.name.clone();
        let size = state.font_size();
        let angle = state.font.angle_deg;

        let metrics = match self.backend.retrieve_font(&name, size, angle) {
            Some(m) => m,
            None => {
                let fallback = self.backend.default_font().to_owned();
                self.messenger.warning(&format!(
                    "font \"{name}\" is not available, substituting \"{fallback}\""
                ));
                self.backend
                    .retrieve_font(&fallback, size, angle)
                    .unwrap_or_else(|| FontMetrics::generic(&fallback, size))
            }
        };
        self.top_mut()?.font.metrics = Some(metrics.clone());
        Ok(metrics)
    }
}

impl<B: Backend> Drop for Plotter<B> {
    fn drop(&mut self) {
        if self.stack.is_some()
            && let Err(e) = self.closepl()
        {
            tracing::error!(error = %e, "closing plotter on drop failed");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plotter.rs"]
mod tests;
