//! Drawing scripts: a JSON array of tagged commands replayed through a [`Plotter`].
//!
//! ```json
//! [
//!   {"op": "openpl"},
//!   {"op": "pencolorname", "name": "red"},
//!   {"op": "circle", "xc": 0.5, "yc": 0.5, "r": 0.25},
//!   {"op": "closepl"}
//! ]
//! ```

use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::foundation::error::{PlotError, PlotResult};
use crate::plotter::Plotter;

/// One plotter call. Field names follow the float API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Openpl,
    Closepl,
    Flushpl,
    Erase,
    Savestate,
    Restorestate,

    Space {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    },
    Space2 {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Setmatrix {
        m: [f64; 6],
    },
    Concat {
        m: [f64; 6],
    },
    Translate {
        x: f64,
        y: f64,
    },
    Scale {
        x: f64,
        y: f64,
    },
    Rotate {
        deg: f64,
    },

    Move {
        x: f64,
        y: f64,
    },
    Cont {
        x: f64,
        y: f64,
    },
    Line {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    },
    Moverel {
        dx: f64,
        dy: f64,
    },
    Contrel {
        dx: f64,
        dy: f64,
    },
    Linerel {
        dx0: f64,
        dy0: f64,
        dx1: f64,
        dy1: f64,
    },
    Arc {
        xc: f64,
        yc: f64,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    },
    Ellarc {
        xc: f64,
        yc: f64,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    },
    Bezier2 {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Bezier3 {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    },
    #[serde(rename = "box")]
    Rect {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    },
    Circle {
        xc: f64,
        yc: f64,
        r: f64,
    },
    Ellipse {
        xc: f64,
        yc: f64,
        rx: f64,
        ry: f64,
        #[serde(default)]
        angle: f64,
    },
    Point {
        x: f64,
        y: f64,
    },
    Endpath,
    Endsubpath,
    Closepath,

    Pencolor {
        r: i32,
        g: i32,
        b: i32,
    },
    Fillcolor {
        r: i32,
        g: i32,
        b: i32,
    },
    Bgcolor {
        r: i32,
        g: i32,
        b: i32,
    },
    Color {
        r: i32,
        g: i32,
        b: i32,
    },
    Pencolorname {
        name: String,
    },
    Fillcolorname {
        name: String,
    },
    Bgcolorname {
        name: String,
    },
    Colorname {
        name: String,
    },
    Pentype {
        level: i32,
    },
    Filltype {
        level: i32,
    },
    Linewidth {
        width: f64,
    },
    Linemod {
        name: String,
    },
    Linedash {
        dashes: Vec<f64>,
        #[serde(default)]
        offset: f64,
    },
    Capmod {
        name: String,
    },
    Joinmod {
        name: String,
    },
    Miterlimit {
        limit: f64,
    },
    Fillmod {
        name: String,
    },
    Orientation {
        direction: i32,
    },

    Fontname {
        name: String,
    },
    Fontsize {
        size: f64,
    },
    Textangle {
        deg: f64,
    },
    Label {
        text: String,
    },
    Alabel {
        h: char,
        v: char,
        text: String,
    },
}

impl DrawCommand {
    /// Issue this command against `p`.
    pub fn apply<B: Backend>(&self, p: &mut Plotter<B>) -> PlotResult<()> {
        use DrawCommand as C;
        match self {
            C::Openpl => p.openpl(),
            C::Closepl => p.closepl(),
            C::Flushpl => p.flushpl(),
            C::Erase => p.erase(),
            C::Savestate => p.savestate(),
            C::Restorestate => p.restorestate(),

            C::Space { x0, y0, x1, y1 } => p.fspace(*x0, *y0, *x1, *y1),
            C::Space2 {
                x0,
                y0,
                x1,
                y1,
                x2,
                y2,
            } => p.fspace2(*x0, *y0, *x1, *y1, *x2, *y2),
            C::Setmatrix { m } => p.fsetmatrix(*m),
            C::Concat { m } => p.fconcat(*m),
            C::Translate { x, y } => p.ftranslate(*x, *y),
            C::Scale { x, y } => p.fscale(*x, *y),
            C::Rotate { deg } => p.frotate(*deg),

            C::Move { x, y } => p.fmove(*x, *y),
            C::Cont { x, y } => p.fcont(*x, *y),
            C::Line { x0, y0, x1, y1 } => p.fline(*x0, *y0, *x1, *y1),
            C::Moverel { dx, dy } => p.fmoverel(*dx, *dy),
            C::Contrel { dx, dy } => p.fcontrel(*dx, *dy),
            C::Linerel { dx0, dy0, dx1, dy1 } => p.flinerel(*dx0, *dy0, *dx1, *dy1),
            C::Arc {
                xc,
                yc,
                x0,
                y0,
                x1,
                y1,
            } => p.farc(*xc, *yc, *x0, *y0, *x1, *y1),
            C::Ellarc {
                xc,
                yc,
                x0,
                y0,
                x1,
                y1,
            } => p.fellarc(*xc, *yc, *x0, *y0, *x1, *y1),
            C::Bezier2 {
                x0,
                y0,
                x1,
                y1,
                x2,
                y2,
            } => p.fbezier2(*x0, *y0, *x1, *y1, *x2, *y2),
            C::Bezier3 {
                x0,
                y0,
                x1,
                y1,
                x2,
                y2,
                x3,
                y3,
            } => p.fbezier3(*x0, *y0, *x1, *y1, *x2, *y2, *x3, *y3),
            C::Rect { x0, y0, x1, y1 } => p.fbox(*x0, *y0, *x1, *y1),
            C::Circle { xc, yc, r } => p.fcircle(*xc, *yc, *r),
            C::Ellipse {
                xc,
                yc,
                rx,
                ry,
                angle,
            } => p.fellipse(*xc, *yc, *rx, *ry, *angle),
            C::Point { x, y } => p.fpoint(*x, *y),
            C::Endpath => p.endpath(),
            C::Endsubpath => p.endsubpath(),
            C::Closepath => p.closepath(),

            C::Pencolor { r, g, b } => p.pencolor(*r, *g, *b),
            C::Fillcolor { r, g, b } => p.fillcolor(*r, *g, *b),
            C::Bgcolor { r, g, b } => p.bgcolor(*r, *g, *b),
            C::Color { r, g, b } => p.color(*r, *g, *b),
            C::Pencolorname { name } => p.pencolorname(name),
            C::Fillcolorname { name } => p.fillcolorname(name),
            C::Bgcolorname { name } => p.bgcolorname(name),
            C::Colorname { name } => p.colorname(name),
            C::Pentype { level } => p.pentype(*level),
            C::Filltype { level } => p.filltype(*level),
            C::Linewidth { width } => p.flinewidth(*width),
            C::Linemod { name } => p.linemod(name),
            C::Linedash { dashes, offset } => p.flinedash(dashes, *offset),
            C::Capmod { name } => p.capmod(name),
            C::Joinmod { name } => p.joinmod(name),
            C::Miterlimit { limit } => p.fmiterlimit(*limit),
            C::Fillmod { name } => p.fillmod(name),
            C::Orientation { direction } => p.orientation(*direction),

            C::Fontname { name } => p.fontname(name).map(drop),
            C::Fontsize { size } => p.ffontsize(*size).map(drop),
            C::Textangle { deg } => p.ftextangle(*deg).map(drop),
            C::Label { text } => p.label(text),
            C::Alabel { h, v, text } => p.alabel(*h, *v, text),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub commands: Vec<DrawCommand>,
}

impl Script {
    pub fn from_json(s: &str) -> PlotResult<Self> {
        serde_json::from_str(s).map_err(|e| PlotError::config(format!("script: {e}")))
    }

    pub fn from_reader(r: impl std::io::Read) -> PlotResult<Self> {
        serde_json::from_reader(r).map_err(|e| PlotError::config(format!("script: {e}")))
    }

    /// Whether the script manages its own pages.
    pub fn opens_pages(&self) -> bool {
        self.commands.iter().any(|c| matches!(c, DrawCommand::Openpl))
    }

    /// Replay every command in order, stopping at the first failure.
    #[tracing::instrument(skip_all, fields(commands = self.commands.len()))]
    pub fn run<B: Backend>(&self, plotter: &mut Plotter<B>) -> PlotResult<()> {
        for (i, cmd) in self.commands.iter().enumerate() {
            if let Err(e) = cmd.apply(plotter) {
                tracing::debug!(index = i, ?cmd, "script command failed");
                return Err(e);
            }
        }
        Ok(())
    }

    /// Replay the script on a single page, opening and closing it unless the script
    /// does so itself.
    pub fn render<B: Backend>(&self, plotter: &mut Plotter<B>) -> PlotResult<()> {
        if self.opens_pages() {
            return self.run(plotter);
        }
        plotter.openpl()?;
        self.run(plotter)?;
        plotter.closepl()
    }
}

#[cfg(test)]
#[path = "../tests/unit/script.rs"]
mod tests;
