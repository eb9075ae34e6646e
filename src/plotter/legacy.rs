//! Integer-coordinate and relative-coordinate forms of the drawing API.
//!
//! Integer calls widen to `f64` and forward. Relative calls offset every coordinate
//! argument by the current cursor position.

use crate::backend::Backend;
use crate::foundation::core::Point;
use crate::foundation::error::PlotResult;

use super::Plotter;

fn f(v: i32) -> f64 {
    f64::from(v)
}

impl<B: Backend> Plotter<B> {
    fn cursor(&mut self, op: &str) -> PlotResult<Point> {
        self.ensure_open(op)?;
        Ok(self.top()?.pos)
    }

    // ---- integer variants ----

    pub fn space(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> PlotResult<()> {
        self.fspace(f(x0), f(y0), f(x1), f(y1))
    }

    pub fn space2(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) -> PlotResult<()> {
        self.fspace2(f(x0), f(y0), f(x1), f(y1), f(x2), f(y2))
    }

    pub fn move_to(&mut self, x: i32, y: i32) -> PlotResult<()> {
        self.fmove(f(x), f(y))
    }

    pub fn cont(&mut self, x: i32, y: i32) -> PlotResult<()> {
        self.fcont(f(x), f(y))
    }

    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> PlotResult<()> {
        self.fline(f(x0), f(y0), f(x1), f(y1))
    }

    pub fn arc(&mut self, xc: i32, yc: i32, x0: i32, y0: i32, x1: i32, y1: i32) -> PlotResult<()> {
        self.farc(f(xc), f(yc), f(x0), f(y0), f(x1), f(y1))
    }

    pub fn ellarc(
        &mut self,
        xc: i32,
        yc: i32,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
    ) -> PlotResult<()> {
        self.fellarc(f(xc), f(yc), f(x0), f(y0), f(x1), f(y1))
    }

    pub fn bezier2(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) -> PlotResult<()> {
        self.fbezier2(f(x0), f(y0), f(x1), f(y1), f(x2), f(y2))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn bezier3(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        x3: i32,
        y3: i32,
    ) -> PlotResult<()> {
        self.fbezier3(f(x0), f(y0), f(x1), f(y1), f(x2), f(y2), f(x3), f(y3))
    }

    /// Integer form of [`Plotter::fbox`].
    pub fn rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> PlotResult<()> {
        self.fbox(f(x0), f(y0), f(x1), f(y1))
    }

    pub fn circle(&mut self, xc: i32, yc: i32, r: i32) -> PlotResult<()> {
        self.fcircle(f(xc), f(yc), f(r))
    }

    pub fn ellipse(&mut self, xc: i32, yc: i32, rx: i32, ry: i32, angle: i32) -> PlotResult<()> {
        self.fellipse(f(xc), f(yc), f(rx), f(ry), f(angle))
    }

    pub fn point(&mut self, x: i32, y: i32) -> PlotResult<()> {
        self.fpoint(f(x), f(y))
    }

    pub fn linewidth(&mut self, width: i32) -> PlotResult<()> {
        self.flinewidth(f(width))
    }

    pub fn linedash(&mut self, dashes: &[i32], offset: i32) -> PlotResult<()> {
        let dashes: Vec<f64> = dashes.iter().copied().map(f).collect();
        self.flinedash(&dashes, f(offset))
    }

    pub fn miterlimit(&mut self, limit: i32) -> PlotResult<()> {
        self.fmiterlimit(f(limit))
    }

    pub fn fontsize(&mut self, size: i32) -> PlotResult<f64> {
        self.ffontsize(f(size))
    }

    pub fn textangle(&mut self, angle: i32) -> PlotResult<f64> {
        self.ftextangle(f(angle))
    }

    pub fn labelwidth(&mut self, text: &str) -> PlotResult<f64> {
        self.flabelwidth(text)
    }

    // ---- relative float variants ----

    pub fn fmoverel(&mut self, dx: f64, dy: f64) -> PlotResult<()> {
        let p = self.cursor("fmoverel")?;
        self.fmove(p.x + dx, p.y + dy)
    }

    pub fn fcontrel(&mut self, dx: f64, dy: f64) -> PlotResult<()> {
        let p = self.cursor("fcontrel")?;
        self.fcont(p.x + dx, p.y + dy)
    }

    pub fn flinerel(&mut self, dx0: f64, dy0: f64, dx1: f64, dy1: f64) -> PlotResult<()> {
        let p = self.cursor("flinerel")?;
        self.fline(p.x + dx0, p.y + dy0, p.x + dx1, p.y + dy1)
    }

    pub fn farcrel(
        &mut self,
        dxc: f64,
        dyc: f64,
        dx0: f64,
        dy0: f64,
        dx1: f64,
        dy1: f64,
    ) -> PlotResult<()> {
        let p = self.cursor("farcrel")?;
        self.farc(p.x + dxc, p.y + dyc, p.x + dx0, p.y + dy0, p.x + dx1, p.y + dy1)
    }

    pub fn fellarcrel(
        &mut self,
        dxc: f64,
        dyc: f64,
        dx0: f64,
        dy0: f64,
        dx1: f64,
        dy1: f64,
    ) -> PlotResult<()> {
        let p = self.cursor("fellarcrel")?;
        self.fellarc(p.x + dxc, p.y + dyc, p.x + dx0, p.y + dy0, p.x + dx1, p.y + dy1)
    }

    pub fn fbezier2rel(
        &mut self,
        dx0: f64,
        dy0: f64,
        dx1: f64,
        dy1: f64,
        dx2: f64,
        dy2: f64,
    ) -> PlotResult<()> {
        let p = self.cursor("fbezier2rel")?;
        self.fbezier2(p.x + dx0, p.y + dy0, p.x + dx1, p.y + dy1, p.x + dx2, p.y + dy2)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn fbezier3rel(
        &mut self,
        dx0: f64,
        dy0: f64,
        dx1: f64,
        dy1: f64,
        dx2: f64,
        dy2: f64,
        dx3: f64,
        dy3: f64,
    ) -> PlotResult<()> {
        let p = self.cursor("fbezier3rel")?;
        self.fbezier3(
            p.x + dx0,
            p.y + dy0,
            p.x + dx1,
            p.y + dy1,
            p.x + dx2,
            p.y + dy2,
            p.x + dx3,
            p.y + dy3,
        )
    }

    pub fn fboxrel(&mut self, dx0: f64, dy0: f64, dx1: f64, dy1: f64) -> PlotResult<()> {
        let p = self.cursor("fboxrel")?;
        self.fbox(p.x + dx0, p.y + dy0, p.x + dx1, p.y + dy1)
    }

    pub fn fcirclerel(&mut self, dxc: f64, dyc: f64, r: f64) -> PlotResult<()> {
        let p = self.cursor("fcirclerel")?;
        self.fcircle(p.x + dxc, p.y + dyc, r)
    }

    pub fn fellipserel(
        &mut self,
        dxc: f64,
        dyc: f64,
        rx: f64,
        ry: f64,
        angle_deg: f64,
    ) -> PlotResult<()> {
        let p = self.cursor("fellipserel")?;
        self.fellipse(p.x + dxc, p.y + dyc, rx, ry, angle_deg)
    }

    pub fn fpointrel(&mut self, dx: f64, dy: f64) -> PlotResult<()> {
        let p = self.cursor("fpointrel")?;
        self.fpoint(p.x + dx, p.y + dy)
    }

    // ---- relative integer variants ----

    pub fn moverel(&mut self, dx: i32, dy: i32) -> PlotResult<()> {
        self.fmoverel(f(dx), f(dy))
    }

    pub fn contrel(&mut self, dx: i32, dy: i32) -> PlotResult<()> {
        self.fcontrel(f(dx), f(dy))
    }

    pub fn linerel(&mut self, dx0: i32, dy0: i32, dx1: i32, dy1: i32) -> PlotResult<()> {
        self.flinerel(f(dx0), f(dy0), f(dx1), f(dy1))
    }

    pub fn arcrel(
        &mut self,
        dxc: i32,
        dyc: i32,
        dx0: i32,
        dy0: i32,
        dx1: i32,
        dy1: i32,
    ) -> PlotResult<()> {
        self.farcrel(f(dxc), f(dyc), f(dx0), f(dy0), f(dx1), f(dy1))
    }

    pub fn ellarcrel(
        &mut self,
        dxc: i32,
        dyc: i32,
        dx0: i32,
        dy0: i32,
        dx1: i32,
        dy1: i32,
    ) -> PlotResult<()> {
        self.fellarcrel(f(dxc), f(dyc), f(dx0), f(dy0), f(dx1), f(dy1))
    }

    pub fn bezier2rel(
        &mut self,
        dx0: i32,
        dy0: i32,
        dx1: i32,
        dy1: i32,
        dx2: i32,
        dy2: i32,
    ) -> PlotResult<()> {
        self.fbezier2rel(f(dx0), f(dy0), f(dx1), f(dy1), f(dx2), f(dy2))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn bezier3rel(
        &mut self,
        dx0: i32,
        dy0: i32,
        dx1: i32,
        dy1: i32,
        dx2: i32,
        dy2: i32,
        dx3: i32,
        dy3: i32,
    ) -> PlotResult<()> {
        self.fbezier3rel(
            f(dx0),
            f(dy0),
            f(dx1),
            f(dy1),
            f(dx2),
            f(dy2),
            f(dx3),
            f(dy3),
        )
    }

    pub fn boxrel(&mut self, dx0: i32, dy0: i32, dx1: i32, dy1: i32) -> PlotResult<()> {
        self.fboxrel(f(dx0), f(dy0), f(dx1), f(dy1))
    }

    pub fn circlerel(&mut self, dxc: i32, dyc: i32, r: i32) -> PlotResult<()> {
        self.fcirclerel(f(dxc), f(dyc), f(r))
    }

    pub fn ellipserel(
        &mut self,
        dxc: i32,
        dyc: i32,
        rx: i32,
        ry: i32,
        angle: i32,
    ) -> PlotResult<()> {
        self.fellipserel(f(dxc), f(dyc), f(rx), f(ry), f(angle))
    }

    pub fn pointrel(&mut self, dx: i32, dy: i32) -> PlotResult<()> {
        self.fpointrel(f(dx), f(dy))
    }
}
