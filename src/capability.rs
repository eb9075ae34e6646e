//! What a backend can draw directly.
//!
//! Each geometric primitive carries a [`Capability`]; the decomposition engine walks a fixed,
//! ordered list of [`Strategy`] values per shape and picks the first one the backend allows,
//! so a new backend only declares flags and never touches the fallback logic.

use serde::{Deserialize, Serialize};

use crate::transform::TransformFlags;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    #[default]
    Unsupported,
    /// Drawable only while the user-to-device map keeps the shape axis-aligned.
    AxisPreservingOnly,
    Any,
}

/// Font families a backend can render natively.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontClasses {
    pub stroked: bool,
    pub postscript: bool,
    pub stick: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub boxes: Capability,
    pub circles: Capability,
    pub ellipses: Capability,
    pub arcs: Capability,
    pub ellarcs: Capability,
    pub quads: Capability,
    pub cubics: Capability,
    /// Curved segments may appear inside longer paths, not only as standalone paths.
    pub mixed_paths: bool,
    pub wide_lines: bool,
    pub dash_arrays: bool,
    pub odd_even_fill: bool,
    pub nonzero_fill: bool,
    pub settable_background: bool,
    pub fonts: FontClasses,
}

impl Capabilities {
    /// A backend that can express every primitive under any transform.
    pub fn everything() -> Self {
        Self {
            boxes: Capability::Any,
            circles: Capability::Any,
            ellipses: Capability::Any,
            arcs: Capability::Any,
            ellarcs: Capability::Any,
            quads: Capability::Any,
            cubics: Capability::Any,
            mixed_paths: true,
            wide_lines: true,
            dash_arrays: true,
            odd_even_fill: true,
            nonzero_fill: true,
            settable_background: true,
            fonts: FontClasses {
                stroked: true,
                postscript: true,
                stick: false,
            },
        }
    }

    /// A backend that only draws polylines; every curve becomes a polygon.
    pub fn polylines_only() -> Self {
        Self {
            boxes: Capability::Unsupported,
            circles: Capability::Unsupported,
            ellipses: Capability::Unsupported,
            arcs: Capability::Unsupported,
            ellarcs: Capability::Unsupported,
            quads: Capability::Unsupported,
            cubics: Capability::Unsupported,
            mixed_paths: false,
            wide_lines: false,
            dash_arrays: false,
            odd_even_fill: true,
            nonzero_fill: false,
            settable_background: true,
            fonts: FontClasses::default(),
        }
    }
}

/// The geometric request being decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Box,
    Circle,
    Ellipse,
    Arc,
    EllArc,
    Quad,
    Cubic,
}

/// Ways of emitting a shape, tried in the order listed by [`ShapeKind::plan`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Emit the shape as itself.
    Primitive,
    /// Four quarter elliptic arcs.
    EllipticArcs,
    /// Four quarter circular arcs.
    CircularArcs,
    /// Cubic Bezier segments.
    Cubics,
    /// Inscribed polyline, always available.
    Polygon,
}

impl ShapeKind {
    pub fn plan(self) -> &'static [Strategy] {
        use Strategy::*;
        match self {
            ShapeKind::Ellipse => &[Primitive, EllipticArcs, Cubics, Polygon],
            ShapeKind::Circle => &[Primitive, CircularArcs, Cubics, Polygon],
            ShapeKind::Box => &[Primitive, Polygon],
            ShapeKind::Arc | ShapeKind::EllArc | ShapeKind::Quad => &[Primitive, Cubics, Polygon],
            ShapeKind::Cubic => &[Primitive, Polygon],
        }
    }
}

/// Geometry facts about one request, beyond the transform flags.
#[derive(Clone, Copy, Debug)]
pub struct ShapeContext {
    pub flags: TransformFlags,
    /// The shape's own axes line up with the user axes (rotation is a multiple of 90 degrees,
    /// or the conjugate radii of an elliptic arc are axis-parallel).
    pub aligned: bool,
    /// The curve would be the only segment of its path.
    pub standalone: bool,
}

fn permits(cap: Capability, axis_condition: bool) -> bool {
    match cap {
        Capability::Any => true,
        Capability::AxisPreservingOnly => axis_condition,
        Capability::Unsupported => false,
    }
}

impl Capabilities {
    pub fn allows(&self, kind: ShapeKind, strategy: Strategy, ctx: &ShapeContext) -> bool {
        let f = ctx.flags;
        let in_path_ok = ctx.standalone || self.mixed_paths;
        match strategy {
            Strategy::Polygon => true,
            Strategy::Cubics => self.cubics == Capability::Any && in_path_ok,
            Strategy::EllipticArcs => permits(self.ellarcs, f.axes_preserved && ctx.aligned),
            Strategy::CircularArcs => permits(self.arcs, f.axes_preserved && f.uniform),
            Strategy::Primitive => match kind {
                ShapeKind::Box => permits(self.boxes, f.axes_preserved),
                ShapeKind::Circle => permits(self.circles, f.axes_preserved && f.uniform),
                ShapeKind::Ellipse => permits(self.ellipses, f.axes_preserved && ctx.aligned),
                ShapeKind::Arc => {
                    in_path_ok && permits(self.arcs, f.axes_preserved && f.uniform)
                }
                ShapeKind::EllArc => {
                    in_path_ok && permits(self.ellarcs, f.axes_preserved && ctx.aligned)
                }
                ShapeKind::Quad => in_path_ok && permits(self.quads, f.axes_preserved),
                ShapeKind::Cubic => in_path_ok && permits(self.cubics, f.axes_preserved),
            },
        }
    }

    /// First strategy in the shape's plan that this backend allows.
    pub fn select(&self, kind: ShapeKind, ctx: &ShapeContext) -> Strategy {
        kind.plan()
            .iter()
            .copied()
            .find(|&s| self.allows(kind, s, ctx))
            .unwrap_or(Strategy::Polygon)
    }
}

#[cfg(test)]
#[path = "../tests/unit/capability.rs"]
mod tests;
