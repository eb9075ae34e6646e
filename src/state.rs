//! Drawing state and the save/restore stack.

use serde::{Deserialize, Serialize};

use crate::color::ResolvedColor;
use crate::foundation::core::{Point, Rgb48};
use crate::path::{Path, PathBuilder};
use crate::text::FontMetrics;
use crate::transform::Transform;

/// Default line width and font size, as fractions of the display size.
pub const DEFAULT_LINE_WIDTH_FRACTION: f64 = 1.0 / 850.0;
pub const DEFAULT_FONT_SIZE_FRACTION: f64 = 1.0 / 50.0;
pub const DEFAULT_MITER_LIMIT: f64 = 10.43;
pub const DEFAULT_FONT_NAME: &str = "HersheySerif";

/// Map a case-insensitive name through `table`, resolving anything unknown to `default`.
fn lookup<T: Copy>(name: Option<&str>, table: &[(&str, T)], default: T) -> T {
    let Some(name) = name else {
        return default;
    };
    let name = name.trim().to_ascii_lowercase();
    table
        .iter()
        .find(|(n, _)| *n == name)
        .map_or(default, |(_, v)| *v)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineMode {
    #[default]
    Solid,
    Dotted,
    DotDashed,
    ShortDashed,
    LongDashed,
    DotDotDashed,
    DotDotDotDashed,
    Disconnected,
}

impl LineMode {
    pub fn from_name(name: Option<&str>) -> Self {
        use LineMode::*;
        lookup(
            name,
            &[
                ("solid", Solid),
                ("dotted", Dotted),
                ("dotdashed", DotDashed),
                ("shortdashed", ShortDashed),
                ("longdashed", LongDashed),
                ("dotdotdashed", DotDotDashed),
                ("dotdotdotdashed", DotDotDotDashed),
                ("disconnected", Disconnected),
            ],
            Solid,
        )
    }

    /// On/off dash lengths in multiples of the line width; empty means solid.
    pub fn pattern(self) -> &'static [f64] {
        match self {
            LineMode::Solid | LineMode::Disconnected => &[],
            LineMode::Dotted => &[1.0, 3.0],
            LineMode::DotDashed => &[4.0, 3.0, 1.0, 3.0],
            LineMode::ShortDashed => &[4.0, 4.0],
            LineMode::LongDashed => &[7.0, 4.0],
            LineMode::DotDotDashed => &[4.0, 3.0, 1.0, 3.0, 1.0, 3.0],
            LineMode::DotDotDotDashed => &[4.0, 3.0, 1.0, 3.0, 1.0, 3.0, 1.0, 3.0],
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapStyle {
    #[default]
    Butt,
    Round,
    Projecting,
    Triangular,
}

impl CapStyle {
    pub fn from_name(name: Option<&str>) -> Self {
        use CapStyle::*;
        lookup(
            name,
            &[
                ("butt", Butt),
                ("round", Round),
                ("projecting", Projecting),
                ("triangular", Triangular),
            ],
            Butt,
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinStyle {
    #[default]
    Miter,
    Round,
    Bevel,
    Triangular,
}

impl JoinStyle {
    pub fn from_name(name: Option<&str>) -> Self {
        use JoinStyle::*;
        lookup(
            name,
            &[
                ("miter", Miter),
                ("mitre", Miter),
                ("round", Round),
                ("bevel", Bevel),
                ("triangular", Triangular),
            ],
            Miter,
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillRule {
    #[default]
    OddEven,
    NonZero,
}

impl FillRule {
    pub fn from_name(name: Option<&str>) -> Self {
        use FillRule::*;
        lookup(
            name,
            &[
                ("even-odd", OddEven),
                ("odd-even", OddEven),
                ("alternate", OddEven),
                ("nonzero-winding", NonZero),
                ("nonzero", NonZero),
                ("winding", NonZero),
            ],
            OddEven,
        )
    }
}

/// User-specified dash pattern, in user units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashArray {
    pub dashes: Vec<f64>,
    pub offset: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Width in user units; `None` uses the display-relative default.
    pub width: Option<f64>,
    pub mode: LineMode,
    /// Overrides `mode` when set.
    pub dash: Option<DashArray>,
    pub cap: CapStyle,
    pub join: JoinStyle,
    pub miter_limit: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: None,
            mode: LineMode::Solid,
            dash: None,
            cap: CapStyle::Butt,
            join: JoinStyle::Miter,
            miter_limit: DEFAULT_MITER_LIMIT,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FontState {
    pub name: String,
    /// Size in user units; `None` uses the display-relative default.
    pub size: Option<f64>,
    pub angle_deg: f64,
    /// Filled in lazily on first text operation after a font change.
    pub metrics: Option<FontMetrics>,
}

impl Default for FontState {
    fn default() -> Self {
        Self {
            name: DEFAULT_FONT_NAME.to_owned(),
            size: None,
            angle_deg: 0.0,
            metrics: None,
        }
    }
}

/// Direction in which closed primitives are traced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    CounterClockwise,
    Clockwise,
}

/// Every graphics attribute, plus the path in progress.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawingState {
    pub transform: Transform,
    pub pos: Point,
    pub path: Option<PathBuilder>,
    /// Simple paths finished by `endsubpath`, painted together at `endpath`.
    pub subpaths: Vec<Path>,
    pub pen_color: Rgb48,
    pub fill_color: Rgb48,
    pub bg_color: Rgb48,
    /// 0 disables stroking.
    pub pen_type: u16,
    /// 0 disables filling; otherwise a desaturation level.
    pub fill_type: u16,
    pub line: LineStyle,
    pub fill_rule: FillRule,
    pub orientation: Orientation,
    pub font: FontState,
    pub(crate) pen_resolved: Option<ResolvedColor>,
    pub(crate) fill_resolved: Option<ResolvedColor>,
    pub(crate) bg_resolved: Option<ResolvedColor>,
}

impl DrawingState {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            pos: Point::ZERO,
            path: None,
            subpaths: Vec::new(),
            pen_color: Rgb48::BLACK,
            fill_color: Rgb48::BLACK,
            bg_color: Rgb48::WHITE,
            pen_type: 1,
            fill_type: 0,
            line: LineStyle::default(),
            fill_rule: FillRule::OddEven,
            orientation: Orientation::CounterClockwise,
            font: FontState::default(),
            pen_resolved: None,
            fill_resolved: None,
            bg_resolved: None,
        }
    }

    /// True when a simple path with at least one segment, or finished subpaths, are pending.
    pub fn has_pending_path(&self) -> bool {
        self.path.as_ref().is_some_and(|p| !p.is_empty()) || !self.subpaths.is_empty()
    }

    pub fn line_width(&self) -> f64 {
        self.line
            .width
            .unwrap_or_else(|| DEFAULT_LINE_WIDTH_FRACTION / self.transform.ndc_norm())
    }

    pub fn font_size(&self) -> f64 {
        self.font
            .size
            .unwrap_or_else(|| DEFAULT_FONT_SIZE_FRACTION / self.transform.ndc_norm())
    }

    pub fn clockwise(&self) -> bool {
        self.orientation == Orientation::Clockwise
    }

    /// A copy for `save`: every attribute, but no path in progress.
    fn saved_copy(&self) -> Self {
        Self {
            path: None,
            subpaths: Vec::new(),
            ..self.clone()
        }
    }
}

/// Stack of drawing states. The bottom state has no predecessor and is never popped by
/// `restore`; it is released only when the page closes.
#[derive(Clone, Debug)]
pub struct StateStack {
    states: Vec<DrawingState>,
}

impl StateStack {
    pub fn new(bottom: DrawingState) -> Self {
        Self {
            states: vec![bottom],
        }
    }

    pub fn depth(&self) -> usize {
        self.states.len()
    }

    pub fn top(&self) -> &DrawingState {
        // the stack is never empty: `pop` refuses to remove the bottom state
        &self.states[self.states.len() - 1]
    }

    pub fn top_mut(&mut self) -> &mut DrawingState {
        let n = self.states.len();
        &mut self.states[n - 1]
    }

    pub fn save(&mut self) {
        let copy = self.top().saved_copy();
        self.states.push(copy);
    }

    /// Pop the top state; `None` when only the bottom state remains.
    pub fn restore(&mut self) -> Option<DrawingState> {
        if self.states.len() > 1 {
            self.states.pop()
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/state.rs"]
mod tests;
