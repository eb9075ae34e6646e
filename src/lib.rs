#![forbid(unsafe_code)]
//! Device-independent 2D vector plotting.
//!
//! One drawing API ([`Plotter`]) renders into any [`Backend`]: SVG, PNG, HP-GL or a JSON
//! metafile. The core keeps the drawing-state stack, the coordinate transform, path
//! assembly and flushing, and decomposes shapes into whatever the backend can draw.

mod foundation;

pub mod backend;
pub mod capability;
pub mod clip;
pub mod color;
pub mod message;
pub mod params;
pub mod path;
pub mod plotter;
pub mod script;
pub mod state;
pub mod text;
pub mod transform;

pub use backend::{Backend, BackendKind, DeviceLine, PaintContext, create_backend};
pub use capability::{Capabilities, Capability};
pub use color::DeviceColor;
pub use foundation::core::{Affine, Point, Rgb24, Rgb48, Vec2};
pub use foundation::error::{PlotError, PlotResult};
pub use message::{MessageHandler, Severity, set_global_handler};
pub use params::{ParamValue, PlotterParams};
pub use path::{Path, Segment, SegmentList};
pub use plotter::Plotter;
pub use script::{DrawCommand, Script};
pub use state::{CapStyle, DrawingState, FillRule, JoinStyle, LineMode};
pub use text::{FontMetrics, HJust, VJust};
pub use transform::Transform;
