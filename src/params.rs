//! Plotter-creation parameters.
//!
//! Lookup order for every key: explicit value, then the environment variable with the same
//! name, then the built-in default. Keys nobody reads are kept and ignored so that scripts
//! written for newer releases still run.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Known parameter names with their built-in defaults.
const KNOWN_PARAMS: &[(&str, Option<&str>)] = &[
    ("BG_COLOR", Some("white")),
    ("BITMAPSIZE", Some("570x570")),
    ("EMULATE_COLOR", Some("no")),
    ("HPGL_VERSION", Some("2")),
    ("INTERLACE", Some("no")),
    ("MAX_LINE_LENGTH", Some("500")),
    ("META_PORTABLE", Some("no")),
    ("PAGESIZE", Some("letter")),
];

/// A parameter value: either a string or an opaque handle owned by the caller.
#[derive(Clone)]
pub enum ParamValue {
    Str(String),
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

/// String-keyed parameter set supplied when a plotter is created.
#[derive(Clone, Debug, Default)]
pub struct PlotterParams {
    values: BTreeMap<String, ParamValue>,
}

impl PlotterParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a string parameter. Builder-style so call sites can chain.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .insert(key.into(), ParamValue::Str(value.into()));
    }

    pub fn set_opaque(&mut self, key: impl Into<String>, value: Arc<dyn Any + Send + Sync>) {
        self.values.insert(key.into(), ParamValue::Opaque(value));
    }

    /// Resolve a string parameter through explicit value, environment and default.
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(ParamValue::Str(s)) = self.values.get(key) {
            return Some(s.clone());
        }
        if let Ok(v) = std::env::var(key) {
            return Some(v);
        }
        default_for(key).map(str::to_owned)
    }

    /// Explicitly supplied opaque value; opaque values have no environment or default fallback.
    pub fn get_opaque(&self, key: &str) -> Option<Arc<dyn Any + Send + Sync>> {
        match self.values.get(key) {
            Some(ParamValue::Opaque(v)) => Some(v.clone()),
            _ => None,
        }
    }

    /// Boolean parameter: "yes", "true", "on" and "1" are true, anything else false.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "yes" | "true" | "on" | "1"
            )
        })
    }

    /// Unsigned integer parameter; unparsable values fall back to the built-in default.
    pub fn usize_or_default(&self, key: &str) -> Option<usize> {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .or_else(|| default_for(key).and_then(|d| d.parse().ok()))
    }

    /// Parse a `WIDTHxHEIGHT` size such as `BITMAPSIZE=640x480`.
    pub fn size(&self, key: &str) -> Option<(u32, u32)> {
        let parse = |v: &str| -> Option<(u32, u32)> {
            let (w, h) = v.trim().split_once(['x', 'X'])?;
            let w: u32 = w.trim().parse().ok()?;
            let h: u32 = h.trim().parse().ok()?;
            (w > 0 && h > 0).then_some((w, h))
        };
        self.get(key)
            .and_then(|v| parse(&v))
            .or_else(|| default_for(key).and_then(parse))
    }
}

fn default_for(key: &str) -> Option<&'static str> {
    KNOWN_PARAMS
        .iter()
        .find(|(k, _)| *k == key)
        .and_then(|(_, d)| *d)
}

#[cfg(test)]
#[path = "../tests/unit/params.rs"]
mod tests;
