//! Geometry and inline style values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Inline style declarations keyed by CSS property name (`z-index`, `opacity`, ...).
pub type StyleMap = BTreeMap<String, String>;

/// Build a [`StyleMap`] from property/value pairs.
pub fn style_map<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> StyleMap {
    pairs
        .into_iter()
        .map(|(property, value)| (property.to_string(), value.to_string()))
        .collect()
}

/// Viewport-relative rectangle, as returned by `getBoundingClientRect()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// A 2D offset in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub left: f64,
    pub top: f64,
}

impl Offset {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}
