//! Remaps a drawing from the space it was captured in onto the fixed canvas
//! the classifier expects.
//!
//! Each axis is handled independently: the observed extent of the drawing is
//! stretched onto `[dim * padding, dim * (1 - padding)]`, leaving an equal
//! margin on both sides. Aspect ratio is not preserved.
//!
//! An axis on which every point shares the same coordinate (a dot, or a
//! perfectly straight horizontal or vertical line) has no extent to stretch.
//! Those points are placed on the midpoint of the target range instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{remap, Span};
use crate::models::{BoundingBox, Drawing};

/// Canvas size the classifier was trained on.
pub const DEFAULT_CANVAS_SIZE: u32 = 280;

/// Fraction of the canvas left blank on each side.
pub const DEFAULT_PADDING: f64 = 0.1;

/// Invalid canvas configuration.
#[derive(Debug, Error, PartialEq)]
pub enum CanvasError {
    #[error("Canvas dimensions must be positive, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },

    #[error("Canvas dimensions must fit in i32, got {width}x{height}")]
    TooLarge { width: u32, height: u32 },

    #[error("Padding must be in [0, 0.5), got {0}")]
    Padding(f64),
}

/// The target space drawings are normalized into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    /// Margin on each side as a fraction of the dimension.
    pub padding: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_SIZE,
            height: DEFAULT_CANVAS_SIZE,
            padding: DEFAULT_PADDING,
        }
    }
}

impl Canvas {
    pub fn new(width: u32, height: u32, padding: f64) -> Result<Self, CanvasError> {
        let canvas = Self {
            width,
            height,
            padding,
        };
        canvas.validate()?;
        Ok(canvas)
    }

    pub fn validate(&self) -> Result<(), CanvasError> {
        if self.width == 0 || self.height == 0 {
            return Err(CanvasError::EmptyCanvas {
                width: self.width,
                height: self.height,
            });
        }
        if i32::try_from(self.width).is_err() || i32::try_from(self.height).is_err() {
            return Err(CanvasError::TooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if !(0.0..0.5).contains(&self.padding) {
            return Err(CanvasError::Padding(self.padding));
        }
        Ok(())
    }

    /// Horizontal target range, `[width * padding, width * (1 - padding)]`.
    pub fn x_target(&self) -> Span {
        target_span(self.width, self.padding)
    }

    /// Vertical target range, `[height * padding, height * (1 - padding)]`.
    pub fn y_target(&self) -> Span {
        target_span(self.height, self.padding)
    }
}

fn target_span(dimension: u32, padding: f64) -> Span {
    let dimension = f64::from(dimension);
    Span::new(
        (dimension * padding).round() as i32,
        (dimension * (1.0 - padding)).round() as i32,
    )
}

/// Rewrite every point of `drawing` in place so its bounding box fills the
/// padded target range of `canvas`.
///
/// Afterwards the drawing's bounding box is exactly the target range on each
/// axis, or `{mid, mid}` for an axis that had no extent. Empty drawings are
/// left untouched.
pub fn normalize(drawing: &mut Drawing, canvas: &Canvas) {
    let Some(observed) = drawing.bounds() else {
        return;
    };

    let x = AxisMap::new(observed.x_span(), canvas.x_target());
    let y = AxisMap::new(observed.y_span(), canvas.y_target());

    for point in drawing.points_mut() {
        point.x = x.apply(point.x);
        point.y = y.apply(point.y);
    }

    drawing.set_bounds(BoundingBox::from_spans(x.result(), y.result()));

    tracing::debug!(?observed, normalized = ?drawing.bounds(), "normalized drawing");
}

struct AxisMap {
    from: Span,
    to: Span,
}

impl AxisMap {
    fn new(from: Span, to: Span) -> Self {
        Self { from, to }
    }

    fn apply(&self, value: i32) -> i32 {
        remap(value, self.from, self.to).unwrap_or_else(|| self.to.midpoint())
    }

    fn result(&self) -> Span {
        if self.from.is_degenerate() {
            let mid = self.to.midpoint();
            Span::new(mid, mid)
        } else {
            self.to
        }
    }
}
