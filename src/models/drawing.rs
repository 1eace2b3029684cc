use crate::geometry::Span;

use super::{ModelError, Point, Stroke};

/// Initial stroke capacity of a fresh drawing.
const INITIAL_DRAWING_CAPACITY: usize = 3;

/// Axis-aligned box around every point of a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// The box around a single position.
    pub fn around(x: i32, y: i32) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    pub fn from_spans(x: Span, y: Span) -> Self {
        Self {
            min_x: x.min,
            max_x: x.max,
            min_y: y.min,
            max_y: y.max,
        }
    }

    /// Grows the box just enough to contain `(x, y)`.
    pub fn extend(&mut self, x: i32, y: i32) {
        if x < self.min_x {
            self.min_x = x;
        }
        if x > self.max_x {
            self.max_x = x;
        }
        if y < self.min_y {
            self.min_y = y;
        }
        if y > self.max_y {
            self.max_y = y;
        }
    }

    pub fn x_span(&self) -> Span {
        Span::new(self.min_x, self.max_x)
    }

    pub fn y_span(&self) -> Span {
        Span::new(self.min_y, self.max_y)
    }
}

/// Every stroke drawn on the canvas since the last reset.
///
/// The bounding box is `None` until the first point arrives and from then on
/// is the exact min/max over all contained points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drawing {
    strokes: Vec<Stroke>,
    bounds: Option<BoundingBox>,
}

impl Drawing {
    /// Create an empty drawing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Append a new, empty stroke and return its index.
    ///
    /// Subsequent [`Drawing::append_point`] calls extend this stroke.
    pub fn begin_stroke(&mut self) -> Result<usize, ModelError> {
        if self.strokes.capacity() == 0 {
            self.strokes.try_reserve(INITIAL_DRAWING_CAPACITY)?;
        } else if self.strokes.len() == self.strokes.capacity() {
            self.strokes.try_reserve(self.strokes.len())?;
        }
        self.strokes.push(Stroke::new()?);
        Ok(self.strokes.len() - 1)
    }

    /// Append a point to the most recently begun stroke and widen the bounding
    /// box if the point lies outside it.
    ///
    /// Fails with [`ModelError::NoOpenStroke`] when no stroke has been begun.
    pub fn append_point(&mut self, point: Point) -> Result<Point, ModelError> {
        let stroke = self.strokes.last_mut().ok_or(ModelError::NoOpenStroke)?;
        let point = stroke.push(point)?;
        match self.bounds.as_mut() {
            Some(bounds) => bounds.extend(point.x, point.y),
            None => self.bounds = Some(BoundingBox::around(point.x, point.y)),
        }
        Ok(point)
    }

    pub(crate) fn points_mut(&mut self) -> impl Iterator<Item = &mut Point> {
        self.strokes
            .iter_mut()
            .flat_map(|stroke| stroke.points_mut().iter_mut())
    }

    pub(crate) fn set_bounds(&mut self, bounds: BoundingBox) {
        self.bounds = Some(bounds);
    }
}
