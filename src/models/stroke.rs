use super::{ModelError, Point};

/// Initial point capacity of a fresh stroke.
const INITIAL_STROKE_CAPACITY: usize = 100;

/// One continuous pen-down interval, in drawing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    pub(crate) fn new() -> Result<Self, ModelError> {
        let mut points = Vec::new();
        points.try_reserve(INITIAL_STROKE_CAPACITY)?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Appends a point, growing geometrically when full.
    ///
    /// A timestamp earlier than the previous point's is raised to match it so
    /// the stroke stays ordered in time.
    pub(crate) fn push(&mut self, mut point: Point) -> Result<Point, ModelError> {
        if let Some(prev) = self.points.last() {
            if point.t < prev.t {
                tracing::debug!(t = point.t, prev = prev.t, "clamping out-of-order timestamp");
                point.t = prev.t;
            }
        }
        if self.points.len() == self.points.capacity() {
            self.points.try_reserve(self.points.len().max(1))?;
        }
        self.points.push(point);
        Ok(point)
    }

    pub(crate) fn points_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }
}
