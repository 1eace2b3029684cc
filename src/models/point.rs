use serde::{Deserialize, Serialize};

/// A captured pen position.
///
/// `t` is the capture time in milliseconds. It orders points in time and is
/// carried through to the classifier, but never takes part in geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    pub t: i64,
}

impl Point {
    pub fn new(x: i32, y: i32, t: i64) -> Self {
        Self { x, y, t }
    }

    /// Points with a negative coordinate lie outside the canvas.
    pub fn is_on_canvas(&self) -> bool {
        self.x >= 0 && self.y >= 0
    }
}
