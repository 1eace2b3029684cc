//! Scalar range helpers used by the normalizer.

/// A closed integer interval `[min, max]` on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub min: i32,
    pub max: i32,
}

impl Span {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Distance between the two ends.
    pub fn extent(&self) -> i64 {
        i64::from(self.max) - i64::from(self.min)
    }

    /// A span whose ends coincide cannot be used as a remap source.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Integer midpoint, truncated toward `min`.
    pub fn midpoint(&self) -> i32 {
        let mid = i64::from(self.min) + self.extent() / 2;
        mid as i32
    }
}

/// Linearly maps `value` from `from` onto `to`.
///
/// Computed as `to.min + (value - from.min) * (to.max - to.min) / (from.max - from.min)`
/// in 64-bit integers, truncating the quotient toward zero, so `from.min` lands
/// exactly on `to.min` and `from.max` exactly on `to.max`.
///
/// Returns `None` when `from` is degenerate.
pub fn remap(value: i32, from: Span, to: Span) -> Option<i32> {
    if from.is_degenerate() {
        return None;
    }
    let offset = i64::from(value) - i64::from(from.min);
    let scaled = offset * to.extent() / from.extent();
    Some((i64::from(to.min) + scaled) as i32)
}
