//! Stroke model for captured drawings.
//!
//! # Core Concepts
//!
//! - [`Point`]: A single captured pen position with the time it was recorded.
//! - [`Stroke`]: Every point drawn between one button press and its release.
//!   A lone tap is a stroke with a single point.
//! - [`Drawing`]: All strokes on the canvas plus the exact bounding box of
//!   their points.
//!
//! A [`Drawing`] exclusively owns its strokes and a [`Stroke`] exclusively owns
//! its points. Dropping the drawing releases everything captured so far.

mod drawing;
mod point;
mod stroke;

pub use drawing::*;
pub use point::*;
pub use stroke::*;

use std::collections::TryReserveError;

use thiserror::Error;

/// Stroke model errors.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("No open stroke to append to")]
    NoOpenStroke,

    #[error("Allocation failed while growing the drawing: {0}")]
    AllocationFailure(#[from] TryReserveError),
}
