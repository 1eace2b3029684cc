//! Capture freehand strokes, normalize them onto a fixed canvas and encode them
//! for a handwriting classifier.
//!
//! Input flows through the crate in one direction:
//!
//! 1. [`capture::Session`] turns pointer events into a [`models::Drawing`].
//! 2. On commit, [`normalize::normalize`] stretches the drawing onto the
//!    classifier's canvas.
//! 3. [`encode::encode`] turns it into a `strokes=` form body.
//! 4. A [`classifier::ClassifierClient`] takes the body; the session starts
//!    over without waiting for the answer.

pub mod capture;
pub mod classifier;
pub mod config;
pub mod encode;
pub mod geometry;
pub mod models;
pub mod normalize;
pub mod replay;
