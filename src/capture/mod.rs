//! Turns raw pointer input into strokes.
//!
//! A [`Session`] owns the current [`Drawing`](crate::models::Drawing), the
//! [`DisplaySurface`] events come from, and the
//! [`ClassifierClient`](crate::classifier::ClassifierClient) committed drawings
//! go to. Events are handled one at a time, in arrival order:
//!
//! - `PointerDown` starts a stroke and `PointerUp` ends it.
//! - `PointerMove` extends the open stroke and is ignored while the pen is up.
//! - `CancelRequested` throws the drawing away and clears the surface.
//! - `CommitRequested` normalizes, encodes and submits the drawing, then
//!   starts over with an empty one.
//! - `CloseRequested` throws the drawing away and ends the session.
//!
//! Positions with a negative coordinate are outside the canvas and are dropped
//! without ending the stroke they arrive in.

mod event;
mod session;
mod surface;

pub use event::*;
pub use session::*;
pub use surface::*;
