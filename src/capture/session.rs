use thiserror::Error;
use uuid::Uuid;

use super::{DisplaySurface, InputEvent};
use crate::classifier::ClassifierClient;
use crate::encode::{encode, EncodeError};
use crate::models::{Drawing, ModelError, Point};
use crate::normalize::{normalize, Canvas};

/// Errors raised while handling an event.
///
/// The session has already been reset to an empty, idle drawing by the time
/// one of these reaches the caller.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to record point: {0}")]
    Model(#[from] ModelError),

    #[error("Failed to encode drawing: {0}")]
    Encode(#[from] EncodeError),
}

/// Where the pen is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// No button held.
    Idle,
    /// A button is held. `last` is the most recent accepted position, `None`
    /// until the first on-canvas point of this press arrives.
    StrokeOpen { last: Option<(i32, i32)> },
}

/// Whether the session wants more events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

/// Drives one capture session: owns the drawing and talks to both collaborators.
pub struct Session<S, C> {
    id: Uuid,
    surface: S,
    classifier: C,
    canvas: Canvas,
    drawing: Drawing,
    state: CaptureState,
    commits: usize,
}

impl<S: DisplaySurface, C: ClassifierClient> Session<S, C> {
    pub fn new(surface: S, classifier: C, canvas: Canvas) -> Self {
        Self {
            id: Uuid::new_v4(),
            surface,
            classifier,
            canvas,
            drawing: Drawing::new(),
            state: CaptureState::Idle,
            commits: 0,
        }
    }

    /// Identifies the current drawing in log records; changes on every reset.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Number of drawings handed to the classifier so far.
    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn into_parts(self) -> (S, C) {
        (self.surface, self.classifier)
    }

    /// Handle every event in order until one closes the session.
    ///
    /// Errors are logged and the session carries on with an empty drawing.
    pub fn run(&mut self, events: impl IntoIterator<Item = InputEvent>) -> Flow {
        for event in events {
            if let Ok(Flow::Close) = self.handle(event) {
                return Flow::Close;
            }
        }
        Flow::Continue
    }

    /// Handle a single event.
    pub fn handle(&mut self, event: InputEvent) -> Result<Flow, CaptureError> {
        let result = self.dispatch(event);
        if let Err(e) = &result {
            tracing::error!(session = %self.id, event = event.kind(), "Discarding drawing: {}", e);
            self.reset();
        }
        result
    }

    fn dispatch(&mut self, event: InputEvent) -> Result<Flow, CaptureError> {
        match event {
            InputEvent::PointerDown { x, y, t } => {
                if let CaptureState::StrokeOpen { .. } = self.state {
                    tracing::debug!(session = %self.id, "pointer down without release");
                }
                self.state = CaptureState::StrokeOpen { last: None };
                self.extend(Point::new(x, y, t))?;
            }
            InputEvent::PointerMove { x, y, t } => match self.state {
                CaptureState::Idle => {}
                CaptureState::StrokeOpen { .. } => self.extend(Point::new(x, y, t))?,
            },
            InputEvent::PointerUp => {
                self.state = CaptureState::Idle;
            }
            InputEvent::CancelRequested => {
                tracing::debug!(
                    session = %self.id,
                    strokes = self.drawing.stroke_count(),
                    "drawing cancelled"
                );
                self.reset();
            }
            InputEvent::CommitRequested => self.commit()?,
            InputEvent::CloseRequested => {
                self.drawing = Drawing::new();
                self.state = CaptureState::Idle;
                return Ok(Flow::Close);
            }
        }
        Ok(Flow::Continue)
    }

    /// Record `point` in the open stroke, beginning the stroke if this is the
    /// first accepted point of the press.
    fn extend(&mut self, point: Point) -> Result<(), CaptureError> {
        let CaptureState::StrokeOpen { last } = self.state else {
            return Ok(());
        };
        if !point.is_on_canvas() {
            tracing::trace!(x = point.x, y = point.y, "dropping point outside canvas");
            return Ok(());
        }

        match last {
            None => {
                let index = self.drawing.begin_stroke()?;
                self.drawing.append_point(point)?;
                self.surface.draw_point(point.x, point.y);
                tracing::debug!(session = %self.id, stroke = index, "stroke started");
            }
            Some((last_x, last_y)) => {
                self.drawing.append_point(point)?;
                self.surface.draw_line_segment(last_x, last_y, point.x, point.y);
            }
        }

        self.state = CaptureState::StrokeOpen {
            last: Some((point.x, point.y)),
        };
        Ok(())
    }

    fn commit(&mut self) -> Result<(), CaptureError> {
        let mut drawing = std::mem::take(&mut self.drawing);
        normalize(&mut drawing, &self.canvas);
        let payload = encode(&drawing)?;

        let session = self.id;
        self.reset();

        tracing::info!(
            %session,
            strokes = drawing.stroke_count(),
            points = drawing.point_count(),
            bytes = payload.len(),
            "submitting drawing"
        );

        if let Err(e) = self.classifier.submit(payload) {
            tracing::warn!(%session, "Classifier submission failed: {}", e);
        }
        self.commits += 1;
        Ok(())
    }

    /// Start over with an empty drawing and a blank surface.
    fn reset(&mut self) {
        self.drawing = Drawing::new();
        self.state = CaptureState::Idle;
        self.id = Uuid::new_v4();
        self.surface.clear_surface();
    }
}
