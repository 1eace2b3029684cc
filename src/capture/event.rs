/// Input delivered by the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Primary button pressed at `(x, y)` at time `t` (milliseconds).
    PointerDown { x: i32, y: i32, t: i64 },
    /// Pointer moved to `(x, y)` at time `t`.
    PointerMove { x: i32, y: i32, t: i64 },
    /// Primary button released.
    PointerUp,
    /// Throw away the current drawing (secondary button).
    CancelRequested,
    /// Send the current drawing to the classifier (confirm key).
    CommitRequested,
    /// The surface is going away.
    CloseRequested,
}

impl InputEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp => "pointer_up",
            Self::CancelRequested => "cancel_requested",
            Self::CommitRequested => "commit_requested",
            Self::CloseRequested => "close_requested",
        }
    }
}
