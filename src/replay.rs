//! Headless stand-in for a window: events come from a script and draw calls go
//! to the log.
//!
//! Scripts are JSON Lines, one event per line:
//!
//! ```text
//! # a short diagonal stroke, then submit
//! {"kind": "pointer_down", "x": 10, "y": 10, "t": 1000}
//! {"kind": "pointer_move", "x": 20, "y": 20, "t": 1016}
//! {"kind": "pointer_up"}
//! {"kind": "commit_requested"}
//! ```
//!
//! `t` is optional and defaults to the wall-clock time the line was read.

use std::io::BufRead;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::capture::{DisplaySurface, InputEvent};

/// One line of an event script.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptEvent {
    PointerDown {
        x: i32,
        y: i32,
        #[serde(default)]
        t: Option<i64>,
    },
    PointerMove {
        x: i32,
        y: i32,
        #[serde(default)]
        t: Option<i64>,
    },
    PointerUp,
    CancelRequested,
    CommitRequested,
    CloseRequested,
}

impl ScriptEvent {
    /// Convert to an input event, stamping pointer events that carry no time
    /// with `now_ms()`.
    pub fn into_input(self, now_ms: impl Fn() -> i64) -> InputEvent {
        match self {
            Self::PointerDown { x, y, t } => InputEvent::PointerDown {
                x,
                y,
                t: t.unwrap_or_else(&now_ms),
            },
            Self::PointerMove { x, y, t } => InputEvent::PointerMove {
                x,
                y,
                t: t.unwrap_or_else(&now_ms),
            },
            Self::PointerUp => InputEvent::PointerUp,
            Self::CancelRequested => InputEvent::CancelRequested,
            Self::CommitRequested => InputEvent::CommitRequested,
            Self::CloseRequested => InputEvent::CloseRequested,
        }
    }
}

/// Milliseconds since the Unix epoch.
pub fn wall_clock_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Read every event of a script. Blank lines and lines starting with `#` are skipped.
pub fn read_script(reader: impl BufRead) -> Result<Vec<InputEvent>> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_no))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: ScriptEvent = serde_json::from_str(line)
            .with_context(|| format!("Invalid event on line {}", line_no))?;
        events.push(event.into_input(wall_clock_ms));
    }
    Ok(events)
}

/// Logs every draw primitive and keeps count.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TracingSurface {
    pub points: usize,
    pub segments: usize,
    pub clears: usize,
}

impl TracingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySurface for TracingSurface {
    fn draw_point(&mut self, x: i32, y: i32) {
        tracing::trace!(x, y, "draw point");
        self.points += 1;
    }

    fn draw_line_segment(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        tracing::trace!(x1, y1, x2, y2, "draw line");
        self.segments += 1;
    }

    fn clear_surface(&mut self) {
        tracing::trace!("clear surface");
        self.clears += 1;
    }
}
