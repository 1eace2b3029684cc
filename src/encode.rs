//! Serializes a drawing into the form body the classifier accepts.
//!
//! The body is a single `application/x-www-form-urlencoded` field named
//! `strokes` whose decoded value is a JSON array of strokes, each an array of
//! `{"x":<int>,"y":<int>,"t":<int>}` objects:
//!
//! ```text
//! strokes=%5B%5B%7B%22x%22%3A1%2C%22y%22%3A2%2C%22t%22%3A100%7D%5D%5D
//! ```
//!
//! Past the field name only digits, `-` and the keys `x`, `y`, `t` appear unescaped, so the
//! writer emits the escaped punctuation directly instead of escaping a JSON
//! document after the fact.

use std::collections::TryReserveError;
use std::fmt;

use thiserror::Error;

use crate::models::{Drawing, Point};

const FIELD: &str = "strokes=";
const COMMA: &str = "%2C";
const COLON: &str = "%3A";
const QUOTE: &str = "%22";
const OPEN_BRACKET: &str = "%5B";
const CLOSE_BRACKET: &str = "%5D";
const OPEN_BRACE: &str = "%7B";
const CLOSE_BRACE: &str = "%7D";

/// Approximate encoded size of one point with three-digit coordinates and a
/// 13-digit millisecond timestamp.
const POINT_SIZE_HINT: usize = 63;

/// Longest decimal rendering of an `i64`, sign included.
const MAX_NUMBER_WIDTH: usize = 20;

/// Encoder errors.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Allocation failed while encoding: {0}")]
    AllocationFailure(#[from] TryReserveError),
}

/// An encoded `strokes=` form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(String);

impl Payload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The payload bytes followed by a single NUL terminator.
    pub fn into_bytes_with_nul(self) -> Result<Vec<u8>, EncodeError> {
        let mut bytes = self.0.into_bytes();
        bytes.try_reserve_exact(1)?;
        bytes.push(0);
        Ok(bytes)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Payload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Payload> for String {
    fn from(payload: Payload) -> Self {
        payload.0
    }
}

/// Appends encoded tokens to a growable buffer.
///
/// Every append reserves its space fallibly first, so running out of memory
/// surfaces as [`EncodeError::AllocationFailure`] rather than a truncated body.
#[derive(Debug, Default)]
pub struct PayloadWriter {
    buf: String,
    /// Whether the innermost open list already holds an element.
    needs_separator: Vec<bool>,
}

impl PayloadWriter {
    /// Start a body with the `strokes=` field name.
    pub fn new() -> Result<Self, EncodeError> {
        let mut writer = Self::default();
        writer.push(FIELD)?;
        Ok(writer)
    }

    /// Reserve room for roughly `points` more encoded points.
    pub fn reserve_points(&mut self, points: usize) -> Result<(), EncodeError> {
        self.buf.try_reserve(points.saturating_mul(POINT_SIZE_HINT))?;
        Ok(())
    }

    pub fn open_list(&mut self) -> Result<(), EncodeError> {
        self.separate()?;
        self.push(OPEN_BRACKET)?;
        self.needs_separator.push(false);
        Ok(())
    }

    pub fn close_list(&mut self) -> Result<(), EncodeError> {
        self.needs_separator.pop();
        self.push(CLOSE_BRACKET)
    }

    /// Append one `{"x":..,"y":..,"t":..}` object.
    pub fn point(&mut self, point: &Point) -> Result<(), EncodeError> {
        self.separate()?;
        self.push(OPEN_BRACE)?;
        self.field("x", i64::from(point.x))?;
        self.push(COMMA)?;
        self.field("y", i64::from(point.y))?;
        self.push(COMMA)?;
        self.field("t", point.t)?;
        self.push(CLOSE_BRACE)
    }

    pub fn finish(self) -> Payload {
        Payload(self.buf)
    }

    fn field(&mut self, name: &str, value: i64) -> Result<(), EncodeError> {
        self.push(QUOTE)?;
        self.push(name)?;
        self.push(QUOTE)?;
        self.push(COLON)?;
        self.number(value)
    }

    /// Writes a comma if the enclosing list already has an element.
    fn separate(&mut self) -> Result<(), EncodeError> {
        if let Some(needs) = self.needs_separator.last_mut() {
            if *needs {
                self.buf.try_reserve(COMMA.len())?;
                self.buf.push_str(COMMA);
            }
            *needs = true;
        }
        Ok(())
    }

    fn push(&mut self, token: &str) -> Result<(), EncodeError> {
        self.buf.try_reserve(token.len())?;
        self.buf.push_str(token);
        Ok(())
    }

    /// Renders `value` in decimal through a stack buffer. The reservation
    /// covers the widest `i64`.
    fn number(&mut self, value: i64) -> Result<(), EncodeError> {
        self.buf.try_reserve(MAX_NUMBER_WIDTH)?;
        let mut digits = [0u8; MAX_NUMBER_WIDTH];
        let mut start = digits.len();
        let mut rest = value.unsigned_abs();
        loop {
            start -= 1;
            digits[start] = b'0' + (rest % 10) as u8;
            rest /= 10;
            if rest == 0 {
                break;
            }
        }
        if value < 0 {
            start -= 1;
            digits[start] = b'-';
        }
        self.buf.extend(digits[start..].iter().map(|&b| char::from(b)));
        Ok(())
    }
}

/// Encode every stroke of `drawing`, in order, into a `strokes=` body.
///
/// An empty drawing encodes as `strokes=%5B%5D`.
pub fn encode(drawing: &Drawing) -> Result<Payload, EncodeError> {
    let mut writer = PayloadWriter::new()?;
    writer.open_list()?;
    for stroke in drawing.strokes() {
        writer.reserve_points(stroke.len())?;
        writer.open_list()?;
        for point in stroke.points() {
            writer.point(point)?;
        }
        writer.close_list()?;
    }
    writer.close_list()?;
    Ok(writer.finish())
}
