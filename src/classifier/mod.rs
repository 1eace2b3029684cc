//! Collaborators that receive finished payloads.
//!
//! The capture session hands every committed drawing to a [`ClassifierClient`]
//! and moves on without waiting for an answer. A failed hand-off is logged and
//! otherwise ignored.

mod http;

pub use http::*;

use std::io::Write;

use thiserror::Error;

use crate::encode::Payload;

/// Classifier client errors.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("No tokio runtime available: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),

    #[error("Submission task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Failed to write payload: {0}")]
    Io(#[from] std::io::Error),
}

/// Receives encoded drawings from a capture session.
pub trait ClassifierClient {
    /// Hand off one payload. Implementations must not block on the answer.
    fn submit(&mut self, payload: Payload) -> Result<(), ClassifierError>;
}

/// Writes each payload on its own line instead of sending it anywhere.
#[derive(Debug)]
pub struct EchoClassifier<W> {
    out: W,
    submitted: usize,
}

impl<W: Write> EchoClassifier<W> {
    pub fn new(out: W) -> Self {
        Self { out, submitted: 0 }
    }

    /// Number of payloads written so far.
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ClassifierClient for EchoClassifier<W> {
    fn submit(&mut self, payload: Payload) -> Result<(), ClassifierError> {
        writeln!(self.out, "{}", payload)?;
        self.out.flush()?;
        self.submitted += 1;
        Ok(())
    }
}
