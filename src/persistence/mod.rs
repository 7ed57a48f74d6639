//! Reward persistence seam
//!
//! Collections are awarded server-side through an `AwardSink`. Calls are
//! fire-and-forget: the session total is already updated when a sink is
//! invoked, and a failing sink only produces a log line.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of an award call: petals earned and where on screen (0..1 normalized)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AwardRequest {
    pub amount: u32,
    pub x: f32,
    pub y: f32,
}

/// Why an award could not be delivered
#[derive(Debug, Error)]
pub enum AwardError {
    #[error("could not encode award request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("could not write award request: {0}")]
    Io(#[from] std::io::Error),

    #[error("award endpoint answered with status {0}")]
    Status(u16),

    #[error("award transport failed: {0}")]
    Transport(String),
}

/// Destination for award requests
///
/// Implementations must not block: anything slow is started here and left
/// to finish (or fail) on its own.
pub trait AwardSink {
    fn award(&mut self, request: AwardRequest) -> Result<(), AwardError>;
}

/// Discards awards (offline pages, previews)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AwardSink for NullSink {
    fn award(&mut self, _request: AwardRequest) -> Result<(), AwardError> {
        Ok(())
    }
}

/// Writes one JSON object per award to a writer
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> AwardSink for JsonLinesSink<W> {
    fn award(&mut self, request: AwardRequest) -> Result<(), AwardError> {
        serde_json::to_writer(&mut self.writer, &request)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Keeps every award attempt in a shared buffer
///
/// Clones share the buffer, so a host can hand one clone to the session and
/// read the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    requests: Rc<RefCell<Vec<AwardRequest>>>,
    fail_status: Option<u16>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records attempts but reports every one as rejected with `status`
    pub fn failing(status: u16) -> Self {
        Self {
            requests: Rc::default(),
            fail_status: Some(status),
        }
    }

    pub fn requests(&self) -> Vec<AwardRequest> {
        self.requests.borrow().clone()
    }

    pub fn total_awarded(&self) -> u64 {
        self.requests.borrow().iter().map(|r| r.amount as u64).sum()
    }
}

impl AwardSink for RecordingSink {
    fn award(&mut self, request: AwardRequest) -> Result<(), AwardError> {
        self.requests.borrow_mut().push(request);
        match self.fail_status {
            Some(status) => Err(AwardError::Status(status)),
            None => Ok(()),
        }
    }
}
