/*!
 * Pipe Types
 * Modes, readiness mask, errors, and stats for the pipe
 */

use crate::core::sync::WaitError;
use crate::core::types::Size;
use serde::{Deserialize, Serialize};
use std::ops::BitOr;
use thiserror::Error;

/// Transfer direction, fixed at open time for the lifetime of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Read,
    Write,
}

/// Pipe error types
///
/// `WouldBlock` and end-of-stream (the `Ok(0)` read result) are expected,
/// recoverable outcomes; nothing here is retried internally.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PipeError {
    #[error("Operation would block")]
    WouldBlock,

    #[error("Wait interrupted by cancellation")]
    Interrupted,

    #[error("Handle is not open for reading")]
    NotReadable,

    #[error("Handle is not open for writing")]
    NotWritable,
}

impl From<WaitError> for PipeError {
    fn from(err: WaitError) -> Self {
        match err {
            WaitError::Interrupted => PipeError::Interrupted,
        }
    }
}

/// Readiness bitmask returned by `poll`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Readiness(u8);

impl Readiness {
    /// At least one byte is buffered.
    pub const READABLE: Readiness = Readiness(0b001);
    /// At least one byte of free space remains.
    pub const WRITABLE: Readiness = Readiness(0b010);
    /// Reader-side end-of-stream: empty buffer and no writer left.
    pub const HANGUP: Readiness = Readiness(0b100);

    pub const fn empty() -> Self {
        Readiness(0)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: Readiness) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn readable(self) -> bool {
        self.contains(Self::READABLE)
    }

    #[inline]
    pub const fn writable(self) -> bool {
        self.contains(Self::WRITABLE)
    }

    #[inline]
    pub const fn hangup(self) -> bool {
        self.contains(Self::HANGUP)
    }

    #[inline]
    pub(crate) fn insert(&mut self, other: Readiness) {
        self.0 |= other.0;
    }
}

impl BitOr for Readiness {
    type Output = Readiness;

    fn bitor(self, rhs: Readiness) -> Readiness {
        Readiness(self.0 | rhs.0)
    }
}

/// Pipe statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PipeStats {
    pub capacity: Size,
    pub buffered: Size,
    pub readers: Size,
    pub writers: Size,
}
