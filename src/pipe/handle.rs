/*!
 * Pipe Handle
 * An open session on a pipe with fixed mode and blocking behavior
 */

use super::pipe::PipeShared;
use super::types::{Mode, PipeError, Readiness};
use crate::core::types::Size;
use std::fmt;
use std::sync::Arc;

/// Open session on a pipe.
///
/// Mode and blocking flag are fixed for the handle's lifetime. Dropping the
/// handle closes it: the matching counter is decremented and both gates are
/// notified so parked peers re-evaluate end-of-stream and free space.
pub struct PipeHandle {
    shared: Arc<PipeShared>,
    mode: Mode,
    blocking: bool,
}

impl PipeHandle {
    pub(super) fn new(shared: Arc<PipeShared>, mode: Mode, blocking: bool) -> Self {
        Self {
            shared,
            mode,
            blocking,
        }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    /// Read up to `dst.len()` bytes from the pipe.
    ///
    /// Returns `Ok(0)` for end-of-stream (empty buffer, no writer left), a
    /// defined success rather than an error. While the buffer is empty with
    /// a writer attached, a blocking handle parks on the readable gate and a
    /// non-blocking one fails with `WouldBlock`. An interrupted wait
    /// propagates as `Interrupted`, never retried here.
    pub fn read(&self, dst: &mut [u8]) -> Result<Size, PipeError> {
        if self.mode != Mode::Read {
            return Err(PipeError::NotReadable);
        }

        let mut state = self.shared.state.lock();
        if state.awaiting_data() {
            if !self.blocking {
                return Err(PipeError::WouldBlock);
            }
            self.shared
                .readable
                .wait_until(&mut state, &self.shared.cancel, |s| !s.awaiting_data())?;
        }
        if state.end_of_stream() {
            return Ok(0);
        }

        let count = state.ring.read_chunk(dst);
        drop(state);
        self.shared.writable.notify_all();
        Ok(count)
    }

    /// Write up to `src.len()` bytes into the pipe.
    ///
    /// While the buffer is full a blocking handle parks on the writable gate
    /// and a non-blocking one fails with `WouldBlock`, in both cases
    /// regardless of reader presence; there is no broken-pipe short-circuit
    /// for writers. Returns the count actually copied, which falls short of
    /// `src.len()` when free space runs out.
    pub fn write(&self, src: &[u8]) -> Result<Size, PipeError> {
        if self.mode != Mode::Write {
            return Err(PipeError::NotWritable);
        }

        let mut state = self.shared.state.lock();
        if state.ring.is_full() {
            if !self.blocking {
                return Err(PipeError::WouldBlock);
            }
            self.shared
                .writable
                .wait_until(&mut state, &self.shared.cancel, |s| !s.ring.is_full())?;
        }

        let count = state.ring.write_chunk(src);
        drop(state);
        self.shared.readable.notify_all();
        Ok(count)
    }

    /// Compute readiness under the mutex without blocking and without
    /// registering any subscription.
    pub fn poll(&self) -> Readiness {
        let state = self.shared.state.lock();
        let mut mask = Readiness::empty();
        if !state.ring.is_empty() {
            mask.insert(Readiness::READABLE);
        }
        if !state.ring.is_full() {
            mask.insert(Readiness::WRITABLE);
        }
        if self.mode == Mode::Read && state.end_of_stream() {
            mask.insert(Readiness::HANGUP);
        }
        mask
    }

    /// Close the handle explicitly; equivalent to dropping it.
    pub fn close(self) {}
}

impl Drop for PipeHandle {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        match self.mode {
            Mode::Read => state.readers = state.readers.saturating_sub(1),
            Mode::Write => state.writers = state.writers.saturating_sub(1),
        }
        drop(state);

        // Unconditional on both gates: the last writer leaving turns reader
        // waits into end-of-stream, and parked peers re-check either way.
        self.shared.readable.notify_all();
        self.shared.writable.notify_all();
    }
}

impl fmt::Debug for PipeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipeHandle")
            .field("mode", &self.mode)
            .field("blocking", &self.blocking)
            .finish()
    }
}
