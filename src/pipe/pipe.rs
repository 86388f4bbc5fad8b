/*!
 * Pipe
 * Bounded FIFO byte pipe composing one ring, one mutex, and two wait gates
 */

use super::handle::PipeHandle;
use super::ring::RingBuffer;
use super::types::{Mode, PipeError, PipeStats};
use crate::core::limits::{DEFAULT_PIPE_CAPACITY, MAX_PIPE_CAPACITY, MIN_PIPE_CAPACITY};
use crate::core::sync::{CancelToken, WaitGate};
use crate::core::types::Size;
use log::info;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Mutable pipe state; every field is guarded by the single pipe mutex.
pub(super) struct PipeState {
    pub(super) ring: RingBuffer,
    pub(super) readers: Size,
    pub(super) writers: Size,
}

impl PipeState {
    /// Empty with a writer still attached: a reader waits rather than
    /// observing end-of-stream.
    pub(super) fn awaiting_data(&self) -> bool {
        self.ring.is_empty() && self.writers > 0
    }

    /// Empty with no writer left: the defined zero-byte read result.
    pub(super) fn end_of_stream(&self) -> bool {
        self.ring.is_empty() && self.writers == 0
    }
}

/// Shared interior of a pipe and all of its handles.
///
/// Exactly one lock spans the ring and both counters; it is held for the
/// whole of every state inspection or mutation and released only while a
/// thread is parked inside a gate. Copies into and out of the ring happen
/// with the lock held, so no reference into the buffer ever escapes the
/// critical section.
pub(super) struct PipeShared {
    pub(super) state: Mutex<PipeState>,
    pub(super) readable: WaitGate,
    pub(super) writable: WaitGate,
    pub(super) cancel: CancelToken,
}

/// Bounded FIFO byte pipe.
///
/// Created once at attach time with a fixed capacity. Handles opened through
/// [`Pipe::open`] share one ring; one slot of `capacity` stays reserved for
/// empty/full disambiguation, so `capacity - 1` bytes are usable.
///
/// # Examples
///
/// ```
/// use ringpipe::{Mode, Pipe};
///
/// let pipe = Pipe::new(64);
/// let writer = pipe.open(Mode::Write, false).unwrap();
/// let reader = pipe.open(Mode::Read, false).unwrap();
///
/// writer.write(b"hello").unwrap();
///
/// let mut buf = [0u8; 8];
/// let n = reader.read(&mut buf).unwrap();
/// assert_eq!(&buf[..n], b"hello");
/// ```
pub struct Pipe {
    shared: Arc<PipeShared>,
}

impl Pipe {
    /// Create a pipe with a private cancellation token that only fires
    /// through [`Pipe::shutdown`]. `capacity` is clamped into
    /// `[MIN_PIPE_CAPACITY, MAX_PIPE_CAPACITY]`.
    pub fn new(capacity: Size) -> Self {
        Self::with_cancel(capacity, CancelToken::new())
    }

    /// Create a pipe wired to an external cancellation signal. Firing the
    /// token releases every parked waiter with `Interrupted`.
    pub fn with_cancel(capacity: Size, cancel: CancelToken) -> Self {
        let capacity = capacity.clamp(MIN_PIPE_CAPACITY, MAX_PIPE_CAPACITY);
        let shared = Arc::new(PipeShared {
            state: Mutex::new(PipeState {
                ring: RingBuffer::new(capacity),
                readers: 0,
                writers: 0,
            }),
            readable: WaitGate::new(),
            writable: WaitGate::new(),
            cancel,
        });

        // The waker must take the state lock before notifying; firing
        // otherwise races the check-then-park window inside wait_until.
        let waker = Arc::downgrade(&shared);
        shared.cancel.register_waker(move || {
            if let Some(shared) = waker.upgrade() {
                drop(shared.state.lock());
                shared.readable.notify_all();
                shared.writable.notify_all();
            }
        });

        info!(
            "Created pipe (capacity: {} bytes, usable: {})",
            capacity,
            capacity - 1
        );

        Self { shared }
    }

    /// Open a handle, incrementing the matching open-handle counter.
    ///
    /// A blocking read-mode open on an empty pipe with no writer parks until
    /// a writer attaches or data arrives, so an early reader does not
    /// immediately observe end-of-stream. Non-blocking opens return at once
    /// regardless. Opening in write mode notifies the readable gate so
    /// parked read-openers re-check writer presence.
    pub fn open(&self, mode: Mode, blocking: bool) -> Result<PipeHandle, PipeError> {
        let mut state = self.shared.state.lock();
        match mode {
            Mode::Read => {
                state.readers += 1;
                if blocking && state.end_of_stream() {
                    let wait = self.shared.readable.wait_until(
                        &mut state,
                        &self.shared.cancel,
                        |s| !s.end_of_stream(),
                    );
                    if wait.is_err() {
                        // An interrupted open must not leave a phantom reader.
                        state.readers -= 1;
                        return Err(PipeError::Interrupted);
                    }
                }
            }
            Mode::Write => {
                state.writers += 1;
                drop(state);
                self.shared.readable.notify_all();
            }
        }
        Ok(PipeHandle::new(Arc::clone(&self.shared), mode, blocking))
    }

    /// Point-in-time snapshot of capacity, occupancy, and open handles.
    pub fn stats(&self) -> PipeStats {
        let state = self.shared.state.lock();
        PipeStats {
            capacity: state.ring.capacity(),
            buffered: state.ring.occupied(),
            readers: state.readers,
            writers: state.writers,
        }
    }

    /// Detach-time release: fires the cancellation token so every parked
    /// waiter unblocks with `Interrupted` and later waits refuse to park.
    /// Idempotent.
    pub fn shutdown(&self) {
        info!("Pipe shutdown, releasing parked waiters");
        self.shared.cancel.fire();
    }

    /// The cancellation signal wired to this pipe.
    pub fn cancel_token(&self) -> CancelToken {
        self.shared.cancel.clone()
    }
}

impl Default for Pipe {
    fn default() -> Self {
        Self::new(DEFAULT_PIPE_CAPACITY)
    }
}

impl Clone for Pipe {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl fmt::Debug for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("Pipe")
            .field("capacity", &state.ring.capacity())
            .field("buffered", &state.ring.occupied())
            .field("readers", &state.readers)
            .field("writers", &state.writers)
            .finish()
    }
}
