/*!
 * ringpipe Library
 * Bounded FIFO byte pipe over a fixed-size ring, with blocking and
 * non-blocking transfers, readiness polling, and end-of-stream tracking
 */

pub mod core;
pub mod pipe;

// Re-exports
pub use crate::core::sync::{CancelToken, WaitError, WaitGate};
pub use pipe::{Mode, Pipe, PipeError, PipeHandle, PipeStats, Readiness, RingBuffer};
