/*!
 * FIFO Pipe
 * Bounded circular byte pipe with blocking I/O, polling, and
 * reader/writer lifecycle tracking
 */

mod handle;
mod pipe;
mod ring;
mod types;

pub use handle::PipeHandle;
pub use pipe::Pipe;
pub use ring::RingBuffer;
pub use types::{Mode, PipeError, PipeStats, Readiness};
