/*!
 * Synchronization Primitives
 * Cancellation signal and predicate wait gate sharing one mutex
 */

mod cancel;
mod gate;

pub use cancel::CancelToken;
pub use gate::{WaitError, WaitGate};
