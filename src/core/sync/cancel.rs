/*!
 * Cancellation Token
 * Externally-fireable signal that releases pending waits
 */

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

type Waker = Box<dyn Fn() + Send + Sync>;

/// Cloneable cancellation signal shared between a pipe and its controller.
///
/// Models an external interrupt: firing is one-way and permanent. Firing runs
/// every registered waker so that parked threads are unparked promptly rather
/// than on the next unrelated wakeup; a waker must take the waiters' mutex
/// before notifying, which serializes firing against the check-then-park
/// window inside `WaitGate::wait_until`.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Default)]
struct CancelInner {
    fired: AtomicBool,
    wakers: Mutex<Vec<Waker>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the signal has fired.
    #[inline]
    pub fn is_fired(&self) -> bool {
        self.inner.fired.load(Ordering::Acquire)
    }

    /// Fire the signal and run every registered waker.
    ///
    /// Idempotent: only the first call runs the wakers.
    pub fn fire(&self) {
        if self.inner.fired.swap(true, Ordering::AcqRel) {
            return;
        }
        for waker in self.inner.wakers.lock().iter() {
            waker();
        }
    }

    /// Register a waker run once on `fire`. The waker must not call back
    /// into the token.
    pub(crate) fn register_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        self.inner.wakers.lock().push(Box::new(waker));
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("fired", &self.is_fired())
            .finish()
    }
}
