/*!
 * Wait Gate
 * Predicate wait over a caller-supplied mutex guard
 *
 * A gate holds no state of its own: the predicate is supplied per call and
 * re-checked with the lock held after every wakeup, so a single notification
 * is never trusted to satisfy it.
 */

use super::cancel::CancelToken;
use parking_lot::{Condvar, MutexGuard};
use thiserror::Error;

/// Wait operation errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitError {
    #[error("Wait interrupted by cancellation")]
    Interrupted,
}

/// Condvar-backed predicate gate.
///
/// All waiters of one gate must park through the same mutex; the pipe shares
/// a single mutex between both of its gates.
pub struct WaitGate {
    condvar: Condvar,
}

impl WaitGate {
    pub const fn new() -> Self {
        Self {
            condvar: Condvar::new(),
        }
    }

    /// Block until `ready` holds or `cancel` fires.
    ///
    /// The guard's mutex is released while parked and is re-held whenever
    /// `ready` runs; both terminal states return with the lock held. A fired
    /// cancellation wins over a simultaneously satisfied predicate.
    pub fn wait_until<T, F>(
        &self,
        guard: &mut MutexGuard<'_, T>,
        cancel: &CancelToken,
        mut ready: F,
    ) -> Result<(), WaitError>
    where
        F: FnMut(&T) -> bool,
    {
        loop {
            if cancel.is_fired() {
                return Err(WaitError::Interrupted);
            }
            if ready(&**guard) {
                return Ok(());
            }
            self.condvar.wait(guard);
        }
    }

    /// Wake every parked waiter; each re-checks its own predicate
    /// independently.
    #[inline]
    pub fn notify_all(&self) {
        self.condvar.notify_all();
    }
}

impl Default for WaitGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_satisfied_predicate_returns_without_parking() {
        let gate = WaitGate::new();
        let mutex = Mutex::new(7u32);
        let cancel = CancelToken::new();

        let mut guard = mutex.lock();
        let result = gate.wait_until(&mut guard, &cancel, |v| *v == 7);
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_wakeup_rechecks_predicate() {
        let gate = Arc::new(WaitGate::new());
        let mutex = Arc::new(Mutex::new(0u32));
        let cancel = CancelToken::new();

        let gate_clone = Arc::clone(&gate);
        let mutex_clone = Arc::clone(&mutex);
        let waiter = thread::spawn(move || {
            let mut guard = mutex_clone.lock();
            gate_clone.wait_until(&mut guard, &cancel, |v| *v >= 3)
        });

        thread::sleep(Duration::from_millis(50));

        // Wakeups below the threshold must park again instead of returning.
        for value in 1..=3 {
            *mutex.lock() = value;
            gate.notify_all();
            thread::sleep(Duration::from_millis(10));
        }

        assert_eq!(waiter.join().unwrap(), Ok(()));
        assert_eq!(*mutex.lock(), 3);
    }

    #[test]
    fn test_cancel_interrupts_parked_waiter() {
        let gate = Arc::new(WaitGate::new());
        let mutex = Arc::new(Mutex::new(()));
        let cancel = CancelToken::new();

        {
            let gate = Arc::clone(&gate);
            let mutex = Arc::clone(&mutex);
            cancel.register_waker(move || {
                drop(mutex.lock());
                gate.notify_all();
            });
        }

        let gate_clone = Arc::clone(&gate);
        let mutex_clone = Arc::clone(&mutex);
        let cancel_clone = cancel.clone();
        let waiter = thread::spawn(move || {
            let mut guard = mutex_clone.lock();
            gate_clone.wait_until(&mut guard, &cancel_clone, |_| false)
        });

        thread::sleep(Duration::from_millis(50));
        cancel.fire();

        assert_eq!(waiter.join().unwrap(), Err(WaitError::Interrupted));
    }

    #[test]
    fn test_fired_cancel_refuses_to_park() {
        let gate = WaitGate::new();
        let mutex = Mutex::new(());
        let cancel = CancelToken::new();
        cancel.fire();

        let mut guard = mutex.lock();
        let result = gate.wait_until(&mut guard, &cancel, |_| true);
        assert_eq!(result, Err(WaitError::Interrupted));
    }
}
