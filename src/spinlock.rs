//! Interrupt-safe spin lock guarding the ring's mutable state.
//!
//! Acquisition enters a critical section first (on bare-metal targets the
//! `critical-section` implementation masks interrupts and hands back the prior
//! state; under `std` it is a process-global section), then spins for the
//! per-ring flag with adaptive backoff. Dropping the guard releases the flag
//! and restores the saved interrupt state, in that order.
//!
//! The lock is held only for bounded copy windows: bulk transfers that opt
//! into chunking re-acquire it per chunk, so the interrupt-masked window is
//! one chunk's worth of copying.

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::RestoreState;
use crossbeam_utils::Backoff;

pub(crate) struct SpinLock<T> {
    locked: AtomicBool,
    value: UnsafeCell<T>,
}

// SAFETY: The spin flag serializes all access to `value`; a guard hands out
// &T/&mut T only while the flag is held, so the lock provides the same
// guarantees as std::sync::Mutex.
unsafe impl<T: Send> Send for SpinLock<T> {}
unsafe impl<T: Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
    pub(crate) const fn new(value: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            value: UnsafeCell::new(value),
        }
    }

    /// Acquire the lock with interrupts masked for the duration of the guard.
    pub(crate) fn lock(&self) -> SpinGuard<'_, T> {
        // SAFETY: paired with `release` in SpinGuard::drop; guards never leak
        // out of this module with the restore token detached.
        let restore = unsafe { critical_section::acquire() };

        let backoff = Backoff::new();
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            backoff.snooze();
        }

        SpinGuard { lock: self, restore }
    }
}

pub(crate) struct SpinGuard<'a, T> {
    lock: &'a SpinLock<T>,
    restore: RestoreState,
}

impl<T> Deref for SpinGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the spin flag is held for the guard's lifetime.
        unsafe { &*self.lock.value.get() }
    }
}

impl<T> DerefMut for SpinGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the spin flag is held for the guard's lifetime, and &mut
        // self guarantees exclusive use of the guard itself.
        unsafe { &mut *self.lock.value.get() }
    }
}

impl<T> Drop for SpinGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
        // SAFETY: `restore` came from the matching `acquire` in `lock`.
        unsafe { critical_section::release(self.restore) };
    }
}
