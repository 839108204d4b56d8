//! Binary edge-triggered event.
//!
//! The event carries a state transition, not a level: the ring raises it on
//! the empty→nonempty edge and clears it on the nonempty→empty edge. Waiters
//! must not assume sticky signaling; the ring pairs every wait with a
//! validate-and-retry loop.

use parking_lot::{Condvar, Mutex};

/// A binary event with explicit signal/unsignal transitions.
///
/// Manual-reset events stay signaled until [`unsignal`](Event::unsignal) and
/// wake every waiter; auto-reset events wake one waiter, which consumes the
/// signal on its way out of [`wait`](Event::wait).
pub struct Event {
    signaled: Mutex<bool>,
    cond: Condvar,
    manual_reset: bool,
}

impl Event {
    /// Create an event. `signaled` is the initial state.
    pub fn new(manual_reset: bool, signaled: bool) -> Self {
        Self {
            signaled: Mutex::new(signaled),
            cond: Condvar::new(),
            manual_reset,
        }
    }

    /// Block the calling thread until the event is signaled.
    ///
    /// Returns immediately when the event is already signaled. An auto-reset
    /// event is cleared before this returns.
    pub fn wait(&self) {
        let mut signaled = self.signaled.lock();
        while !*signaled {
            self.cond.wait(&mut signaled);
        }
        if !self.manual_reset {
            *signaled = false;
        }
    }

    /// Signal the event, waking waiters.
    ///
    /// `reschedule` is a scheduler hint: when true the caller is willing to
    /// be preempted in favor of a woken waiter. Hosted targets treat it as
    /// advisory only.
    pub fn signal(&self, reschedule: bool) {
        let _ = reschedule;
        let mut signaled = self.signaled.lock();
        *signaled = true;
        if self.manual_reset {
            self.cond.notify_all();
        } else {
            self.cond.notify_one();
        }
    }

    /// Clear the event without waking anyone.
    pub fn unsignal(&self) {
        *self.signaled.lock() = false;
    }

    /// Current state. Racy by nature; meaningful only to a caller holding
    /// external coordination (the ring queries it under its own lock).
    pub fn is_signaled(&self) -> bool {
        *self.signaled.lock()
    }
}
