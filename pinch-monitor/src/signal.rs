//! Interruptible sleep primitive for the polling loop.
//!
//! A mutex-guarded flag pair plus a condvar. The loop sleeps on
//! [`Signal::sleep`]; other threads wake it with [`Signal::notify_stop`]
//! (terminate) or [`Signal::notify_force_poll`] (poll immediately). Both
//! waits are true blocking waits with a timeout, never spins.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Why a sleep ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wake {
    /// The full duration elapsed.
    Timeout,
    /// A force-poll was requested; start the next cycle now.
    Force,
    /// Stop was requested; end the loop without polling again.
    Stop,
}

#[derive(Debug, Default)]
struct Flags {
    stop: bool,
    force_poll: bool,
}

/// Shared wakeup signal between the loop and the control surface.
#[derive(Debug, Default)]
pub(crate) struct Signal {
    flags: Mutex<Flags>,
    condvar: Condvar,
}

impl Signal {
    /// Requests loop termination and wakes any waiter.
    pub fn notify_stop(&self) {
        self.flags.lock().stop = true;
        self.condvar.notify_all();
    }

    /// Requests an immediate poll and wakes any waiter.
    pub fn notify_force_poll(&self) {
        self.flags.lock().force_poll = true;
        self.condvar.notify_all();
    }

    /// Returns true once stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.flags.lock().stop
    }

    /// Clears both flags. Called when a (re)start begins.
    pub fn reset(&self) {
        let mut flags = self.flags.lock();
        flags.stop = false;
        flags.force_poll = false;
    }

    /// Sleeps up to `timeout`, ending early on stop or force-poll.
    ///
    /// A force-poll raised before this call starts is consumed at entry so
    /// the request is not lost between cycles, matching the clear-then-wait
    /// pattern: reconnect during an active poll still shortens the
    /// following sleep.
    pub fn sleep(&self, timeout: Duration) -> Wake {
        let deadline = Instant::now() + timeout;
        let mut flags = self.flags.lock();
        loop {
            if flags.stop {
                return Wake::Stop;
            }
            if flags.force_poll {
                flags.force_poll = false;
                return Wake::Force;
            }
            if self.condvar.wait_until(&mut flags, deadline).timed_out() {
                if flags.stop {
                    return Wake::Stop;
                }
                if flags.force_poll {
                    flags.force_poll = false;
                    return Wake::Force;
                }
                return Wake::Timeout;
            }
        }
    }

    /// Waits out a fixed retry delay, returning false if stop was
    /// requested. Force-poll does not cut this wait short.
    pub fn wait_unless_stopped(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut flags = self.flags.lock();
        loop {
            if flags.stop {
                return false;
            }
            if self.condvar.wait_until(&mut flags, deadline).timed_out() {
                return !flags.stop;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_sleep_times_out() {
        let signal = Signal::default();
        let started = Instant::now();
        assert_eq!(signal.sleep(Duration::from_millis(20)), Wake::Timeout);
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_stop_interrupts_sleep() {
        let signal = Arc::new(Signal::default());
        let waker = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                signal.notify_stop();
            })
        };
        let started = Instant::now();
        assert_eq!(signal.sleep(Duration::from_secs(60)), Wake::Stop);
        assert!(started.elapsed() < Duration::from_secs(5));
        waker.join().unwrap();
    }

    #[test]
    fn test_force_poll_interrupts_sleep_once() {
        let signal = Arc::new(Signal::default());
        let waker = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                signal.notify_force_poll();
            })
        };
        assert_eq!(signal.sleep(Duration::from_secs(60)), Wake::Force);
        waker.join().unwrap();

        // The request was consumed; the next sleep runs to its deadline
        assert_eq!(signal.sleep(Duration::from_millis(10)), Wake::Timeout);
    }

    #[test]
    fn test_pending_force_poll_consumed_at_entry() {
        let signal = Signal::default();
        signal.notify_force_poll();
        assert_eq!(signal.sleep(Duration::from_secs(60)), Wake::Force);
    }

    #[test]
    fn test_retry_wait_ignores_force_poll() {
        let signal = Arc::new(Signal::default());
        let waker = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(5));
                signal.notify_force_poll();
            })
        };
        let started = Instant::now();
        assert!(signal.wait_unless_stopped(Duration::from_millis(50)));
        assert!(started.elapsed() >= Duration::from_millis(50));
        waker.join().unwrap();
    }

    #[test]
    fn test_retry_wait_ends_on_stop() {
        let signal = Arc::new(Signal::default());
        let waker = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                signal.notify_stop();
            })
        };
        assert!(!signal.wait_unless_stopped(Duration::from_secs(60)));
        waker.join().unwrap();
    }

    #[test]
    fn test_reset_clears_flags() {
        let signal = Signal::default();
        signal.notify_stop();
        signal.notify_force_poll();
        signal.reset();
        assert!(!signal.is_stopped());
        assert_eq!(signal.sleep(Duration::from_millis(5)), Wake::Timeout);
    }
}
