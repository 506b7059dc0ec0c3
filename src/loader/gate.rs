use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// A small, blocking join point for in-flight background work.
///
/// Workers register with [`enter`](WorkGate::enter) before doing anything and
/// deregister with [`leave`](WorkGate::leave) on every exit path; a canceller
/// blocks in [`wait_idle`](WorkGate::wait_idle) until the count reaches zero.
pub(crate) struct WorkGate {
    active: Mutex<usize>,
    cv: Condvar,
}

impl WorkGate {
    pub(crate) fn new() -> Self {
        Self {
            active: Mutex::new(0),
            cv: Condvar::new(),
        }
    }

    /// Register one unit of in-flight work.
    pub(crate) fn enter(&self) {
        let mut g = self.active.lock().expect("gate mutex poisoned");
        *g += 1;
    }

    /// Deregister one unit of in-flight work, waking any waiters at zero.
    pub(crate) fn leave(&self) {
        let mut g = self.active.lock().expect("gate mutex poisoned");
        assert!(*g > 0, "leave without matching enter");
        *g -= 1;
        if *g == 0 {
            self.cv.notify_all();
        }
    }

    /// Block until no work is registered.
    ///
    /// Returns the time spent waiting (zero if no work was in flight).
    pub(crate) fn wait_idle(&self) -> Duration {
        let start = Instant::now();
        let mut waited = false;
        let mut g = self.active.lock().expect("gate mutex poisoned");
        while *g > 0 {
            waited = true;
            g = self.cv.wait(g).expect("gate mutex poisoned");
        }
        if waited { start.elapsed() } else { Duration::ZERO }
    }
}

#[cfg(test)]
mod tests {
    use super::WorkGate;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn wait_idle_returns_immediately_when_nothing_registered() {
        let gate = WorkGate::new();
        assert_eq!(gate.wait_idle(), Duration::ZERO);
    }

    #[test]
    fn wait_idle_blocks_until_leave() {
        let gate = Arc::new(WorkGate::new());
        gate.enter();

        let worker = {
            let gate = Arc::clone(&gate);
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(50));
                gate.leave();
            })
        };

        let waited = gate.wait_idle();
        assert!(waited > Duration::ZERO);
        worker.join().unwrap();
    }

    #[test]
    fn wait_idle_returns_immediately_after_work_left() {
        let gate = WorkGate::new();
        gate.enter();
        gate.leave();
        assert_eq!(gate.wait_idle(), Duration::ZERO);
    }
}
