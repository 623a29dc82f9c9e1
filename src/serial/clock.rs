use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic high-resolution counter behind a narrow interface, so the
/// keyer's deadline loop can run against a simulated clock in tests.
pub trait TickClock {
    /// Counter frequency, queried once per session.
    fn ticks_per_second(&self) -> u64;

    /// Current counter value.
    fn now(&self) -> u64;

    /// Block until the counter reaches `deadline`. Implementations for real
    /// hardware must spin rather than sleep: bit periods sit well below the
    /// reliable resolution of OS sleep primitives.
    fn wait_until(&self, deadline: u64);
}

/// Wall clock backed by `Instant`, counting nanoseconds from construction.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickClock for MonotonicClock {
    fn ticks_per_second(&self) -> u64 {
        1_000_000_000
    }

    fn now(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }

    fn wait_until(&self, deadline: u64) {
        while self.now() < deadline {
            std::hint::spin_loop();
        }
    }
}

/// Manually advanced clock for tests. Clones share the same counter, so a
/// test can keep a handle while the keyer owns its copy.
#[derive(Clone)]
pub struct SimClock {
    now: Rc<Cell<u64>>,
    ticks_per_second: u64,
}

impl SimClock {
    pub fn new(ticks_per_second: u64) -> Self {
        Self { now: Rc::new(Cell::new(0)), ticks_per_second }
    }

    pub fn advance(&self, ticks: u64) {
        self.now.set(self.now.get() + ticks);
    }
}

impl TickClock for SimClock {
    fn ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }

    fn now(&self) -> u64 {
        self.now.get()
    }

    fn wait_until(&self, deadline: u64) {
        // Waiting "arrives" exactly at the deadline.
        if self.now.get() < deadline {
            self.now.set(deadline);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_moves_forward() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
        assert_eq!(clock.ticks_per_second(), 1_000_000_000);
    }

    #[test]
    fn monotonic_wait_reaches_the_deadline() {
        let clock = MonotonicClock::new();
        let deadline = clock.now() + 200_000; // 0.2 ms
        clock.wait_until(deadline);
        assert!(clock.now() >= deadline);
    }

    #[test]
    fn sim_clock_is_shared_between_clones() {
        let clock = SimClock::new(1_000_000);
        let handle = clock.clone();
        handle.advance(42);
        assert_eq!(clock.now(), 42);
        clock.wait_until(100);
        assert_eq!(handle.now(), 100);
        clock.wait_until(50); // never goes backwards
        assert_eq!(handle.now(), 100);
    }
}
