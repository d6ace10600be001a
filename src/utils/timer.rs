use std::time::Instant;

/// Accumulates elapsed nanoseconds over one or more start/stop spans.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Timer {
    pub total_time: u128,
    pub curr: Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self { total_time: 0, curr: Instant::now() }
    }
}

impl Timer {
    /// A timer that is already running.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn start(&mut self) {
        self.curr = Instant::now();
    }

    /// Closes the current span and returns the running total.
    #[inline(always)]
    pub fn stop(&mut self) -> u128 {
        self.total_time += self.curr.elapsed().as_nanos();
        self.curr = Instant::now();
        self.total_time
    }
}

#[test]
fn test_timer_accumulates() {
    use std::{thread, time::Duration};

    let mut timer = Timer::new();
    thread::sleep(Duration::from_millis(5));
    let first = timer.stop();

    timer.start();
    thread::sleep(Duration::from_millis(5));
    let total = timer.stop();

    assert!(first >= 5_000_000);
    assert!(total >= first + 5_000_000);
    assert_eq!(timer.total_time, total);
}
