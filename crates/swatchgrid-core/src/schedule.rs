//! Fire-once deferred tasks driven by the host's clock.

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// A queue of tasks that become due at a point in time.
///
/// The host calls [`Scheduler::poll`] from its event loop; there is no
/// cancellation or retry.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    tasks: Vec<(Instant, u64, T)>,
    seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            seq: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` once `delay` has elapsed after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, task: T) {
        self.tasks.push((now + delay, self.seq, task));
        self.seq += 1;
    }

    /// Remove and return all tasks due at `now`, earliest first.
    pub fn poll(&mut self, now: Instant) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|(at, _, _)| *at <= now);
        self.tasks = pending;
        due.sort_by_key(|(at, seq, _)| (*at, *seq));
        due.into_iter().map(|(_, _, task)| task).collect()
    }

    /// When the next task becomes due.
    pub fn next_due(&self) -> Option<Instant> {
        self.tasks.iter().map(|(at, _, _)| *at).min()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_due_before_delay() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(start, Duration::from_millis(20), "readback");

        assert!(scheduler.poll(start + Duration::from_millis(19)).is_empty());
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.poll(start + Duration::from_millis(20)), vec!["readback"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_fires_once_in_due_order() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(start, Duration::from_millis(30), 3);
        scheduler.schedule(start, Duration::from_millis(10), 1);
        scheduler.schedule(start, Duration::from_millis(10), 2);

        assert_eq!(scheduler.next_due(), Some(start + Duration::from_millis(10)));
        let later = start + Duration::from_millis(50);
        assert_eq!(scheduler.poll(later), vec![1, 2, 3]);
        assert!(scheduler.poll(later).is_empty());
    }

    #[test]
    fn test_clear() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(start, Duration::ZERO, ());
        scheduler.clear();
        assert!(scheduler.poll(start).is_empty());
    }
}
