//! Deferred work without threads
//!
//! Owners keep a [`TimerQueue`] and an `Option<TimerId>` per kind of pending
//! work, and call their own `poll()` from the host's event loop. Time comes
//! from a [`Clock`], so tests drive it by hand with [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Milliseconds since an arbitrary fixed origin
pub trait Clock {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Clock that only moves when told to; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Timer<E> {
    id: TimerId,
    deadline: u64,
    event: E,
}

/// Events waiting for a deadline
pub struct TimerQueue<E> {
    clock: Rc<dyn Clock>,
    next_id: u64,
    timers: Vec<Timer<E>>,
}

impl<E> TimerQueue<E> {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            next_id: 0,
            timers: Vec::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn schedule(&mut self, delay_ms: u64, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            deadline: self.now().saturating_add(delay_ms),
            event,
        });
        id
    }

    /// Cancel a pending timer, returning its event if it had not fired
    pub fn cancel(&mut self, id: TimerId) -> Option<E> {
        let index = self.timers.iter().position(|timer| timer.id == id)?;
        Some(self.timers.remove(index).event)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|timer| timer.id == id)
    }

    /// Remove and return the earliest due timer
    ///
    /// Timers sharing a deadline fire in scheduling order. Calling this in a
    /// loop also fires timers scheduled by earlier handlers once they are due.
    pub fn pop_due(&mut self) -> Option<(TimerId, E)> {
        let now = self.now();
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.deadline <= now)
            .min_by_key(|(_, timer)| (timer.deadline, timer.id))
            .map(|(index, _)| index)?;
        let timer = self.timers.remove(index);
        Some((timer.id, timer.event))
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.iter().map(|timer| timer.deadline).min()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> (ManualClock, TimerQueue<&'static str>) {
        let clock = ManualClock::new();
        let queue = TimerQueue::new(Rc::new(clock.clone()));
        (clock, queue)
    }

    #[test]
    fn test_fires_at_deadline() {
        let (clock, mut queue) = queue();
        queue.schedule(100, "a");
        clock.advance(99);
        assert!(queue.pop_due().is_none());
        clock.advance(1);
        assert_eq!(queue.pop_due().map(|(_, e)| e), Some("a"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_deadline_then_schedule_order() {
        let (clock, mut queue) = queue();
        queue.schedule(50, "late");
        queue.schedule(10, "early");
        queue.schedule(10, "early-second");
        clock.advance(100);
        let fired: Vec<_> = std::iter::from_fn(|| queue.pop_due()).map(|(_, e)| e).collect();
        assert_eq!(fired, vec!["early", "early-second", "late"]);
    }

    #[test]
    fn test_cancel() {
        let (clock, mut queue) = queue();
        let id = queue.schedule(10, "a");
        assert!(queue.is_pending(id));
        assert_eq!(queue.cancel(id), Some("a"));
        assert_eq!(queue.cancel(id), None);
        clock.advance(10);
        assert!(queue.pop_due().is_none());
    }

    #[test]
    fn test_next_deadline() {
        let (clock, mut queue) = queue();
        clock.set(1000);
        queue.schedule(300, "a");
        queue.schedule(150, "b");
        assert_eq!(queue.next_deadline(), Some(1150));
        queue.clear();
        assert_eq!(queue.next_deadline(), None);
    }
}
