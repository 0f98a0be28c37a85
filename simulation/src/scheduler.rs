//! Discrete-event scheduler
//!
//! Single-threaded simulated clock with a min-heap of pending events.
//! Events scheduled for the same instant fire in scheduling order.
//! Cancellation is lazy: a cancelled event stays in the heap and is dropped
//! when it reaches the front.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

use csmarl_core::{EventId, SimTime, Timer};
use tracing::trace;

struct Scheduled<E> {
    time: SimTime,
    id: EventId,
    event: E,
}

impl<E> PartialEq for Scheduled<E> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.id == other.id
    }
}

impl<E> Eq for Scheduled<E> {}

impl<E> PartialOrd for Scheduled<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Scheduled<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse the ordering for min-heap
        (other.time, other.id).cmp(&(self.time, self.id))
    }
}

/// Event queue carrying payloads of type `E`
pub struct Scheduler<E> {
    now: SimTime,
    next_id: u64,
    queue: BinaryHeap<Scheduled<E>>,
    pending: HashSet<EventId>,
    dispatched: u64,
}

impl<E> Scheduler<E> {
    /// Create a scheduler at time zero
    pub fn new() -> Self {
        Self {
            now: SimTime::ZERO,
            next_id: 0,
            queue: BinaryHeap::new(),
            pending: HashSet::new(),
            dispatched: 0,
        }
    }

    /// Current simulated time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule `event` to fire `delay` after now
    pub fn schedule(&mut self, delay: Duration, event: E) -> EventId {
        self.schedule_at(self.now + delay, event)
    }

    /// Schedule `event` at an absolute time; times in the past fire now
    pub fn schedule_at(&mut self, time: SimTime, event: E) -> EventId {
        let id = EventId(self.next_id);
        self.next_id += 1;
        let time = time.max(self.now);
        self.queue.push(Scheduled { time, id, event });
        self.pending.insert(id);
        trace!(%id, %time, "event scheduled");
        id
    }

    /// Cancel a pending event
    ///
    /// Returns true if the event was pending. Cancelling an event that
    /// already fired or was already cancelled does nothing.
    pub fn cancel(&mut self, id: EventId) -> bool {
        let removed = self.pending.remove(&id);
        if removed {
            trace!(%id, "event cancelled");
        }
        removed
    }

    /// True if `id` is scheduled and not yet fired or cancelled
    pub fn is_pending(&self, id: EventId) -> bool {
        self.pending.contains(&id)
    }

    /// Number of events that will still fire
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of events dispatched so far
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Time of the next live event
    pub fn peek_time(&mut self) -> Option<SimTime> {
        self.discard_cancelled();
        self.queue.peek().map(|next| next.time)
    }

    /// Remove the next live event and advance the clock to its time
    pub fn pop(&mut self) -> Option<(EventId, E)> {
        self.discard_cancelled();
        let next = self.queue.pop()?;
        self.pending.remove(&next.id);
        self.now = next.time;
        self.dispatched += 1;
        trace!(id = %next.id, time = %self.now, "event dispatched");
        Some((next.id, next.event))
    }

    /// Dispatch every event up to and including `limit`, then set the clock
    /// to `limit`
    ///
    /// The handler may schedule or cancel further events.
    pub fn run_until<F>(&mut self, limit: SimTime, mut handler: F)
    where
        F: FnMut(&mut Self, EventId, E),
    {
        while self.peek_time().is_some_and(|time| time <= limit) {
            if let Some((id, event)) = self.pop() {
                handler(self, id, event);
            }
        }
        self.advance_to(limit);
    }

    /// Move the clock forward to `time` without dispatching anything
    ///
    /// Never moves the clock backwards.
    pub fn advance_to(&mut self, time: SimTime) {
        self.now = self.now.max(time);
    }

    /// A [`Timer`] that schedules copies of `event` on this scheduler
    pub fn timer_for(&mut self, event: E) -> ScopedTimer<'_, E>
    where
        E: Clone,
    {
        ScopedTimer {
            scheduler: self,
            event,
        }
    }

    fn discard_cancelled(&mut self) {
        while let Some(next) = self.queue.peek() {
            if self.pending.contains(&next.id) {
                break;
            }
            self.queue.pop();
        }
    }
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Scheduler<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now)
            .field("pending", &self.pending.len())
            .field("dispatched", &self.dispatched)
            .finish()
    }
}

/// Scheduler view bound to one event payload
pub struct ScopedTimer<'a, E> {
    scheduler: &'a mut Scheduler<E>,
    event: E,
}

impl<E: Clone> Timer for ScopedTimer<'_, E> {
    fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    fn schedule(&mut self, delay: Duration) -> EventId {
        self.scheduler.schedule(delay, self.event.clone())
    }

    fn cancel(&mut self, id: EventId) -> bool {
        self.scheduler.cancel(id)
    }
}
