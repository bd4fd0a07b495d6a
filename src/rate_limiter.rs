//! Sliding-window pacing for calls to an external API family.
//!
//! A [`RateLimiter`] keeps one timestamp per slot in a FIFO queue. Taking a
//! slot pops the oldest timestamp and sleeps until it is at least one window
//! old; dropping the returned [`Permit`] pushes the call's start time back.
//! At most `capacity` calls therefore start within any window.
//!
//! Callers are admitted in arrival order: each takes a ticket, and only the
//! oldest waiting ticket may pop a slot.
//!
//! Clones share the same queue, so every client built from clones of one
//! limiter counts against the same external limit.
//!
//! The queue starts with `capacity` empty slots that are already expired, so
//! the first `capacity` calls go out back to back. That initial burst is
//! intended.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::RateLimitConfig;
use crate::error::RateLimitError;

#[derive(Debug, Clone)]
pub struct RateLimiter {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    family: String,
    capacity: usize,
    window: Duration,
    queue: Mutex<Queue>,
    changed: Condvar,
}

#[derive(Debug)]
struct Queue {
    /// Start time of the call that last used each slot, oldest first.
    /// `None` marks a slot that has never been used.
    slots: VecDeque<Option<Instant>>,
    /// Tickets of callers waiting for a slot, in arrival order.
    waiting: VecDeque<u64>,
    next_ticket: u64,
}

impl Queue {
    fn leave(&mut self, ticket: u64) {
        self.waiting.retain(|&waiting| waiting != ticket);
    }
}

impl RateLimiter {
    /// Build a limiter. A capacity of zero is treated as one.
    pub fn new(config: RateLimitConfig) -> Self {
        let capacity = config.capacity.max(1);
        let slots = std::iter::repeat_n(None, capacity).collect();
        Self {
            shared: Arc::new(Shared {
                family: config.family,
                capacity,
                window: config.window,
                queue: Mutex::new(Queue {
                    slots,
                    waiting: VecDeque::new(),
                    next_ticket: 0,
                }),
                changed: Condvar::new(),
            }),
        }
    }

    pub fn family(&self) -> &str {
        &self.shared.family
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    pub fn window(&self) -> Duration {
        self.shared.window
    }

    /// Block until a call may start.
    ///
    /// The caller should issue its request right away and drop the permit
    /// once the request has completed. With a deadline, waiting stops as
    /// soon as it becomes clear the slot cannot be granted in time; the slot
    /// is then returned untouched.
    pub fn acquire(&self, deadline: Option<Instant>) -> Result<Permit, RateLimitError> {
        let last_start = self.take_slot(deadline)?;

        if let Some(last_start) = last_start {
            let wait = self.shared.window.saturating_sub(last_start.elapsed());
            if !wait.is_zero() {
                if deadline.is_some_and(|deadline| Instant::now() + wait > deadline) {
                    self.lock_queue().slots.push_front(Some(last_start));
                    self.shared.changed.notify_all();
                    return Err(self.deadline_exceeded());
                }
                debug!(
                    family = %self.shared.family,
                    wait_ms = wait.as_millis() as u64,
                    "waiting for rate limit window"
                );
                thread::sleep(wait);
            }
        }

        Ok(Permit {
            limiter: self.clone(),
            started_at: Instant::now(),
        })
    }

    /// Queue up behind earlier callers and pop the oldest slot once this
    /// caller is first in line.
    fn take_slot(&self, deadline: Option<Instant>) -> Result<Option<Instant>, RateLimitError> {
        let mut queue = self.lock_queue();
        let ticket = queue.next_ticket;
        queue.next_ticket += 1;
        queue.waiting.push_back(ticket);

        loop {
            if queue.waiting.front() == Some(&ticket) {
                if let Some(slot) = queue.slots.pop_front() {
                    queue.waiting.pop_front();
                    // The next in line may find a slot too.
                    self.shared.changed.notify_all();
                    return Ok(slot);
                }
            }
            queue = match deadline {
                None => self
                    .shared
                    .changed
                    .wait(queue)
                    .unwrap_or_else(PoisonError::into_inner),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        queue.leave(ticket);
                        self.shared.changed.notify_all();
                        return Err(self.deadline_exceeded());
                    }
                    let (guard, _) = self
                        .shared
                        .changed
                        .wait_timeout(queue, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner);
                    guard
                }
            };
        }
    }

    fn release(&self, started_at: Instant) {
        self.lock_queue().slots.push_back(Some(started_at));
        self.shared.changed.notify_all();
    }

    fn lock_queue(&self) -> MutexGuard<'_, Queue> {
        self.shared
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn deadline_exceeded(&self) -> RateLimitError {
        RateLimitError::DeadlineExceeded {
            family: self.shared.family.clone(),
        }
    }
}

/// Permission to make one call. Dropping it recycles the slot.
#[derive(Debug)]
pub struct Permit {
    limiter: RateLimiter,
    started_at: Instant,
}

impl Permit {
    /// When the permit was granted, i.e. just before the call was issued.
    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        self.limiter.release(self.started_at);
    }
}
