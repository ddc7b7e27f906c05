//! Debounced values for rapidly-changing input.
//!
//! A [`Debouncer`] holds the last settled value plus at most one pending value
//! with a deadline. Observing a new value replaces the pending one, so an
//! older deadline can never fire. Nothing runs in the background: the
//! deadline is only awaited inside [`Debouncer::next_settled`], and dropping
//! the debouncer drops the pending value with it.

use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// Default settle delay for keyboard input.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Surfaces a value only once it has stopped changing for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    settled: T,
    pending: Option<Pending<T>>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    /// The settled value starts out as `initial`; there is no initial delay.
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            settled: initial,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn settled(&self) -> &T {
        &self.settled
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record the latest input and (re)arm the deadline.
    ///
    /// A value equal to the pending one leaves the running deadline alone.
    /// Returning to the settled value drops the pending one, so a pending
    /// value always differs from the settled value. Returns `true` if the
    /// deadline was armed.
    pub fn observe(&mut self, value: T) -> bool {
        if value == self.settled {
            self.pending = None;
            return false;
        }
        if self.pending() == Some(&value) {
            return false;
        }
        self.pending = Some(Pending {
            value,
            deadline: Instant::now() + self.delay,
        });
        true
    }

    /// Change the delay. A pending value is re-armed with the new delay.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
        if let Some(pending) = self.pending.as_mut() {
            pending.deadline = Instant::now() + delay;
        }
    }

    /// Drop any pending value and settle on `value` immediately.
    /// Returns `true` if the settled value changed.
    pub fn settle_now(&mut self, value: T) -> bool {
        self.pending = None;
        if self.settled == value {
            return false;
        }
        self.settled = value;
        true
    }

    /// Drop the pending value without settling it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Settle the pending value if its deadline is at or before `now`.
    ///
    /// Returns the new settled value only when it differs from the previous
    /// one.
    pub fn poll_settle(&mut self, now: Instant) -> Option<&T> {
        match &self.pending {
            Some(pending) if pending.deadline <= now => {}
            _ => return None,
        }
        let pending = self.pending.take()?;
        if pending.value == self.settled {
            return None;
        }
        self.settled = pending.value;
        Some(&self.settled)
    }

    /// Wait until the settled value changes and return it.
    ///
    /// Never resolves while nothing is pending. Cancel-safe: dropping the
    /// future before it resolves leaves the debouncer untouched.
    pub async fn next_settled(&mut self) -> T {
        loop {
            let Some(deadline) = self.pending.as_ref().map(|p| p.deadline) else {
                return std::future::pending().await;
            };
            sleep_until(deadline).await;
            if let Some(value) = self.poll_settle(Instant::now()).cloned() {
                return value;
            }
        }
    }
}
