//! Conditional immediate/delayed transition pairs.
//!
//! A pre-check tests its condition first and only then runs the immediate
//! transition. A post-check runs the immediate transition first and tests
//! the condition against the state it produced. Either way the delayed
//! transition is armed only when the condition held and the immediate
//! transition succeeded.
//!
//! Delayed transitions are plain messages sent back into the owner's inbox
//! once the delay elapses, so they are handled in the same serialised loop
//! as everything else.

use std::{collections::HashMap, fmt, future::Future, hash::Hash, pin::Pin, time::Duration};

use tokio::{sync::mpsc, task::JoinHandle};

/// An immediate transition borrowing the state it mutates.
pub type Immediate<'a, E> = Pin<Box<dyn Future<Output = Result<(), E>> + Send + 'a>>;

/// What happened to the delayed half of a transition pair.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scheduled {
    /// A timer was armed
    Armed,
    /// The condition did not hold
    Skipped,
    /// A timer with the same key is still pending
    AlreadyPending,
}

pub struct DelayedTransitionScheduler<K, M>
where
    K: Clone + Eq + Hash + fmt::Debug,
    M: Send + 'static,
{
    outbox: mpsc::Sender<M>,
    pending: HashMap<K, JoinHandle<()>>,
}

impl<K, M> DelayedTransitionScheduler<K, M>
where
    K: Clone + Eq + Hash + fmt::Debug,
    M: Send + 'static,
{
    pub fn new(outbox: mpsc::Sender<M>) -> Self {
        Self {
            outbox,
            pending: HashMap::new(),
        }
    }

    /// Arms a timer that delivers `message` after `delay`. A key with a
    /// pending timer is left alone.
    pub fn arm(&mut self, key: K, message: M, delay: Duration) -> Scheduled {
        if self.is_pending(&key) {
            log::debug!("Timer {key:?} already pending");
            return Scheduled::AlreadyPending;
        }

        let outbox = self.outbox.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if outbox.send(message).await.is_err() {
                log::debug!("Timer fired after its owner shut down");
            }
        });
        log::debug!("Armed timer {key:?} for {}ms", delay.as_millis());
        self.pending.insert(key, handle);
        Scheduled::Armed
    }

    /// Runs `immediate` and arms the timer only if `condition` holds
    /// beforehand.
    pub async fn pre_check<S, E, C, I>(
        &mut self,
        state: &mut S,
        condition: C,
        immediate: I,
        key: K,
        message: M,
        delay: Duration,
    ) -> Result<Scheduled, E>
    where
        C: FnOnce(&S) -> bool,
        I: for<'a> FnOnce(&'a mut S) -> Immediate<'a, E>,
    {
        if !condition(state) {
            return Ok(Scheduled::Skipped);
        }
        if self.is_pending(&key) {
            log::debug!("Transition {key:?} already underway");
            return Ok(Scheduled::AlreadyPending);
        }

        immediate(state).await?;
        Ok(self.arm(key, message, delay))
    }

    /// Runs `immediate` and arms the timer if `condition` holds afterwards.
    pub async fn post_check<S, E, C, I>(
        &mut self,
        state: &mut S,
        condition: C,
        immediate: I,
        key: K,
        message: M,
        delay: Duration,
    ) -> Result<Scheduled, E>
    where
        C: FnOnce(&S) -> bool,
        I: for<'a> FnOnce(&'a mut S) -> Immediate<'a, E>,
    {
        immediate(state).await?;

        if !condition(state) {
            return Ok(Scheduled::Skipped);
        }
        Ok(self.arm(key, message, delay))
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Forgets a timer whose message has been delivered.
    pub fn fired(&mut self, key: &K) {
        self.pending.remove(key);
    }

    pub fn cancel(&mut self, key: &K) -> bool {
        match self.pending.remove(key) {
            Some(handle) => {
                handle.abort();
                log::debug!("Cancelled timer {key:?}");
                true
            }
            None => false,
        }
    }

    /// Cancels every timer whose key matches `predicate`.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&K) -> bool) -> usize {
        let mut cancelled = 0;
        self.pending.retain(|key, handle| {
            if predicate(key) {
                handle.abort();
                cancelled += 1;
                false
            } else {
                true
            }
        });
        if cancelled > 0 {
            log::debug!("Cancelled {cancelled} timers");
        }
        cancelled
    }

    pub fn cancel_all(&mut self) -> usize {
        self.cancel_where(|_| true)
    }

    /// Number of timers armed and not yet fired or cancelled.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl<K, M> Drop for DelayedTransitionScheduler<K, M>
where
    K: Clone + Eq + Hash + fmt::Debug,
    M: Send + 'static,
{
    fn drop(&mut self) {
        for handle in self.pending.values() {
            handle.abort();
        }
    }
}
