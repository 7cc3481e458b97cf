//! Keyed, suspendable countdowns.
//!
//! Each key owns at most one countdown. Countdowns run as tasks on a tokio
//! runtime and are measured with [`tokio::time::Instant`], so tests can drive
//! them with a paused clock. Pausing freezes every countdown and keeps its
//! remaining time; resuming restarts each one for exactly what was left.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::trace;

use crate::Result;

pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

struct Entry {
    task: Option<JoinHandle<()>>,
    remaining: Duration,
    started_at: Instant,
    callback: TimerCallback,
    generation: u64,
}

impl Entry {
    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct TimerState<K> {
    entries: HashMap<K, Entry>,
    paused: bool,
    next_generation: u64,
}

impl<K> TimerState<K> {
    fn bump(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }
}

pub struct TimerCoordinator<K> {
    state: Arc<Mutex<TimerState<K>>>,
    runtime: Handle,
}

impl<K> TimerCoordinator<K>
where
    K: Clone + Eq + Hash + fmt::Debug + Send + 'static,
{
    pub fn new(runtime: Handle) -> Self {
        Self {
            state: Arc::new(Mutex::new(TimerState {
                entries: HashMap::new(),
                paused: false,
                next_generation: 0,
            })),
            runtime,
        }
    }

    /// Coordinator bound to the runtime the caller is running on.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Runtime`] outside a tokio runtime.
    pub fn current() -> Result<Self> {
        Ok(Self::new(Handle::try_current()?))
    }

    /// Start (or restart) the countdown for `key`. A zero delay is ignored.
    /// While paused, the countdown is recorded but only starts on resume.
    pub fn schedule(&self, key: K, delay: Duration, callback: impl FnOnce() + Send + 'static) {
        if delay.is_zero() {
            return;
        }

        let mut state = self.state.lock();
        if let Some(mut previous) = state.entries.remove(&key) {
            previous.abort();
        }
        let generation = state.bump();
        let task = (!state.paused).then(|| self.spawn(key.clone(), generation, delay));
        trace!(?key, delay_ms = delay.as_millis(), paused = state.paused, "timer scheduled");
        state.entries.insert(
            key,
            Entry {
                task,
                remaining: delay,
                started_at: Instant::now(),
                callback: Box::new(callback),
                generation,
            },
        );
    }

    /// Drop the countdown for `key`. Returns whether one existed.
    pub fn cancel(&self, key: &K) -> bool {
        let removed = self.state.lock().entries.remove(key);
        removed.is_some_and(|mut entry| {
            entry.abort();
            true
        })
    }

    pub fn cancel_all(&self) {
        let drained: Vec<Entry> = self.state.lock().entries.drain().map(|(_, e)| e).collect();
        for mut entry in drained {
            entry.abort();
        }
    }

    /// Freeze every countdown. No-op when already paused.
    pub fn pause(&self) {
        let mut state = self.state.lock();
        if state.paused {
            return;
        }
        state.paused = true;
        let now = Instant::now();
        for entry in state.entries.values_mut() {
            entry.abort();
            let elapsed = now.saturating_duration_since(entry.started_at);
            entry.remaining = entry.remaining.saturating_sub(elapsed);
        }
        trace!(timers = state.entries.len(), "timers paused");
    }

    /// Restart every frozen countdown for its remaining time. Countdowns
    /// with nothing left fire right away, after the internal lock has been
    /// released. No-op when not paused.
    pub fn resume(&self) {
        let due = {
            let mut state = self.state.lock();
            if !state.paused {
                return;
            }
            state.paused = false;

            let due_keys: Vec<K> = state
                .entries
                .iter()
                .filter(|(_, entry)| entry.remaining.is_zero())
                .map(|(key, _)| key.clone())
                .collect();
            let due: Vec<TimerCallback> = due_keys
                .iter()
                .filter_map(|key| state.entries.remove(key))
                .map(|entry| entry.callback)
                .collect();

            let now = Instant::now();
            let pending: Vec<(K, Duration)> = state
                .entries
                .iter()
                .map(|(key, entry)| (key.clone(), entry.remaining))
                .collect();
            for (key, remaining) in pending {
                let generation = state.bump();
                let task = self.spawn(key.clone(), generation, remaining);
                if let Some(entry) = state.entries.get_mut(&key) {
                    entry.task = Some(task);
                    entry.started_at = now;
                    entry.generation = generation;
                }
            }
            trace!(restarted = state.entries.len(), due = due.len(), "timers resumed");
            due
        };

        for callback in due {
            callback();
        }
    }

    pub fn has(&self, key: &K) -> bool {
        self.state.lock().entries.contains_key(key)
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Time left on `key`'s countdown as of now.
    pub fn remaining(&self, key: &K) -> Option<Duration> {
        let state = self.state.lock();
        let entry = state.entries.get(key)?;
        if state.paused {
            return Some(entry.remaining);
        }
        let elapsed = Instant::now().saturating_duration_since(entry.started_at);
        Some(entry.remaining.saturating_sub(elapsed))
    }

    fn spawn(&self, key: K, generation: u64, delay: Duration) -> JoinHandle<()> {
        let state = Arc::downgrade(&self.state);
        self.runtime.spawn(async move {
            sleep(delay).await;
            fire(&state, &key, generation);
        })
    }
}

/// Runs the callback of `key` if its entry still belongs to `generation`.
/// A stale task whose entry was replaced or cancelled does nothing.
fn fire<K: Eq + Hash + fmt::Debug>(state: &Weak<Mutex<TimerState<K>>>, key: &K, generation: u64) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let callback = {
        let mut guard = state.lock();
        match guard.entries.get(key) {
            Some(entry) if entry.generation == generation && !guard.paused => {}
            _ => return,
        }
        guard.entries.remove(key).map(|entry| entry.callback)
    };
    if let Some(callback) = callback {
        trace!(?key, "timer fired");
        callback();
    }
}

impl<K> Drop for TimerCoordinator<K> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        for entry in state.entries.values_mut() {
            entry.abort();
        }
        state.entries.clear();
    }
}

impl<K> fmt::Debug for TimerCoordinator<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TimerCoordinator")
            .field("timers", &state.entries.len())
            .field("paused", &state.paused)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::TimerCoordinator;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::sleep;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> usize) {
        let count = Arc::new(AtomicUsize::new(0));
        let read = {
            let count = count.clone();
            move || count.load(Ordering::SeqCst)
        };
        (count, read)
    }

    fn bump(count: &Arc<AtomicUsize>) -> impl FnOnce() + Send + 'static {
        let count = count.clone();
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let timers = TimerCoordinator::<&'static str>::current().unwrap();
        let (count, fired) = counter();
        timers.schedule("a", Duration::from_millis(100), bump(&count));

        sleep(Duration::from_millis(99)).await;
        assert_eq!(fired(), 0);
        assert!(timers.has(&"a"));

        sleep(Duration::from_millis(2)).await;
        assert_eq!(fired(), 1);
        assert!(!timers.has(&"a"));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_is_ignored() {
        let timers = TimerCoordinator::<u32>::current().unwrap();
        let (count, fired) = counter();
        timers.schedule(1, Duration::ZERO, bump(&count));
        assert!(!timers.has(&1));
        sleep(Duration::from_millis(10)).await;
        assert_eq!(fired(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_supersedes_previous_timer() {
        let timers = TimerCoordinator::<u32>::current().unwrap();
        let (first, first_fired) = counter();
        let (second, second_fired) = counter();
        timers.schedule(7, Duration::from_millis(50), bump(&first));
        timers.schedule(7, Duration::from_millis(200), bump(&second));

        sleep(Duration::from_millis(100)).await;
        assert_eq!(first_fired(), 0);
        assert_eq!(second_fired(), 0);

        sleep(Duration::from_millis(101)).await;
        assert_eq!(first_fired(), 0);
        assert_eq!(second_fired(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let timers = TimerCoordinator::<u32>::current().unwrap();
        let (count, fired) = counter();
        timers.schedule(1, Duration::from_millis(50), bump(&count));
        timers.schedule(2, Duration::from_millis(50), bump(&count));
        assert!(timers.cancel(&1));
        assert!(!timers.cancel(&1));
        timers.cancel_all();
        assert!(timers.is_empty());

        sleep(Duration::from_millis(100)).await;
        assert_eq!(fired(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_preserves_remaining_time() {
        let timers = TimerCoordinator::<u32>::current().unwrap();
        let (count, fired) = counter();
        timers.schedule(1, Duration::from_millis(5_000), bump(&count));

        sleep(Duration::from_millis(1_000)).await;
        timers.pause();
        assert!(timers.is_paused());
        assert_eq!(timers.remaining(&1), Some(Duration::from_millis(4_000)));

        sleep(Duration::from_millis(3_000)).await;
        assert_eq!(fired(), 0);
        assert_eq!(timers.remaining(&1), Some(Duration::from_millis(4_000)));

        timers.resume();
        sleep(Duration::from_millis(3_999)).await;
        assert_eq!(fired(), 0);
        sleep(Duration::from_millis(2)).await;
        assert_eq!(fired(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_and_resume_are_idempotent() {
        let timers = TimerCoordinator::<u32>::current().unwrap();
        let (count, fired) = counter();
        timers.schedule(1, Duration::from_millis(300), bump(&count));

        timers.resume();
        sleep(Duration::from_millis(100)).await;
        timers.pause();
        sleep(Duration::from_millis(100)).await;
        timers.pause();
        assert_eq!(timers.remaining(&1), Some(Duration::from_millis(200)));
        timers.resume();
        timers.resume();

        sleep(Duration::from_millis(199)).await;
        assert_eq!(fired(), 0);
        sleep(Duration::from_millis(2)).await;
        assert_eq!(fired(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn scheduling_while_paused_waits_for_resume() {
        let timers = TimerCoordinator::<u32>::current().unwrap();
        let (count, fired) = counter();
        timers.pause();
        timers.schedule(1, Duration::from_millis(50), bump(&count));

        sleep(Duration::from_millis(500)).await;
        assert_eq!(fired(), 0);

        timers.resume();
        sleep(Duration::from_millis(51)).await;
        assert_eq!(fired(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn callbacks_may_reenter_the_coordinator() {
        let timers = Arc::new(TimerCoordinator::<u32>::current().unwrap());
        let (count, fired) = counter();
        let inner = Arc::downgrade(&timers);
        let chained = bump(&count);
        timers.schedule(1, Duration::from_millis(10), move || {
            if let Some(timers) = inner.upgrade() {
                timers.schedule(2, Duration::from_millis(10), chained);
            }
        });

        sleep(Duration::from_millis(11)).await;
        assert!(timers.has(&2));
        sleep(Duration::from_millis(11)).await;
        assert_eq!(fired(), 1);
    }
}
