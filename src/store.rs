//! Observable collection of live toasts.
//!
//! The current list is an immutable snapshot swapped atomically on every
//! change; readers never block writers. A write holds the store until every
//! listener has seen its snapshot, so listeners observe changes in the order
//! they were made. The lock is reentrant: a listener may read the store or
//! write to it from the same thread. A listener must not wait on another
//! thread that writes to the store.

use std::fmt;
use std::sync::{Arc, Weak};

use arc_swap::ArcSwap;
use parking_lot::{Mutex, ReentrantMutex};
use tracing::trace;
use uuid::Uuid;

use crate::toast::{Toast, ToastId};
use crate::types::Position;

pub type Snapshot = Arc<Vec<Toast>>;

type Listener = Arc<dyn Fn(&Snapshot) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

struct StoreInner {
    snap: ArcSwap<Vec<Toast>>,
    write: ReentrantMutex<()>,
    listeners: Mutex<Listeners>,
}

/// Cheaply clonable handle; clones share the same toasts and listeners.
#[derive(Clone)]
pub struct ToastStore {
    inner: Arc<StoreInner>,
}

impl Default for ToastStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                snap: ArcSwap::from_pointee(Vec::new()),
                write: ReentrantMutex::new(()),
                listeners: Mutex::new(Listeners::default()),
            }),
        }
    }

    /// Append `toast`, replacing any record with the same id.
    pub fn add(&self, toast: Toast) {
        let _write = self.inner.write.lock();
        let mut next: Vec<Toast> = self
            .inner
            .snap
            .load()
            .iter()
            .filter(|existing| existing.id != toast.id)
            .cloned()
            .collect();
        next.push(toast);
        self.publish(&self.swap(next));
    }

    /// Replace the record under `id` with what `updater` returns. `None`
    /// from the updater means "unchanged" and publishes nothing.
    pub fn update<F>(&self, id: &ToastId, updater: F) -> bool
    where
        F: FnOnce(&Toast) -> Option<Toast>,
    {
        let _write = self.inner.write.lock();
        let current = self.inner.snap.load_full();
        let Some(index) = current.iter().position(|toast| &toast.id == id) else {
            return false;
        };
        let Some(replacement) = updater(&current[index]) else {
            return false;
        };
        let mut next: Vec<Toast> = current.as_ref().clone();
        next[index] = replacement;
        self.publish(&self.swap(next));
        true
    }

    pub fn remove(&self, id: &ToastId) -> bool {
        self.remove_where(|toast| &toast.id == id)
    }

    /// Remove the record under `id` only if it is still `instance_id`.
    pub fn remove_instance(&self, id: &ToastId, instance_id: Uuid) -> bool {
        self.remove_where(|toast| &toast.id == id && toast.instance_id == instance_id)
    }

    /// Remove everything, or only the records at `position`. Returns the ids
    /// that were removed.
    pub fn clear(&self, position: Option<Position>) -> Vec<ToastId> {
        let _write = self.inner.write.lock();
        let current = self.inner.snap.load_full();
        let (removed, kept): (Vec<&Toast>, Vec<&Toast>) = current
            .iter()
            .partition(|toast| position.is_none_or(|p| toast.position == p));
        if removed.is_empty() {
            return Vec::new();
        }
        let removed: Vec<ToastId> = removed.into_iter().map(|t| t.id.clone()).collect();
        let kept: Vec<Toast> = kept.into_iter().cloned().collect();
        self.publish(&self.swap(kept));
        removed
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.snap.load_full()
    }

    pub fn get(&self, id: &ToastId) -> Option<Toast> {
        self.inner
            .snap
            .load()
            .iter()
            .find(|toast| &toast.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.snap.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register `listener` for every future change. The listener stays
    /// registered until the returned [`Subscription`] is dropped or
    /// explicitly unsubscribed.
    #[must_use = "dropping the subscription unsubscribes the listener"]
    pub fn subscribe(&self, listener: impl Fn(&Snapshot) + Send + Sync + 'static) -> Subscription {
        let mut listeners = self.inner.listeners.lock();
        listeners.next_id += 1;
        let id = listeners.next_id;
        listeners.entries.push((id, Arc::new(listener)));
        trace!(listener = id, total = listeners.entries.len(), "store listener added");
        Subscription {
            store: Arc::downgrade(&self.inner),
            id,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().entries.len()
    }

    fn remove_where(&self, predicate: impl Fn(&Toast) -> bool) -> bool {
        let _write = self.inner.write.lock();
        let current = self.inner.snap.load_full();
        let next: Vec<Toast> = current
            .iter()
            .filter(|toast| !predicate(toast))
            .cloned()
            .collect();
        if next.len() == current.len() {
            return false;
        }
        self.publish(&self.swap(next));
        true
    }

    fn swap(&self, next: Vec<Toast>) -> Snapshot {
        let next = Arc::new(next);
        self.inner.snap.store(Arc::clone(&next));
        next
    }

    fn publish(&self, snapshot: &Snapshot) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        trace!(toasts = snapshot.len(), listeners = listeners.len(), "store published");
        for listener in listeners {
            // A listener wrote to the store and the newer snapshot has
            // already gone out to everyone.
            if !Arc::ptr_eq(&self.inner.snap.load(), snapshot) {
                break;
            }
            listener(snapshot);
        }
    }
}

impl fmt::Debug for ToastStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastStore")
            .field("toasts", &self.len())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Handle to a store listener.
pub struct Subscription {
    store: Weak<StoreInner>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.listeners.lock().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ToastStore;
    use crate::config::EngineSettings;
    use crate::factory::{Defaults, create};
    use crate::toast::{Toast, ToastId, ToastOptions};
    use crate::types::Position;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn toast(id: &str, position: Position) -> Toast {
        create(
            &ToastOptions::titled(id).id(id).position(position),
            &Defaults::default(),
            &EngineSettings::default(),
        )
    }

    fn counting(store: &ToastStore) -> (Arc<AtomicUsize>, super::Subscription) {
        let count = Arc::new(AtomicUsize::new(0));
        let sub = {
            let count = count.clone();
            store.subscribe(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };
        (count, sub)
    }

    #[test]
    fn add_deduplicates_by_id() {
        let store = ToastStore::new();
        store.add(toast("a", Position::TopRight));
        store.add(toast("b", Position::TopRight));
        store.add(toast("a", Position::BottomLeft));

        let snap = store.snapshot();
        let ids: Vec<&str> = snap.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(snap[1].position, Position::BottomLeft);
    }

    #[test]
    fn update_publishes_only_on_change() {
        let store = ToastStore::new();
        store.add(toast("a", Position::TopRight));
        let (count, _sub) = counting(&store);

        assert!(!store.update(&ToastId::from("a"), |_| None));
        assert!(!store.update(&ToastId::from("missing"), |t| Some(t.clone())));
        assert_eq!(count.load(Ordering::SeqCst), 0);

        assert!(store.update(&ToastId::from("a"), |t| {
            let mut next = t.clone();
            next.exiting = true;
            Some(next)
        }));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(store.get(&ToastId::from("a")).unwrap().exiting);
    }

    #[test]
    fn remove_publishes_only_when_something_left() {
        let store = ToastStore::new();
        store.add(toast("a", Position::TopRight));
        let (count, _sub) = counting(&store);

        assert!(!store.remove(&ToastId::from("zzz")));
        assert!(store.remove(&ToastId::from("a")));
        assert!(store.is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remove_instance_spares_newer_generation() {
        let store = ToastStore::new();
        let first = toast("a", Position::TopRight);
        let stale = first.instance_id;
        store.add(first);
        store.add(toast("a", Position::TopRight));

        assert!(!store.remove_instance(&ToastId::from("a"), stale));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_by_position_keeps_other_stacks() {
        let store = ToastStore::new();
        store.add(toast("a", Position::TopRight));
        store.add(toast("b", Position::BottomLeft));
        store.add(toast("c", Position::TopRight));

        let removed = store.clear(Some(Position::TopRight));
        assert_eq!(removed, [ToastId::from("a"), ToastId::from("c")]);
        assert_eq!(store.len(), 1);

        assert!(store.clear(Some(Position::TopRight)).is_empty());
        assert_eq!(store.clear(None).len(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn every_listener_sees_every_change_until_unsubscribed() {
        let store = ToastStore::new();
        let (first, first_sub) = counting(&store);
        let (second, _second_sub) = counting(&store);
        assert_eq!(store.listener_count(), 2);

        store.add(toast("a", Position::TopRight));
        first_sub.unsubscribe();
        store.add(toast("b", Position::TopRight));

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 2);
        assert_eq!(store.listener_count(), 1);
    }

    #[test]
    fn listeners_observe_the_published_snapshot() {
        let store = ToastStore::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let _sub = {
            let seen = seen.clone();
            let reader = store.clone();
            store.subscribe(move |snap| {
                assert_eq!(snap.len(), reader.len());
                seen.store(snap.len(), Ordering::SeqCst);
            })
        };
        store.add(toast("a", Position::TopRight));
        store.add(toast("b", Position::TopRight));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn concurrent_writers_notify_in_write_order() {
        let store = ToastStore::new();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let _sub = {
            let seen = seen.clone();
            store.subscribe(move |snap| seen.lock().push(snap.len()))
        };

        let writers: Vec<_> = ["a", "b"]
            .into_iter()
            .map(|prefix| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for n in 0..50 {
                        store.add(toast(&format!("{prefix}{n}"), Position::TopRight));
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let seen = seen.lock();
        assert_eq!(seen.len(), 100);
        assert!(seen.windows(2).all(|pair| pair[0] < pair[1]), "{seen:?}");
        assert_eq!(seen.last().copied(), Some(store.len()));
    }

    #[test]
    fn listener_may_write_back_without_stale_delivery() {
        let store = ToastStore::new();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let _writer = {
            let writer = store.clone();
            store.subscribe(move |snap| {
                if snap.len() == 1 {
                    writer.add(toast("echo", Position::BottomLeft));
                }
            })
        };
        let _recorder = {
            let seen = seen.clone();
            store.subscribe(move |snap| seen.lock().push(snap.len()))
        };

        store.add(toast("a", Position::TopRight));
        assert_eq!(store.len(), 2);
        assert_eq!(seen.lock().as_slice(), [2]);
    }
}
