//! Change notifications for child documents.
//!
//! Repositories publish the fresh profile after every successful write;
//! views hold a `ChildSubscription` for as long as they want updates.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use spell_core::model::{ChildId, ChildProfile};

/// Callback invoked with each new snapshot of a child.
pub type ChildListener = Arc<dyn Fn(&ChildProfile) + Send + Sync>;

type Registry = HashMap<ChildId, Vec<(u64, ChildListener)>>;

#[derive(Default)]
struct FeedInner {
    next_token: AtomicU64,
    listeners: Mutex<Registry>,
}

impl FeedInner {
    /// Lock the registry, recovering it if poisoned. No write leaves it half-done.
    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.listeners.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("child feed lock was poisoned; recovering listener registry");
            poisoned.into_inner()
        })
    }
}

/// Listener registry shared by a repository and the subscriptions it hands out.
#[derive(Clone, Default)]
pub struct ChildFeed {
    inner: Arc<FeedInner>,
}

impl ChildFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for changes to `child_id`.
    #[must_use]
    pub fn register(&self, child_id: ChildId, listener: ChildListener) -> ChildSubscription {
        let token = self.inner.next_token.fetch_add(1, Ordering::Relaxed);
        self.inner
            .registry()
            .entry(child_id)
            .or_default()
            .push((token, listener));
        ChildSubscription {
            feed: Arc::downgrade(&self.inner),
            child_id,
            token,
            released: false,
        }
    }

    /// Deliver `profile` to every listener of its child.
    ///
    /// Listeners run after the registry lock is released, so a listener may
    /// subscribe or unsubscribe without deadlocking.
    pub fn publish(&self, profile: &ChildProfile) {
        let listeners: Vec<ChildListener> = self
            .inner
            .registry()
            .get(&profile.id)
            .map(|entries| entries.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default();
        tracing::trace!(child_id = %profile.id, listeners = listeners.len(), "publishing child snapshot");
        for listener in listeners {
            listener(profile);
        }
    }

    #[must_use]
    pub fn listener_count(&self, child_id: ChildId) -> usize {
        self.inner.registry().get(&child_id).map_or(0, Vec::len)
    }
}

/// Handle to a live child subscription. Dropping it unsubscribes.
pub struct ChildSubscription {
    feed: Weak<FeedInner>,
    child_id: ChildId,
    token: u64,
    released: bool,
}

impl ChildSubscription {
    #[must_use]
    pub fn child_id(&self) -> ChildId {
        self.child_id
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let Some(inner) = self.feed.upgrade() else {
            return;
        };
        let mut guard = inner.registry();
        if let Some(entries) = guard.get_mut(&self.child_id) {
            entries.retain(|(token, _)| *token != self.token);
            if entries.is_empty() {
                guard.remove(&self.child_id);
            }
        }
    }
}

impl Drop for ChildSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ChildSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildSubscription")
            .field("child_id", &self.child_id)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_listener(counter: &Arc<AtomicUsize>) -> ChildListener {
        let counter = Arc::clone(counter);
        Arc::new(move |_profile: &ChildProfile| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn publish_reaches_only_matching_child() {
        let feed = ChildFeed::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let _sub = feed.register(ChildId::new(1), counting_listener(&hits));

        feed.publish(&ChildProfile::new(ChildId::new(1), "Maya"));
        feed.publish(&ChildProfile::new(ChildId::new(2), "Sam"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_subscription_releases_listener() {
        let feed = ChildFeed::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let sub = feed.register(ChildId::new(1), counting_listener(&hits));
        let other = feed.register(ChildId::new(1), counting_listener(&hits));
        assert_eq!(feed.listener_count(ChildId::new(1)), 2);

        drop(sub);
        assert_eq!(feed.listener_count(ChildId::new(1)), 1);
        other.unsubscribe();
        assert_eq!(feed.listener_count(ChildId::new(1)), 0);

        feed.publish(&ChildProfile::new(ChildId::new(1), "Maya"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn subscription_outliving_feed_is_harmless() {
        let feed = ChildFeed::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let sub = feed.register(ChildId::new(7), counting_listener(&hits));
        drop(feed);
        sub.unsubscribe();
    }

    #[test]
    fn poisoned_registry_still_delivers() {
        let feed = ChildFeed::new();
        let inner = Arc::clone(&feed.inner);
        let _ = std::thread::spawn(move || {
            let _guard = inner.listeners.lock().unwrap();
            panic!("listener holder crashed");
        })
        .join();
        assert!(feed.inner.listeners.is_poisoned());

        let hits = Arc::new(AtomicUsize::new(0));
        let sub = feed.register(ChildId::new(1), counting_listener(&hits));
        assert_eq!(feed.listener_count(ChildId::new(1)), 1);
        feed.publish(&ChildProfile::new(ChildId::new(1), "Maya"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        drop(sub);
        assert_eq!(feed.listener_count(ChildId::new(1)), 0);
    }
}
