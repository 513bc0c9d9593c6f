//! Typed publish/subscribe hub.
//!
//! Listeners are compared by identity (`Arc::ptr_eq`), so registering the same
//! listener twice under one name does nothing. One-shot listeners are taken out
//! of the registry before any listener of an emit runs, which keeps them
//! single-fire when a listener emits the same event again.

use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Key type an [`EventHub`] can be indexed by.
///
/// `is_blank` marks keys that can never be registered or emitted (the empty
/// string for string keys). Enum keys keep the default.
pub trait EventName: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static {
    fn is_blank(&self) -> bool {
        false
    }
}

impl EventName for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl EventName for &'static str {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

/// Shared callback registered on a hub.
pub type Listener<K, A> = Arc<dyn Fn(Scope<'_, K, A>, &A) + Send + Sync>;

/// Wraps a closure as a [`Listener`]. Keep the returned value around to
/// unsubscribe it later.
pub fn listener<K, A, F>(f: F) -> Listener<K, A>
where
    K: EventName,
    F: Fn(Scope<'_, K, A>, &A) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Receiver a listener is invoked with: the hub itself for [`EventHub::emit`],
/// or the caller's context for [`EventHub::emit_with_context`].
pub enum Scope<'a, K: EventName, A> {
    Hub(&'a EventHub<K, A>),
    Context(&'a (dyn Any + Send + Sync)),
}

impl<K: EventName, A> Clone for Scope<'_, K, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: EventName, A> Copy for Scope<'_, K, A> {}

impl<'a, K: EventName, A> Scope<'a, K, A> {
    pub fn hub(&self) -> Option<&'a EventHub<K, A>> {
        match *self {
            Scope::Hub(hub) => Some(hub),
            Scope::Context(_) => None,
        }
    }

    pub fn context<T: Any>(&self) -> Option<&'a T> {
        match *self {
            Scope::Hub(_) => None,
            Scope::Context(context) => context.downcast_ref::<T>(),
        }
    }
}

struct Subscription<K: EventName, A> {
    listener: Listener<K, A>,
    once: bool,
}

pub struct EventHub<K: EventName, A> {
    events: Mutex<HashMap<K, Vec<Subscription<K, A>>>>,
}

impl<K: EventName, A> Default for EventHub<K, A> {
    fn default() -> Self {
        Self {
            events: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: EventName, A> fmt::Debug for EventHub<K, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("events", &self.event_names())
            .finish()
    }
}

impl<K: EventName, A> EventHub<K, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names with at least one live subscription, in no particular order.
    pub fn event_names(&self) -> Vec<K> {
        self.events
            .lock()
            .iter()
            .filter(|(_, subs)| !subs.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn listener_count(&self, name: &K) -> usize {
        self.events.lock().get(name).map_or(0, Vec::len)
    }

    pub fn on(&self, name: K, listener: Listener<K, A>) -> &Self {
        self.register(name, listener, false)
    }

    /// Registers a listener that is dropped after its first dispatch.
    pub fn once(&self, name: K, listener: Listener<K, A>) -> &Self {
        self.register(name, listener, true)
    }

    fn register(&self, name: K, listener: Listener<K, A>, once: bool) -> &Self {
        if name.is_blank() {
            return self;
        }

        let mut events = self.events.lock();
        let subs = events.entry(name).or_default();
        if subs.iter().any(|sub| Arc::ptr_eq(&sub.listener, &listener)) {
            return self;
        }

        subs.push(Subscription { listener, once });
        self
    }

    /// Removes the first registration of `listener` under `name`.
    pub fn off(&self, name: &K, listener: &Listener<K, A>) -> &Self {
        if name.is_blank() {
            return self;
        }

        let mut events = self.events.lock();
        if let Some(subs) = events.get_mut(name) {
            if let Some(pos) = subs
                .iter()
                .position(|sub| Arc::ptr_eq(&sub.listener, listener))
            {
                subs.remove(pos);
            }
            if subs.is_empty() {
                events.remove(name);
            }
        }

        self
    }

    pub fn emit(&self, name: &K, args: &A) -> &Self {
        if name.is_blank() {
            return self;
        }

        for listener in self.take_dispatch(name).iter().rev() {
            listener(Scope::Hub(self), args);
        }

        self
    }

    /// Same dispatch as [`emit`](Self::emit), but listeners see `context`
    /// instead of the hub. Nothing happens without a context.
    pub fn emit_with_context(
        &self,
        name: &K,
        context: Option<&(dyn Any + Send + Sync)>,
        args: &A,
    ) -> &Self {
        let Some(context) = context else {
            return self;
        };
        if name.is_blank() {
            return self;
        }

        for listener in self.take_dispatch(name).iter().rev() {
            listener(Scope::Context(context), args);
        }

        self
    }

    /// Drops every subscription under `name`, or all of them when `None`.
    pub fn clear(&self, name: Option<&K>) -> &Self {
        let mut events = self.events.lock();
        match name {
            Some(name) => {
                events.remove(name);
            }
            None => events.clear(),
        }
        self
    }

    // Walks the live list backwards, pulling one-shot entries out as it goes.
    // The returned buffer is in reverse registration order; callers replay it
    // back to front. The lock is released before any listener runs.
    fn take_dispatch(&self, name: &K) -> Vec<Listener<K, A>> {
        let mut events = self.events.lock();
        let Some(subs) = events.get_mut(name) else {
            return Vec::new();
        };

        let mut used = Vec::with_capacity(subs.len());
        for i in (0..subs.len()).rev() {
            if subs[i].once {
                used.push(subs.remove(i).listener);
            } else {
                used.push(Arc::clone(&subs[i].listener));
            }
        }

        if subs.is_empty() {
            events.remove(name);
        }

        used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Hub = EventHub<&'static str, u32>;

    fn counter() -> (Arc<AtomicUsize>, Listener<&'static str, u32>) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        let l = listener(move |_, _: &u32| {
            inner.fetch_add(1, Ordering::SeqCst);
        });
        (count, l)
    }

    #[test]
    fn test_duplicate_subscription_dispatches_once() {
        let hub = Hub::new();
        let (count, l) = counter();

        hub.on("tick", Arc::clone(&l)).on("tick", Arc::clone(&l));
        hub.emit(&"tick", &1);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(hub.listener_count(&"tick"), 1);
    }

    #[test]
    fn test_once_dispatches_a_single_time() {
        let hub = Hub::new();
        let (count, l) = counter();

        hub.once("tick", l);
        hub.emit(&"tick", &1).emit(&"tick", &2);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(hub.event_names().is_empty());
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let hub = Hub::new();
        hub.emit(&"nothing", &0);
        assert!(hub.event_names().is_empty());
    }

    #[test]
    fn test_dispatch_follows_registration_order() {
        let hub: EventHub<&'static str, ()> = EventHub::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for id in 1..=4 {
            let log = Arc::clone(&log);
            let l = listener(move |_, _: &()| log.lock().push(id));
            // mix persistent and one-shot entries
            if id % 2 == 0 {
                hub.once("order", l);
            } else {
                hub.on("order", l);
            }
        }

        hub.emit(&"order", &());
        assert_eq!(*log.lock(), vec![1, 2, 3, 4]);

        hub.emit(&"order", &());
        assert_eq!(*log.lock(), vec![1, 2, 3, 4, 1, 3]);
    }

    #[test]
    fn test_off_unknown_listener_changes_nothing() {
        let hub = Hub::new();
        let (count, l) = counter();
        let (_, stranger) = counter();

        hub.on("tick", l);
        hub.off(&"tick", &stranger).off(&"other", &stranger);
        hub.emit(&"tick", &1);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(hub.listener_count(&"tick"), 1);
    }

    #[test]
    fn test_off_removes_registration() {
        let hub = Hub::new();
        let (count, l) = counter();

        hub.on("tick", Arc::clone(&l));
        hub.off(&"tick", &l);
        hub.emit(&"tick", &1);

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(hub.event_names().is_empty());
    }

    #[test]
    fn test_blank_name_is_ignored() {
        let hub = Hub::new();
        let (count, l) = counter();

        hub.on("", Arc::clone(&l));
        hub.emit(&"", &1);

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(hub.event_names().is_empty());
    }

    #[test]
    fn test_listener_receives_hub_scope_and_args() {
        let hub = Hub::new();
        let seen = Arc::new(Mutex::new(None));
        let inner = Arc::clone(&seen);

        hub.on(
            "tick",
            listener(move |scope, value: &u32| {
                let names = scope.hub().map(|hub| hub.event_names());
                *inner.lock() = Some((*value, names));
            }),
        );
        hub.emit(&"tick", &7);

        assert_eq!(*seen.lock(), Some((7, Some(vec!["tick"]))));
    }

    #[test]
    fn test_emit_with_context_binds_context() {
        struct Session {
            id: u64,
        }

        let hub = Hub::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let inner = Arc::clone(&seen);
        hub.on(
            "tick",
            listener(move |scope, _: &u32| {
                inner.lock().push(scope.context::<Session>().map(|s| s.id));
            }),
        );

        hub.emit_with_context(&"tick", None, &1);
        assert!(seen.lock().is_empty());

        let session = Session { id: 42 };
        hub.emit_with_context(&"tick", Some(&session), &1);
        assert_eq!(*seen.lock(), vec![Some(42)]);
    }

    #[test]
    fn test_reentrant_emit_keeps_once_single_fire() {
        let hub = Hub::new();
        let (count, once) = counter();
        hub.once("tick", once);

        hub.on(
            "tick",
            listener(|scope, depth: &u32| {
                if *depth == 0 {
                    if let Some(hub) = scope.hub() {
                        hub.emit(&"tick", &1);
                    }
                }
            }),
        );

        hub.emit(&"tick", &0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_event_names_and_clear() {
        let hub = Hub::new();
        let (_, a) = counter();
        let (_, b) = counter();

        hub.on("a", a).on("b", b);
        let mut names = hub.event_names();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);

        hub.clear(Some(&"a"));
        assert_eq!(hub.event_names(), vec!["b"]);

        hub.clear(None);
        assert!(hub.event_names().is_empty());
    }
}
