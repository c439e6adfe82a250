//! Observable value containers shared between the stores and their subscribers.
//!
//! A [`Writable`] is owned by a store and is the only handle that can change the value.
//! Callers get a [`Readable`] view that can take snapshots and register [`OnChange`]
//! callbacks. Callbacks run on the thread that performed the write, after every
//! internal lock has been released, so a callback may freely read the container again.
//!
//! A callback may also write to the container it observes. Writes made while
//! subscribers are being notified are queued and delivered in order once the
//! current round finishes, so no callback is ever re-entered.

use super::callback::OnChange;
use parking_lot::Mutex;
use std::{
    collections::{BTreeMap, VecDeque},
    fmt,
    sync::{Arc, Weak},
};

struct Shared<T> {
    value: Mutex<T>,
    subscribers: Mutex<Subscribers<T>>,
    delivery: Mutex<Delivery<T>>,
}

struct Subscribers<T> {
    next_id: usize,
    entries: BTreeMap<usize, OnChange<T>>,
}

/// Values waiting to be handed to subscribers.
struct Delivery<T> {
    draining: bool,
    queue: VecDeque<Pending<T>>,
}

enum Pending<T> {
    /// A write, sent to every subscriber.
    Broadcast(T),
    /// The first value a new subscriber sees.
    Initial(usize, T),
}

impl<T: Clone + Send + 'static> Shared<T> {
    fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
            subscribers: Mutex::new(Subscribers {
                next_id: 0,
                entries: BTreeMap::new(),
            }),
            delivery: Mutex::new(Delivery {
                draining: false,
                queue: VecDeque::new(),
            }),
        }
    }

    fn notify(&self, value: T) {
        self.deliver(Pending::Broadcast(value));
    }

    /// Queues `pending` and, unless another call is already draining the queue,
    /// delivers everything queued until it is empty.
    fn deliver(&self, pending: Pending<T>) {
        {
            let mut delivery = self.delivery.lock();
            delivery.queue.push_back(pending);
            if delivery.draining {
                return;
            }
            delivery.draining = true;
        }

        loop {
            let next = {
                let mut delivery = self.delivery.lock();
                match delivery.queue.pop_front() {
                    Some(next) => next,
                    None => {
                        delivery.draining = false;
                        return;
                    }
                }
            };

            match next {
                Pending::Broadcast(value) => {
                    let callbacks: Vec<OnChange<T>> =
                        self.subscribers.lock().entries.values().cloned().collect();
                    for callback in callbacks {
                        callback.call(&value);
                    }
                }
                Pending::Initial(id, value) => {
                    let callback = self.subscribers.lock().entries.get(&id).cloned();
                    if let Some(callback) = callback {
                        callback.call(&value);
                    }
                }
            }
        }
    }

    fn subscribe(self: &Arc<Self>, callback: OnChange<T>) -> Subscription {
        let id = {
            let mut subscribers = self.subscribers.lock();
            let id = subscribers.next_id;
            subscribers.next_id += 1;
            subscribers.entries.insert(id, callback);
            id
        };

        let current = self.value.lock().clone();
        self.deliver(Pending::Initial(id, current));

        let weak: Weak<Self> = Arc::downgrade(self);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.subscribers.lock().entries.remove(&id);
                }
            })),
        }
    }
}

/// A value holder that notifies its subscribers on every write.
pub struct Writable<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Clone + Send + 'static> Writable<T> {
    /// Creates a new container holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            shared: Arc::new(Shared::new(value)),
        }
    }

    /// Returns a snapshot of the current value.
    pub fn get(&self) -> T {
        self.shared.value.lock().clone()
    }

    /// Overwrites the value and notifies subscribers.
    pub fn set(&self, value: T) {
        let snapshot = {
            let mut current = self.shared.value.lock();
            *current = value;
            current.clone()
        };
        self.shared.notify(snapshot);
    }

    /// Applies `f` to the value in place and notifies subscribers.
    ///
    /// The read-modify-write happens under the container's lock, so two concurrent
    /// updates never lose each other's changes.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let snapshot = {
            let mut current = self.shared.value.lock();
            f(&mut current);
            current.clone()
        };
        self.shared.notify(snapshot);
    }

    /// Registers a callback. It is called immediately with the current value.
    ///
    /// When registered from inside another callback of this container, the first call
    /// happens once the values already queued have been delivered.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Into<OnChange<T>>,
    {
        self.shared.subscribe(callback.into())
    }

    /// Returns a read-only view of this container.
    pub fn readable(&self) -> Readable<T> {
        Readable {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Clone for Writable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: Clone + Default + Send + 'static> Default for Writable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Writable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writable")
            .field("value", &*self.shared.value.lock())
            .field("subscribers", &self.shared.subscribers.lock().entries.len())
            .finish()
    }
}

/// A read-only view of a [`Writable`].
pub struct Readable<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Clone + Send + 'static> Readable<T> {
    /// Returns a snapshot of the current value.
    pub fn get(&self) -> T {
        self.shared.value.lock().clone()
    }

    /// Registers a callback. It is called immediately with the current value.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Into<OnChange<T>>,
    {
        self.shared.subscribe(callback.into())
    }
}

impl<T> Clone for Readable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Readable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Readable")
            .field("value", &*self.shared.value.lock())
            .finish()
    }
}

/// Keeps a callback registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the callback immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Unsubscribes the callback now.
    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl FnMut(&T) + Send) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |value: &T| sink.lock().push(value.clone()))
    }

    #[test]
    fn subscribe_emits_current_value_first() {
        let store = Writable::new(3);
        let (seen, callback) = recorder::<i32>();
        let _subscription = store.subscribe(callback);
        store.set(4);
        assert_eq!(*seen.lock(), vec![3, 4]);
    }

    #[test]
    fn update_mutates_in_place() {
        let store = Writable::new(vec![1, 2]);
        store.update(|values| values.insert(0, 0));
        assert_eq!(store.get(), vec![0, 1, 2]);
    }

    #[test]
    fn readable_observes_writes() {
        let store = Writable::new(String::from("a"));
        let view = store.readable();
        let (seen, callback) = recorder::<String>();
        let _subscription = view.subscribe(callback);
        store.set("b".to_string());
        assert_eq!(view.get(), "b");
        assert_eq!(*seen.lock(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn dropping_subscription_stops_notifications() {
        let store = Writable::new(false);
        let (seen, callback) = recorder::<bool>();
        let subscription = store.subscribe(callback);
        drop(subscription);
        store.set(true);
        assert_eq!(*seen.lock(), vec![false]);
    }

    #[test]
    fn explicit_unsubscribe_only_removes_its_own_callback() {
        let store = Writable::new(0u8);
        let (first, first_callback) = recorder::<u8>();
        let (second, second_callback) = recorder::<u8>();
        let first_subscription = store.subscribe(first_callback);
        let _second_subscription = store.subscribe(second_callback);
        first_subscription.unsubscribe();
        store.set(1);
        assert_eq!(*first.lock(), vec![0]);
        assert_eq!(*second.lock(), vec![0, 1]);
    }

    #[test]
    fn callback_may_read_the_container() {
        let store = Writable::new(1);
        let view = store.readable();
        let reads = Arc::new(Mutex::new(Vec::new()));
        let sink = reads.clone();
        let _subscription = store.subscribe(move |_: &i32| sink.lock().push(view.get()));
        store.set(2);
        assert_eq!(*reads.lock(), vec![1, 2]);
    }

    #[test]
    fn callback_may_write_the_container_it_observes() {
        let store: Writable<Option<&'static str>> = Writable::new(Some("boom"));
        let writer = store.clone();
        let (seen, mut record) = recorder::<Option<&'static str>>();
        let _subscription = store.subscribe(move |value: &Option<&'static str>| {
            record(value);
            if value.is_some() {
                writer.set(None);
            }
        });
        assert_eq!(store.get(), None);

        store.set(Some("again"));
        assert_eq!(store.get(), None);
        assert_eq!(
            *seen.lock(),
            vec![Some("boom"), None, Some("again"), None]
        );
    }

    #[test]
    fn writes_from_callbacks_reach_every_subscriber_in_order() {
        let store = Writable::new(0u8);
        let writer = store.clone();
        let _bump = store.subscribe(move |value: &u8| {
            if *value == 1 {
                writer.set(2);
            }
        });
        let (seen, callback) = recorder::<u8>();
        let _subscription = store.subscribe(callback);

        store.set(1);
        assert_eq!(*seen.lock(), vec![0, 1, 2]);
    }
}
