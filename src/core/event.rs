use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Handle returned by [`Signal::connect`], used to disconnect later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Synchronous observer list.
///
/// Delivery runs on the emitting thread, in connection order, over a
/// snapshot of the subscribers; connecting or disconnecting from inside a
/// callback affects the next emission only.
pub struct Signal<T> {
    subscribers: Mutex<Vec<(SubscriberId, Callback<T>)>>,
    next_id: AtomicU64,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<T: Copy> Signal<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect<F>(&self, callback: F) -> SubscriberId
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((id, Arc::new(callback)));
        id
    }

    /// Returns `false` if the subscriber was not connected.
    pub fn disconnect(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|(sub, _)| *sub != id);
        subscribers.len() != before
    }

    pub fn emit(&self, value: T) {
        let snapshot: Vec<Callback<T>> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(value);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}
