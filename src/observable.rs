//! Observable preferences
//!
//! An [`ObservablePreference`] wraps a [`Preference`] with a change stream
//! that replays the latest value to each new subscriber and suppresses
//! consecutive duplicates.
//!
//! Consumers either register a callback with
//! [`subscribe`](ObservablePreference::subscribe) or pull values from a
//! blocking [`Changes`] iterator:
//! - Blocking: `recv()`, `for value in changes`
//! - Non-blocking: `try_recv()`, `try_iter()`
//! - Timeout: `recv_timeout()`
//!
//! Consecutive values are compared with `PartialEq`. A float `NaN` never
//! equals the previous one, so every `set(f32::NAN)` is emitted.
//!
//! Only writes made through the observable accessor (or one of its clones)
//! reach subscribers. Writes that bypass it are picked up by an explicit
//! [`refresh`](ObservablePreference::refresh).

use crate::codec::Codec;
use crate::error::Result;
use crate::preference::Preference;
use crate::sync::MutexExt;
use log::debug;
use std::fmt;
use std::sync::{mpsc, Arc, Mutex, Weak};
use std::time::Duration;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Stream<T> {
    latest: Option<T>,
    next_id: u64,
    subscribers: Vec<(u64, Callback<T>)>,
}

impl<T: PartialEq> Stream<T> {
    fn new() -> Self {
        Self {
            latest: None,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// Deliver `value` unless it equals the latest one
    ///
    /// Values unequal to themselves (`NaN`) are always delivered.
    fn publish(&mut self, value: T) -> bool {
        if self.latest.as_ref() == Some(&value) {
            return false;
        }
        for (_, callback) in &self.subscribers {
            callback(&value);
        }
        self.latest = Some(value);
        true
    }
}

/// Type-erased handle a [`Subscription`] uses to remove itself
trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

impl<T: Send> Detach for Mutex<Stream<T>> {
    fn detach(&self, id: u64) {
        if let Ok(mut stream) = self.lock_recovered() {
            stream.subscribers.retain(|(sid, _)| *sid != id);
            debug!("Subscriber {id} detached");
        }
    }
}

/// Handle to a registered subscriber
///
/// Dropping the handle unsubscribes. It must not be dropped from inside a
/// callback of the same preference.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    stream: Weak<dyn Detach>,
}

impl Subscription {
    /// Stop delivery to this subscriber
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Whether the preference this subscription belongs to is still alive
    pub fn is_active(&self) -> bool {
        self.stream.strong_count() > 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.upgrade() {
            stream.detach(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Preference accessor with a replaying, deduplicating change stream
///
/// Clones share the same stream.
///
/// # Example
///
/// ```
/// use rprefs::Preferences;
/// use std::sync::{Arc, Mutex};
///
/// let prefs = Preferences::in_memory();
/// let token = prefs.string("token_key", "")?.observable();
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let _sub = token.subscribe(move |v: &String| sink.lock().unwrap().push(v.clone()))?;
///
/// token.set("abc".into())?;
/// token.set("abc".into())?;
/// token.set("xyz".into())?;
///
/// assert_eq!(*seen.lock().unwrap(), ["", "abc", "xyz"]);
/// # Ok::<(), rprefs::Error>(())
/// ```
pub struct ObservablePreference<C: Codec> {
    preference: Preference<C>,
    stream: Arc<Mutex<Stream<C::Value>>>,
}

impl<C: Codec> Clone for ObservablePreference<C> {
    fn clone(&self) -> Self {
        Self {
            preference: self.preference.clone(),
            stream: Arc::clone(&self.stream),
        }
    }
}

impl<C: Codec> fmt::Debug for ObservablePreference<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservablePreference")
            .field("preference", &self.preference)
            .finish_non_exhaustive()
    }
}

impl<C: Codec> ObservablePreference<C>
where
    C::Value: PartialEq,
{
    pub(crate) fn new(preference: Preference<C>) -> Self {
        Self {
            preference,
            stream: Arc::new(Mutex::new(Stream::new())),
        }
    }

    /// Read the store directly, without touching the stream
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn get(&self) -> Result<C::Value> {
        self.preference.get()
    }

    /// Persist `value`, then notify subscribers if it differs from the latest
    ///
    /// Subscribers see what a read returns afterwards: a `None` written to a
    /// nullable preference with a `Some` default emits that default. They run
    /// on the calling thread before `set` returns. Nothing is emitted when the
    /// commit fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`](crate::Error::Persistence) if the store
    /// rejects the write.
    pub fn set(&self, value: C::Value) -> Result<()> {
        let mut stream = self.stream.lock_recovered()?;
        let descriptor = self.preference.descriptor();
        let published = descriptor
            .codec()
            .read_back(value.clone(), descriptor.default_value());
        self.preference.set(value)?;
        if stream.publish(published) {
            debug!("Preference '{}' changed", self.preference.key());
        }
        Ok(())
    }

    /// Remove the stored value and emit the default
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`](crate::Error::Persistence) if the store
    /// rejects the removal.
    pub fn reset(&self) -> Result<()> {
        let mut stream = self.stream.lock_recovered()?;
        self.preference.reset()?;
        stream.publish(self.preference.default_value().clone());
        Ok(())
    }

    /// Re-read the store and push the result into the stream
    ///
    /// Use this after the store was modified behind this accessor's back.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn refresh(&self) -> Result<C::Value> {
        let mut stream = self.stream.lock_recovered()?;
        let value = self.preference.get()?;
        stream.publish(value.clone());
        Ok(value)
    }

    /// Latest value known to the stream
    ///
    /// The first call seeds the stream from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding needs a store read and it fails.
    pub fn latest(&self) -> Result<C::Value> {
        let mut stream = self.stream.lock_recovered()?;
        self.seed(&mut stream)
    }

    /// Register `callback` for value changes
    ///
    /// The callback is invoked once immediately with the latest value, then
    /// once per distinct change. It runs while the stream is locked and must
    /// not call back into this preference.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding the stream from the store fails.
    pub fn subscribe<F>(&self, callback: F) -> Result<Subscription>
    where
        F: Fn(&C::Value) + Send + Sync + 'static,
    {
        let mut stream = self.stream.lock_recovered()?;
        let latest = self.seed(&mut stream)?;
        callback(&latest);

        let id = stream.next_id;
        stream.next_id += 1;
        let callback: Callback<C::Value> = Arc::new(callback);
        stream.subscribers.push((id, callback));
        debug!(
            "Subscriber {id} attached to '{}' ({} total)",
            self.preference.key(),
            stream.subscribers.len()
        );

        let weak: Weak<Mutex<Stream<C::Value>>> = Arc::downgrade(&self.stream);
        Ok(Subscription { id, stream: weak })
    }

    /// Blocking iterator over changes, starting with the latest value
    ///
    /// # Errors
    ///
    /// Returns an error if seeding the stream from the store fails.
    pub fn changes(&self) -> Result<Changes<C::Value>> {
        let (tx, rx) = mpsc::channel();
        let subscription = self.subscribe(move |value: &C::Value| {
            // Receiver gone means the Changes is being dropped
            let _ = tx.send(value.clone());
        })?;
        Ok(Changes {
            rx,
            _subscription: subscription,
        })
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.stream
            .lock_recovered()
            .map(|s| s.subscribers.len())
            .unwrap_or(0)
    }

    pub fn key(&self) -> &str {
        self.preference.key()
    }

    /// The plain accessor underneath
    ///
    /// Writes through it are not seen by subscribers.
    pub fn preference(&self) -> &Preference<C> {
        &self.preference
    }

    fn seed(&self, stream: &mut Stream<C::Value>) -> Result<C::Value> {
        let value = match stream.latest.take() {
            Some(value) => value,
            None => self.preference.get()?,
        };
        stream.latest = Some(value.clone());
        Ok(value)
    }
}

/// Blocking iterator over the values of an [`ObservablePreference`]
///
/// Dropping it unsubscribes.
pub struct Changes<T> {
    rx: mpsc::Receiver<T>,
    _subscription: Subscription,
}

impl<T> Changes<T> {
    /// Block until the next value is available
    ///
    /// Returns `None` once the preference and all its clones are gone.
    pub fn recv(&self) -> Option<T> {
        self.rx.recv().ok()
    }

    /// Block until the next value or timeout expires
    pub fn recv_timeout(&self, timeout: Duration) -> Option<T> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Take a value without blocking
    pub fn try_recv(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Non-blocking iterator over values already queued
    pub fn try_iter(&self) -> impl Iterator<Item = T> + '_ {
        self.rx.try_iter()
    }
}

impl<T> Iterator for Changes<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.recv()
    }
}

impl<T> fmt::Debug for Changes<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Changes")
            .field("subscription", &self._subscription)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Preferences;

    fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |v: &T| sink.lock().unwrap().push(v.clone()))
    }

    #[test]
    fn test_stream_publish_dedups() {
        let mut stream = Stream::new();
        assert!(stream.publish(1));
        assert!(!stream.publish(1));
        assert!(stream.publish(2));
        assert_eq!(stream.latest, Some(2));
    }

    #[test]
    fn test_replay_then_updates() {
        let prefs = Preferences::in_memory();
        let n = prefs.int("n", 0).unwrap().observable();
        n.set(21).unwrap();

        let (seen, callback) = recorder::<i32>();
        let _sub = n.subscribe(callback).unwrap();
        n.set(21).unwrap();
        n.set(22).unwrap();

        assert_eq!(*seen.lock().unwrap(), [21, 22]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let prefs = Preferences::in_memory();
        let n = prefs.int("n", 0).unwrap().observable();

        let (seen, callback) = recorder::<i32>();
        let sub = n.subscribe(callback).unwrap();
        assert_eq!(n.subscriber_count(), 1);

        sub.unsubscribe();
        assert_eq!(n.subscriber_count(), 0);
        n.set(5).unwrap();
        assert_eq!(*seen.lock().unwrap(), [0]);
    }

    #[test]
    fn test_subscription_outlives_preference() {
        let prefs = Preferences::in_memory();
        let n = prefs.int("n", 0).unwrap().observable();
        let sub = n.subscribe(|_| {}).unwrap();

        drop(n);
        assert!(!sub.is_active());
        drop(sub);
    }

    #[test]
    fn test_changes_try_iter() {
        let prefs = Preferences::in_memory();
        let s = prefs.string("s", "a").unwrap().observable();
        let changes = s.changes().unwrap();

        s.set("b".into()).unwrap();
        s.set("b".into()).unwrap();
        s.reset().unwrap();

        let values: Vec<String> = changes.try_iter().collect();
        assert_eq!(values, ["a", "b", "a"]);
        assert!(changes.try_recv().is_none());
    }

    #[test]
    fn test_changes_closed_when_preference_dropped() {
        let prefs = Preferences::in_memory();
        let s = prefs.boolean("b", false).unwrap().observable();
        let changes = s.changes().unwrap();
        drop(s);

        assert_eq!(changes.recv(), Some(false));
        assert_eq!(changes.recv(), None);
    }

    #[test]
    fn test_recv_timeout_expires() {
        let prefs = Preferences::in_memory();
        let s = prefs.boolean("b", false).unwrap().observable();
        let changes = s.changes().unwrap();

        assert_eq!(changes.recv_timeout(Duration::from_millis(10)), Some(false));
        assert_eq!(changes.recv_timeout(Duration::from_millis(10)), None);
    }
}
