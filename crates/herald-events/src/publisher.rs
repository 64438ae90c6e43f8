//! Publisher - per-instance listener registry with synchronous broadcast.
//!
//! A type becomes an event source by embedding a [`Publisher`] in a private
//! field and implementing [`Publish`]. The trait only hands out a
//! [`Subscriptions`] view, which has no `broadcast`, so only code that can
//! reach the field (the owning type itself) can publish.
//!
//! # Concurrency
//!
//! The listener list sits behind an `RwLock`. Every mutation takes the write
//! lock. `broadcast` copies the list under the read lock and releases it
//! before calling any listener, so listeners may subscribe or unsubscribe
//! (themselves included) while an event is being delivered. Such changes
//! only affect later broadcasts.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use herald_models::EventName;
use tracing::{debug, trace, warn};

use crate::callable::CallableAdapter;
use crate::config::PublisherConfig;
use crate::error::{PublisherError, Result};
use crate::listener::{same_listener, BoxError, Callback, Listener};

/// Listener registry and dispatcher for one event source.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use herald_events::{Listener, ListenerResult, Publish, Publisher, Subscriptions};
/// use herald_models::EventName;
///
/// struct PromoteUser {
///     events: Publisher<u64>,
/// }
///
/// impl Publish<u64> for PromoteUser {
///     fn subscriptions(&self) -> Subscriptions<'_, u64> {
///         self.events.subscriptions()
///     }
/// }
///
/// impl PromoteUser {
///     fn call(&self, user_id: u64) -> Result<(), herald_events::BoxError> {
///         self.events.broadcast("user_promoted", &user_id)?;
///         Ok(())
///     }
/// }
///
/// struct NotifyUserOfPromotion;
///
/// impl Listener<u64> for NotifyUserOfPromotion {
///     fn on_event(&self, name: &EventName, user_id: &u64) -> ListenerResult {
///         println!("{} => {}", name, user_id);
///         Ok(())
///     }
/// }
///
/// let command = PromoteUser { events: Publisher::new() };
/// let listener: Arc<dyn Listener<u64>> = Arc::new(NotifyUserOfPromotion);
/// command.subscribe(listener).unwrap();
/// command.call(42).unwrap();
/// ```
pub struct Publisher<P> {
    config: PublisherConfig,
    listeners: RwLock<Vec<Arc<dyn Listener<P>>>>,
}

impl<P: 'static> Publisher<P> {
    /// Creates a publisher with no listeners and default configuration.
    pub fn new() -> Self {
        Self::with_config(PublisherConfig::default())
    }

    /// Creates a publisher with no listeners.
    pub fn with_config(config: PublisherConfig) -> Self {
        Self {
            config,
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    /// Returns a view exposing every operation except `broadcast`.
    pub fn subscriptions(&self) -> Subscriptions<'_, P> {
        Subscriptions { publisher: self }
    }

    /// Returns true if `listener` is subscribed.
    pub fn is_subscribed<L>(&self, listener: &Arc<L>) -> bool
    where
        L: Listener<P> + ?Sized,
    {
        self.listeners
            .read()
            .map(|listeners| listeners.iter().any(|e| same_listener(e, listener)))
            .unwrap_or(false)
    }

    /// Returns true if an adapter around `callback` is subscribed.
    pub fn is_callback_subscribed(&self, callback: &Callback<P>) -> bool {
        self.listeners()
            .map(|listeners| listeners.iter().any(|e| e.wraps_callback(callback)))
            .unwrap_or(false)
    }

    /// Subscribes a listener. It receives events after every listener
    /// subscribed before it.
    ///
    /// # Errors
    ///
    /// - `AlreadyRegistered` if this exact listener is already subscribed
    /// - `NoEventHandler` if the listener reports it cannot receive events
    pub fn subscribe(&self, listener: Arc<dyn Listener<P>>) -> Result<&Self> {
        // Ask the listener before locking; user code must not run under the lock.
        let description = listener.describe();
        let has_handler = listener.has_event_handler();

        let mut listeners = self.write()?;

        if listeners.iter().any(|e| same_listener(e, &listener)) {
            return Err(PublisherError::AlreadyRegistered(description));
        }

        if !has_handler {
            return Err(PublisherError::NoEventHandler(description));
        }

        listeners.push(listener);
        debug!(listener = %description, count = listeners.len(), "listener subscribed");

        Ok(self)
    }

    /// Unsubscribes a listener.
    ///
    /// # Errors
    ///
    /// `NotRegistered` if the listener is not subscribed.
    pub fn unsubscribe<L>(&self, listener: &Arc<L>) -> Result<&Self>
    where
        L: Listener<P> + ?Sized,
    {
        let description = listener.describe();

        let (_removed, count) = {
            let mut listeners = self.write()?;
            let index = listeners
                .iter()
                .position(|e| same_listener(e, listener))
                .ok_or_else(|| PublisherError::NotRegistered(description.clone()))?;
            (listeners.remove(index), listeners.len())
        };
        debug!(listener = %description, count, "listener unsubscribed");

        Ok(self)
    }

    /// Unsubscribes every listener. Safe to call when there are none.
    pub fn unsubscribe_all(&self) -> Result<&Self> {
        // Dropped after the guard, so listener destructors run unlocked.
        let removed = std::mem::take(&mut *self.write()?);
        debug!(removed = removed.len(), "all listeners unsubscribed");

        Ok(self)
    }

    /// Subscribes a bare callback to `name`.
    ///
    /// The callback is wrapped in a fresh [`CallableAdapter`] using the
    /// configured matching mode, so subscribing the same callback twice
    /// creates two independent entries.
    ///
    /// # Errors
    ///
    /// `MissingCallback` if `callback` is `None`.
    pub fn on(&self, name: impl Into<EventName>, callback: Option<Callback<P>>) -> Result<&Self> {
        let name = name.into();
        let callback = callback.ok_or_else(|| PublisherError::MissingCallback(name.clone()))?;
        let adapter = CallableAdapter::with_match(name, callback, self.config.callable_match);

        self.subscribe(Arc::new(adapter))
    }

    /// Unsubscribes the earliest adapter wrapping `callback`.
    ///
    /// # Errors
    ///
    /// `NotRegistered` if no adapter wraps `callback`.
    pub fn unsubscribe_callback(&self, callback: &Callback<P>) -> Result<&Self> {
        let not_registered = || PublisherError::NotRegistered("callable".to_string());

        let target = self
            .listeners()?
            .into_iter()
            .find(|e| e.wraps_callback(callback))
            .ok_or_else(not_registered)?;

        let (removed, count) = {
            let mut listeners = self.write()?;
            let index = listeners
                .iter()
                .position(|e| same_listener(e, &target))
                .ok_or_else(not_registered)?;
            (listeners.remove(index), listeners.len())
        };
        debug!(listener = %removed.describe(), count, "callback unsubscribed");

        Ok(self)
    }

    /// Broadcasts an event to every listener subscribed when the call starts.
    ///
    /// Listeners are called synchronously in subscription order. The first
    /// listener error stops delivery and is returned unchanged.
    pub fn broadcast(
        &self,
        name: impl Into<EventName>,
        payload: &P,
    ) -> std::result::Result<&Self, BoxError> {
        let name = name.into();
        let snapshot = self.listeners()?;

        trace!(event = %name, listeners = snapshot.len(), "broadcasting event");

        for listener in &snapshot {
            if self.config.log_deliveries {
                trace!(event = %name, listener = %listener.describe(), "delivering event");
            }

            if let Err(e) = listener.on_event(&name, payload) {
                warn!(
                    event = %name,
                    listener = %listener.describe(),
                    error = %e,
                    "listener failed, aborting broadcast"
                );
                return Err(e);
            }
        }

        Ok(self)
    }

    /// Broadcasts an event with the default payload.
    pub fn broadcast_empty(
        &self,
        name: impl Into<EventName>,
    ) -> std::result::Result<&Self, BoxError>
    where
        P: Default,
    {
        self.broadcast(name, &P::default())
    }

    /// Returns a copy of the current listener list, in dispatch order.
    pub fn listeners(&self) -> Result<Vec<Arc<dyn Listener<P>>>> {
        Ok(self.read()?.clone())
    }

    /// Returns the number of subscribed listeners.
    pub fn len(&self) -> usize {
        self.listeners.read().map(|l| l.len()).unwrap_or(0)
    }

    /// Returns true if nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Arc<dyn Listener<P>>>>> {
        self.listeners
            .read()
            .map_err(|e| PublisherError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Arc<dyn Listener<P>>>>> {
        self.listeners
            .write()
            .map_err(|e| PublisherError::LockPoisoned(e.to_string()))
    }
}

impl<P: 'static> Default for Publisher<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for Publisher<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.listeners.read().map(|l| l.len()).unwrap_or(0);
        f.debug_struct("Publisher")
            .field("config", &self.config)
            .field("listeners", &count)
            .finish()
    }
}

/// Subscription operations of a [`Publisher`], without `broadcast`.
///
/// Handed out by [`Publisher::subscriptions`] and [`Publish::subscriptions`].
/// Nothing reachable from this view can publish an event.
pub struct Subscriptions<'a, P> {
    publisher: &'a Publisher<P>,
}

impl<P> Clone for Subscriptions<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Subscriptions<'_, P> {}

impl<'a, P: 'static> Subscriptions<'a, P> {
    /// See [`Publisher::is_subscribed`].
    pub fn is_subscribed<L>(self, listener: &Arc<L>) -> bool
    where
        L: Listener<P> + ?Sized,
    {
        self.publisher.is_subscribed(listener)
    }

    /// See [`Publisher::is_callback_subscribed`].
    pub fn is_callback_subscribed(self, callback: &Callback<P>) -> bool {
        self.publisher.is_callback_subscribed(callback)
    }

    /// See [`Publisher::subscribe`].
    pub fn subscribe(self, listener: Arc<dyn Listener<P>>) -> Result<Self> {
        self.publisher.subscribe(listener)?;
        Ok(self)
    }

    /// See [`Publisher::unsubscribe`].
    pub fn unsubscribe<L>(self, listener: &Arc<L>) -> Result<Self>
    where
        L: Listener<P> + ?Sized,
    {
        self.publisher.unsubscribe(listener)?;
        Ok(self)
    }

    /// See [`Publisher::unsubscribe_all`].
    pub fn unsubscribe_all(self) -> Result<Self> {
        self.publisher.unsubscribe_all()?;
        Ok(self)
    }

    /// See [`Publisher::on`].
    pub fn on(self, name: impl Into<EventName>, callback: Option<Callback<P>>) -> Result<Self> {
        self.publisher.on(name, callback)?;
        Ok(self)
    }

    /// See [`Publisher::unsubscribe_callback`].
    pub fn unsubscribe_callback(self, callback: &Callback<P>) -> Result<Self> {
        self.publisher.unsubscribe_callback(callback)?;
        Ok(self)
    }

    /// See [`Publisher::len`].
    pub fn len(self) -> usize {
        self.publisher.len()
    }

    /// See [`Publisher::is_empty`].
    pub fn is_empty(self) -> bool {
        self.publisher.is_empty()
    }
}

impl<P> fmt::Debug for Subscriptions<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subscriptions").field(self.publisher).finish()
    }
}

/// Grants the subscription operations of an embedded [`Publisher`].
///
/// Each method returns the implementing value for chaining. The trait only
/// ever exposes a [`Subscriptions`] view, so broadcasting stays with the
/// code that can reach the embedded field.
///
/// Outside code cannot broadcast through the view:
///
/// ```compile_fail
/// mod command {
///     use herald_events::{Publish, Publisher, Subscriptions};
///
///     pub struct PromoteUser {
///         events: Publisher<u64>,
///     }
///
///     impl PromoteUser {
///         pub fn new() -> Self {
///             Self { events: Publisher::new() }
///         }
///     }
///
///     impl Publish<u64> for PromoteUser {
///         fn subscriptions(&self) -> Subscriptions<'_, u64> {
///             self.events.subscriptions()
///         }
///     }
/// }
///
/// use herald_events::Publish;
///
/// let command = command::PromoteUser::new();
/// command.subscriptions().broadcast("user_promoted", &666).unwrap();
/// ```
///
/// nor through the embedded field:
///
/// ```compile_fail
/// mod command {
///     use herald_events::Publisher;
///
///     pub struct PromoteUser {
///         events: Publisher<u64>,
///     }
///
///     impl PromoteUser {
///         pub fn new() -> Self {
///             Self { events: Publisher::new() }
///         }
///     }
/// }
///
/// let command = command::PromoteUser::new();
/// command.events.broadcast("user_promoted", &666).unwrap();
/// ```
pub trait Publish<P: 'static> {
    /// Returns the subscription view of the embedded publisher.
    fn subscriptions(&self) -> Subscriptions<'_, P>;

    /// See [`Publisher::is_subscribed`].
    fn is_subscribed<L>(&self, listener: &Arc<L>) -> bool
    where
        L: Listener<P> + ?Sized,
    {
        self.subscriptions().is_subscribed(listener)
    }

    /// See [`Publisher::is_callback_subscribed`].
    fn is_callback_subscribed(&self, callback: &Callback<P>) -> bool {
        self.subscriptions().is_callback_subscribed(callback)
    }

    /// See [`Publisher::subscribe`].
    fn subscribe(&self, listener: Arc<dyn Listener<P>>) -> Result<&Self> {
        self.subscriptions().subscribe(listener)?;
        Ok(self)
    }

    /// See [`Publisher::unsubscribe`].
    fn unsubscribe<L>(&self, listener: &Arc<L>) -> Result<&Self>
    where
        L: Listener<P> + ?Sized,
    {
        self.subscriptions().unsubscribe(listener)?;
        Ok(self)
    }

    /// See [`Publisher::unsubscribe_all`].
    fn unsubscribe_all(&self) -> Result<&Self> {
        self.subscriptions().unsubscribe_all()?;
        Ok(self)
    }

    /// See [`Publisher::on`].
    fn on(&self, name: impl Into<EventName>, callback: Option<Callback<P>>) -> Result<&Self> {
        self.subscriptions().on(name, callback)?;
        Ok(self)
    }

    /// See [`Publisher::unsubscribe_callback`].
    fn unsubscribe_callback(&self, callback: &Callback<P>) -> Result<&Self> {
        self.subscriptions().unsubscribe_callback(callback)?;
        Ok(self)
    }
}
