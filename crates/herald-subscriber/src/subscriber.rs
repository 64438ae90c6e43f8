//! Subscriber - a listener dispatching events to named handlers.
//!
//! Each incoming event name is resolved to a method name with
//! [`ResolveMethod`] and looked up in the subscriber's handler table.
//! With the default configuration `UserPromoted` and `user_promoted` both
//! resolve to `on_user_promoted`.

use std::collections::HashMap;
use std::fmt;

use herald_events::{Listener, ListenerResult};
use herald_models::EventName;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::SubscriberError;
use crate::resolve::ResolveMethod;

/// Handler invoked with the event payload.
pub type Handler<P> = Box<dyn Fn(&P) -> ListenerResult + Send + Sync>;

/// Configuration for a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriberConfig {
    /// Prefix resolved method names with `on_`.
    pub prefix: bool,
    /// Fail on events that have no handler instead of ignoring them.
    pub strict: bool,
    /// Snake-case event names before resolving.
    pub underscore: bool,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            prefix: true,
            strict: true,
            underscore: true,
        }
    }
}

impl SubscriberConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether method names are prefixed.
    pub fn with_prefix(mut self, prefix: bool) -> Self {
        self.prefix = prefix;
        self
    }

    /// Sets whether unhandled events are errors.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets whether event names are snake-cased.
    pub fn with_underscore(mut self, underscore: bool) -> Self {
        self.underscore = underscore;
        self
    }
}

/// A listener that routes events to handlers by resolved method name.
///
/// A subscriber without handlers reports no event handler and is refused by
/// [`Publisher::subscribe`](herald_events::Publisher::subscribe).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use herald_events::{Listener, Publisher};
/// use herald_subscriber::{Subscriber, SubscriberConfig};
///
/// let audit = Subscriber::new(SubscriberConfig::default())
///     .handle("on_user_promoted", |user_id: &u64| {
///         println!("promoted {}", user_id);
///         Ok(())
///     });
///
/// let publisher: Publisher<u64> = Publisher::new();
/// let listener: Arc<dyn Listener<u64>> = Arc::new(audit);
/// publisher.subscribe(listener).unwrap();
/// publisher.broadcast("UserPromoted", &42).unwrap();
/// ```
pub struct Subscriber<P> {
    config: SubscriberConfig,
    resolver: ResolveMethod,
    handlers: HashMap<String, Handler<P>>,
}

impl<P> Subscriber<P> {
    /// Creates a subscriber with no handlers.
    pub fn new(config: SubscriberConfig) -> Self {
        let resolver = if config.underscore {
            ResolveMethod::underscored()
        } else {
            ResolveMethod::new()
        };

        Self::with_resolver(config, resolver)
    }

    /// Creates a subscriber with a custom resolver.
    ///
    /// The resolver's transform replaces the `underscore` setting.
    pub fn with_resolver(config: SubscriberConfig, resolver: ResolveMethod) -> Self {
        Self {
            config,
            resolver,
            handlers: HashMap::new(),
        }
    }

    /// Registers `handler` under `method`, replacing any previous one.
    pub fn handle<F>(mut self, method: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&P) -> ListenerResult + Send + Sync + 'static,
    {
        self.handlers.insert(method.into(), Box::new(handler));
        self
    }

    /// Returns true if a handler is registered under `method`.
    pub fn handles(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Returns the method name `name` resolves to.
    pub fn method_for(&self, name: &EventName) -> String {
        self.resolver.call(name, self.config.prefix)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SubscriberConfig {
        &self.config
    }
}

impl<P> Listener<P> for Subscriber<P> {
    fn on_event(&self, name: &EventName, payload: &P) -> ListenerResult {
        let method = self.method_for(name);

        match self.handlers.get(&method) {
            Some(handler) => handler(payload),
            None if self.config.strict => Err(SubscriberError::UnhandledEvent {
                event: name.clone(),
                method,
            }
            .into()),
            None => {
                trace!(event = %name, method = %method, "no handler, event ignored");
                Ok(())
            }
        }
    }

    fn has_event_handler(&self) -> bool {
        !self.handlers.is_empty()
    }

    fn describe(&self) -> String {
        let mut methods: Vec<&str> = self.handlers.keys().map(|m| m.as_str()).collect();
        methods.sort_unstable();
        format!("subscriber[{}]", methods.join(", "))
    }
}

impl<P> fmt::Debug for Subscriber<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("config", &self.config)
            .field("resolver", &self.resolver)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_events::{Publisher, PublisherError};
    use std::sync::{Arc, Mutex};

    fn recording(config: SubscriberConfig) -> (Arc<Mutex<Vec<String>>>, Subscriber<i32>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let created = seen.clone();
        let deleted = seen.clone();

        let subscriber = Subscriber::new(config)
            .handle("on_item_created", move |p: &i32| {
                created.lock().unwrap().push(format!("created {}", p));
                Ok(())
            })
            .handle("on_item_deleted", move |p: &i32| {
                deleted.lock().unwrap().push(format!("deleted {}", p));
                Ok(())
            });

        (seen, subscriber)
    }

    #[test]
    fn test_default_config() {
        let config = SubscriberConfig::default();

        assert!(config.prefix);
        assert!(config.strict);
        assert!(config.underscore);
    }

    #[test]
    fn test_config_builder() {
        let config = SubscriberConfig::new()
            .with_prefix(false)
            .with_strict(false)
            .with_underscore(false);

        assert!(!config.prefix);
        assert!(!config.strict);
        assert!(!config.underscore);
    }

    #[test]
    fn test_config_from_json() {
        let config: SubscriberConfig = serde_json::from_str(r#"{"strict": false}"#).unwrap();

        assert!(config.prefix);
        assert!(!config.strict);
        assert!(config.underscore);
    }

    #[test]
    fn test_dispatches_by_resolved_method() {
        let (seen, subscriber) = recording(SubscriberConfig::default());

        subscriber.on_event(&"ItemCreated".into(), &1).unwrap();
        subscriber.on_event(&"item_deleted".into(), &2).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["created 1", "deleted 2"]);
    }

    #[test]
    fn test_method_for() {
        let (_, subscriber) = recording(SubscriberConfig::default());
        assert_eq!(subscriber.method_for(&"ItemCreated".into()), "on_item_created");

        let config = SubscriberConfig::new()
            .with_prefix(false)
            .with_underscore(false);
        let (_, plain) = recording(config);
        assert_eq!(plain.method_for(&"ItemCreated".into()), "ItemCreated");
    }

    #[test]
    fn test_strict_rejects_unhandled() {
        let (_, subscriber) = recording(SubscriberConfig::default());

        let err = subscriber.on_event(&"ItemMoved".into(), &1).unwrap_err();
        let err = err.downcast_ref::<SubscriberError>().unwrap();

        assert!(matches!(
            err,
            SubscriberError::UnhandledEvent { method, .. } if method == "on_item_moved"
        ));
    }

    #[test]
    fn test_lenient_ignores_unhandled() {
        let (seen, subscriber) = recording(SubscriberConfig::new().with_strict(false));

        subscriber.on_event(&"ItemMoved".into(), &1).unwrap();
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_custom_resolver() {
        let resolver = ResolveMethod::new().with_prefix("handle_");
        let subscriber: Subscriber<i32> =
            Subscriber::with_resolver(SubscriberConfig::default(), resolver)
                .handle("handle_ping", |_| Ok(()));

        assert!(subscriber.handles("handle_ping"));
        subscriber.on_event(&"ping".into(), &0).unwrap();
    }

    #[test]
    fn test_has_event_handler() {
        let empty: Subscriber<i32> = Subscriber::new(SubscriberConfig::default());
        let (_, full) = recording(SubscriberConfig::default());

        assert!(!empty.has_event_handler());
        assert!(full.has_event_handler());
    }

    #[test]
    fn test_describe_lists_methods() {
        let (_, subscriber) = recording(SubscriberConfig::default());
        assert_eq!(
            subscriber.describe(),
            "subscriber[on_item_created, on_item_deleted]"
        );
    }

    #[test]
    fn test_publisher_rejects_empty_subscriber() {
        let publisher: Publisher<i32> = Publisher::new();
        let empty: Arc<dyn Listener<i32>> =
            Arc::new(Subscriber::<i32>::new(SubscriberConfig::default()));

        let result = publisher.subscribe(empty.clone());

        assert!(matches!(result, Err(PublisherError::NoEventHandler(_))));
        assert!(!publisher.is_subscribed(&empty));
    }

    #[test]
    fn test_publisher_broadcast_to_subscriber() {
        let publisher: Publisher<i32> = Publisher::new();
        let (seen, subscriber) = recording(SubscriberConfig::default());
        let subscriber: Arc<dyn Listener<i32>> = Arc::new(subscriber);

        publisher.subscribe(subscriber).unwrap();
        publisher.broadcast("ItemCreated", &5).unwrap();

        let err = publisher.broadcast("ItemMoved", &6).unwrap_err();
        assert!(err.downcast_ref::<SubscriberError>().is_some());
        assert_eq!(*seen.lock().unwrap(), vec!["created 5"]);
    }
}
