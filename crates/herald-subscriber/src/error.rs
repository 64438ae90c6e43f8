//! Error types for subscribers.

use herald_models::EventName;
use thiserror::Error;

/// Errors raised by a [`Subscriber`](crate::Subscriber) while handling an event.
#[derive(Error, Debug)]
pub enum SubscriberError {
    /// A strict subscriber received an event it has no handler for.
    #[error("no handler {method} for event {event}")]
    UnhandledEvent {
        /// The event that was received.
        event: EventName,
        /// The handler name it resolved to.
        method: String,
    },
}
