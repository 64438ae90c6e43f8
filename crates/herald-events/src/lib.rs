//! In-process publish/subscribe for Herald.
//!
//! This crate lets any type become an event source:
//! - `Publisher` - per-instance listener registry with synchronous broadcast
//! - `Listener` - the contract every receiver implements
//! - `CallableAdapter` - lets a bare callback act as a listener
//! - `Publish` - grants the subscription operations (a `Subscriptions` view, no
//!   broadcast) to a type embedding a `Publisher`
//!
//! Delivery happens on the broadcaster's stack, in subscription order, to
//! the listeners present when the broadcast started. A failing listener
//! stops the broadcast and its error is returned to the broadcaster.
//!
//! # Example
//!
//! ```
//! use herald_events::{callback, Publisher};
//!
//! let publisher: Publisher<String> = Publisher::new();
//! let greet = callback(|name: &String| {
//!     println!("hello {}", name);
//!     Ok(())
//! });
//!
//! publisher.on("greeted", Some(greet.clone())).unwrap();
//! assert!(publisher.is_callback_subscribed(&greet));
//!
//! publisher.broadcast("greeted", &"world".to_string()).unwrap();
//! ```

pub mod callable;
pub mod config;
pub mod error;
pub mod listener;
pub mod publisher;

pub use callable::{CallableAdapter, CallableMatch};
pub use config::PublisherConfig;
pub use error::{PublisherError, Result};
pub use listener::{callback, BoxError, Callback, Listener, ListenerResult};
pub use publisher::{Publish, Publisher, Subscriptions};
