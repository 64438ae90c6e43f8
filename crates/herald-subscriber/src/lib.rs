//! Handler-table subscribers for Herald.
//!
//! A [`Subscriber`] maps each incoming event name to a handler method name
//! (`UserPromoted` -> `on_user_promoted`) and calls the handler registered
//! under that name. The mapping itself is available on its own as
//! [`ResolveMethod`] / [`resolve_method`].

pub mod error;
pub mod resolve;
pub mod subscriber;
pub mod underscore;

pub use error::SubscriberError;
pub use resolve::{resolve_method, ResolveMethod, DEFAULT_PREFIX};
pub use subscriber::{Subscriber, SubscriberConfig};
pub use underscore::underscore;
