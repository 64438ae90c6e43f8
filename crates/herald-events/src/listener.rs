//! The listener contract.
//!
//! A listener is anything that can receive `(event name, payload)`
//! notifications from a [`Publisher`](crate::Publisher). Listeners are
//! registered as `Arc` handles and compared by pointer identity, so two
//! equal-looking values are still two different listeners.

use std::sync::Arc;

use herald_models::EventName;

/// Boxed error returned by a failing listener.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result of delivering one event to one listener.
pub type ListenerResult = std::result::Result<(), BoxError>;

/// A bare callback that receives only the payload.
///
/// Wrapped in a [`CallableAdapter`](crate::CallableAdapter) by
/// [`Publisher::on`](crate::Publisher::on).
pub type Callback<P> = Arc<dyn Fn(&P) -> ListenerResult + Send + Sync>;

/// Wraps a closure as a [`Callback`].
pub fn callback<P, F>(f: F) -> Callback<P>
where
    F: Fn(&P) -> ListenerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Receiver of broadcast events.
///
/// # Example
///
/// ```
/// use herald_events::{Listener, ListenerResult};
/// use herald_models::EventName;
///
/// struct NotifyUserOfPromotion;
///
/// impl Listener<String> for NotifyUserOfPromotion {
///     fn on_event(&self, name: &EventName, payload: &String) -> ListenerResult {
///         println!("{} => {}", name, payload);
///         Ok(())
///     }
/// }
/// ```
pub trait Listener<P>: Send + Sync {
    /// Handles one event.
    ///
    /// An error aborts the broadcast that delivered the event and is
    /// returned to the broadcaster as-is.
    fn on_event(&self, name: &EventName, payload: &P) -> ListenerResult;

    /// Returns false when this listener has nothing that can receive events.
    ///
    /// Checked by [`Publisher::subscribe`](crate::Publisher::subscribe),
    /// which rejects such listeners.
    fn has_event_handler(&self) -> bool {
        true
    }

    /// Returns true if this listener is an adapter around `callback`.
    fn wraps_callback(&self, _callback: &Callback<P>) -> bool {
        false
    }

    /// Short description used in logs and error messages.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// Returns true if both handles point at the same listener value.
pub(crate) fn same_listener<P, L>(entry: &Arc<dyn Listener<P>>, listener: &Arc<L>) -> bool
where
    L: ?Sized,
{
    Arc::as_ptr(entry) as *const () == Arc::as_ptr(listener) as *const ()
}
