//! Adapter letting a bare callback act as a listener.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use herald_models::EventName;
use serde::{Deserialize, Serialize};

use crate::error::PublisherError;
use crate::listener::{Callback, Listener, ListenerResult};

/// How a [`CallableAdapter`] treats events other than the one it is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CallableMatch {
    /// Invoke the callback for every broadcast, whatever its name.
    Any,
    /// Invoke the callback only for broadcasts of the bound event name.
    #[default]
    Exact,
}

impl fmt::Display for CallableMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallableMatch::Any => write!(f, "any"),
            CallableMatch::Exact => write!(f, "exact"),
        }
    }
}

impl FromStr for CallableMatch {
    type Err = PublisherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(CallableMatch::Any),
            "exact" => Ok(CallableMatch::Exact),
            other => Err(PublisherError::Config(format!(
                "unknown callable match mode: {}",
                other
            ))),
        }
    }
}

/// A callback bound to one event name.
///
/// Each adapter is a distinct listener: subscribing the same callback twice
/// through [`Publisher::on`](crate::Publisher::on) creates two entries that
/// can be removed independently.
pub struct CallableAdapter<P> {
    name: EventName,
    callback: Callback<P>,
    mode: CallableMatch,
}

impl<P> CallableAdapter<P> {
    /// Creates an adapter that only fires for `name`.
    pub fn new(name: impl Into<EventName>, callback: Callback<P>) -> Self {
        Self::with_match(name, callback, CallableMatch::Exact)
    }

    /// Creates an adapter with an explicit matching mode.
    pub fn with_match(
        name: impl Into<EventName>,
        callback: Callback<P>,
        mode: CallableMatch,
    ) -> Self {
        Self {
            name: name.into(),
            callback,
            mode,
        }
    }

    /// Returns the event name this adapter is bound to.
    pub fn name(&self) -> &EventName {
        &self.name
    }

    /// Returns the matching mode.
    pub fn mode(&self) -> CallableMatch {
        self.mode
    }

    /// Returns true if the callback should run for `incoming`.
    pub fn accepts(&self, incoming: &EventName) -> bool {
        match self.mode {
            CallableMatch::Any => true,
            CallableMatch::Exact => *incoming == self.name,
        }
    }
}

impl<P> Listener<P> for CallableAdapter<P> {
    fn on_event(&self, name: &EventName, payload: &P) -> ListenerResult {
        if !self.accepts(name) {
            return Ok(());
        }
        (self.callback)(payload)
    }

    fn wraps_callback(&self, callback: &Callback<P>) -> bool {
        Arc::ptr_eq(&self.callback, callback)
    }

    fn describe(&self) -> String {
        format!("callable({})", self.name)
    }
}

impl<P> fmt::Debug for CallableAdapter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallableAdapter")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
