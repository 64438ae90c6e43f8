//! Event name to handler method name resolution.

use std::fmt;
use std::sync::Arc;

use crate::underscore::underscore;

/// Prefix prepended to handler names when prefixing is requested.
pub const DEFAULT_PREFIX: &str = "on_";

/// Case transform applied to event names before prefixing.
pub type Transform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Derives a handler method name from an event name.
///
/// # Example
///
/// ```
/// use herald_subscriber::ResolveMethod;
///
/// let resolve = ResolveMethod::underscored();
/// assert_eq!(resolve.call("UserPromoted", true), "on_user_promoted");
/// assert_eq!(resolve.call("UserPromoted", false), "user_promoted");
/// ```
#[derive(Clone)]
pub struct ResolveMethod {
    transform: Option<Transform>,
    prefix: String,
}

impl ResolveMethod {
    /// Creates a resolver that leaves names untouched.
    pub fn new() -> Self {
        Self {
            transform: None,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Creates a resolver that snake-cases names first.
    pub fn underscored() -> Self {
        Self::new().with_transform(underscore)
    }

    /// Sets the case transform.
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Sets the prefix used when `call` is asked to prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Returns the prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolves `name`, transforming it if a transform is set and
    /// prepending the prefix when `use_prefix` is true.
    pub fn call(&self, name: impl AsRef<str>, use_prefix: bool) -> String {
        let name = name.as_ref();
        let name = match &self.transform {
            Some(transform) => transform(name),
            None => name.to_string(),
        };

        if use_prefix {
            format!("{}{}", self.prefix, name)
        } else {
            name
        }
    }
}

impl Default for ResolveMethod {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResolveMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveMethod")
            .field("transform", &self.transform.is_some())
            .field("prefix", &self.prefix)
            .finish()
    }
}

/// Resolves `name` without any case transform.
pub fn resolve_method(name: impl AsRef<str>, use_prefix: bool) -> String {
    ResolveMethod::new().call(name, use_prefix)
}
