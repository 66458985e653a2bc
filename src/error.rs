//! Errors raised while registering routes, and the error type handlers fail with.

use thiserror::Error;

/// A boxed error type for handler failures.
///
/// Routers never inspect or wrap these; whatever a handler returns travels
/// back through every [`Next`](crate::Next) and [`Compose`](crate::Compose)
/// unchanged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A route pattern that could not be compiled.
///
/// These are configuration errors: they surface while the router is being
/// built, never while it is serving requests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Every pattern is rooted at `/`.
    #[error("expect pattern beginning with '/', found: '{0}'")]
    MissingLeadingSlash(String),

    /// The pattern uses the name reserved for the prefix remainder.
    #[error("pattern '{0}' uses the reserved parameter name '_rest'")]
    ReservedName(String),

    /// The underlying matcher rejected the pattern.
    #[error("invalid pattern '{pattern}': {reason}")]
    Invalid { pattern: String, reason: String },
}
