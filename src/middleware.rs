//! Composable request-processing units.
//!
//! A [`Middleware`] receives the request [`Context`] and a one-shot
//! continuation, [`Next`]. Calling [`Next::run`] hands the request to
//! whatever comes after the unit; returning without calling it stops that
//! branch. Because `run` consumes the continuation, a unit can delegate at
//! most once.
//!
//! ```rust
//! use stackrouter::{compose, from_fn};
//! use hyper::StatusCode;
//!
//! let logger = from_fn(|ctx, next| {
//!     Box::pin(async move {
//!         let path = ctx.path().to_owned();
//!         let result = next.run(&mut *ctx).await;
//!         println!("{} -> {:?}", path, ctx.response().map(|r| r.status()));
//!         result
//!     })
//! });
//!
//! let hello = from_fn(|ctx, _next| {
//!     Box::pin(async move {
//!         ctx.respond(StatusCode::OK, "Hello");
//!         Ok(())
//!     })
//! });
//!
//! let chain = compose![logger, hello];
//! # let _ = chain;
//! ```
use crate::context::Context;
use crate::error::BoxError;

use std::sync::Arc;

use futures_util::future::{self, BoxFuture};

/// A unit of request processing.
///
/// Implemented by routers, by [`Compose`], by closures wrapped in
/// [`from_fn`], and by `Arc`/`Box` around any of those. The returned future
/// borrows the context for its whole lifetime; other requests have their
/// own contexts, so a unit never needs to lock anything to mutate it.
pub trait Middleware: Send + Sync + 'static {
    fn call<'a>(&'a self, ctx: &'a mut Context, next: Next<'a>)
        -> BoxFuture<'a, Result<(), BoxError>>;
}

/// The continuation handed to a unit: the rest of the chain it is part of,
/// followed by the continuations of every enclosing chain.
pub struct Next<'a> {
    chain: &'a [Arc<dyn Middleware>],
    outer: Option<Box<Next<'a>>>,
}

impl<'a> Next<'a> {
    /// A continuation that does nothing.
    pub fn end() -> Self {
        Self {
            chain: &[],
            outer: None,
        }
    }

    fn within(chain: &'a [Arc<dyn Middleware>], outer: Next<'a>) -> Self {
        let outer = match outer.is_end() {
            true => None,
            false => Some(Box::new(outer)),
        };
        Self { chain, outer }
    }

    /// Returns true if running this continuation would do nothing.
    pub fn is_end(&self) -> bool {
        self.chain.is_empty() && self.outer.is_none()
    }

    /// Passes the request on.
    pub fn run(self, ctx: &'a mut Context) -> BoxFuture<'a, Result<(), BoxError>> {
        match self.chain.split_first() {
            Some((unit, rest)) => {
                let next = Next {
                    chain: rest,
                    outer: self.outer,
                };
                unit.call(ctx, next)
            }
            None => match self.outer {
                Some(outer) => (*outer).run(ctx),
                None => Box::pin(future::ok(())),
            },
        }
    }
}

/// An ordered sequence of units run as one.
///
/// The first unit runs with a continuation that starts the second, and so
/// on; the last unit's continuation is the one the composition itself was
/// given. An empty composition passes straight through.
#[derive(Clone, Default)]
pub struct Compose {
    units: Vec<Arc<dyn Middleware>>,
}

impl Compose {
    pub fn new(units: Vec<Arc<dyn Middleware>>) -> Self {
        Self { units }
    }

    /// Appends a unit to the end of the sequence.
    pub fn push(&mut self, unit: impl Middleware) {
        self.units.push(Arc::new(unit));
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl Middleware for Compose {
    fn call<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Next::within(&self.units, next).run(ctx)
    }
}

impl std::fmt::Debug for Compose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compose")
            .field("units", &self.units.len())
            .finish()
    }
}

/// Builds a [`Compose`] out of any number of units.
///
/// ```rust
/// # use stackrouter::{compose, Router};
/// let chain = compose![Router::new("a"), Router::new("b")];
/// assert_eq!(chain.len(), 2);
/// ```
#[macro_export]
macro_rules! compose {
    ($($unit:expr),* $(,)?) => {
        $crate::Compose::new(vec![
            $(::std::sync::Arc::new($unit) as ::std::sync::Arc<dyn $crate::Middleware>),*
        ])
    };
}

/// A unit backed by a closure. See [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F>(F);

/// Turns a closure into a [`Middleware`].
///
/// The closure has to return a boxed future, which usually means wrapping an
/// `async move` block in `Box::pin`.
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, Result<(), BoxError>>
        + Send
        + Sync
        + 'static,
{
    FromFn(f)
}

impl<F> Middleware for FromFn<F>
where
    F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, Result<(), BoxError>>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        (self.0)(ctx, next)
    }
}

impl<M: Middleware + ?Sized> Middleware for Arc<M> {
    fn call<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        (**self).call(ctx, next)
    }
}

impl<M: Middleware + ?Sized> Middleware for Box<M> {
    fn call<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        (**self).call(ctx, next)
    }
}
