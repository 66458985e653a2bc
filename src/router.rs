//! [`Router`](crate::Router) is an ordered stack of middleware, each entry
//! optionally guarded by a route pattern and an HTTP method.
//!
//! Entries are tried strictly in registration order and the first guard that
//! matches wins:
//!
//! ```rust
//! use stackrouter::{from_fn, Router};
//! use hyper::StatusCode;
//!
//! let users = Router::new("users")
//!     .get("/", from_fn(|ctx, _| Box::pin(async move {
//!         ctx.respond(StatusCode::OK, "all users");
//!         Ok(())
//!     })))
//!     .get("/:id", from_fn(|ctx, _| Box::pin(async move {
//!         let body = format!("user {}", ctx.params().get("id").unwrap_or_default());
//!         ctx.respond(StatusCode::OK, body);
//!         Ok(())
//!     })));
//!
//! let api = Router::new("api").route("/users", users);
//! # let _ = api;
//! ```
//!
//! There are three kinds of entries:
//! ```ignore
//!  Registration               Runs when
//!  mount(unit)                always
//!  route("/api", unit)        the path is /api or below; unit sees the rest of the path
//!  get("/users/:id", unit)    the method is GET and the path is exactly /users/:id
//! ```
//!
//! Inside a `route` scope the context's path is rewritten to the part after
//! the prefix and the prefix's parameters are merged over the ones already
//! captured. Both are put back as soon as the scoped unit returns, however it
//! returns, so entries after the `route` and the router's caller always see
//! the original values.
//!
//! A router is itself a [`Middleware`]. It runs its own stack and then always
//! hands the request on, which is what lets routers be nested inside
//! `route` scopes or placed next to each other in a larger chain.
use crate::context::Context;
use crate::error::{BoxError, PatternError};
use crate::middleware::{Compose, Middleware, Next};
use crate::pattern::{MatchOptions, Pattern};

use std::sync::Arc;

use futures_util::future::BoxFuture;
use hyper::Method;
use tracing::debug;

/// Router dispatches requests through an ordered stack of guarded middleware.
pub struct Router {
    name: Arc<str>,
    stack: Compose,
    options: MatchOptions,
}

impl Router {
    /// Creates an empty router. The name only shows up in logs.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Arc::from(name.into()),
            stack: Compose::default(),
            options: MatchOptions::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of registered entries.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Makes literal path segments of subsequently registered patterns
    /// case-sensitive. By default `/Users` and `/users` are the same route.
    pub fn case_sensitive(mut self) -> Self {
        self.options.case_sensitive = true;
        self
    }

    /// Stops subsequently registered method routes from accepting a trailing
    /// slash. By default `get("/foo", ..)` also answers `/foo/`.
    pub fn strict(mut self) -> Self {
        self.options.strict = true;
        self
    }

    /// Appends a unit that runs for every request reaching this point of the
    /// stack.
    /// ```rust
    /// use stackrouter::{from_fn, Router};
    ///
    /// let router = Router::new("app").mount(from_fn(|ctx, next| Box::pin(async move {
    ///     ctx.request_mut().headers_mut().insert("x-seen", "1".parse().unwrap());
    ///     next.run(ctx).await
    /// })));
    /// assert_eq!(router.len(), 1);
    /// ```
    pub fn mount(mut self, unit: impl Middleware) -> Self {
        self.stack.push(unit);
        self
    }

    /// Appends a unit that runs for requests whose path is `pattern` or lies
    /// below it. Inside the unit the path is relative to `pattern`.
    ///
    /// Requests outside `pattern` fall through to the next entry. Requests
    /// inside it do not: once the unit returns, this router is done.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is not a valid route pattern. See
    /// [`Router::try_route`] for a fallible version.
    pub fn route(self, pattern: &str, unit: impl Middleware) -> Self {
        self.try_route(pattern, unit)
            .unwrap_or_else(|err| panic!("{}", err))
    }

    /// Like [`Router::route`], but returns an error for an invalid pattern.
    pub fn try_route(mut self, pattern: &str, unit: impl Middleware) -> Result<Self, PatternError> {
        let pattern = Pattern::prefix(pattern, self.options)?;
        self.stack.push(Scope {
            router: self.name.clone(),
            pattern,
            unit: Box::new(unit),
        });
        Ok(self)
    }

    /// Appends a unit that runs for requests with the given method whose path
    /// matches `pattern` exactly.
    /// ```rust
    /// use stackrouter::{from_fn, Router};
    /// use hyper::{Method, StatusCode};
    ///
    /// let router = Router::new("app")
    ///     .handle(Method::GET, "/teapot", from_fn(|ctx, _| Box::pin(async move {
    ///         ctx.respond(StatusCode::IM_A_TEAPOT, "I am a teapot!");
    ///         Ok(())
    ///     })));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is not a valid route pattern. See
    /// [`Router::try_handle`] for a fallible version.
    pub fn handle(self, method: Method, pattern: &str, unit: impl Middleware) -> Self {
        self.try_handle(method, pattern, unit)
            .unwrap_or_else(|err| panic!("{}", err))
    }

    /// Like [`Router::handle`], but returns an error for an invalid pattern.
    pub fn try_handle(
        self,
        method: Method,
        pattern: &str,
        unit: impl Middleware,
    ) -> Result<Self, PatternError> {
        self.push_endpoint(Some(method), pattern, unit)
    }

    /// Appends a unit that runs for requests of any method whose path matches
    /// `pattern` exactly.
    pub fn all(self, pattern: &str, unit: impl Middleware) -> Self {
        self.push_endpoint(None, pattern, unit)
            .unwrap_or_else(|err| panic!("{}", err))
    }

    fn push_endpoint(
        mut self,
        method: Option<Method>,
        pattern: &str,
        unit: impl Middleware,
    ) -> Result<Self, PatternError> {
        let pattern = Pattern::exact(pattern, self.options)?;
        self.stack.push(Endpoint {
            router: self.name.clone(),
            method,
            pattern,
            unit: Box::new(unit),
        });
        Ok(self)
    }

    /// Register a unit for `GET` requests
    pub fn get(self, pattern: &str, unit: impl Middleware) -> Self {
        self.handle(Method::GET, pattern, unit)
    }

    /// Register a unit for `HEAD` requests
    pub fn head(self, pattern: &str, unit: impl Middleware) -> Self {
        self.handle(Method::HEAD, pattern, unit)
    }

    /// Register a unit for `OPTIONS` requests
    pub fn options(self, pattern: &str, unit: impl Middleware) -> Self {
        self.handle(Method::OPTIONS, pattern, unit)
    }

    /// Register a unit for `POST` requests
    pub fn post(self, pattern: &str, unit: impl Middleware) -> Self {
        self.handle(Method::POST, pattern, unit)
    }

    /// Register a unit for `PUT` requests
    pub fn put(self, pattern: &str, unit: impl Middleware) -> Self {
        self.handle(Method::PUT, pattern, unit)
    }

    /// Register a unit for `PATCH` requests
    pub fn patch(self, pattern: &str, unit: impl Middleware) -> Self {
        self.handle(Method::PATCH, pattern, unit)
    }

    /// Register a unit for `DELETE` requests
    pub fn delete(self, pattern: &str, unit: impl Middleware) -> Self {
        self.handle(Method::DELETE, pattern, unit)
    }

    /// Register a unit for `CONNECT` requests
    pub fn connect(self, pattern: &str, unit: impl Middleware) -> Self {
        self.handle(Method::CONNECT, pattern, unit)
    }

    /// Register a unit for `TRACE` requests
    pub fn trace(self, pattern: &str, unit: impl Middleware) -> Self {
        self.handle(Method::TRACE, pattern, unit)
    }

    /// Runs the request through this router alone, with nothing after it.
    pub fn dispatch<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, Result<(), BoxError>> {
        self.call(ctx, Next::end())
    }
}

/// An anonymous router.
impl Default for Router {
    fn default() -> Self {
        Router::new("anon")
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("name", &self.name)
            .field("entries", &self.stack.len())
            .field("options", &self.options)
            .finish()
    }
}

impl Middleware for Router {
    fn call<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(async move {
            debug!(router = %self.name, path = %ctx.path(), "enter");
            let result = self.stack.call(&mut *ctx, Next::end()).await;
            debug!(router = %self.name, path = %ctx.path(), "exit");
            result?;
            next.run(ctx).await
        })
    }
}

/// A `route` entry: a prefix guard that scopes the path and parameters.
struct Scope {
    router: Arc<str>,
    pattern: Pattern,
    unit: Box<dyn Middleware>,
}

impl Middleware for Scope {
    fn call<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(async move {
            let captures = match self.pattern.matches(ctx.path()) {
                Some(captures) => captures,
                None => {
                    debug!(router = %self.router, path = %ctx.path(), route = %self.pattern.as_str(), "didn't match");
                    return next.run(ctx).await;
                }
            };
            debug!(router = %self.router, path = %ctx.path(), route = %self.pattern.as_str(), "matched");

            let mut params = ctx.params().clone();
            params.merge(captures.params);
            let path = format!("/{}", captures.rest.unwrap_or_default());

            let saved = ctx.enter_scope(path, params);
            let result = self.unit.call(&mut *ctx, Next::end()).await;
            ctx.exit_scope(saved);
            result
        })
    }
}

/// A method entry: an exact path guard, optionally restricted to one method.
struct Endpoint {
    router: Arc<str>,
    method: Option<Method>,
    pattern: Pattern,
    unit: Box<dyn Middleware>,
}

impl Endpoint {
    fn accepts(&self, method: &Method) -> bool {
        match self.method {
            Some(ref expected) => expected.as_str().eq_ignore_ascii_case(method.as_str()),
            None => true,
        }
    }

    fn label(&self) -> &str {
        self.method.as_ref().map_or("ALL", Method::as_str)
    }
}

impl Middleware for Endpoint {
    fn call<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        let captures = match self.accepts(ctx.method()) {
            true => self.pattern.matches(ctx.path()),
            false => None,
        };

        match captures {
            Some(captures) => {
                debug!(router = %self.router, method = %ctx.method(), path = %ctx.path(), route = %self.pattern.as_str(), allowed = self.label(), "matched");
                ctx.params_mut().merge(captures.params);
                self.unit.call(ctx, next)
            }
            None => {
                debug!(router = %self.router, method = %ctx.method(), path = %ctx.path(), route = %self.pattern.as_str(), allowed = self.label(), "didn't match");
                next.run(ctx)
            }
        }
    }
}
