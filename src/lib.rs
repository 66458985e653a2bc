//! # StackRouter
//!
//! StackRouter is a middleware-stack HTTP request router for hyper.
//!
//! A router is an ordered list of middleware. Each entry can be guarded by a
//! path prefix, or by an exact path and an HTTP method. Requests walk the
//! list in registration order and the first guard that matches handles the
//! request. Routers are middleware themselves, so they nest: a router mounted
//! under `/api` sees `/api/users` as `/users`.
//!
//! ## Features
//!
//! **First registered, first matched:** Overlapping routes are allowed. The
//! one registered first wins and later ones are simply never reached for the
//! overlapping requests, so the order of registration is the only priority
//! rule.
//!
//! **Scoped paths:** `route("/api", unit)` runs `unit` with the path rewritten
//! to the part below `/api` and the prefix's parameters added. The original
//! path and parameters are restored as soon as `unit` returns, whether it
//! handled the request, passed it on, or failed.
//!
//! **Parameters in your routing pattern:** Give a path segment a name and the
//! router delivers the dynamic value to you through [`Context::params`].
//!
//! **Continuation-passing middleware:** Every unit receives the request
//! context and a one-shot [`Next`]. Calling it runs the rest of the chain and
//! returns control to the unit afterwards; not calling it ends the chain.
//!
//! ## Usage
//!
//! Here is a simple example:
//!
//! ```rust,no_run
//! use stackrouter::{from_fn, Router};
//! use hyper::StatusCode;
//!
//! #[tokio::main]
//! async fn main() {
//!     let users = Router::new("users")
//!         .get("/", from_fn(|ctx, _| Box::pin(async move {
//!             ctx.respond(StatusCode::OK, "all users");
//!             Ok(())
//!         })))
//!         .get("/:user", from_fn(|ctx, _| Box::pin(async move {
//!             let body = format!("Hello, {}", ctx.params().get("user").unwrap_or_default());
//!             ctx.respond(StatusCode::OK, body);
//!             Ok(())
//!         })));
//!
//!     let router = Router::new("app").route("/users", users);
//!
//!     hyper::Server::bind(&([127, 0, 0, 1], 3000).into())
//!         .serve(router.into_service())
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! ### Named parameters
//!
//! `:user` is a *named parameter*. Named parameters only match a single path
//! segment:
//!
//! ```ignore
//! Pattern: /user/:user
//!
//!  /user/gordon              match
//!  /user/you                 match
//!  /user/gordon/profile      no match
//!  /user/                    no match
//! ```
//!
//! Captured values are percent-decoded, so `/user/John%20Doe` delivers
//! `John Doe`.
//!
//! Parameters captured by an enclosing `route` stay visible in nested scopes.
//! When a nested pattern reuses a name, the nested value wins while inside.
//!
//! ### Prefix routes
//!
//! Patterns given to [`Router::route`] match their own path and everything
//! below it. One trailing slash never matters:
//!
//! ```ignore
//! Pattern: /src
//!
//!  /src                      match, inner path "/"
//!  /src/                     match, inner path "/"
//!  /src/subdir/somefile.rs   match, inner path "/subdir/somefile.rs"
//!  /srcs                     no match
//! ```
//!
//! ### Not Found Handler
//!
//! A router that matches nothing does not answer; it hands the request on.
//! When the whole chain is done and no response was set,
//! [`RouterService`] answers `404`, or runs the unit given to
//! [`RouterService::not_found`].

#![forbid(unsafe_code)]

mod context;
mod error;
mod middleware;
mod params;
mod pattern;
mod router;
mod service;

pub use context::Context;
pub use error::{BoxError, PatternError};
pub use middleware::{from_fn, Compose, FromFn, Middleware, Next};
pub use params::{Param, Params};
pub use pattern::{Captures, MatchOptions, Pattern};
pub use router::Router;
pub use service::{MakeRouterService, ResponseFut, RouterService};
