//! Serving a [`Router`](crate::Router) with hyper.
//!
//! ```rust,no_run
//! use stackrouter::{from_fn, Router};
//! use hyper::StatusCode;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let router = Router::default().get("/", from_fn(|ctx, _| Box::pin(async move {
//!     ctx.respond(StatusCode::OK, "Hello, World!");
//!     Ok(())
//! })));
//!
//! hyper::Server::bind(&([127, 0, 0, 1], 3000).into())
//!     .serve(router.into_service())
//!     .await?;
//! # Ok(())
//! # }
//! ```
use crate::context::Context;
use crate::error::BoxError;
use crate::middleware::{Middleware, Next};
use crate::router::Router;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};

use futures_util::future::{self, BoxFuture};
use hyper::service::Service;
use hyper::{Body, Request, Response, StatusCode};
use tracing::debug;

/// A [`Router`] that answers hyper requests.
///
/// Each request gets a fresh [`Context`]; the router runs to completion and
/// whatever response it left in the context is returned. If no unit produced
/// a response, the not-found unit runs, and if that does not produce one
/// either the answer is an empty `404`.
#[derive(Clone)]
pub struct RouterService {
    router: Arc<Router>,
    not_found: Option<Arc<dyn Middleware>>,
}

impl RouterService {
    pub fn new(router: Router) -> Self {
        RouterService {
            router: Arc::new(router),
            not_found: None,
        }
    }

    /// A configurable unit which is called when the router produced no
    /// response.
    /// ```rust
    /// use stackrouter::{from_fn, Router, RouterService};
    /// use hyper::StatusCode;
    ///
    /// let service = RouterService::new(Router::default())
    ///     .not_found(from_fn(|ctx, _| Box::pin(async move {
    ///         ctx.respond(StatusCode::NOT_FOUND, "404: Not Found");
    ///         Ok(())
    ///     })));
    /// ```
    pub fn not_found(mut self, unit: impl Middleware) -> Self {
        self.not_found = Some(Arc::new(unit));
        self
    }

    /// Runs a request through the router and produces its response.
    ///
    /// Errors returned by units are passed back as they are.
    pub fn serve(&self, req: Request<Body>) -> ResponseFut {
        let router = self.router.clone();
        let fallback = self.not_found.clone();
        let fut = async move {
            let mut ctx = Context::new(req);
            router.dispatch(&mut ctx).await?;

            if ctx.response().is_none() {
                debug!(router = %router.name(), method = %ctx.method(), path = %ctx.path(), "no response");
                if let Some(fallback) = fallback {
                    fallback.call(&mut ctx, Next::end()).await?;
                }
            }

            Ok::<_, BoxError>(ctx.take_response().unwrap_or_else(empty_not_found))
        };

        ResponseFut(Box::pin(fut))
    }

    pub fn into_make_service(self) -> MakeRouterService {
        MakeRouterService(self)
    }
}

impl Router {
    /// Converts the `Router` into a `Service` which you can serve directly with `Hyper`.
    /// If you need a custom not-found handler, build a [`RouterService`] instead.
    pub fn into_service(self) -> MakeRouterService {
        RouterService::new(self).into_make_service()
    }
}

fn empty_not_found() -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}

impl Service<Request<Body>> for RouterService {
    type Response = Response<Body>;
    type Error = BoxError;
    type Future = ResponseFut;

    fn poll_ready(&mut self, _: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        self.serve(req)
    }
}

#[doc(hidden)]
pub struct MakeRouterService(RouterService);

impl<T> Service<T> for MakeRouterService {
    type Response = RouterService;
    type Error = hyper::Error;
    type Future = future::Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _: T) -> Self::Future {
        let service = self.0.clone();
        future::ok(service)
    }
}

/// The future returned by [`RouterService::serve`].
pub struct ResponseFut(BoxFuture<'static, Result<Response<Body>, BoxError>>);

impl Future for ResponseFut {
    type Output = Result<Response<Body>, BoxError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        self.0.as_mut().poll(cx)
    }
}
