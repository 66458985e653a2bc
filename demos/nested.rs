//! Serves a small API made of nested routers.
//!
//! ```text
//! RUST_LOG=stackrouter=debug cargo run --example nested
//! curl localhost:3000/api/users/gordon
//! ```
use stackrouter::{from_fn, Middleware, Router, RouterService};

use hyper::{Server, StatusCode};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

fn text(body: &'static str) -> impl Middleware {
    from_fn(move |ctx, _| {
        ctx.respond(StatusCode::OK, body);
        Box::pin(async { Ok(()) })
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let access_log = from_fn(|ctx, next| {
        Box::pin(async move {
            let path = ctx.path().to_owned();
            let result = next.run(&mut *ctx).await;
            let status = ctx.response().map(|res| res.status().as_u16());
            tracing::info!(method = %ctx.method(), path = %path, status = ?status, "request");
            result
        })
    });

    let users = Router::new("users")
        .get("/", text("all users"))
        .get(
            "/:name",
            from_fn(|ctx, _| {
                let body = format!("Hello, {}", ctx.params().get("name").unwrap_or_default());
                ctx.respond(StatusCode::OK, body);
                Box::pin(async { Ok(()) })
            }),
        )
        .post("/", text("created"));

    let api = Router::new("api")
        .get("/health", text("ok"))
        .route("/users", users);

    let app = Router::new("app").mount(access_log).route("/api", api);

    let service = RouterService::new(app).not_found(from_fn(|ctx, _| {
        ctx.respond(StatusCode::NOT_FOUND, "404: Not Found");
        Box::pin(async { Ok(()) })
    }));

    let addr: SocketAddr = ([127, 0, 0, 1], 3000).into();
    tracing::info!(%addr, "listening");
    Server::bind(&addr).serve(service.into_make_service()).await?;

    Ok(())
}
