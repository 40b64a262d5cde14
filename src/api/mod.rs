use crate::{api::handlers::auth, api::handlers::health, store::SharedStore};
use anyhow::Result;
use axum::{
    Extension, Router,
    body::Body,
    extract::MatchedPath,
    http::{
        HeaderName, HeaderValue, Method, Request,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::options,
};
use bearer_token::TokenConfig;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{Span, error, info, info_span};
use ulid::Ulid;

pub mod handlers;
mod openapi;

pub use openapi::openapi;

pub const REQUEST_ID: &str = "x-request-id";

/// Build the full application: public routes, the bearer-gated routes and the
/// shared layers.
#[must_use]
pub fn router(store: SharedStore, tokens: &TokenConfig) -> Router {
    let (public, _) = openapi::public_router().split_for_parts();
    let (protected, _) = openapi::protected_router().split_for_parts();

    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(AllowOrigin::any());

    public
        .route("/health", options(health::health))
        .merge(protected.route_layer(middleware::from_fn(auth::require_bearer)))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static(REQUEST_ID),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID,
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(tokens.signer()))
                .layer(Extension(tokens.verifier()))
                .layer(Extension(store)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, store: SharedStore, tokens: TokenConfig) -> Result<()> {
    let app = router(store, &tokens);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Gracefully shutdown"),
        Err(err) => {
            error!("Failed to listen for shutdown signal: {err}");
            std::future::pending::<()>().await;
        }
    }
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
