use axum::{Router, http, middleware};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::{
    adapters::{
        self,
        http::{app_state::AppState, middleware::edge_router_middleware},
    },
    infra::setup::init_tracing,
};

pub fn create_app(app_state: AppState) -> Router {
    init_tracing();

    let cors = CorsLayer::new()
        .allow_origin(app_state.config.cors_origin.clone())
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true);

    let routes = Router::new()
        .nest("/api", adapters::http::routes::api_router())
        .merge(adapters::http::routes::pages::router())
        .with_state(app_state.clone());

    // Middleware layered onto a router runs after that router has already
    // matched a path, so a URI rewrite there comes too late. The real routes
    // therefore live in an inner router mounted as the fallback of a bare
    // outer one: the outer router forwards every request, the edge router
    // middleware mutates the URI, and only then does the inner router match
    // paths. A rewritten request routes as if the client had asked for
    // `/{username}...` directly.
    Router::new()
        .fallback_service(routes)
        .layer(middleware::from_fn_with_state(
            app_state,
            edge_router_middleware,
        ))
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::X_CONTENT_TYPE_OPTIONS,
            http::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::X_FRAME_OPTIONS,
            http::HeaderValue::from_static("DENY"),
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http-request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                    request_id = %request_id
                )
            }),
        )
}
