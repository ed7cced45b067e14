use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Uri, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::edge::{EdgeUseCases, RouteDecision},
};

/// Path of the verification landing page. Requests already targeting it pass
/// through untouched so the unverified-domain redirect can never loop.
pub const VERIFICATION_PATH: &str = "/domain-verification";

const REDIRECT_COUNT_HEADER: &str = "x-redirect-count";
const MAX_REDIRECT_COUNT: u32 = 5;

/// Edge router: inspects the Host header of every inbound request and serves
/// verified custom domains from the owning profile's page via an internal
/// rewrite. The client-visible URL never changes; unverified domains are
/// redirected to the verification flow instead.
pub async fn edge_router_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();

    // Internal surfaces never go through domain resolution.
    if path == VERIFICATION_PATH
        || path.starts_with("/api")
        || path.starts_with("/static")
        || path.starts_with("/assets")
        || path == "/favicon.ico"
    {
        return next.run(request).await;
    }

    // Break out of redirect loops caused by misconfiguration or stale
    // caches serving old redirects.
    let redirect_count = redirect_count(request.headers());
    if redirect_count > MAX_REDIRECT_COUNT {
        tracing::error!(count = redirect_count, "Redirect loop detected, passing through");
        return next.run(request).await;
    }

    let Some(host) = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
    else {
        return next.run(request).await;
    };
    let host = EdgeUseCases::normalize_host(host);

    if app_state.edge_use_cases.is_platform_host(&host) {
        return next.run(request).await;
    }

    match app_state.edge_use_cases.route_host(&host).await {
        RouteDecision::PassThrough => next.run(request).await,
        RouteDecision::RewriteTo { username } => {
            match rewritten_uri(request.uri(), &username) {
                Ok(uri) => {
                    tracing::debug!(host = %host, rewritten = %uri, "Rewriting custom domain request");
                    *request.uri_mut() = uri;
                }
                Err(e) => {
                    tracing::error!(host = %host, error = %e, "Failed to rewrite request path");
                }
            }
            next.run(request).await
        }
        RouteDecision::RedirectToVerification { domain } => {
            let location = format!("{VERIFICATION_PATH}?domain={domain}");
            let mut response = Redirect::temporary(&location).into_response();
            if let Ok(value) = HeaderValue::from_str(&(redirect_count + 1).to_string()) {
                response.headers_mut().insert(REDIRECT_COUNT_HEADER, value);
            }
            response
        }
    }
}

fn redirect_count(headers: &HeaderMap) -> u32 {
    headers
        .get(REDIRECT_COUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

/// Prefix the request path with the profile's username; the root path
/// collapses to just `/{username}`. The query string is preserved.
fn rewritten_uri(uri: &Uri, username: &str) -> Result<Uri, axum::http::uri::InvalidUri> {
    let path = uri.path();
    let new_path = if path == "/" {
        format!("/{username}")
    } else {
        format!("/{username}{path}")
    };
    let path_and_query = match uri.query() {
        Some(query) => format!("{new_path}?{query}"),
        None => new_path,
    };
    path_and_query.parse()
}
