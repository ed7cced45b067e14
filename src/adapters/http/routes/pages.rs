use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{Html, IntoResponse},
    routing::get,
};
use serde::Deserialize;

use crate::{adapters::http::app_state::AppState, app_error::AppError, app_error::AppResult};

/// Top-level pages: the verification landing page the edge router redirects
/// unverified domains to, and a minimal profile page standing in for the
/// profile subsystem as the rewrite target.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/domain-verification", get(domain_verification_page))
        .route("/{username}", get(profile_page))
        .route("/{username}/{*rest}", get(profile_subpage))
}

#[derive(Deserialize)]
struct VerificationPageParams {
    domain: Option<String>,
}

async fn domain_verification_page(
    State(app_state): State<AppState>,
    Query(params): Query<VerificationPageParams>,
) -> impl IntoResponse {
    let domain = params.domain.unwrap_or_default();
    Html(format!(
        "<h1>Verify your domain</h1>\
         <p>Point <code>{}</code> at <code>{}</code> with a CNAME record, then verify.</p>",
        domain,
        app_state.domain_use_cases.cname_target(),
    ))
}

#[derive(serde::Serialize)]
struct ProfilePageResponse {
    username: String,
    path: String,
}

async fn profile_page(
    State(app_state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    render_profile(&app_state, username, String::new()).await
}

async fn profile_subpage(
    State(app_state): State<AppState>,
    Path((username, rest)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    render_profile(&app_state, username, rest).await
}

async fn render_profile(
    app_state: &AppState,
    username: String,
    path: String,
) -> AppResult<Json<ProfilePageResponse>> {
    if !app_state.profiles.profile_exists(&username).await? {
        return Err(AppError::NotFound);
    }
    Ok(Json(ProfilePageResponse { username, path }))
}
