use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::jwt,
    domain::entities::domain_record::DomainRecord,
    use_cases::domains::ProviderDnsRecord,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_domain).put(set_domain).delete(clear_domain),
        )
        .route("/verify", post(verify_domain))
        .route("/provider", post(register_with_provider))
        .route("/provider/status", post(provider_status))
        .route("/provider/verify", post(trigger_provider_verification))
}

async fn current_profile(jar: &CookieJar, app_state: &AppState) -> AppResult<Uuid> {
    let Some(cookie) = jar.get("access_token") else {
        return Err(AppError::Unauthorized);
    };
    let claims = jwt::verify(cookie.value(), &app_state.config.jwt_secret)?;
    Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)
}

#[derive(Deserialize)]
struct DomainPayload {
    domain: String,
}

#[derive(Serialize)]
struct DomainResponse {
    domain: String,
    status: String,
    verified: bool,
    expected_cname: String,
    verified_at: Option<chrono::NaiveDateTime>,
    created_at: Option<chrono::NaiveDateTime>,
}

impl DomainResponse {
    fn from_record(record: DomainRecord, expected_cname: &str) -> Self {
        Self {
            domain: record.domain,
            status: record.status.as_str().to_string(),
            verified: record.status.is_verified(),
            expected_cname: expected_cname.to_string(),
            verified_at: record.verified_at,
            created_at: record.created_at,
        }
    }
}

async fn get_domain(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let profile_id = current_profile(&jar, &app_state).await?;

    let record = app_state
        .domain_use_cases
        .get_domain_for_profile(profile_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(DomainResponse::from_record(
        record,
        app_state.domain_use_cases.cname_target(),
    )))
}

async fn set_domain(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<DomainPayload>,
) -> AppResult<impl IntoResponse> {
    let profile_id = current_profile(&jar, &app_state).await?;

    let record = app_state
        .domain_use_cases
        .set_domain(profile_id, &payload.domain)
        .await?;

    Ok(Json(DomainResponse::from_record(
        record,
        app_state.domain_use_cases.cname_target(),
    )))
}

async fn clear_domain(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let profile_id = current_profile(&jar, &app_state).await?;
    app_state.domain_use_cases.clear_domain(profile_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
struct VerifyResponse {
    verified: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    found: Option<Vec<String>>,
}

async fn verify_domain(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<DomainPayload>,
) -> AppResult<impl IntoResponse> {
    let profile_id = current_profile(&jar, &app_state).await?;

    let outcome = app_state
        .domain_use_cases
        .verify_domain(profile_id, &payload.domain)
        .await?;

    Ok(Json(VerifyResponse {
        verified: outcome.verified,
        message: outcome.message,
        expected: outcome.expected,
        found: outcome.found,
    }))
}

#[derive(Serialize)]
struct ProviderRegisterResponse {
    success: bool,
    message: String,
    verification_details: Vec<ProviderDnsRecord>,
}

async fn register_with_provider(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<DomainPayload>,
) -> AppResult<impl IntoResponse> {
    let profile_id = current_profile(&jar, &app_state).await?;

    let registration = app_state
        .domain_use_cases
        .register_with_provider(profile_id, &payload.domain)
        .await?;

    Ok(Json(ProviderRegisterResponse {
        success: true,
        message: "Domain registered with edge provider".into(),
        verification_details: registration.verification,
    }))
}

#[derive(Serialize)]
struct ProviderStatusBody {
    exists: bool,
    verified: bool,
    details: serde_json::Value,
}

#[derive(Serialize)]
struct ProviderStatusResponse {
    success: bool,
    status: ProviderStatusBody,
}

async fn provider_status(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<DomainPayload>,
) -> AppResult<impl IntoResponse> {
    let profile_id = current_profile(&jar, &app_state).await?;

    let status = app_state
        .domain_use_cases
        .provider_status(profile_id, &payload.domain)
        .await?;

    Ok(Json(ProviderStatusResponse {
        success: true,
        status: ProviderStatusBody {
            exists: status.exists,
            verified: status.verified,
            details: status.detail,
        },
    }))
}

#[derive(Serialize)]
struct ProviderVerifyResponse {
    success: bool,
    message: String,
    status: ProviderStatusBody,
}

async fn trigger_provider_verification(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<DomainPayload>,
) -> AppResult<impl IntoResponse> {
    let profile_id = current_profile(&jar, &app_state).await?;

    let status = app_state
        .domain_use_cases
        .trigger_provider_verification(profile_id, &payload.domain)
        .await?;

    Ok(Json(ProviderVerifyResponse {
        success: true,
        message: "Provider verification triggered".into(),
        status: ProviderStatusBody {
            exists: status.exists,
            verified: status.verified,
            details: status.detail,
        },
    }))
}
