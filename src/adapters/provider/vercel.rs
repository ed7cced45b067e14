use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, error};

use crate::app_error::{AppError, AppResult};
use crate::infra::http_client::build_client;
use crate::use_cases::domains::{
    EdgeProvider, ProviderDnsRecord, ProviderRegistration, ProviderStatus,
};

const VERCEL_API_BASE: &str = "https://api.vercel.com";

/// Client for Vercel's project-domains API. Registering a domain here makes
/// the edge platform terminate TLS and serve traffic for it; Vercel runs its
/// own verification, independent of our CNAME ownership check.
pub struct VercelDomainsClient {
    client: Client,
    base_url: String,
    token: SecretString,
    project_id: String,
    team_id: Option<String>,
}

impl VercelDomainsClient {
    pub fn new(token: SecretString, project_id: String, team_id: Option<String>) -> Self {
        Self {
            client: build_client(),
            base_url: VERCEL_API_BASE.to_string(),
            token,
            project_id,
            team_id,
        }
    }

    /// Point the client at a different API host (local mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn domains_url(&self) -> String {
        format!(
            "{}/v9/projects/{}/domains{}",
            self.base_url,
            self.project_id,
            self.team_query()
        )
    }

    fn domain_url(&self, domain: &str, suffix: &str) -> String {
        format!(
            "{}/v9/projects/{}/domains/{}{}{}",
            self.base_url,
            self.project_id,
            domain,
            suffix,
            self.team_query()
        )
    }

    fn team_query(&self) -> String {
        match &self.team_id {
            Some(team_id) => format!("?teamId={}", team_id),
            None => String::new(),
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }

    /// Decode a provider response, folding conflicts and outages into the
    /// error taxonomy. The provider's raw body travels with conflicts so
    /// support can see Vercel's own diagnostic.
    async fn handle_response(&self, response: Response) -> AppResult<Value> {
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(body);
        }

        error!(status = %status, body = %body, "Vercel API error");

        if status == StatusCode::CONFLICT || provider_says_domain_taken(&body) {
            return Err(AppError::ProviderConflict {
                message: "Domain is already in use by another project".into(),
                detail: body,
            });
        }
        Err(AppError::ProviderUnavailable(format!(
            "Vercel API returned {}",
            status
        )))
    }
}

fn provider_says_domain_taken(body: &Value) -> bool {
    body.pointer("/error/code")
        .and_then(Value::as_str)
        .is_some_and(|code| code == "domain_already_in_use")
}

// The API token never appears in logs or debug output.
impl std::fmt::Debug for VercelDomainsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VercelDomainsClient")
            .field("token", &"<REDACTED>")
            .field("project_id", &self.project_id)
            .field("team_id", &self.team_id)
            .finish()
    }
}

#[async_trait]
impl EdgeProvider for VercelDomainsClient {
    async fn register_domain(&self, domain: &str) -> AppResult<ProviderRegistration> {
        debug!(domain = %domain, "Registering domain with Vercel");

        let response = self
            .client
            .post(self.domains_url())
            .header("Authorization", self.bearer())
            .json(&serde_json::json!({ "name": domain }))
            .send()
            .await
            .map_err(|e| AppError::ProviderUnavailable(format!("Vercel request failed: {}", e)))?;

        let body = self.handle_response(response).await?;
        Ok(ProviderRegistration {
            verification: parse_verification_records(&body),
            detail: body,
        })
    }

    async fn check_status(&self, domain: &str) -> AppResult<ProviderStatus> {
        let response = self
            .client
            .get(self.domain_url(domain, ""))
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|e| AppError::ProviderUnavailable(format!("Vercel request failed: {}", e)))?;

        // Unknown domain is a normal answer for status polling, not an error.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(ProviderStatus {
                exists: false,
                verified: false,
                detail: Value::Null,
            });
        }

        let body = self.handle_response(response).await?;
        Ok(ProviderStatus {
            exists: true,
            verified: body
                .get("verified")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            detail: body,
        })
    }

    async fn trigger_verification(&self, domain: &str) -> AppResult<ProviderStatus> {
        let response = self
            .client
            .post(self.domain_url(domain, "/verify"))
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|e| AppError::ProviderUnavailable(format!("Vercel request failed: {}", e)))?;

        let body = self.handle_response(response).await?;
        Ok(ProviderStatus {
            exists: true,
            verified: body
                .get("verified")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            detail: body,
        })
    }

    async fn remove_domain(&self, domain: &str) -> AppResult<()> {
        let response = self
            .client
            .delete(self.domain_url(domain, ""))
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|e| AppError::ProviderUnavailable(format!("Vercel request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        self.handle_response(response).await.map(|_| ())
    }
}

fn parse_verification_records(body: &Value) -> Vec<ProviderDnsRecord> {
    body.get("verification")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    Some(ProviderDnsRecord {
                        record_type: entry.get("type")?.as_str()?.to_string(),
                        name: entry.get("domain")?.as_str()?.to_string(),
                        value: entry.get("value")?.as_str()?.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
