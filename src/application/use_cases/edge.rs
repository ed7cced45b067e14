use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::use_cases::domains::{DomainRepo, ProfileDirectory};

/// What the edge router should do with a request for a given host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Platform host, unknown host, or any registry failure: hand the
    /// request to the normal router untouched.
    PassThrough,
    /// Verified custom domain: serve `/{username}{path}` while keeping the
    /// client-visible URL intact.
    RewriteTo { username: String },
    /// Known but unverified custom domain: send the visitor to the
    /// verification flow.
    RedirectToVerification { domain: String },
}

#[derive(Clone)]
pub struct EdgeUseCases {
    repo: Arc<dyn DomainRepo>,
    profiles: Arc<dyn ProfileDirectory>,
    main_domain: String,
    platform_suffixes: Vec<String>,
}

impl EdgeUseCases {
    pub fn new(
        repo: Arc<dyn DomainRepo>,
        profiles: Arc<dyn ProfileDirectory>,
        main_domain: String,
        platform_suffixes: Vec<String>,
    ) -> Self {
        Self {
            repo,
            profiles,
            main_domain,
            platform_suffixes,
        }
    }

    /// Lowercase, trim, and strip the port from a Host header value.
    pub fn normalize_host(raw: &str) -> String {
        let host = raw.trim().to_ascii_lowercase();
        match host.rsplit_once(':') {
            Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name.to_string(),
            _ => host,
        }
    }

    /// Whether the host is one of the platform's own hostnames, which never
    /// go through domain resolution.
    pub fn is_platform_host(&self, host: &str) -> bool {
        host == self.main_domain
            || host == "localhost"
            || host == "127.0.0.1"
            || self
                .platform_suffixes
                .iter()
                .any(|suffix| host.ends_with(suffix.as_str()))
    }

    /// Decide routing for a custom host. Never fails: registry and profile
    /// lookup errors degrade to pass-through so the platform stays reachable.
    pub async fn route_host(&self, host: &str) -> RouteDecision {
        let record = match self.repo.get_by_domain(host).await {
            Ok(record) => record,
            Err(e) => {
                warn!(host = %host, error = ?e, "Domain registry lookup failed, passing through");
                return RouteDecision::PassThrough;
            }
        };

        let Some(record) = record else {
            debug!(host = %host, "No domain record for host");
            return RouteDecision::PassThrough;
        };

        if !record.status.is_verified() {
            return RouteDecision::RedirectToVerification {
                domain: host.to_string(),
            };
        }

        match self.profiles.username_for_profile(record.profile_id).await {
            Ok(Some(username)) => RouteDecision::RewriteTo { username },
            Ok(None) => {
                warn!(host = %host, profile_id = %record.profile_id, "No username for verified domain");
                RouteDecision::PassThrough
            }
            Err(e) => {
                warn!(host = %host, error = ?e, "Profile lookup failed, passing through");
                RouteDecision::PassThrough
            }
        }
    }
}
