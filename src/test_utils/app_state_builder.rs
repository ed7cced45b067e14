//! Test app state builder for HTTP-level integration testing.
//!
//! Builds a minimal `AppState` with in-memory ports so routes and the edge
//! router middleware can be exercised through `axum_test::TestServer`.

use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    domain::entities::domain_record::DomainRecord,
    infra::config::AppConfig,
    test_utils::{InMemoryDomainRepo, InMemoryProfileDirectory, ScriptedResolver},
    use_cases::{
        domains::{DomainUseCases, EdgeProvider},
        edge::EdgeUseCases,
    },
};

const TEST_CNAME_TARGET: &str = "profiles.ollo.bio";

/// Builder for creating `AppState` with in-memory ports for testing.
///
/// # Example
///
/// ```ignore
/// let record = create_test_record(|r| r.domain = "example.com".to_string());
/// let app_state = TestAppStateBuilder::new()
///     .with_record(record)
///     .with_profile(profile_id, "alice")
///     .build();
/// ```
pub struct TestAppStateBuilder {
    records: Vec<DomainRecord>,
    profiles: Vec<(Uuid, String)>,
    resolver: ScriptedResolver,
    provider: Option<Arc<dyn EdgeProvider>>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            profiles: Vec::new(),
            resolver: ScriptedResolver::empty(),
            provider: None,
        }
    }

    pub fn with_record(mut self, record: DomainRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn with_profile(mut self, profile_id: Uuid, username: &str) -> Self {
        self.profiles.push((profile_id, username.to_string()));
        self
    }

    pub fn with_resolver(mut self, resolver: ScriptedResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_provider(mut self, provider: impl EdgeProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    pub fn build(self) -> AppState {
        let config = test_config();

        let repo = Arc::new(InMemoryDomainRepo::with_records(self.records));
        let profiles = Arc::new(InMemoryProfileDirectory::with_profiles(self.profiles));

        let domain_use_cases = DomainUseCases::new(
            repo.clone(),
            Arc::new(self.resolver),
            self.provider,
            config.cname_target.clone(),
            config.cname_suffix_match,
        );

        let edge_use_cases = EdgeUseCases::new(
            repo,
            profiles.clone(),
            config.main_domain.clone(),
            config.platform_suffixes.clone(),
        );

        AppState {
            config: Arc::new(config),
            domain_use_cases: Arc::new(domain_use_cases),
            edge_use_cases: Arc::new(edge_use_cases),
            profiles,
        }
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: SecretString::new("test-secret".into()),
        access_token_ttl: Duration::hours(1),
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        database_url: "postgres://unused".to_string(),
        main_domain: "ollo.bio".to_string(),
        platform_suffixes: vec![".vercel.app".to_string()],
        cname_target: TEST_CNAME_TARGET.to_string(),
        cname_suffix_match: true,
        dns_server: None,
        vercel_token: None,
        vercel_project_id: None,
        vercel_team_id: None,
    }
}
