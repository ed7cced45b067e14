//! In-memory mock implementations for the domain subsystem's ports.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::domain_record::{DomainRecord, DomainStatus},
    use_cases::domains::{
        CnameResolver, DnsLookupError, DomainRepo, EdgeProvider, ProfileDirectory,
        ProviderDnsRecord, ProviderRegistration, ProviderStatus,
    },
};

/// In-memory implementation of `DomainRepo` for testing. Keyed by profile id,
/// mirroring the one-claim-per-profile upsert; cross-profile uniqueness on
/// the domain string is checked the way the database's unique index would.
#[derive(Default)]
pub struct InMemoryDomainRepo {
    pub records: Mutex<HashMap<Uuid, DomainRecord>>,
}

impl InMemoryDomainRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repo with initial records for testing.
    pub fn with_records(records: Vec<DomainRecord>) -> Self {
        let map: HashMap<Uuid, DomainRecord> = records
            .into_iter()
            .map(|r| (r.profile_id, r))
            .collect();
        Self {
            records: Mutex::new(map),
        }
    }

    /// Get all records (for test assertions).
    pub fn get_all(&self) -> Vec<DomainRecord> {
        self.records.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl DomainRepo for InMemoryDomainRepo {
    async fn upsert_for_profile(&self, profile_id: Uuid, domain: &str) -> AppResult<DomainRecord> {
        let mut records = self.records.lock().unwrap();

        if records
            .values()
            .any(|r| r.domain == domain && r.profile_id != profile_id)
        {
            return Err(AppError::Conflict(
                "This domain is already connected to another profile".into(),
            ));
        }

        let now = chrono::Utc::now().naive_utc();
        let record = DomainRecord {
            id: Uuid::new_v4(),
            profile_id,
            domain: domain.to_string(),
            status: DomainStatus::PendingDns,
            verified_at: None,
            created_at: Some(now),
            updated_at: Some(now),
        };

        records.insert(profile_id, record.clone());
        Ok(record)
    }

    async fn get_by_domain(&self, domain: &str) -> AppResult<Option<DomainRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .find(|r| r.domain == domain)
            .cloned())
    }

    async fn get_for_profile(&self, profile_id: Uuid) -> AppResult<Option<DomainRecord>> {
        Ok(self.records.lock().unwrap().get(&profile_id).cloned())
    }

    async fn mark_verified(&self, domain: &str) -> AppResult<DomainRecord> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .values_mut()
            .find(|r| r.domain == domain)
            .ok_or(AppError::NotFound)?;

        if record.status != DomainStatus::ProviderRegistered {
            record.status = DomainStatus::DnsVerified;
        }
        record
            .verified_at
            .get_or_insert_with(|| chrono::Utc::now().naive_utc());
        record.updated_at = Some(chrono::Utc::now().naive_utc());

        Ok(record.clone())
    }

    async fn mark_provider_registered(&self, domain: &str) -> AppResult<DomainRecord> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .values_mut()
            .find(|r| r.domain == domain && r.status.is_verified())
            .ok_or(AppError::NotFound)?;

        record.status = DomainStatus::ProviderRegistered;
        record.updated_at = Some(chrono::Utc::now().naive_utc());

        Ok(record.clone())
    }

    async fn delete_for_profile(&self, profile_id: Uuid) -> AppResult<()> {
        let mut records = self.records.lock().unwrap();
        records.remove(&profile_id).ok_or(AppError::NotFound)?;
        Ok(())
    }
}

/// Repo that fails every call, for registry-outage behavior.
pub struct FailingDomainRepo;

#[async_trait]
impl DomainRepo for FailingDomainRepo {
    async fn upsert_for_profile(&self, _: Uuid, _: &str) -> AppResult<DomainRecord> {
        Err(AppError::Registry("registry unavailable".into()))
    }
    async fn get_by_domain(&self, _: &str) -> AppResult<Option<DomainRecord>> {
        Err(AppError::Registry("registry unavailable".into()))
    }
    async fn get_for_profile(&self, _: Uuid) -> AppResult<Option<DomainRecord>> {
        Err(AppError::Registry("registry unavailable".into()))
    }
    async fn mark_verified(&self, _: &str) -> AppResult<DomainRecord> {
        Err(AppError::Registry("registry unavailable".into()))
    }
    async fn mark_provider_registered(&self, _: &str) -> AppResult<DomainRecord> {
        Err(AppError::Registry("registry unavailable".into()))
    }
    async fn delete_for_profile(&self, _: Uuid) -> AppResult<()> {
        Err(AppError::Registry("registry unavailable".into()))
    }
}

/// In-memory `ProfileDirectory` mapping profile ids to usernames.
#[derive(Default)]
pub struct InMemoryProfileDirectory {
    profiles: Mutex<HashMap<Uuid, String>>,
}

impl InMemoryProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: Vec<(Uuid, String)>) -> Self {
        Self {
            profiles: Mutex::new(profiles.into_iter().collect()),
        }
    }
}

#[async_trait]
impl ProfileDirectory for InMemoryProfileDirectory {
    async fn username_for_profile(&self, profile_id: Uuid) -> AppResult<Option<String>> {
        Ok(self.profiles.lock().unwrap().get(&profile_id).cloned())
    }

    async fn profile_exists(&self, username: &str) -> AppResult<bool> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .values()
            .any(|u| u == username))
    }
}

enum ScriptedLookup {
    Records(Vec<String>),
    HostNotFound,
    NoRecord,
    Unavailable,
}

/// Resolver returning a fixed answer, standing in for live DNS.
pub struct ScriptedResolver {
    lookup: ScriptedLookup,
}

impl ScriptedResolver {
    pub fn with_records(records: Vec<String>) -> Self {
        Self {
            lookup: ScriptedLookup::Records(records),
        }
    }

    pub fn host_not_found() -> Self {
        Self {
            lookup: ScriptedLookup::HostNotFound,
        }
    }

    pub fn no_record() -> Self {
        Self {
            lookup: ScriptedLookup::NoRecord,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            lookup: ScriptedLookup::Unavailable,
        }
    }

    /// For tests that never reach DNS.
    pub fn empty() -> Self {
        Self::no_record()
    }
}

#[async_trait]
impl CnameResolver for ScriptedResolver {
    async fn resolve_cname(&self, _domain: &str) -> Result<Vec<String>, DnsLookupError> {
        match &self.lookup {
            ScriptedLookup::Records(records) => Ok(records.clone()),
            ScriptedLookup::HostNotFound => Err(DnsLookupError::HostNotFound),
            ScriptedLookup::NoRecord => Err(DnsLookupError::NoCnameRecord),
            ScriptedLookup::Unavailable => {
                Err(DnsLookupError::Unavailable("connection refused".into()))
            }
        }
    }
}

/// Provider that records calls and answers like a freshly-added domain.
#[derive(Default)]
pub struct RecordingProvider {
    registered: Mutex<Vec<String>>,
    removed: Mutex<Vec<String>>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registered(&self) -> Vec<String> {
        self.registered.lock().unwrap().clone()
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }
}

#[async_trait]
impl EdgeProvider for RecordingProvider {
    async fn register_domain(&self, domain: &str) -> AppResult<ProviderRegistration> {
        self.registered.lock().unwrap().push(domain.to_string());
        Ok(ProviderRegistration {
            verification: vec![ProviderDnsRecord {
                record_type: "TXT".into(),
                name: format!("_vercel.{domain}"),
                value: "vc-domain-verify=test".into(),
            }],
            detail: serde_json::json!({ "name": domain, "verified": false }),
        })
    }

    async fn check_status(&self, _domain: &str) -> AppResult<ProviderStatus> {
        Ok(ProviderStatus {
            exists: false,
            verified: false,
            detail: serde_json::Value::Null,
        })
    }

    async fn trigger_verification(&self, domain: &str) -> AppResult<ProviderStatus> {
        Ok(ProviderStatus {
            exists: true,
            verified: false,
            detail: serde_json::json!({ "name": domain }),
        })
    }

    async fn remove_domain(&self, domain: &str) -> AppResult<()> {
        self.removed.lock().unwrap().push(domain.to_string());
        Ok(())
    }
}

/// Provider whose every call fails as an outage.
pub struct FailingProvider;

#[async_trait]
impl EdgeProvider for FailingProvider {
    async fn register_domain(&self, _: &str) -> AppResult<ProviderRegistration> {
        Err(AppError::ProviderUnavailable("provider down".into()))
    }
    async fn check_status(&self, _: &str) -> AppResult<ProviderStatus> {
        Err(AppError::ProviderUnavailable("provider down".into()))
    }
    async fn trigger_verification(&self, _: &str) -> AppResult<ProviderStatus> {
        Err(AppError::ProviderUnavailable("provider down".into()))
    }
    async fn remove_domain(&self, _: &str) -> AppResult<()> {
        Err(AppError::ProviderUnavailable("provider down".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_record;

    #[tokio::test]
    async fn upsert_creates_pending_record() {
        let repo = InMemoryDomainRepo::new();
        let profile_id = Uuid::new_v4();

        let record = repo.upsert_for_profile(profile_id, "test.com").await.unwrap();

        assert_eq!(record.domain, "test.com");
        assert_eq!(record.profile_id, profile_id);
        assert_eq!(record.status, DomainStatus::PendingDns);
    }

    #[tokio::test]
    async fn upsert_rejects_domain_claimed_by_other_profile() {
        let repo = InMemoryDomainRepo::new();

        repo.upsert_for_profile(Uuid::new_v4(), "test.com").await.unwrap();
        let result = repo.upsert_for_profile(Uuid::new_v4(), "test.com").await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn upsert_replaces_own_claim_and_resets_status() {
        let repo = InMemoryDomainRepo::new();
        let profile_id = Uuid::new_v4();

        repo.upsert_for_profile(profile_id, "old.com").await.unwrap();
        repo.mark_verified("old.com").await.unwrap();
        let record = repo.upsert_for_profile(profile_id, "new.com").await.unwrap();

        assert_eq!(record.status, DomainStatus::PendingDns);
        assert!(repo.get_by_domain("old.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn mark_verified_sets_timestamp() {
        let record = create_test_record(|r| {
            r.domain = "test.com".to_string();
            r.status = DomainStatus::PendingDns;
            r.verified_at = None;
        });
        let repo = InMemoryDomainRepo::with_records(vec![record]);

        let updated = repo.mark_verified("test.com").await.unwrap();
        assert_eq!(updated.status, DomainStatus::DnsVerified);
        assert!(updated.verified_at.is_some());
    }

    #[tokio::test]
    async fn mark_verified_never_downgrades_registered_claims() {
        let record = create_test_record(|r| {
            r.domain = "test.com".to_string();
            r.status = DomainStatus::ProviderRegistered;
        });
        let repo = InMemoryDomainRepo::with_records(vec![record]);

        let updated = repo.mark_verified("test.com").await.unwrap();
        assert_eq!(updated.status, DomainStatus::ProviderRegistered);
    }
}
