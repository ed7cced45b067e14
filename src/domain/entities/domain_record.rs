use uuid::Uuid;

/// Lifecycle of a custom-domain claim.
///
/// `PendingDns` is the state every new or changed claim starts in. DNS
/// verification advances it to `DnsVerified`; registering the domain with the
/// edge hosting provider advances it further to `ProviderRegistered`. The two
/// verification tracks are independent: provider registration never gates (or
/// reverts) DNS verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainStatus {
    PendingDns,
    DnsVerified,
    ProviderRegistered,
}

impl DomainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainStatus::PendingDns => "pending_dns",
            DomainStatus::DnsVerified => "dns_verified",
            DomainStatus::ProviderRegistered => "provider_registered",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "dns_verified" => DomainStatus::DnsVerified,
            "provider_registered" => DomainStatus::ProviderRegistered,
            _ => DomainStatus::PendingDns,
        }
    }

    /// Whether the domain may serve profile traffic from the edge router.
    pub fn is_verified(&self) -> bool {
        matches!(
            self,
            DomainStatus::DnsVerified | DomainStatus::ProviderRegistered
        )
    }
}

/// A profile's custom-domain claim as stored in the registry.
///
/// At most one record exists per domain string and per profile (both enforced
/// by unique indexes).
#[derive(Debug, Clone)]
pub struct DomainRecord {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub domain: String,
    pub status: DomainStatus,
    pub verified_at: Option<chrono::NaiveDateTime>,
    pub created_at: Option<chrono::NaiveDateTime>,
    pub updated_at: Option<chrono::NaiveDateTime>,
}
