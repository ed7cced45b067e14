use std::net::SocketAddr;

use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use hickory_resolver::config::{NameServerConfig, ResolverConfig};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::ProtoErrorKind;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::proto::xfer::Protocol;
use hickory_resolver::{ResolveError, ResolveErrorKind};
use tracing::debug;

use crate::use_cases::domains::{CnameResolver, DnsLookupError};

pub struct HickoryCnameResolver {
    resolver: TokioResolver,
}

impl HickoryCnameResolver {
    /// Create resolver using system DNS configuration.
    pub fn new() -> Self {
        let resolver = TokioResolver::builder_tokio().unwrap().build();
        Self { resolver }
    }

    /// Create resolver pointing to a specific DNS server (for local dev with CoreDNS).
    pub fn with_nameserver(addr: SocketAddr) -> Self {
        let mut config = ResolverConfig::new();
        config.add_name_server(NameServerConfig::new(addr, Protocol::Udp));

        let resolver =
            TokioResolver::builder_with_config(config, TokioConnectionProvider::default()).build();
        Self { resolver }
    }
}

impl Default for HickoryCnameResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CnameResolver for HickoryCnameResolver {
    async fn resolve_cname(&self, domain: &str) -> Result<Vec<String>, DnsLookupError> {
        debug!(domain = %domain, "Resolving CNAME records");

        // Append trailing dot to make it an FQDN and prevent search domain appending
        let fqdn = if domain.ends_with('.') {
            domain.to_string()
        } else {
            format!("{}.", domain)
        };

        match self.resolver.lookup(&fqdn, RecordType::CNAME).await {
            Ok(lookup) => {
                let records: Vec<String> = lookup
                    .records()
                    .iter()
                    .filter_map(|record| record.data().as_cname())
                    .map(|cname| cname.to_string().trim_end_matches('.').to_string())
                    .collect();

                debug!(domain = %domain, found = ?records, "CNAME lookup completed");

                if records.is_empty() {
                    Err(DnsLookupError::NoCnameRecord)
                } else {
                    Ok(records)
                }
            }
            Err(err) => Err(classify_lookup_error(err)),
        }
    }
}

/// NXDOMAIN means the host has no DNS presence at all; NODATA means the host
/// resolves but carries no CNAME. Everything else is a transport problem the
/// caller should retry.
fn classify_lookup_error(err: ResolveError) -> DnsLookupError {
    if let ResolveErrorKind::Proto(proto) = err.kind()
        && let ProtoErrorKind::NoRecordsFound { response_code, .. } = proto.kind()
    {
        return if *response_code == ResponseCode::NXDomain {
            DnsLookupError::HostNotFound
        } else {
            DnsLookupError::NoCnameRecord
        };
    }
    DnsLookupError::Unavailable(err.to_string())
}
