use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use time::Duration;

pub struct AppConfig {
    pub jwt_secret: SecretString,
    pub access_token_ttl: Duration,
    pub cors_origin: HeaderValue,
    pub bind_addr: SocketAddr,
    pub database_url: String,
    /// The platform's own apex domain (e.g. "ollo.bio"). Requests for it
    /// bypass custom-domain resolution entirely.
    pub main_domain: String,
    /// Hostname suffixes of the deployment platform's generated hosts
    /// (e.g. ".vercel.app"), also treated as platform hosts.
    pub platform_suffixes: Vec<String>,
    /// The CNAME target custom domains must point at (e.g. "profiles.ollo.bio").
    /// One fixed platform hostname, never per-tenant.
    pub cname_target: String,
    /// Whether a CNAME ending in `.{cname_target}` also counts as a match.
    /// Permissive; disable for exact matching only.
    pub cname_suffix_match: bool,
    /// Optional DNS server address for lookups (e.g. "127.0.0.1:5353" for local CoreDNS).
    pub dns_server: Option<SocketAddr>,
    /// Vercel credentials for provider registration. All three are optional;
    /// without token + project id the provider endpoints report
    /// PROVIDER_CONFIG_MISSING.
    pub vercel_token: Option<SecretString>,
    pub vercel_project_id: Option<String>,
    pub vercel_team_id: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret: SecretString = SecretString::new(get_env::<String>("JWT_SECRET").into());

        let access_token_ttl_secs: i64 = get_env_default("ACCESS_TOKEN_TTL_SECS", 86_400);

        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");

        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3001".parse().unwrap());
        let database_url: String = get_env("DATABASE_URL");

        let main_domain: String = get_env_default("MAIN_DOMAIN", "ollo.bio".to_string());
        let platform_suffixes: Vec<String> =
            get_env_default("PLATFORM_SUFFIXES", ".vercel.app".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        let cname_target: String =
            get_env_default("CNAME_TARGET", "profiles.ollo.bio".to_string());
        let cname_suffix_match: bool = get_env_default("CNAME_SUFFIX_MATCH", true);

        let dns_server: Option<SocketAddr> = std::env::var("DNS_SERVER")
            .ok()
            .and_then(|s| s.parse().ok());

        let vercel_token: Option<SecretString> = std::env::var("VERCEL_AUTH_TOKEN")
            .ok()
            .map(|s| SecretString::new(s.into()));
        let vercel_project_id: Option<String> = std::env::var("VERCEL_PROJECT_ID").ok();
        let vercel_team_id: Option<String> = std::env::var("VERCEL_TEAM_ID").ok();

        Self {
            jwt_secret,
            access_token_ttl: Duration::seconds(access_token_ttl_secs),
            cors_origin,
            bind_addr,
            database_url,
            main_domain,
            platform_suffixes,
            cname_target,
            cname_suffix_match,
            dns_server,
            vercel_token,
            vercel_project_id,
            vercel_team_id,
        }
    }
}
