use std::fs::File;
use std::sync::Arc;

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{dns::HickoryCnameResolver, http::app_state::AppState, provider::vercel::VercelDomainsClient},
    infra::{config::AppConfig, postgres_persistence},
    use_cases::{
        domains::{CnameResolver, DomainRepo, DomainUseCases, EdgeProvider, ProfileDirectory},
        edge::EdgeUseCases,
    },
};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres_arc = Arc::new(postgres_persistence(&config.database_url).await?);

    let resolver: Arc<dyn CnameResolver> = Arc::new(match config.dns_server {
        Some(addr) => HickoryCnameResolver::with_nameserver(addr),
        None => HickoryCnameResolver::new(),
    });

    let provider: Option<Arc<dyn EdgeProvider>> =
        match (&config.vercel_token, &config.vercel_project_id) {
            (Some(token), Some(project_id)) => Some(Arc::new(VercelDomainsClient::new(
                token.clone(),
                project_id.clone(),
                config.vercel_team_id.clone(),
            ))),
            _ => {
                warn!("Vercel credentials not configured; provider registration is disabled");
                None
            }
        };

    let repo_arc = postgres_arc.clone() as Arc<dyn DomainRepo>;
    let profiles_arc = postgres_arc.clone() as Arc<dyn ProfileDirectory>;

    let domain_use_cases = DomainUseCases::new(
        repo_arc.clone(),
        resolver,
        provider,
        config.cname_target.clone(),
        config.cname_suffix_match,
    );

    let edge_use_cases = EdgeUseCases::new(
        repo_arc,
        profiles_arc.clone(),
        config.main_domain.clone(),
        config.platform_suffixes.clone(),
    );

    Ok(AppState {
        config: Arc::new(config),
        domain_use_cases: Arc::new(domain_use_cases),
        edge_use_cases: Arc::new(edge_use_cases),
        profiles: profiles_arc,
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ollo_edge=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don't show target (module path)
        .with_level(true) // show log level
        .pretty(); // human-friendly, with colors

    // File (structured JSON logs)
    let file = File::create("app.log").expect("cannot create log file");
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
