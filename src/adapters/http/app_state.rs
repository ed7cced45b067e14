use std::sync::Arc;

use crate::{
    application::use_cases::{domains::DomainUseCases, edge::EdgeUseCases},
    infra::config::AppConfig,
    use_cases::domains::ProfileDirectory,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub domain_use_cases: Arc<DomainUseCases>,
    pub edge_use_cases: Arc<EdgeUseCases>,
    pub profiles: Arc<dyn ProfileDirectory>,
}
