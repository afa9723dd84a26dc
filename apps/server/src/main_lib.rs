use std::sync::Arc;

use crate::config::Config;
use tenant_config_core::{
    process_mappings::{ProcessMappingService, ProcessMappingServiceTrait, ResolutionCache},
    tenants::{TenantService, TenantServiceTrait},
};
use tenant_config_storage_sqlite::{
    db::{self, write_actor},
    ProcessMappingRepository, TenantRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub process_mapping_service: Arc<dyn ProcessMappingServiceTrait + Send + Sync>,
    pub tenant_service: Arc<dyn TenantServiceTrait + Send + Sync>,
}

pub fn init_tracing() {
    let log_format = std::env::var("TC_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path, config.db_pool_size)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    // One cache shared by both services so tenant deletes evict resolutions.
    let resolution_cache = Arc::new(ResolutionCache::with_capacity(config.cache_capacity));
    tracing::info!("Resolution cache capacity: {}", config.cache_capacity);

    let mapping_repo = Arc::new(ProcessMappingRepository::new(pool.clone(), writer.clone()));
    let process_mapping_service = Arc::new(ProcessMappingService::new(
        mapping_repo,
        resolution_cache.clone(),
    ));

    let tenant_repo = Arc::new(TenantRepository::new(pool.clone(), writer.clone()));
    let tenant_service = Arc::new(TenantService::new(tenant_repo, resolution_cache));

    Ok(Arc::new(AppState {
        process_mapping_service,
        tenant_service,
    }))
}
