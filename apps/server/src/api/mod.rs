use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    config::Config,
    main_lib::AppState,
    models::{
        CacheStats, NewProcessMapping, NewTenant, ProcessMapping, ProcessMappingUpdate, Tenant,
        TenantUpdate,
    },
};

mod process_mappings;
mod resolve;
mod tenants;

#[utoipa::path(get, path = "/api/v1/healthz", responses((status = 200, description = "Health")))]
pub async fn healthz() -> &'static str {
    "ok"
}

#[utoipa::path(get, path = "/api/v1/readyz", responses((status = 200, description = "Ready")))]
pub async fn readyz() -> &'static str {
    "ok"
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Query strings send absent filters as empty values; treat those as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        healthz,
        readyz,
        resolve::resolve_process,
        resolve::invalidate_cache,
        resolve::cache_stats,
        process_mappings::list_mappings,
        process_mappings::get_mapping,
        process_mappings::create_mapping,
        process_mappings::update_mapping,
        process_mappings::delete_mapping,
        tenants::list_tenants,
        tenants::get_tenant,
        tenants::create_tenant,
        tenants::update_tenant,
        tenants::delete_tenant,
    ),
    components(schemas(
        ProcessMapping,
        NewProcessMapping,
        ProcessMappingUpdate,
        Tenant,
        NewTenant,
        TenantUpdate,
        CacheStats
    )),
    tags((name = "tenant-config"))
)]
pub struct ApiDoc;

pub fn app_router(state: Arc<AppState>, config: &Config) -> anyhow::Result<Router> {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .map(|o| o.parse().with_context(|| format!("Invalid CORS origin {o}")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        CorsLayer::new().allow_origin(origins)
    };

    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .merge(resolve::router())
        .merge(process_mappings::router())
        .merge(tenants::router());

    Ok(Router::new()
        .nest("/api/v1", api)
        .route("/openapi.json", get(openapi_json))
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http()))
}
