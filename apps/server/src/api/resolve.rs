use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tenant_config_core::process_mappings::ResolutionKey;

use super::non_empty;
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{CacheStats, ProcessMapping},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolveQuery {
    tenant_id: Option<String>,
    operation_id: Option<String>,
    product_id: Option<String>,
    channel_type: Option<String>,
}

impl ResolveQuery {
    fn into_key(self) -> ApiResult<ResolutionKey> {
        let operation_id = non_empty(self.operation_id)
            .ok_or_else(|| ApiError::BadRequest("operationId is required".to_string()))?;
        Ok(ResolutionKey {
            tenant_id: non_empty(self.tenant_id),
            operation_id,
            product_id: non_empty(self.product_id),
            channel_type: non_empty(self.channel_type),
        })
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/resolve",
    params(
        ("tenantId" = Option<String>, Query, description = "Tenant requesting the operation"),
        ("operationId" = String, Query, description = "API operation to route"),
        ("productId" = Option<String>, Query, description = "Product scope"),
        ("channelType" = Option<String>, Query, description = "Channel scope, e.g. WEB or MOBILE"),
    ),
    responses(
        (status = 200, body = ProcessMapping),
        (status = 400, description = "operationId missing or empty"),
        (status = 404, description = "No applicable mapping"),
        (status = 503, description = "Mapping store unavailable"),
    )
)]
pub(super) async fn resolve_process(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ResolveQuery>,
) -> ApiResult<Json<ProcessMapping>> {
    let key = q.into_key()?;
    let operation_id = key.operation_id.clone();
    let tenant_id = key.tenant_id.clone();

    match state.process_mapping_service.resolve(key).await? {
        Some(mapping) => Ok(Json(mapping.into())),
        None => Err(ApiError::NotFound(format!(
            "No process mapping for operation {} (tenant {})",
            operation_id,
            tenant_id.as_deref().unwrap_or("none")
        ))),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvalidateQuery {
    tenant_id: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/cache/invalidate",
    params(("tenantId" = Option<String>, Query, description = "Tenant to evict; omit to clear everything")),
    responses((status = 204))
)]
pub(super) async fn invalidate_cache(
    State(state): State<Arc<AppState>>,
    Query(q): Query<InvalidateQuery>,
) -> StatusCode {
    let tenant_id = non_empty(q.tenant_id);
    let removed = state
        .process_mapping_service
        .invalidate_cache(tenant_id.as_deref());
    tracing::info!(
        tenant = tenant_id.as_deref().unwrap_or("*"),
        removed,
        "Resolution cache invalidated"
    );
    StatusCode::NO_CONTENT
}

#[utoipa::path(get, path = "/api/v1/cache/stats", responses((status = 200, body = CacheStats)))]
pub(super) async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    Json(CacheStats {
        entries: state.process_mapping_service.cached_resolutions().await,
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/resolve", get(resolve_process))
        .route("/cache/invalidate", post(invalidate_cache))
        .route("/cache/stats", get(cache_stats))
}
