use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tenant_config_core::process_mappings::ProcessMappingFilter;

use super::non_empty;
use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{NewProcessMapping, ProcessMapping, ProcessMappingUpdate},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MappingListQuery {
    tenant_id: Option<String>,
    operation_id: Option<String>,
    vanilla: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/v1/process-mappings",
    params(
        ("tenantId" = Option<String>, Query, description = "Only mappings of this tenant"),
        ("operationId" = Option<String>, Query, description = "Only mappings of this operation"),
        ("vanilla" = Option<bool>, Query, description = "true: only vanilla mappings, false: only tenant-scoped ones"),
    ),
    responses((status = 200, body = [ProcessMapping]))
)]
pub(super) async fn list_mappings(
    State(state): State<Arc<AppState>>,
    Query(q): Query<MappingListQuery>,
) -> ApiResult<Json<Vec<ProcessMapping>>> {
    let filter = ProcessMappingFilter {
        tenant_id: non_empty(q.tenant_id),
        operation_id: non_empty(q.operation_id),
        vanilla: q.vanilla,
    };
    let mappings = state.process_mapping_service.list_mappings(&filter)?;
    Ok(Json(mappings.into_iter().map(ProcessMapping::from).collect()))
}

#[utoipa::path(get, path = "/api/v1/process-mappings/{id}", responses((status = 200, body = ProcessMapping), (status = 404)))]
pub(super) async fn get_mapping(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ProcessMapping>> {
    let mapping = state.process_mapping_service.get_mapping(&id)?;
    Ok(Json(mapping.into()))
}

#[utoipa::path(post, path = "/api/v1/process-mappings", request_body = NewProcessMapping, responses((status = 200, body = ProcessMapping)))]
pub(super) async fn create_mapping(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewProcessMapping>,
) -> ApiResult<Json<ProcessMapping>> {
    let created = state
        .process_mapping_service
        .create_mapping(payload.into())
        .await?;
    Ok(Json(created.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/process-mappings/{id}",
    request_body = ProcessMappingUpdate,
    responses((status = 200, body = ProcessMapping), (status = 404), (status = 409))
)]
pub(super) async fn update_mapping(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ProcessMappingUpdate>,
) -> ApiResult<Json<ProcessMapping>> {
    let updated = state
        .process_mapping_service
        .update_mapping(payload.into_core(id))
        .await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(delete, path = "/api/v1/process-mappings/{id}", responses((status = 204), (status = 404)))]
pub(super) async fn delete_mapping(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.process_mapping_service.delete_mapping(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/process-mappings",
            get(list_mappings).post(create_mapping),
        )
        .route(
            "/process-mappings/{id}",
            get(get_mapping).put(update_mapping).delete(delete_mapping),
        )
}
