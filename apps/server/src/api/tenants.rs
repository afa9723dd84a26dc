use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{NewTenant, Tenant, TenantUpdate},
};

#[utoipa::path(get, path = "/api/v1/tenants", responses((status = 200, body = [Tenant])))]
pub(super) async fn list_tenants(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Tenant>>> {
    let tenants = state.tenant_service.get_tenants()?;
    Ok(Json(tenants.into_iter().map(Tenant::from).collect()))
}

#[utoipa::path(get, path = "/api/v1/tenants/{id}", responses((status = 200, body = Tenant), (status = 404)))]
pub(super) async fn get_tenant(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Tenant>> {
    Ok(Json(state.tenant_service.get_tenant(&id)?.into()))
}

#[utoipa::path(post, path = "/api/v1/tenants", request_body = NewTenant, responses((status = 200, body = Tenant), (status = 409)))]
pub(super) async fn create_tenant(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewTenant>,
) -> ApiResult<Json<Tenant>> {
    let created = state.tenant_service.create_tenant(payload.into()).await?;
    Ok(Json(created.into()))
}

#[utoipa::path(put, path = "/api/v1/tenants/{id}", request_body = TenantUpdate, responses((status = 200, body = Tenant), (status = 404)))]
pub(super) async fn update_tenant(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TenantUpdate>,
) -> ApiResult<Json<Tenant>> {
    let updated = state
        .tenant_service
        .update_tenant(payload.into_core(id))
        .await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(delete, path = "/api/v1/tenants/{id}", responses((status = 204), (status = 404)))]
pub(super) async fn delete_tenant(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    if state.tenant_service.delete_tenant(id.clone()).await? == 0 {
        return Err(ApiError::NotFound(format!("Tenant {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tenants", get(list_tenants).post(create_tenant))
        .route(
            "/tenants/{id}",
            get(get_tenant).put(update_tenant).delete(delete_tenant),
        )
}
