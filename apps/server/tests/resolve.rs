use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tenant_config_server::{api::app_router, build_state, config::Config};
use tower::ServiceExt;

async fn build_test_router() -> (TempDir, Router) {
    let tmp = tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp.path().join("test.db").to_string_lossy().into_owned(),
        db_pool_size: 4,
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(10),
        cache_capacity: 1_000,
    };
    let state = build_state(&config).await.unwrap();
    let app = app_router(state, &config).unwrap();
    (tmp, app)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_tenant(app: &Router, code: &str) -> String {
    let (status, tenant) = send(
        app,
        Method::POST,
        "/api/v1/tenants",
        Some(json!({ "code": code, "name": format!("{code} Bank") })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{tenant}");
    tenant["id"].as_str().unwrap().to_string()
}

async fn create_mapping(app: &Router, body: Value) -> Value {
    let (status, mapping) = send(app, Method::POST, "/api/v1/process-mappings", Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{mapping}");
    mapping
}

#[tokio::test]
async fn resolve_follows_writes() {
    let (_tmp, app) = build_test_router().await;
    let acme = create_tenant(&app, "ACME").await;

    create_mapping(
        &app,
        json!({ "operationId": "createAccount", "processId": "vanilla-account-creation" }),
    )
    .await;

    let resolve_uri = format!("/api/v1/resolve?tenantId={acme}&operationId=createAccount");
    let (status, resolved) = send(&app, Method::GET, &resolve_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["processId"], "vanilla-account-creation");

    let (_, stats) = send(&app, Method::GET, "/api/v1/cache/stats", None).await;
    assert_eq!(stats["entries"], 1);

    // A tenant mapping created after the first resolution must win immediately.
    let tenant_mapping = create_mapping(
        &app,
        json!({
            "tenantId": acme,
            "operationId": "createAccount",
            "processId": "acme-account-creation",
        }),
    )
    .await;
    let (_, resolved) = send(&app, Method::GET, &resolve_uri, None).await;
    assert_eq!(resolved["processId"], "acme-account-creation");

    let mapping_id = tenant_mapping["id"].as_str().unwrap();
    let mut update = tenant_mapping.clone();
    update["processId"] = json!("acme-account-creation-v2");
    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/process-mappings/{mapping_id}"),
        Some(update.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["version"], 1);

    let (_, resolved) = send(&app, Method::GET, &resolve_uri, None).await;
    assert_eq!(resolved["processId"], "acme-account-creation-v2");

    // Same body again carries the old version.
    let (status, conflict) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/process-mappings/{mapping_id}"),
        Some(update),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(conflict["code"], 409);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/process-mappings/{mapping_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, resolved) = send(&app, Method::GET, &resolve_uri, None).await;
    assert_eq!(resolved["processId"], "vanilla-account-creation");
}

#[tokio::test]
async fn resolve_prefers_most_specific_mapping() {
    let (_tmp, app) = build_test_router().await;
    let acme = create_tenant(&app, "ACME").await;

    for (product, channel, process) in [
        (None, None, "acme-default"),
        (Some("SAVINGS"), None, "acme-savings"),
        (None, Some("MOBILE"), "acme-mobile"),
        (Some("SAVINGS"), Some("MOBILE"), "acme-savings-mobile"),
    ] {
        create_mapping(
            &app,
            json!({
                "tenantId": acme,
                "productId": product,
                "channelType": channel,
                "operationId": "createAccount",
                "processId": process,
            }),
        )
        .await;
    }

    let cases = [
        ("&productId=SAVINGS&channelType=MOBILE", "acme-savings-mobile"),
        ("&productId=SAVINGS&channelType=WEB", "acme-savings"),
        ("&productId=LOANS&channelType=MOBILE", "acme-mobile"),
        ("&productId=&channelType=", "acme-default"),
        ("", "acme-default"),
    ];
    for (extra, expected) in cases {
        let uri = format!("/api/v1/resolve?tenantId={acme}&operationId=createAccount{extra}");
        let (status, resolved) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(resolved["processId"], expected, "{uri}");
    }
}

#[tokio::test]
async fn resolve_reports_missing_and_invalid_requests() {
    let (_tmp, app) = build_test_router().await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/resolve?tenantId=unknown&operationId=closeAccount",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
    assert!(body["message"].as_str().unwrap().contains("closeAccount"));

    for uri in [
        "/api/v1/resolve?tenantId=T1",
        "/api/v1/resolve?tenantId=T1&operationId=",
        "/api/v1/resolve?operationId=%20%20",
    ] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["code"], 400);
    }
}

#[tokio::test]
async fn cache_invalidation_endpoint() {
    let (_tmp, app) = build_test_router().await;
    let acme = create_tenant(&app, "ACME").await;
    let globex = create_tenant(&app, "GLOBEX").await;
    create_mapping(
        &app,
        json!({ "operationId": "createAccount", "processId": "vanilla-account-creation" }),
    )
    .await;

    for tenant in [&acme, &globex] {
        let uri = format!("/api/v1/resolve?tenantId={tenant}&operationId=createAccount");
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, stats) = send(&app, Method::GET, "/api/v1/cache/stats", None).await;
    assert_eq!(stats["entries"], 2);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/cache/invalidate?tenantId={acme}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, stats) = send(&app, Method::GET, "/api/v1/cache/stats", None).await;
    assert_eq!(stats["entries"], 1);

    let (status, _) = send(&app, Method::POST, "/api/v1/cache/invalidate", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, stats) = send(&app, Method::GET, "/api/v1/cache/stats", None).await;
    assert_eq!(stats["entries"], 0);
}

#[tokio::test]
async fn deleting_a_tenant_removes_its_mappings() {
    let (_tmp, app) = build_test_router().await;
    let acme = create_tenant(&app, "ACME").await;
    create_mapping(
        &app,
        json!({ "tenantId": acme, "operationId": "createAccount", "processId": "acme-account-creation" }),
    )
    .await;

    let uri = format!("/api/v1/resolve?tenantId={acme}&operationId=createAccount");
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/tenants/{acme}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, remaining) = send(&app, Method::GET, "/api/v1/process-mappings", None).await;
    assert_eq!(remaining.as_array().unwrap().len(), 0);

    let (status, _) = send(&app, Method::GET, &format!("/api/v1/tenants/{acme}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_tenant_code_conflicts() {
    let (_tmp, app) = build_test_router().await;
    create_tenant(&app, "ACME").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/tenants",
        Some(json!({ "code": "ACME", "name": "Another Acme" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);
}

#[tokio::test]
async fn mapping_for_unknown_tenant_conflicts() {
    let (_tmp, app) = build_test_router().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/process-mappings",
        Some(json!({
            "tenantId": "no-such-tenant",
            "operationId": "createAccount",
            "processId": "ghost-account-creation"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
    assert_eq!(body["code"], 409);

    let (_, remaining) = send(&app, Method::GET, "/api/v1/process-mappings", None).await;
    assert_eq!(remaining.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn deleting_a_mapping_twice_is_not_found() {
    let (_tmp, app) = build_test_router().await;
    let mapping = create_mapping(
        &app,
        json!({ "operationId": "createAccount", "processId": "vanilla-account-creation" }),
    )
    .await;
    let uri = format!("/api/v1/process-mappings/{}", mapping["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}
