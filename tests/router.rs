//! Router-level tests: the full axum app over the in-memory store.

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, LOCATION, WWW_AUTHENTICATE},
        Method, Request, StatusCode,
    },
    response::Response,
    Router,
};
use portico::{
    access::{Role, TokenGate},
    api,
    hierarchy::HierarchyManager,
    ids::UlidGenerator,
    store::MemoryStore,
};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const ADMIN: &str = "admin-token";
const EDITOR: &str = "editor-token";
const VIEWER: &str = "viewer-token";

fn app() -> Router {
    let manager = HierarchyManager::new(Arc::new(MemoryStore::new()), Arc::new(UlidGenerator));
    let gate = TokenGate::new()
        .with_token(Role::Admin, &SecretString::from(ADMIN.to_string()))
        .with_token(Role::Editor, &SecretString::from(EDITOR.to_string()))
        .with_token(Role::Viewer, &SecretString::from(VIEWER.to_string()));
    api::app(manager, Arc::new(gate))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(body) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

async fn create(app: &Router, uri: &str, body: Value) -> Value {
    let response = send(app, Method::POST, uri, Some(ADMIN), Some(body)).await;
    assert_eq!(response.status(), StatusCode::CREATED, "POST {uri}");
    json_body(response).await
}

fn id(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

async fn create_api(app: &Router, name: &str, base_path: &str) -> String {
    let api = create(
        app,
        "/v1/apis",
        json!({ "name": name, "version": "1.0", "base_path": base_path }),
    )
    .await;
    id(&api)
}

async fn create_resource(app: &Router, api_id: &str, name: &str) -> String {
    let resource = create(
        app,
        &format!("/v1/apis/{api_id}/resources"),
        json!({ "name": name }),
    )
    .await;
    id(&resource)
}

#[tokio::test]
async fn operation_lifecycle() {
    let app = app();
    let api_id = create_api(&app, "orders", "/orders").await;
    let resource_id = create_resource(&app, &api_id, "items").await;
    let operations = format!("/v1/apis/{api_id}/resources/{resource_id}/operations");

    let response = send(
        &app,
        Method::POST,
        &operations,
        Some(EDITOR),
        Some(json!({ "method": "GET", "path": "/items/{id}", "description": "fetch" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap();
    let operation = json_body(response).await;
    let operation_id = id(&operation);
    assert_eq!(location, format!("{operations}/{operation_id}"));
    assert_eq!(operation["api_id"], api_id.as_str());
    assert_eq!(operation["resource_id"], resource_id.as_str());
    assert_eq!(operation["method"], "GET");

    let response = send(&app, Method::GET, &location, Some(VIEWER), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, operation);

    let response = send(
        &app,
        Method::PUT,
        &location,
        Some(EDITOR),
        Some(json!({ "method": "POST", "path": "/items" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = json_body(response).await;
    assert_eq!(updated["id"], operation_id.as_str());
    assert_eq!(updated["method"], "POST");

    // resource membership is derived from the store index
    let response = send(
        &app,
        Method::GET,
        &format!("/v1/apis/{api_id}/resources/{resource_id}"),
        Some(VIEWER),
        None,
    )
    .await;
    let resource = json_body(response).await;
    assert_eq!(resource["operations"], json!([operation_id]));

    let response = send(&app, Method::DELETE, &location, Some(ADMIN), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, Method::GET, &location, Some(VIEWER), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "not_found");

    // deleting again is a no-op
    let response = send(&app, Method::DELETE, &location, Some(ADMIN), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn chain_mismatch_is_not_found() {
    let app = app();
    let orders = create_api(&app, "orders", "/orders").await;
    let billing = create_api(&app, "billing", "/billing").await;
    let items = create_resource(&app, &orders, "items").await;
    let invoices = create_resource(&app, &billing, "invoices").await;
    let operation = create(
        &app,
        &format!("/v1/apis/{orders}/resources/{items}/operations"),
        json!({ "method": "GET", "path": "/items" }),
    )
    .await;
    let operation_id = id(&operation);

    for uri in [
        format!("/v1/apis/{billing}/resources/{items}"),
        format!("/v1/apis/{orders}/resources/{invoices}/operations/{operation_id}"),
        format!("/v1/apis/{billing}/resources/{items}/operations/{operation_id}"),
        format!("/v1/apis/missing/resources/{items}/operations"),
    ] {
        let response = send(&app, Method::GET, &uri, Some(VIEWER), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {uri}");
    }

    // delete through a broken chain reports the missing ancestor
    let response = send(
        &app,
        Method::DELETE,
        &format!("/v1/apis/{billing}/resources/{items}/operations/{operation_id}"),
        Some(ADMIN),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // an operation owned by a sibling resource is left alone
    let response = send(
        &app,
        Method::DELETE,
        &format!("/v1/apis/{billing}/resources/{invoices}/operations/{operation_id}"),
        Some(ADMIN),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = send(
        &app,
        Method::GET,
        &format!("/v1/apis/{orders}/resources/{items}/operations/{operation_id}"),
        Some(VIEWER),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn listing_is_full_or_paged() {
    let app = app();
    let api_id = create_api(&app, "orders", "/orders").await;
    let resource_id = create_resource(&app, &api_id, "items").await;
    let operations = format!("/v1/apis/{api_id}/resources/{resource_id}/operations");
    let mut ids = Vec::new();
    for path in ["/a", "/b", "/c", "/d", "/e"] {
        let operation = create(&app, &operations, json!({ "method": "GET", "path": path })).await;
        ids.push(id(&operation));
    }

    let response = send(&app, Method::GET, &operations, Some(VIEWER), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let full = json_body(response).await;
    let listed: Vec<&str> = full
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|operation| operation["id"].as_str())
        .collect();
    assert_eq!(listed, ids.iter().map(String::as_str).collect::<Vec<_>>());

    let response = send(
        &app,
        Method::GET,
        &format!("{operations}?page=1&limit=2"),
        Some(VIEWER),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = json_body(response).await;
    assert_eq!(page["total_elements"], 5);
    assert_eq!(page["total_pages"], 3);
    assert_eq!(page["page"], 1);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["first"], false);
    assert_eq!(page["last"], false);
    assert_eq!(page["content"][0]["id"], ids[2].as_str());
    assert_eq!(page["content"][1]["id"], ids[3].as_str());

    let response = send(
        &app,
        Method::GET,
        &format!("{operations}?page=9&limit=2"),
        Some(VIEWER),
        None,
    )
    .await;
    let past_end = json_body(response).await;
    assert_eq!(past_end["content"], json!([]));
    assert_eq!(past_end["total_elements"], 5);

    for query in ["page=-1", "limit=0", "limit=abc"] {
        let response = send(
            &app,
            Method::GET,
            &format!("{operations}?{query}"),
            Some(VIEWER),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{query}");
    }
}

#[tokio::test]
async fn blank_paging_values_return_the_full_collection() {
    let app = app();
    let api_id = create_api(&app, "orders", "/orders").await;
    let resource_id = create_resource(&app, &api_id, "items").await;
    let operations = format!("/v1/apis/{api_id}/resources/{resource_id}/operations");
    let operation = create(&app, &operations, json!({ "method": "GET", "path": "/items" })).await;

    for query in ["page=&limit=", "page=", "limit="] {
        let response = send(
            &app,
            Method::GET,
            &format!("{operations}?{query}"),
            Some(VIEWER),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "{query}");
        let listing = json_body(response).await;
        assert_eq!(listing, json!([operation]), "{query}");
    }

    let response = send(
        &app,
        Method::GET,
        "/v1/apis?base_path=&page=&limit=",
        Some(VIEWER),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn access_is_gated() {
    let app = app();

    let response = send(&app, Method::GET, "/v1/apis", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(WWW_AUTHENTICATE));
    assert_eq!(json_body(response).await["error"], "unauthorized");

    let response = send(&app, Method::GET, "/v1/apis", Some("nope"), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        Method::POST,
        "/v1/apis",
        Some(VIEWER),
        Some(json!({ "name": "orders", "version": "1", "base_path": "/orders" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["error"], "forbidden");

    let api_id = create_api(&app, "orders", "/orders").await;
    let response = send(
        &app,
        Method::DELETE,
        &format!("/v1/apis/{api_id}"),
        Some(EDITOR),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // unauthenticated callers are rejected before the body is read
    let response = send(
        &app,
        Method::POST,
        "/v1/apis",
        None,
        Some(json!({ "unexpected": true })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let app = app();

    let response = send(
        &app,
        Method::POST,
        "/v1/apis",
        Some(ADMIN),
        Some(json!({ "name": "orders", "version": "1" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "validation_error");

    let response = send(
        &app,
        Method::POST,
        "/v1/apis",
        Some(ADMIN),
        Some(json!({ "name": "orders", "unknown": 1 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let api_id = create_api(&app, "orders", "/orders").await;
    let resource_id = create_resource(&app, &api_id, "items").await;
    let response = send(
        &app,
        Method::POST,
        &format!("/v1/apis/{api_id}/resources/{resource_id}/operations"),
        Some(ADMIN),
        Some(json!({ "method": "FETCH", "path": "/items" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn conflicts_map_to_409() {
    let app = app();
    let api_id = create_api(&app, "orders", "/orders").await;
    let resource_id = create_resource(&app, &api_id, "items").await;
    let operations = format!("/v1/apis/{api_id}/resources/{resource_id}/operations");
    create(&app, &operations, json!({ "method": "GET", "path": "/items" })).await;

    let response = send(
        &app,
        Method::POST,
        &operations,
        Some(ADMIN),
        Some(json!({ "method": "GET", "path": "/items" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["error"], "conflict");

    let response = send(
        &app,
        Method::POST,
        &format!("/v1/apis/{api_id}/resources"),
        Some(ADMIN),
        Some(json!({ "name": "items" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn deleting_an_api_cascades() {
    let app = app();
    let api_id = create_api(&app, "orders", "/orders").await;
    let resource_id = create_resource(&app, &api_id, "items").await;
    create(
        &app,
        &format!("/v1/apis/{api_id}/resources/{resource_id}/operations"),
        json!({ "method": "ALL", "path": "/items" }),
    )
    .await;

    let response = send(
        &app,
        Method::GET,
        &format!("/v1/apis/{api_id}/operations"),
        Some(VIEWER),
        None,
    )
    .await;
    assert_eq!(json_body(response).await.as_array().map(Vec::len), Some(1));

    let response = send(
        &app,
        Method::DELETE,
        &format!("/v1/apis/{api_id}"),
        Some(ADMIN),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(
        &app,
        Method::GET,
        &format!("/v1/apis/{api_id}/resources/{resource_id}"),
        Some(VIEWER),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        Method::DELETE,
        &format!("/v1/apis/{api_id}"),
        Some(ADMIN),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn apis_filter_by_base_path() {
    let app = app();
    let orders = create_api(&app, "orders", "/orders").await;
    create_api(&app, "billing", "/billing").await;

    let response = send(
        &app,
        Method::GET,
        "/v1/apis?base_path=/orders/",
        Some(VIEWER),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let apis = json_body(response).await;
    assert_eq!(apis.as_array().map(Vec::len), Some(1));
    assert_eq!(apis[0]["id"], orders.as_str());
}

#[tokio::test]
async fn api_references_siblings() {
    let app = app();
    let environment = create(
        &app,
        "/v1/environments",
        json!({
            "name": "production",
            "inbound_url": "https://api.example.com",
            "outbound_url": "https://backend.internal"
        }),
    )
    .await;
    let plan = create(&app, "/v1/plans", json!({ "name": "gold" })).await;

    let api = create(
        &app,
        "/v1/apis",
        json!({
            "name": "orders",
            "version": "1",
            "base_path": "/orders",
            "environments": [id(&environment)],
            "plans": [id(&plan)]
        }),
    )
    .await;
    assert_eq!(api["environments"], json!([id(&environment)]));

    let response = send(
        &app,
        Method::DELETE,
        &format!("/v1/environments/{}", id(&environment)),
        Some(ADMIN),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &app,
        Method::POST,
        "/v1/apis",
        Some(ADMIN),
        Some(json!({
            "name": "billing",
            "version": "1",
            "base_path": "/billing",
            "plans": ["missing"]
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn developers_authenticate_without_exposing_credentials() {
    let app = app();
    let developer = create(
        &app,
        "/v1/developers",
        json!({ "name": "Ada", "email": "Ada@Example.com", "password": "hunter22" }),
    )
    .await;
    assert!(developer.get("password").is_none());
    assert!(developer.get("password_hash").is_none());
    assert_eq!(developer["email"], "ada@example.com");

    let response = send(
        &app,
        Method::POST,
        "/v1/developers/authenticate",
        Some(VIEWER),
        Some(json!({ "email": "ada@example.com", "password": "hunter22" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], id(&developer).as_str());

    let response = send(
        &app,
        Method::POST,
        "/v1/developers/authenticate",
        Some(VIEWER),
        Some(json!({ "email": "ada@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_and_request_ids() {
    let app = app();

    let response = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert!(response.headers().contains_key("x-app"));
    assert_eq!(json_body(response).await["store"], "ok");

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok()),
        Some("req-42")
    );

    let response = send(&app, Method::OPTIONS, "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app();
    let response = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = json_body(response).await;
    assert!(doc["paths"]["/v1/apis/{api_id}/resources/{resource_id}/operations"].is_object());
}
