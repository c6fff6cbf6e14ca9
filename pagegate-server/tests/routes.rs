use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use pagegate_core::{
    context::Credential,
    facade::QueryFacade,
    gateway::{Endpoint, GatewayBuilder},
};
use pagegate_memory::{InMemoryService, RecordedRequest};
use pagegate_server::{AppState, app};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn service() -> InMemoryService {
    InMemoryService::builder()
        .with_page(
            "p1",
            json!({
                "id": "p1",
                "title": "Errands",
                "content": [
                    { "id": "b1", "type": "TodoBlockContent",
                      "content": { "checked": true, "items": [{ "text": "buy milk" }] } },
                    { "id": "b2", "type": "EmbedBlockContent", "content": { "url": "x" } }
                ]
            }),
        )
        .with_collection("tasks", json!({ "pages": [{ "title": "one" }] }))
        .build()
        .await
        .unwrap()
}

fn router(service: &InMemoryService) -> Router {
    app(AppState::new(QueryFacade::new(service.clone()).into_dyn()))
}

fn post(path: &str, token: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut request = Request::post(path).header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request = request.header("Token", token);
    }
    request.body(body.into()).unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn fetch_page_returns_typed_blocks_and_forwards_token() {
    let service = service().await;

    let (status, body) = send(
        router(&service),
        post("/fetchPage", Some("secret"), json!({ "pageId": "p1" }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["content"],
        json!([
            { "id": "b1", "type": "TodoBlockContent",
              "content": { "checked": true, "items": [{ "text": "buy milk" }] } },
            { "id": "b2", "type": "EmbedBlockContent" }
        ])
    );
    assert_eq!(
        service.requests().await,
        vec![RecordedRequest {
            endpoint: Endpoint::FetchPage,
            body: json!({ "pageId": "p1" }),
            token: Some(Credential::from("secret")),
        }]
    );
}

#[tokio::test]
async fn empty_page_id_is_a_bad_request_without_upstream_call() {
    let service = service().await;

    for body in [json!({ "pageId": "" }), json!({}), json!({ "pageId": null })] {
        let (status, error) = send(router(&service), post("/fetchPage", None, body.to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(error["error"], "validation");
        assert!(error.get("upstreamStatus").is_none());
    }

    assert!(service.requests().await.is_empty());
}

#[tokio::test]
async fn unparsable_body_is_a_bad_request() {
    let service = service().await;

    let (status, error) = send(router(&service), post("/fetchPage", None, "{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "validation");
    assert!(service.requests().await.is_empty());
}

#[tokio::test]
async fn upstream_status_passes_through() {
    let service = InMemoryService::builder()
        .with_page("p1", json!({ "title": "private" }))
        .with_required_token("right")
        .build()
        .await
        .unwrap();

    let (status, error) = send(
        router(&service),
        post("/fetchPage", Some("wrong"), json!({ "pageId": "p1" }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        error,
        json!({
            "error": "upstream_status",
            "message": "invalid or missing token",
            "upstreamStatus": 401
        })
    );

    let (status, error) = send(
        router(&service),
        post("/fetchPage", Some("right"), json!({ "pageId": "nope" }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["upstreamStatus"], 404);
}

#[tokio::test]
async fn malformed_upstream_body_is_a_bad_gateway() {
    let service = service().await;
    service.insert_raw_page("broken", "<html>oops</html>").await;

    let (status, error) = send(
        router(&service),
        post("/fetchPage", None, json!({ "pageId": "broken" }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(error["error"], "malformed_response");
}

#[tokio::test]
async fn fetch_collection_accepts_both_argument_revisions() {
    let service = service().await;

    let (status, body) = send(
        router(&service),
        post(
            "/fetchCollection",
            Some("t"),
            json!({
                "collectionId": "tasks",
                "collectionView": "board",
                "filter": { "property": "Status", "operator": "enum_is", "value": "Done" }
            })
            .to_string(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "pages": [{ "title": "one" }] }));

    let (status, _) = send(
        router(&service),
        post(
            "/fetchCollection",
            Some("t"),
            json!({
                "collectionId": "tasks",
                "collectionViewId": "board",
                "filters": [{ "property": "Status", "operator": "enum_is", "value": "Done" }],
                "cursor": "abc",
                "limit": "10"
            })
            .to_string(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let bodies: Vec<_> = service.requests().await.into_iter().map(|r| r.body).collect();
    assert_eq!(
        bodies,
        [
            json!({
                "collectionId": "tasks",
                "collectionViewId": "board",
                "filters": [{ "property": "Status", "operator": "enum_is", "value": "Done" }]
            }),
            json!({
                "collectionId": "tasks",
                "collectionViewId": "board",
                "filters": [{ "property": "Status", "operator": "enum_is", "value": "Done" }],
                "cursor": "abc",
                "limit": "10"
            }),
        ]
    );
}

#[tokio::test]
async fn missing_view_id_is_a_bad_request() {
    let service = service().await;

    let (status, error) = send(
        router(&service),
        post("/fetchCollection", None, json!({ "collectionId": "tasks" }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["message"].as_str().unwrap().contains("collectionViewId"));
    assert!(service.requests().await.is_empty());
}

#[tokio::test]
async fn health_reports_version() {
    let service = service().await;

    let (status, body) = send(
        router(&service),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "pagegate-server");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
