use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Envelope, Relationship, User, PAGE_SIZE};
use tower::ServiceExt;

const PUBLIC_URL: &str = "http://mock.test";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(body.to_string())
        .unwrap()
}

// --- listing ---

#[tokio::test]
async fn follows_first_page_links_to_next() {
    let resp = app(PUBLIC_URL)
        .oneshot(get("/v1/users/self/follows?access_token=t"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let page: Envelope<Vec<User>> = body_json(resp).await;
    assert_eq!(page.meta.code, 200);
    assert_eq!(page.data.len(), PAGE_SIZE);
    assert_eq!(page.data[0].username, "alice");
    let pagination = page.pagination.expect("more pages remain");
    assert_eq!(
        pagination.next_url,
        "http://mock.test/v1/users/self/follows?access_token=t&cursor=2"
    );
    assert_eq!(pagination.next_cursor, "2");
}

#[tokio::test]
async fn follows_last_page_has_no_pagination() {
    let resp = app(PUBLIC_URL)
        .oneshot(get("/v1/users/self/follows?access_token=t&cursor=2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    let raw: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(raw.get("pagination").is_none());
    assert_eq!(raw["data"][0]["username"], "dave");
}

#[tokio::test]
async fn followed_by_pages_independently() {
    let resp = app(PUBLIC_URL)
        .oneshot(get("/v1/users/self/followed-by?access_token=t"))
        .await
        .unwrap();

    let page: Envelope<Vec<User>> = body_json(resp).await;
    let names: Vec<_> = page.data.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, ["alice", "bob"]);
    assert!(page
        .pagination
        .unwrap()
        .next_url
        .starts_with("http://mock.test/v1/users/self/followed-by?"));
}

#[tokio::test]
async fn requested_by_lists_pending_requests() {
    let resp = app(PUBLIC_URL)
        .oneshot(get("/v1/users/self/requested-by?access_token=t"))
        .await
        .unwrap();

    let page: Envelope<Vec<User>> = body_json(resp).await;
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].id, "14");
    assert!(page.pagination.is_none());
}

#[tokio::test]
async fn missing_access_token_is_oauth_error() {
    let resp = app(PUBLIC_URL)
        .oneshot(get("/v1/users/self/follows"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let raw: serde_json::Value = body_json(resp).await;
    assert_eq!(raw["meta"]["code"], 400);
    assert_eq!(raw["meta"]["error_type"], "OAuthParameterException");
}

// --- relationship ---

#[tokio::test]
async fn get_relationship_reports_both_directions() {
    let resp = app(PUBLIC_URL)
        .oneshot(get("/v1/users/10/relationship?access_token=t"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let env: Envelope<Relationship> = body_json(resp).await;
    assert_eq!(env.data.outgoing_status, "follows");
    assert_eq!(env.data.incoming_status, "followed_by");
    assert!(!env.data.target_user_is_private);
}

#[tokio::test]
async fn unknown_user_is_api_not_found() {
    let resp = app(PUBLIC_URL)
        .oneshot(get("/v1/users/999/relationship?access_token=t"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let raw: serde_json::Value = body_json(resp).await;
    assert_eq!(raw["meta"]["error_type"], "APINotFoundError");
}

#[tokio::test]
async fn post_follow_on_private_user_requests() {
    let resp = app(PUBLIC_URL)
        .oneshot(form_request(
            "/v1/users/12/relationship?access_token=t",
            "action=follow",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let env: Envelope<Relationship> = body_json(resp).await;
    assert_eq!(env.data.outgoing_status, "requested");
    assert!(env.data.target_user_is_private);
}

#[tokio::test]
async fn post_unknown_action_is_invalid_parameters() {
    let resp = app(PUBLIC_URL)
        .oneshot(form_request(
            "/v1/users/10/relationship?access_token=t",
            "action=poke",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let raw: serde_json::Value = body_json(resp).await;
    assert_eq!(raw["meta"]["error_type"], "APIInvalidParametersError");
}

#[tokio::test]
async fn post_without_action_is_rejected() {
    let resp = app(PUBLIC_URL)
        .oneshot(form_request("/v1/users/10/relationship?access_token=t", ""))
        .await
        .unwrap();

    assert!(resp.status().is_client_error());
}

// --- state carries across requests on one router ---

#[tokio::test]
async fn block_then_unblock_lifecycle() {
    use tower::Service;

    let mut app = app(PUBLIC_URL).into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "/v1/users/11/relationship?access_token=t",
            "action=block",
        ))
        .await
        .unwrap();
    let env: Envelope<Relationship> = body_json(resp).await;
    assert_eq!(env.data.outgoing_status, "none");
    assert_eq!(env.data.incoming_status, "blocked_by_you");

    // bob no longer shows up in follows
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/v1/users/self/follows?access_token=t"))
        .await
        .unwrap();
    let page: Envelope<Vec<User>> = body_json(resp).await;
    assert!(page.data.iter().all(|u| u.id != "11"));

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "/v1/users/11/relationship?access_token=t",
            "action=unblock",
        ))
        .await
        .unwrap();
    let env: Envelope<Relationship> = body_json(resp).await;
    assert_eq!(env.data.incoming_status, "none");
}
