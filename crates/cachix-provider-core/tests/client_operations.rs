//! Integration tests: cache and user operations against a local scripted API.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cachix_provider_core::{is_not_found_error, ClientError, ErrorKind};
use common::mock_api::{MockApi, MockResponse};
use common::{fast_client, TOKEN};
use tokio_util::sync::CancellationToken;

const TEST_CACHE: &str = r#"{"name":"test-cache","uri":"https://test-cache.cachix.org","isPublic":true,"publicSigningKeys":["k1"]}"#;
const USER: &str = r#"{"id":42,"githubUsername":"octo","email":"octo@example.com"}"#;

#[tokio::test]
async fn get_cache_decodes_response() {
    let api = MockApi::always(200, TEST_CACHE);
    let client = fast_client(api.base_url());

    let cache = client
        .get_cache("test-cache", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(cache.name, "test-cache");
    assert_eq!(cache.uri, "https://test-cache.cachix.org");
    assert!(cache.is_public);
    assert_eq!(cache.public_signing_keys, vec!["k1".to_string()]);

    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/v1/cache/test-cache");
}

#[tokio::test]
async fn every_request_carries_auth_and_json_headers() {
    let api = MockApi::always(200, TEST_CACHE);
    let client = fast_client(api.base_url());
    client
        .get_cache("test-cache", &CancellationToken::new())
        .await
        .unwrap();

    let request = &api.requests()[0];
    assert_eq!(request.header("authorization"), Some(format!("Bearer {TOKEN}").as_str()));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header("accept"), Some("application/json"));
    assert_eq!(request.header("user-agent"), Some("cachix-provider/test"));
}

#[tokio::test]
async fn missing_cache_is_classified_as_not_found() {
    let api = MockApi::always(404, r#"{"message":"cache 'missing' not found"}"#);
    let client = fast_client(api.base_url());

    let err = client
        .get_cache("missing", &CancellationToken::new())
        .await
        .unwrap_err();
    let api_err = err.api_error().expect("api error");
    assert_eq!(api_err.status, 404);
    assert_eq!(api_err.message, "cache 'missing' not found");
    assert!(err.is_not_found());
    assert!(is_not_found_error(&err));
    assert_eq!(err.kind(), ErrorKind::NonRetryableApi);
    // 4xx is never retried.
    assert_eq!(api.request_count(), 1);
}

#[tokio::test]
async fn unauthorized_without_body_gets_canned_message() {
    let api = MockApi::always(401, "");
    let client = fast_client(api.base_url());

    let err = client.get_user(&CancellationToken::new()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "cachix API error (status 401): authentication failed: invalid or expired token"
    );
    assert_eq!(api.request_count(), 1);
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let api = MockApi::always(200, "{not json");
    let client = fast_client(api.base_url());

    let err = client
        .get_cache("test-cache", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Decode { what: "cache", .. }));
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(api.request_count(), 1);
}

#[tokio::test]
async fn get_user_maps_fields() {
    let api = MockApi::always(200, USER);
    let client = fast_client(api.base_url());

    let user = client.get_user(&CancellationToken::new()).await.unwrap();
    assert_eq!(user.id, 42);
    assert_eq!(user.username, "octo");
    assert_eq!(user.email.as_deref(), Some("octo@example.com"));
    assert_eq!(api.requests()[0].path, "/api/v1/user");
}

#[tokio::test]
async fn create_cache_looks_up_user_posts_then_reads_back() {
    let api = MockApi::start(|req, _| match (req.method.as_str(), req.path.as_str()) {
        ("GET", "/api/v1/user") => MockResponse::new(200, USER),
        ("POST", "/api/v1/cache/new-cache") => MockResponse::empty(201),
        ("GET", "/api/v1/cache/new-cache") => MockResponse::new(
            200,
            r#"{"name":"new-cache","uri":"https://new-cache.cachix.org","isPublic":true,"publicSigningKeys":["new-cache-1:abc"]}"#,
        ),
        _ => MockResponse::empty(500),
    });
    let client = fast_client(api.base_url());

    let cache = client
        .create_cache("new-cache", true, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(cache.name, "new-cache");
    assert_eq!(cache.public_signing_keys, vec!["new-cache-1:abc".to_string()]);

    let requests = api.requests();
    let sequence: Vec<(&str, &str)> = requests
        .iter()
        .map(|r| (r.method.as_str(), r.path.as_str()))
        .collect();
    assert_eq!(
        sequence,
        vec![
            ("GET", "/api/v1/user"),
            ("POST", "/api/v1/cache/new-cache"),
            ("GET", "/api/v1/cache/new-cache"),
        ]
    );
    assert_eq!(
        requests[1].json(),
        serde_json::json!({"isPublic": true, "generateSigningKey": true, "accountID": 42})
    );
}

#[tokio::test]
async fn create_cache_reports_user_lookup_failure() {
    let api = MockApi::always(401, r#"{"error":"bad token"}"#);
    let client = fast_client(api.base_url());

    let err = client
        .create_cache("new-cache", false, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::UserLookup(_)));
    assert_eq!(err.api_error().unwrap().message, "bad token");
    // Never got as far as the POST.
    assert_eq!(api.request_count(), 1);
}

#[tokio::test]
async fn create_cache_rejection_is_classified() {
    let api = MockApi::start(|req, _| match req.method.as_str() {
        "GET" => MockResponse::new(200, USER),
        _ => MockResponse::new(409, r#"{"error":"cache name already taken"}"#),
    });
    let client = fast_client(api.base_url());

    let err = client
        .create_cache("taken", true, &CancellationToken::new())
        .await
        .unwrap_err();
    let api_err = err.api_error().unwrap();
    assert_eq!(api_err.status, 409);
    assert_eq!(api_err.message, "cache name already taken");
    assert!(matches!(err, ClientError::Api(_)));
}

#[tokio::test]
async fn create_cache_reports_failed_read_back_distinctly() {
    // Someone deletes the cache between the POST and the read-back.
    let api = MockApi::start(|req, _| match (req.method.as_str(), req.path.as_str()) {
        ("GET", "/api/v1/user") => MockResponse::new(200, USER),
        ("POST", _) => MockResponse::empty(200),
        _ => MockResponse::empty(404),
    });
    let client = fast_client(api.base_url());

    let err = client
        .create_cache("racy", true, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::CreatedButUnreadable(_)));
    assert!(err.to_string().contains("cache created but failed to fetch details"));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn deleting_twice_yields_not_found_the_second_time() {
    let deleted = Arc::new(AtomicBool::new(false));
    let state = Arc::clone(&deleted);
    let api = MockApi::start(move |req, _| {
        assert_eq!(req.method, "DELETE");
        if state.swap(true, Ordering::SeqCst) {
            MockResponse::new(404, r#"{"error":"cache not found"}"#)
        } else {
            MockResponse::empty(204)
        }
    });
    let client = fast_client(api.base_url());
    let cancel = CancellationToken::new();

    client.delete_cache("doomed", &cancel).await.unwrap();
    let err = client.delete_cache("doomed", &cancel).await.unwrap_err();
    assert!(is_not_found_error(&err));
    assert!(deleted.load(Ordering::SeqCst));
    assert_eq!(api.request_count(), 2);
    assert_eq!(api.requests()[0].path, "/api/v1/cache/doomed");
}

#[tokio::test]
async fn delete_accepts_200() {
    let api = MockApi::always(200, "");
    let client = fast_client(api.base_url());
    client
        .delete_cache("gone", &CancellationToken::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn concurrent_reads_share_one_client() {
    let api = MockApi::start(|req, _| {
        let name = req.path.rsplit('/').next().unwrap_or_default().to_string();
        MockResponse::new(
            200,
            format!(r#"{{"name":"{name}","uri":"https://{name}.cachix.org","isPublic":false,"publicSigningKeys":[]}}"#),
        )
    });
    let client = fast_client(api.base_url());
    let cancel = CancellationToken::new();

    let (a, b) = tokio::join!(client.get_cache("alpha", &cancel), client.get_cache("beta", &cancel));
    assert_eq!(a.unwrap().name, "alpha");
    let b = b.unwrap();
    assert_eq!(b.name, "beta");
    assert!(!b.is_public);
    assert_eq!(api.request_count(), 2);
}
