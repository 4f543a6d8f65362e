//! Mock Strapi tests for the strapi library.
//!
//! These tests use wiremock to simulate a Strapi server and exercise the
//! query pipeline, caching, authentication and writes end to end.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use serde_json::{Value, json};
use wiremock::matchers::{
    body_json, body_string_contains, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use strapi::{
    ApiVersion, AuthMethod, BearerToken, Credentials, Error, MemoryCache, Operator, Strapi,
    StrapiConfig, TokenError, UploadFile,
};

/// Config pointing at the mock server's `/api` root.
fn mock_config(server: &MockServer) -> StrapiConfig {
    StrapiConfig::from_url(&format!("{}/api", server.uri())).unwrap()
}

fn client(config: StrapiConfig) -> Strapi {
    Strapi::new(config).unwrap()
}

/// Unsigned JWT expiring at `exp`.
fn jwt(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"id":1,"exp":{exp}}}"#));
    format!("{header}.{payload}.sig")
}

fn articles_body() -> Value {
    json!({
        "data": [
            {"id": 1, "attributes": {"title": "Hello", "slug": "hello"}},
            {"id": 2, "attributes": {"title": "World", "slug": "world"}}
        ],
        "meta": {"pagination": {"page": 1, "pageSize": 100, "pageCount": 1, "total": 2}}
    })
}

// ============================================================================
// Query Pipeline Tests
// ============================================================================

#[tokio::test]
async fn test_query_flattens_and_keeps_meta() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("sort", "id:DESC"))
        .and(query_param("populate", "*"))
        .and(query_param_is_missing("pagination[pageSize]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body()))
        .expect(1)
        .mount(&server)
        .await;

    let before = Utc::now().timestamp();
    let mut query = client(mock_config(&server)).collection("articles");
    let records = query.query(false).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[0]["title"], "Hello");
    assert!(records[0].get("attributes").is_none());
    assert_eq!(query.meta()["pagination"]["total"], 2);
    assert!(query.meta()["response"].as_i64().unwrap() >= before);
    assert_eq!(query.records().len(), 2);
}

#[tokio::test]
async fn test_sorted_articles_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("sort", "publishedAt:DESC"))
        .and(query_param("pagination[pageSize]", "10"))
        .and(query_param_is_missing("pagination[page]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1, "attributes": {"title": "A"}}],
            "meta": {"pagination": {"total": 1}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let strapi = client(mock_config(&server));
    let defaults = strapi.collection("articles").order("publishedAt", false);
    assert_eq!(
        defaults.url(),
        format!("{}/api/articles?sort=publishedAt:DESC&populate=*", server.uri())
    );

    let mut query = defaults.limit(10).page(1);
    let records = query.query(true).await.unwrap();

    assert_eq!(Value::Array(records.into_iter().map(Value::Object).collect()), json!([{"id": 1, "title": "A"}]));
    assert_eq!(query.meta()["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_query_renders_filters_and_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("pagination[pageSize]", "10"))
        .and(query_param("pagination[page]", "2"))
        .and(query_param("filters[author][name][$eq]", "John Doe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [], "meta": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = client(mock_config(&server))
        .collection("articles")
        .limit(10)
        .page(2)
        .field("author.name")
        .filter("John Doe", Operator::EQUALS);

    assert!(query.query(false).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_body_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut query = client(mock_config(&server)).collection("articles");
    let err = query.query(false).await.unwrap_err();
    assert!(matches!(err, Error::Unknown { .. }), "{err}");
}

#[tokio::test]
async fn test_missing_collection_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/nothing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "data": null,
            "error": {"status": 404, "name": "NotFoundError", "message": "Not Found"}
        })))
        .mount(&server)
        .await;

    let mut query = client(mock_config(&server)).collection("nothing");
    let err = query.query(false).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_v3_responses_are_not_flattened() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles"))
        .and(query_param("_sort", "published_at:DESC"))
        .and(query_param("_limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Legacy", "meta": {"kept": true}}
        ])))
        .mount(&server)
        .await;

    let config = StrapiConfig::from_url(&server.uri())
        .unwrap()
        .with_version(ApiVersion::V3);
    let mut query = client(config).collection("articles").recent(5);
    let records = query.query(false).await.unwrap();

    assert_eq!(records[0]["title"], "Legacy");
    assert_eq!(records[0]["meta"]["kept"], true);
    assert_eq!(query.meta().len(), 1);
    assert!(query.meta().contains_key("response"));
}

#[tokio::test]
async fn test_v5_drafts_and_compatibility_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("status", "draft"))
        .and(header("strapi-response-format", "v4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 4, "documentId": "abc", "attributes": {"title": "Draft"}}],
            "meta": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = mock_config(&server)
        .with_version(ApiVersion::V5)
        .with_compatibility_mode(true);
    let records = client(config)
        .collection("articles")
        .drafts(true)
        .query(false)
        .await
        .unwrap();

    assert_eq!(records[0]["title"], "Draft");
    assert_eq!(records[0]["documentId"], "abc");
}

#[tokio::test]
async fn test_media_is_absolutized_and_squashed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": 1,
                "attributes": {
                    "body": "![cat](/uploads/cat.png)",
                    "cover": {"data": {"id": 9, "attributes": {
                        "url": "/uploads/cover.png", "mime": "image/png", "ext": ".png"
                    }}}
                }
            }],
            "meta": {}
        })))
        .mount(&server)
        .await;

    let records = client(mock_config(&server))
        .collection("articles")
        .absolute(true)
        .squash(true)
        .query(false)
        .await
        .unwrap();

    let cover = format!("{}/uploads/cover.png", server.uri());
    assert_eq!(records[0]["cover"], cover.as_str());
    assert_eq!(records[0]["cover_squash"]["id"], 9);
    assert_eq!(
        records[0]["body"],
        format!("![cat]({}/uploads/cat.png)", server.uri()).as_str()
    );
}

// ============================================================================
// Caching Tests
// ============================================================================

#[tokio::test]
async fn test_cached_query_hits_server_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body()))
        .expect(1)
        .mount(&server)
        .await;

    let strapi = client(mock_config(&server));
    let first = strapi.collection("articles").query(true).await.unwrap();
    let second = strapi.collection("articles").query(true).await.unwrap();
    assert_eq!(first, second);

    let index = strapi.cache_index().keys("articles").await.unwrap();
    assert_eq!(index.len(), 1);
}

#[tokio::test]
async fn test_uncached_query_always_fetches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body()))
        .expect(2)
        .mount(&server)
        .await;

    let mut query = client(mock_config(&server)).collection("articles");
    query.query(false).await.unwrap();
    query.query(false).await.unwrap();
}

#[tokio::test]
async fn test_clear_collection_cache_forces_refetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body()))
        .expect(2)
        .mount(&server)
        .await;

    let mut query = client(mock_config(&server)).collection("articles");
    query.query(true).await.unwrap();
    query.query(true).await.unwrap();
    query.clear_collection_cache(false).await.unwrap();
    query.query(true).await.unwrap();
}

#[tokio::test]
async fn test_clear_item_cache_forces_refetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("pagination[pageSize]", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 5, "attributes": {"title": "Only"}}],
            "meta": {}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let strapi = client(mock_config(&server));
    let mut query = strapi.collection("articles");
    query.find_one(true).await.unwrap();
    query.find_one(true).await.unwrap();
    assert_eq!(
        strapi.cache_index().keys("articles_items").await.unwrap(),
        vec!["5"]
    );

    query.clear_item_cache(5).await.unwrap();
    assert!(strapi.cache_index().keys("articles_items").await.unwrap().is_empty());
    query.find_one(true).await.unwrap();
}

#[tokio::test]
async fn test_clear_collection_cache_including_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 5, "attributes": {"title": "Only"}}],
            "meta": {}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let strapi = client(mock_config(&server));
    let mut query = strapi.collection("articles");
    query.find_one(true).await.unwrap();
    query.clear_collection_cache(true).await.unwrap();
    assert!(strapi.cache().get("articles_item:5").await.unwrap().is_none());
    query.find_one(true).await.unwrap();
}

// ============================================================================
// find_one / find_one_by_id / get_custom Tests
// ============================================================================

#[tokio::test]
async fn test_find_one_restores_page_size() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("pagination[pageSize]", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1, "attributes": {"title": "First"}}],
            "meta": {}
        })))
        .mount(&server)
        .await;

    let mut query = client(mock_config(&server)).collection("articles").limit(10);
    let record = query.find_one(false).await.unwrap().unwrap();
    assert_eq!(record["title"], "First");
    assert_eq!(query.page_size(), 10);
}

#[tokio::test]
async fn test_find_one_restores_page_size_on_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut query = client(mock_config(&server)).collection("articles").limit(10);
    assert!(query.find_one(false).await.is_err());
    assert_eq!(query.page_size(), 10);
}

#[tokio::test]
async fn test_find_one_on_empty_collection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [], "meta": {}})))
        .mount(&server)
        .await;

    let mut query = client(mock_config(&server)).collection("articles");
    assert!(query.find_one(true).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_one_by_id_direct() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 3, "attributes": {"title": "Third"}},
            "meta": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = client(mock_config(&server)).collection("articles");
    let record = query.find_one_by_id(3, false).await.unwrap();
    assert_eq!(record["title"], "Third");
    assert_eq!(query.collection_type(), "articles");
}

#[tokio::test]
async fn test_find_one_by_id_falls_back_to_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles/7"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("filters[id][$eq]", "7"))
        .and(query_param("pagination[pageSize]", "1"))
        .and(query_param_is_missing("filters[title][$eq]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 7, "attributes": {"title": "Seventh"}}],
            "meta": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = client(mock_config(&server))
        .collection("articles")
        .field("title")
        .filter("kept", Operator::EQUALS);

    let record = query.find_one_by_id(7, false).await.unwrap();
    assert_eq!(record["title"], "Seventh");

    assert!(query.filters().field("title").is_some());
    assert!(query.filters().field("id").is_none());
    assert!(query.url().contains("filters[title][$eq]=kept"));
}

#[tokio::test]
async fn test_find_one_by_id_returns_none_when_both_lookups_fail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let mut query = client(mock_config(&server)).collection("articles");
    assert!(query.find_one_by_id(1, false).await.is_none());
}

#[tokio::test]
async fn test_get_custom_returns_list_or_single() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles/featured"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/articles/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 9, "attributes": {"title": "Latest"}}
        })))
        .mount(&server)
        .await;

    let mut query = client(mock_config(&server)).collection("articles");

    let featured = query.get_custom("/featured", false).await.unwrap();
    assert_eq!(featured.as_array().unwrap().len(), 2);

    let latest = query.get_custom("/latest", false).await.unwrap();
    assert_eq!(latest["title"], "Latest");
    assert_eq!(query.collection_type(), "articles");
}

#[tokio::test]
async fn test_get_custom_returns_scalar_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(5)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/articles/slugs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["hello", "world"])))
        .mount(&server)
        .await;

    let mut query = client(mock_config(&server)).collection("articles");
    assert_eq!(query.get_custom("/count", false).await.unwrap(), json!(5));
    assert_eq!(
        query.get_custom("/slugs", false).await.unwrap(),
        json!(["hello", "world"])
    );
}

#[tokio::test]
async fn test_find_one_by_id_keeps_media_shaped_record_when_squashing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/files/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 4, "attributes": {
                "name": "logo", "url": "/uploads/logo.png", "mime": "image/png"
            }}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = client(mock_config(&server)).collection("files").squash(true);
    let record = query.find_one_by_id(4, false).await.unwrap();
    assert_eq!(record["id"], 4);
    assert_eq!(record["url"], "/uploads/logo.png");
}

#[tokio::test]
async fn test_get_custom_keeps_type_after_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut query = client(mock_config(&server)).collection("articles");
    assert!(query.get_custom("/broken", false).await.is_err());
    assert_eq!(query.collection_type(), "articles");
    assert!(query.url().contains("/api/articles?"));
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_password_login_sends_bearer() {
    let server = MockServer::start().await;
    let token = jwt(Utc::now().timestamp() + 3600);

    Mock::given(method("POST"))
        .and(path("/api/auth/local"))
        .and(body_json(json!({"identifier": "editor", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jwt": token, "user": {}})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body()))
        .expect(2)
        .mount(&server)
        .await;

    let config = mock_config(&server)
        .with_auth(AuthMethod::Password(Credentials::new("editor", "secret")));
    let strapi = client(config);
    strapi.collection("articles").query(false).await.unwrap();
    strapi.collection("articles").query(false).await.unwrap();
}

#[tokio::test]
async fn test_expired_token_is_refreshed() {
    let server = MockServer::start().await;
    let now = Utc::now().timestamp();
    let fresh = jwt(now + 3600);

    Mock::given(method("POST"))
        .and(path("/api/auth/local"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jwt": jwt(now - 60)})))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/local"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jwt": fresh})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(header("authorization", format!("Bearer {fresh}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body()))
        .expect(1)
        .mount(&server)
        .await;

    let config = mock_config(&server)
        .with_auth(AuthMethod::Password(Credentials::new("editor", "secret")));
    client(config)
        .collection("articles")
        .query(false)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_repeatedly_expired_token_is_a_refresh_loop() {
    let server = MockServer::start().await;
    let now = Utc::now().timestamp();

    Mock::given(method("POST"))
        .and(path("/api/auth/local"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jwt": jwt(now - 60)})))
        .expect(2)
        .mount(&server)
        .await;

    let config = mock_config(&server)
        .with_auth(AuthMethod::Password(Credentials::new("editor", "secret")));
    let err = client(config)
        .collection("articles")
        .query(false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Token(TokenError::RefreshLoop)));
}

#[tokio::test]
async fn test_login_rejections() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/local"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "data": null,
            "error": {"status": 400, "name": "ValidationError", "message": "Invalid identifier or password"}
        })))
        .mount(&server)
        .await;

    let config = mock_config(&server)
        .with_auth(AuthMethod::Password(Credentials::new("editor", "wrong")));
    let err = client(config)
        .collection("articles")
        .query(false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::BadRequest(_)), "{err}");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/local"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let config = mock_config(&server)
        .with_auth(AuthMethod::Password(Credentials::new("editor", "wrong")));
    let err = client(config)
        .collection("articles")
        .query(false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PermissionDenied(_)), "{err}");
}

#[tokio::test]
async fn test_static_token_is_sent_without_login() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(header("authorization", "Bearer api-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body()))
        .expect(1)
        .mount(&server)
        .await;

    let config = mock_config(&server).with_auth(AuthMethod::Token(BearerToken::new("api-token")));
    client(config)
        .collection("articles")
        .query(false)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    let config = StrapiConfig::from_url("http://127.0.0.1:1/api")
        .unwrap()
        .with_auth(AuthMethod::Password(Credentials::new("editor", "secret")));
    let err = client(config)
        .collection("articles")
        .query(false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Connection(_)), "{err}");
}

#[tokio::test]
async fn test_login_token_is_shared_through_the_cache() {
    let server = MockServer::start().await;
    let token = jwt(Utc::now().timestamp() + 3600);

    Mock::given(method("POST"))
        .and(path("/api/auth/local"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jwt": token})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body()))
        .mount(&server)
        .await;

    let config = mock_config(&server)
        .with_auth(AuthMethod::Password(Credentials::new("editor", "secret")));
    let cache = Arc::new(MemoryCache::new());
    let transport = Arc::new(strapi::HttpTransport::from_config(&config).unwrap());

    let a = Strapi::with_backends(config.clone(), transport.clone(), cache.clone()).unwrap();
    let b = Strapi::with_backends(config, transport, cache).unwrap();
    a.collection("articles").query(false).await.unwrap();
    b.collection("articles").query(false).await.unwrap();
}

// ============================================================================
// Write Tests
// ============================================================================

#[tokio::test]
async fn test_post_wraps_payload_in_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/articles"))
        .and(body_json(json!({"data": {"title": "New"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 10, "attributes": {"title": "New"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client(mock_config(&server))
        .collection("articles")
        .post(json!({"title": "New"}))
        .await
        .unwrap();
    assert_eq!(created["data"]["id"], 10);
}

#[tokio::test]
async fn test_v3_post_is_not_wrapped() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/articles"))
        .and(body_json(json!({"title": "New"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 10})))
        .expect(1)
        .mount(&server)
        .await;

    let config = StrapiConfig::from_url(&server.uri())
        .unwrap()
        .with_version(ApiVersion::V3);
    client(config)
        .collection("articles")
        .post(json!({"title": "New"}))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_put_and_delete() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/articles/3"))
        .and(body_json(json!({"data": {"title": "Edited"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 3}})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/articles/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let query = client(mock_config(&server)).collection("articles");
    let updated = query.put(3, json!({"title": "Edited"})).await.unwrap();
    assert_eq!(updated["data"]["id"], 3);
    assert_eq!(query.delete(3).await.unwrap(), Value::Null);
}

#[tokio::test]
async fn test_write_rejections() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"status": 400, "name": "ValidationError", "message": "title must be defined"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/articles/3"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/articles/3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let query = client(mock_config(&server)).collection("articles");
    assert!(matches!(query.post(json!({})).await, Err(Error::BadRequest(_))));
    assert!(matches!(query.delete(3).await, Err(Error::PermissionDenied(_))));
    assert!(matches!(
        query.put(3, json!({})).await,
        Err(Error::Unknown { status: Some(500), .. })
    ));
}

#[tokio::test]
async fn test_post_files_sends_multipart() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/articles"))
        .and(body_string_contains(r#"name="data""#))
        .and(body_string_contains(r#"{"title":"With cover"}"#))
        .and(body_string_contains(r#"name="files.cover"; filename="cover.png""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 11}})))
        .expect(1)
        .mount(&server)
        .await;

    let file = UploadFile::new("cover.png", b"png-bytes".to_vec())
        .for_field("cover")
        .with_content_type("image/png");
    let created = client(mock_config(&server))
        .collection("articles")
        .post_files(json!({"title": "With cover"}), &[file])
        .await
        .unwrap();
    assert_eq!(created["data"]["id"], 11);
}

#[tokio::test]
async fn test_delete_upload() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/upload/files/5"))
        .and(header("authorization", "Bearer api-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5, "name": "cat.png"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = mock_config(&server).with_auth(AuthMethod::Token(BearerToken::new("api-token")));
    let deleted = client(config).uploads().delete(5).await.unwrap();
    assert_eq!(deleted["name"], "cat.png");
}
