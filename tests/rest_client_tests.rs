//! Integration tests for the REST client and its resource groups.
//!
//! These tests verify that each resource operation maps to the expected
//! HTTP method and path, that request options reach the wire, and that
//! failures come back classified.

use serde_json::json;
use telephony_api::clients::{ErrorKind, HttpError, InvalidHttpRequestError, RequestOptions};
use telephony_api::rest::resources::{AccountStatus, User};
use telephony_api::{AccountId, ApiKey, BaseUrl, ClientConfig, RestClient};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(base_url: &str) -> RestClient {
    let config = ClientConfig::builder()
        .api_key(ApiKey::new("sk_test_123").unwrap())
        .base_url(BaseUrl::new(base_url).unwrap())
        .max_network_retries(0)
        .build()
        .unwrap();
    RestClient::new(config).unwrap()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_rest_client_is_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
}

#[test]
fn test_rest_client_exposes_config() {
    let client = create_test_client("https://api.example.com");
    let base_url: &str = client.config().base_url().as_ref();
    assert_eq!(base_url, "https://api.example.com");
    assert_eq!(client.config().max_network_retries(), 0);
}

// ============================================================================
// Resource operations
// ============================================================================

#[tokio::test]
async fn test_create_user_posts_to_collection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/users"))
        .and(body_json(json!({"email": "ada@example.com", "first_name": "Ada"})))
        .and(header("Idempotency-Key", "create-ada"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "usr_1",
            "email": "ada@example.com",
            "first_name": "Ada",
            "last_name": "Lovelace"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server.uri());
    let user = client
        .users()
        .create(
            json!({"email": "ada@example.com", "first_name": "Ada"}),
            &RequestOptions::new().idempotency_key("create-ada"),
        )
        .await
        .unwrap();

    assert_eq!(user.id, "usr_1");
    assert_eq!(user.full_name().as_deref(), Some("Ada Lovelace"));
    server.verify().await;
}

#[tokio::test]
async fn test_retrieve_account_gets_member_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/accounts/acct_42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "acct_42",
            "name": "Support Line",
            "status": "active",
            "region": "us-west"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server.uri());
    let account = client
        .accounts()
        .retrieve("acct_42", &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(account.name.as_deref(), Some("Support Line"));
    assert_eq!(account.status, Some(AccountStatus::Active));
    assert_eq!(account.extra.get("region"), Some(&json!("us-west")));
    server.verify().await;
}

#[tokio::test]
async fn test_update_phone_number_patches_member_path() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/phone_numbers/pn_7"))
        .and(body_json(json!({"label": "Front desk"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pn_7",
            "number": "+14155550107",
            "label": "Front desk",
            "capabilities": ["voice", "sms"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server.uri());
    let number = client
        .phone_numbers()
        .update("pn_7", json!({"label": "Front desk"}), &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(number.label.as_deref(), Some("Front desk"));
    assert!(number.supports("sms"));
    assert!(!number.supports("fax"));
    server.verify().await;
}

#[tokio::test]
async fn test_delete_schedule_accepts_empty_and_object_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/schedules/sch_1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/v1/schedules/sch_2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "sch_2", "deleted": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server.uri());
    client
        .schedules()
        .delete("sch_1", &RequestOptions::new())
        .await
        .unwrap();
    client
        .schedules()
        .delete("sch_2", &RequestOptions::new())
        .await
        .unwrap();

    server.verify().await;
}

#[tokio::test]
async fn test_member_ids_are_percent_encoded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/usr%2F1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "usr/1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server.uri());
    let user = client
        .users()
        .retrieve("usr/1", &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(user.id, "usr/1");
    server.verify().await;
}

#[tokio::test]
async fn test_empty_id_is_rejected_before_sending() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = create_test_client(&server.uri());
    let result = client.users().retrieve("", &RequestOptions::new()).await;

    assert!(matches!(
        result,
        Err(HttpError::InvalidRequest(
            InvalidHttpRequestError::EmptyResourceId { resource: "User" }
        ))
    ));
    server.verify().await;
}

#[tokio::test]
async fn test_list_first_page_sends_query_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "url": "/v1/users",
            "next_page_url": null,
            "data": [{"id": "usr_1"}, {"id": "usr_2"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server.uri());
    let page = client
        .users()
        .list(&RequestOptions::new().query_param("limit", "2"))
        .unwrap()
        .first_page()
        .await
        .unwrap();

    assert_eq!(page.data.len(), 2);
    assert!(!page.has_next_page());
    server.verify().await;
}

// ============================================================================
// Generic verbs and options
// ============================================================================

#[tokio::test]
async fn test_generic_put_decodes_into_caller_type() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/users/usr_1/voicemail"))
        .and(body_json(json!({"enabled": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"enabled": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server.uri());
    let body: serde_json::Value = client
        .put(
            "/v1/users/usr_1/voicemail",
            json!({"enabled": true}),
            &RequestOptions::new(),
        )
        .await
        .unwrap();

    assert_eq!(body["enabled"], true);
    server.verify().await;
}

#[tokio::test]
async fn test_per_request_account_overrides_default() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/usr_1"))
        .and(header("X-Account-Id", "acct_child"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "usr_1"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .api_key(ApiKey::new("sk_test_123").unwrap())
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .account_id(AccountId::new("acct_parent").unwrap())
        .max_network_retries(0)
        .build()
        .unwrap();
    let client = RestClient::new(config).unwrap();

    let user: User = client
        .get(
            "/v1/users/usr_1",
            &RequestOptions::new().account_id(AccountId::new("acct_child").unwrap()),
        )
        .await
        .unwrap();

    assert_eq!(user.id, "usr_1");
    server.verify().await;
}

#[tokio::test]
async fn test_conflict_is_classified_with_code_and_param() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/phone_numbers"))
        .respond_with(
            ResponseTemplate::new(409)
                .insert_header("X-Request-Id", "req_conflict")
                .set_body_json(json!({
                    "error": {
                        "type": "conflict_error",
                        "code": "number_taken",
                        "message": "That number is already assigned.",
                        "param": "number"
                    }
                })),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server.uri());
    let error = client
        .phone_numbers()
        .create(json!({"number": "+14155550100"}), &RequestOptions::new())
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Conflict);
    assert_eq!(error.status(), Some(409));
    assert_eq!(error.request_id(), Some("req_conflict"));

    let api_error = error.as_api_error().unwrap();
    assert_eq!(api_error.code.as_deref(), Some("number_taken"));
    assert_eq!(api_error.param.as_deref(), Some("number"));
    assert_eq!(api_error.message, "That number is already assigned.");
}
