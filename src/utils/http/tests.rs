use super::*;
use wiremock::matchers::{header_regex, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_http_client_builds() {
    let _client = http_client(Duration::from_secs(30));
}

#[tokio::test]
async fn test_user_agent_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header_regex("user-agent", "^agribid/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let resp = http_client(Duration::from_secs(5)).get(server.uri()).send().await.unwrap();
    assert!(resp.status().is_success());
}

#[tokio::test]
async fn test_overall_timeout_applies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(800)))
        .mount(&server)
        .await;

    let client = http_client(Duration::from_millis(100));
    let err = client.get(server.uri()).send().await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err}");
}

async fn get_response(server: &MockServer) -> reqwest::Response {
    http_client(Duration::from_secs(5))
        .get(server.uri())
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_limited_body_under_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"{\"unreadCount\":1}"))
        .mount(&server)
        .await;
    let (bytes, truncated) = limited_body(get_response(&server).await, 1024)
        .await
        .unwrap();
    assert_eq!(bytes, b"{\"unreadCount\":1}");
    assert!(!truncated);
}

#[tokio::test]
async fn test_limited_body_exact_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'a'; 64]))
        .mount(&server)
        .await;
    let (bytes, truncated) = limited_body(get_response(&server).await, 64)
        .await
        .unwrap();
    assert_eq!(bytes.len(), 64);
    assert!(!truncated);
}

#[tokio::test]
async fn test_limited_body_rejects_large_content_length() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'x'; 2048]))
        .mount(&server)
        .await;
    let err = limited_body(get_response(&server).await, 100)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("too large"));
}
