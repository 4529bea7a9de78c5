use larkpost_bot::Keepalive;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_ping_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("I'm alive"))
        .expect(1)
        .mount(&server)
        .await;

    let keepalive = Keepalive::new(format!("{}/", server.uri()), 840).unwrap();
    assert_eq!(keepalive.ping().await.unwrap(), 200);
}

#[tokio::test]
async fn test_ping_error_status_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let keepalive = Keepalive::new(server.uri(), 840).unwrap();
    let err = keepalive.ping().await.unwrap_err();
    assert!(err.message.contains("503"));
}

#[tokio::test]
async fn test_run_stops_on_shutdown() {
    let keepalive = Keepalive::new("http://127.0.0.1:9/", 3600).unwrap();
    let (tx, rx) = tokio::sync::watch::channel(false);
    let handle = tokio::spawn(keepalive.run(rx));

    tx.send(true).unwrap();
    tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
}

#[test]
fn test_zero_interval_rejected() {
    let err = Keepalive::new("http://127.0.0.1:9/", 0).unwrap_err();
    assert!(err.message.contains("interval"));
}
