//! End-to-end server run over a real socket.

use std::time::Duration;

use onlysports_api::lifecycle::Shutdown;
use onlysports_api::HttpServer;

mod common;

#[tokio::test]
async fn test_serves_and_shuts_down_gracefully() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(common::test_config(), common::credentials()).unwrap();
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "operational");

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), server_task)
        .await
        .expect("server should stop after shutdown")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_caller_request_id_is_preserved() {
    let app = common::app(common::test_config(), common::credentials());
    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "caller-chosen-id")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, headers, _) = common::send(&app, request).await;

    assert_eq!(status, 200);
    assert_eq!(headers["x-request-id"], "caller-chosen-id");
}
