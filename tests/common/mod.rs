//! Shared utilities for handler integration tests.
#![allow(dead_code)]

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;

use onlysports_api::config::{Credentials, ServiceConfig};
use onlysports_api::HttpServer;

pub const TOKEN: &str = "test-football-token";
pub const API_KEY: &str = "test-gemini-key";

/// Default config with short upstream timeouts.
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.timeouts.connect_secs = 2;
    config.football_data.timeout_secs = 5;
    config.crests.timeout_secs = 5;
    config.gemini.timeout_secs = 5;
    config
}

pub fn credentials() -> Credentials {
    Credentials::new(Some(TOKEN.to_string()), Some(API_KEY.to_string()))
}

/// The fully layered router, as the server would run it.
pub fn app(config: ServiceConfig, credentials: Credentials) -> Router {
    HttpServer::new(config, credentials)
        .expect("server should build")
        .router()
}

/// Drive one request through the router in-process.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body)
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("origin", "http://localhost:5173")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_body(body: &Bytes) -> serde_json::Value {
    serde_json::from_slice(body).expect("body should be JSON")
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Start a raw HTTP/1.1 backend that answers every request with exactly the
/// given head lines and body. Lets tests control which headers are absent.
pub async fn start_raw_backend(head: &'static str, body: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut request = Vec::new();
                        let mut buf = [0u8; 1024];
                        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut buf).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => request.extend_from_slice(&buf[..n]),
                            }
                        }

                        let response = format!(
                            "{}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                            head,
                            body.len()
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.write_all(body).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
