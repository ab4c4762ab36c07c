//! Integration tests for the application registry, configuration, and
//! the bundled hyper host.

use bytes::Bytes;
use gantry::prelude::*;
use std::error::Error;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// A simple test application.
struct TextApp {
    response_text: String,
}

impl TextApp {
    fn new(response_text: impl Into<String>) -> Self {
        Self {
            response_text: response_text.into(),
        }
    }
}

impl GatewayApp for TextApp {
    fn call(
        &self,
        _environ: Environ,
        start: &mut dyn StartResponse,
    ) -> Result<Box<dyn BodyChunks>, GantryError> {
        start.start_response(
            "200 OK",
            vec![("Content-Type".to_string(), "text/plain".to_string())],
            None,
        )?;
        Ok(Box::new(
            vec![Bytes::from(self.response_text.clone())].into_iter(),
        ))
    }

    fn name(&self) -> &str {
        "text"
    }
}

// ---------------------------------------------------------------------
// registry

#[test]
fn registry_registers_and_resolves() {
    let registry = AppRegistry::new();
    registry
        .register("demo.hello", Arc::new(TextApp::new("hi")))
        .unwrap();

    let app = registry.resolve("demo.hello").unwrap();
    assert_eq!(app.name(), "text");

    let identifiers = registry.list();
    assert_eq!(identifiers, vec!["demo.hello".to_string()]);
}

#[test]
fn registry_rejects_duplicate_registration() {
    let registry = AppRegistry::new();
    registry
        .register("demo.hello", Arc::new(TextApp::new("one")))
        .unwrap();

    let err = registry
        .register("demo.hello", Arc::new(TextApp::new("two")))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Config);
}

#[test]
fn registry_rejects_malformed_identifiers() {
    let registry = AppRegistry::new();
    for identifier in ["", "single", "a..b", ".a", "a."] {
        let err = registry
            .register(identifier, Arc::new(TextApp::new("x")))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Config, "identifier {:?}", identifier);

        let err = registry.resolve(identifier).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Config, "identifier {:?}", identifier);
    }
}

#[test]
fn registry_resolve_of_unknown_identifier_is_a_config_error() {
    let registry = AppRegistry::new();
    let err = registry.resolve("demo.missing").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Config);
}

#[test]
fn registry_remove() {
    let registry = AppRegistry::new();
    registry
        .register("demo.hello", Arc::new(TextApp::new("hi")))
        .unwrap();
    registry.remove("demo.hello").unwrap();
    assert!(registry.resolve("demo.hello").is_err());
    assert!(registry.remove("demo.hello").is_err());
}

// ---------------------------------------------------------------------
// configuration

#[test]
fn config_defaults_and_builder() {
    let config = GantryConfig::new()
        .host("127.0.0.1")
        .port(9000)
        .handler("demo.hello");

    assert_eq!(config.bind_addr(), "127.0.0.1:9000");
    assert_eq!(config.handler, "demo.hello");
    assert_eq!(config.max_body_size, 10 * 1024 * 1024);
}

#[test]
fn config_from_json() {
    let config = GantryConfig::from_json(
        r#"{"host": "127.0.0.1", "port": 8088, "handler": "demo.echo", "max_body_size": 1024}"#,
    )
    .unwrap();

    assert_eq!(config.bind_addr(), "127.0.0.1:8088");
    assert_eq!(config.handler, "demo.echo");
    assert_eq!(config.max_body_size, 1024);
}

#[test]
fn config_from_invalid_json_is_a_config_error() {
    let err = GantryConfig::from_json("{not json").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Config);
}

// ---------------------------------------------------------------------
// errors

#[test]
fn error_display_includes_the_kind() {
    let err = GantryError::protocol("write() before start_response()");
    assert_eq!(err.to_string(), "[protocol] write() before start_response()");
}

#[test]
fn io_errors_are_wrapped_with_their_cause_chained() {
    let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer reset");
    let err: GantryError = io_err.into();
    assert_eq!(err.kind, ErrorKind::Io);
    assert!(err.source().is_some());
}

// ---------------------------------------------------------------------
// hyper host, end to end

/// Echoes the request body and reports the path it saw.
struct EchoApp;

impl GatewayApp for EchoApp {
    fn call(
        &self,
        mut environ: Environ,
        start: &mut dyn StartResponse,
    ) -> Result<Box<dyn BodyChunks>, GantryError> {
        let path = environ.get("PATH_INFO").unwrap_or("").to_string();
        let body = environ.input.read(None)?;

        start.start_response(
            "200 OK",
            vec![
                ("Content-Type".to_string(), "text/plain".to_string()),
                ("X-Seen-Path".to_string(), path),
            ],
            None,
        )?;
        Ok(Box::new(vec![body].into_iter()))
    }

    fn name(&self) -> &str {
        "echo"
    }
}

/// Always fails before starting a response.
struct FailingApp;

impl GatewayApp for FailingApp {
    fn call(
        &self,
        _environ: Environ,
        _start: &mut dyn StartResponse,
    ) -> Result<Box<dyn BodyChunks>, GantryError> {
        Err(GantryError::app("deliberate failure"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

async fn spawn_server(
    handler: &str,
    app: Arc<dyn GatewayApp>,
) -> std::net::SocketAddr {
    let config = GantryConfig::new()
        .host("127.0.0.1")
        .port(0)
        .handler(handler);
    let server = GantryServer::new(config);
    server.register_app(handler, app).unwrap();

    let bound = server.bind().await.unwrap();
    let addr = bound.local_addr().unwrap();
    tokio::spawn(bound.serve());
    addr
}

async fn raw_exchange(addr: std::net::SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn server_serves_a_get_request() {
    let addr = spawn_server("demo.hello", Arc::new(TextApp::new("Hello from gantry!"))).await;

    let response = raw_exchange(
        addr,
        "GET /greet HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200 OK"), "{}", response);
    assert!(response.contains("content-type: text/plain"), "{}", response);
    assert!(response.ends_with("Hello from gantry!"), "{}", response);
}

#[tokio::test]
async fn server_feeds_the_request_body_through_the_input_adapter() {
    let addr = spawn_server("demo.echo", Arc::new(EchoApp)).await;

    let body = "hello gateway";
    let request = format!(
        "POST /in HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    );
    let response = raw_exchange(addr, &request).await;

    assert!(response.starts_with("HTTP/1.1 200 OK"), "{}", response);
    assert!(response.contains("x-seen-path: /in"), "{}", response);
    assert!(response.ends_with(body), "{}", response);
}

#[tokio::test]
async fn server_turns_application_failures_into_a_generic_500() {
    let addr = spawn_server("demo.failing", Arc::new(FailingApp)).await;

    let response = raw_exchange(
        addr,
        "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(
        response.starts_with("HTTP/1.1 500 Internal Server Error"),
        "{}",
        response
    );
}

#[tokio::test]
async fn server_rejects_an_unresolvable_handler_at_startup() {
    let config = GantryConfig::new()
        .host("127.0.0.1")
        .port(0)
        .handler("demo.missing");
    let server = GantryServer::new(config);
    server
        .register_app("demo.hello", Arc::new(TextApp::new("hi")))
        .unwrap();

    assert!(server.bind().await.is_err());
}

#[tokio::test]
async fn server_rejects_a_malformed_handler_identifier_at_startup() {
    let config = GantryConfig::new().host("127.0.0.1").port(0).handler("nodots");
    let server = GantryServer::new(config);
    assert!(server.bind().await.is_err());
}
