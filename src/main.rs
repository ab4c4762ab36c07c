//! Gantry - Example gateway server
//!
//! Runs the bundled hyper host with sample gateway applications. Select
//! the served application with the `GANTRY_HANDLER` environment variable
//! (default `demo.hello`).

use bytes::Bytes;
use gantry::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Example "Hello World" application.
struct HelloApp;

impl GatewayApp for HelloApp {
    fn call(
        &self,
        environ: Environ,
        start: &mut dyn StartResponse,
    ) -> Result<Box<dyn BodyChunks>, GantryError> {
        let who = environ
            .get("HTTP_X_NAME")
            .unwrap_or("World")
            .to_string();

        start.start_response(
            "200 OK",
            vec![("Content-Type".to_string(), "text/plain".to_string())],
            None,
        )?;

        let greeting = format!(
            "Hello, {}! You asked for {}\n",
            who,
            environ.get("PATH_INFO").unwrap_or("/")
        );
        Ok(Box::new(vec![Bytes::from(greeting)].into_iter()))
    }

    fn name(&self) -> &str {
        "hello"
    }
}

/// Echo application - streams the request body back, one line at a time.
struct EchoApp;

impl GatewayApp for EchoApp {
    fn call(
        &self,
        mut environ: Environ,
        start: &mut dyn StartResponse,
    ) -> Result<Box<dyn BodyChunks>, GantryError> {
        let content_type = environ
            .get("CONTENT_TYPE")
            .filter(|t| !t.is_empty())
            .unwrap_or("text/plain")
            .to_string();

        start.start_response(
            "200 OK",
            vec![("Content-Type".to_string(), content_type)],
            None,
        )?;

        let mut lines = Vec::new();
        loop {
            let line = environ.input.read_line(None)?;
            if line.is_empty() {
                break;
            }
            lines.push(line);
        }
        if lines.is_empty() {
            environ.errors.write("echo: empty request body\n");
        }
        Ok(Box::new(lines.into_iter()))
    }

    fn name(&self) -> &str {
        "echo"
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let handler =
        std::env::var("GANTRY_HANDLER").unwrap_or_else(|_| "demo.hello".to_string());

    tracing::info!("Starting gantry server with handler '{}'...", handler);

    let config = GantryConfig::new()
        .host("0.0.0.0")
        .port(8080)
        .handler(handler);

    let server = GantryServer::new(config);
    server.register_app("demo.hello", Arc::new(HelloApp))?;
    server.register_app("demo.echo", Arc::new(EchoApp))?;

    tracing::info!("Registered applications: demo.hello, demo.echo");
    tracing::info!("Try: curl http://localhost:8080/anything");
    tracing::info!("Try: GANTRY_HANDLER=demo.echo and curl -X POST -d 'test' http://localhost:8080/");

    server.run().await
}
