//! Hyper-backed host server for the gateway.

use crate::app::{AppRegistry, GantryError, GatewayApp};
use crate::gateway::{EnvironBuilder, Gateway};
use crate::host::{BufferedResponse, HostLog, SimpleRequest};
use crate::runtime::GantryConfig;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, Version};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Gantry HTTP server.
///
/// Owns the listener and the native hyper request/response objects, and
/// dispatches one [`Gateway::handle`] call per request. The application
/// to serve is resolved from the configured identifier at startup.
pub struct GantryServer {
    /// Server configuration.
    config: GantryConfig,
    /// Application registry.
    registry: Arc<AppRegistry>,
}

impl GantryServer {
    /// Create a new server.
    pub fn new(config: GantryConfig) -> Self {
        Self {
            config,
            registry: Arc::new(AppRegistry::new()),
        }
    }

    /// Get the application registry.
    pub fn registry(&self) -> Arc<AppRegistry> {
        self.registry.clone()
    }

    /// Register an application under a fully-qualified identifier.
    pub fn register_app(
        &self,
        identifier: impl Into<String>,
        app: Arc<dyn GatewayApp>,
    ) -> Result<(), GantryError> {
        self.registry.register(identifier, app)
    }

    /// Resolve the configured handler and bind the listener.
    pub async fn bind(self) -> Result<BoundGantry, Box<dyn std::error::Error + Send + Sync>> {
        let app = self.registry.resolve(&self.config.handler)?;
        let gateway = Arc::new(Gateway::new(
            app,
            EnvironBuilder::new(),
            Arc::new(ServerLog),
        ));

        let addr: SocketAddr = self.config.bind_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;

        info!(
            "Gantry server listening on {}, serving '{}'",
            listener.local_addr()?,
            self.config.handler
        );

        Ok(BoundGantry {
            listener,
            gateway,
            config: self.config,
        })
    }

    /// Resolve, bind, and serve until the process exits.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.bind().await?.serve().await
    }
}

/// A server whose handler is resolved and whose listener is bound.
pub struct BoundGantry {
    listener: TcpListener,
    gateway: Arc<Gateway>,
    config: GantryConfig,
}

impl BoundGantry {
    /// The address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept and serve connections.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let local_addr = self.listener.local_addr()?;

        loop {
            let (stream, remote_addr) = self.listener.accept().await?;
            let io = TokioIo::new(stream);

            let gateway = self.gateway.clone();
            let config = self.config.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let gateway = gateway.clone();
                    let config = config.clone();
                    async move {
                        handle_request(req, gateway, config, remote_addr, local_addr).await
                    }
                });

                if let Err(err) = http1::Builder::new()
                    .serve_connection(io, service)
                    .await
                {
                    error!("Error serving connection: {:?}", err);
                }
            });
        }
    }
}

/// Handle one incoming HTTP request.
async fn handle_request(
    req: Request<Incoming>,
    gateway: Arc<Gateway>,
    config: GantryConfig,
    remote_addr: SocketAddr,
    local_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let mut host_req = match convert_request(req, &config, remote_addr, local_addr).await? {
        Ok(req) => req,
        Err(response) => return Ok(response),
    };

    let mut host_resp = BufferedResponse::new();
    match gateway.handle(&mut host_req, &mut host_resp) {
        Ok(()) => Ok(build_response(host_resp)),
        Err(e) => {
            error!("Application '{}' failed: {}", gateway.app_name(), e);
            // Host-chosen fallback for a failed handle.
            Ok(plain_response(
                hyper::StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
            ))
        }
    }
}

/// Convert a hyper request into the host request handed to the gateway.
/// Oversized bodies short-circuit into a 413 before the gateway runs.
async fn convert_request(
    req: Request<Incoming>,
    config: &GantryConfig,
    remote_addr: SocketAddr,
    local_addr: SocketAddr,
) -> Result<Result<SimpleRequest, Response<Full<Bytes>>>, hyper::Error> {
    let (parts, body) = req.into_parts();
    let body = body.collect().await?.to_bytes();

    if body.len() > config.max_body_size {
        warn!("Request body of {} bytes exceeds limit", body.len());
        return Ok(Err(plain_response(
            hyper::StatusCode::PAYLOAD_TOO_LARGE,
            "Payload Too Large",
        )));
    }

    let mut host_req = SimpleRequest::new(parts.method.as_str())
        .path_info(parts.uri.path())
        .remote(remote_addr.ip().to_string(), remote_addr.port())
        .server(local_addr.ip().to_string(), local_addr.port())
        .protocol(protocol_name(parts.version))
        .scheme("http")
        .content_length(body.len() as u64)
        .body(body);

    if let Some(query) = parts.uri.query() {
        host_req = host_req.query_string(query);
    }
    if let Some(content_type) = parts.headers.get(hyper::header::CONTENT_TYPE) {
        host_req =
            host_req.content_type(String::from_utf8_lossy(content_type.as_bytes()));
    }
    for name in parts.headers.keys() {
        for value in parts.headers.get_all(name) {
            host_req = host_req.header(
                name.as_str(),
                Bytes::copy_from_slice(value.as_bytes()),
            );
        }
    }

    Ok(Ok(host_req))
}

/// Build a hyper response from the buffered host response.
fn build_response(host_resp: BufferedResponse) -> Response<Full<Bytes>> {
    let code = host_resp.status.unwrap_or(500);
    let status = hyper::StatusCode::from_u16(code).unwrap_or_else(|_| {
        warn!(
            "Invalid status code {}, falling back to 500 Internal Server Error",
            code
        );
        hyper::StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut builder = Response::builder().status(status);
    for (name, value) in host_resp.headers {
        builder = builder.header(name, value);
    }

    builder
        .body(Full::new(Bytes::from(host_resp.body)))
        .unwrap_or_else(|e| {
            warn!("Failed to assemble response: {}", e);
            plain_response(
                hyper::StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
            )
        })
}

/// A minimal text/plain response produced by the host itself.
fn plain_response(status: hyper::StatusCode, message: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(hyper::header::CONTENT_TYPE, "text/plain")
        .body(Full::new(Bytes::copy_from_slice(message.as_bytes())))
        .expect("static response parts are valid")
}

fn protocol_name(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/1.1",
    }
}

/// Routes application error-stream output through the server's tracing
/// subscriber.
struct ServerLog;

impl HostLog for ServerLog {
    fn log(&self, message: &str) {
        error!(target: "gantry::app", "{}", message);
    }
}
