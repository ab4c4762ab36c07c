//! Per-request orchestration: environ build, application invocation,
//! body drain.

use crate::app::{BodyChunks, GantryError, GatewayApp, StartResponse};
use crate::gateway::emitter::ResponseEmitter;
use crate::gateway::environ::EnvironBuilder;
use crate::gateway::errlog::ErrorLog;
use crate::host::{HostLog, HostRequest, HostResponse};
use std::sync::Arc;
use tracing::debug;

/// The gateway bridges one resolved application to a host server.
///
/// All per-request state lives on the stack of [`handle`](Self::handle);
/// the host may call it from many threads at once.
pub struct Gateway {
    app: Arc<dyn GatewayApp>,
    builder: EnvironBuilder,
    log: Arc<dyn HostLog>,
}

impl Gateway {
    /// Create a gateway for a resolved application.
    pub fn new(app: Arc<dyn GatewayApp>, builder: EnvironBuilder, log: Arc<dyn HostLog>) -> Self {
        Self { app, builder, log }
    }

    /// The application this gateway serves.
    pub fn app_name(&self) -> &str {
        self.app.name()
    }

    /// Handle one request.
    ///
    /// Builds the environ, invokes the application, and drains the
    /// returned chunk sequence through the emitter. A response (status
    /// plus headers) is committed even when the body yields nothing. The
    /// sequence's release hook runs on every exit path. Errors propagate
    /// to the host server, which decides the client-visible response.
    pub fn handle<Q, R>(&self, req: &mut Q, resp: &mut R) -> Result<(), GantryError>
    where
        Q: HostRequest,
        R: HostResponse,
    {
        debug!(
            "Handling request: {} {}{}",
            req.method(),
            req.script_name(),
            req.path_info().unwrap_or("")
        );

        let environ = self.builder.build(req, ErrorLog::new(self.log.clone()));
        let mut emitter = ResponseEmitter::new(resp);

        let body = self.app.call(environ, &mut emitter)?;
        let mut body = CloseGuard(body);
        drain(&mut *body.0, &mut emitter)
    }
}

/// Drain the body through the emitter, skipping empty chunks so they do
/// not force a header send on their own, then commit headers with an
/// explicit empty write if the body never produced a byte.
fn drain<R: HostResponse>(
    body: &mut dyn BodyChunks,
    emitter: &mut ResponseEmitter<'_, R>,
) -> Result<(), GantryError> {
    while let Some(chunk) = body.next_chunk()? {
        if !chunk.is_empty() {
            emitter.write(&chunk)?;
        }
    }
    if !emitter.headers_sent() {
        emitter.write(b"")?;
    }
    Ok(())
}

/// Runs the sequence's release hook exactly once, on drop, covering both
/// the normal and error exits of the drain loop.
struct CloseGuard(Box<dyn BodyChunks>);

impl Drop for CloseGuard {
    fn drop(&mut self) {
        self.0.close();
    }
}
