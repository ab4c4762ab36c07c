//! Environment construction: host request metadata into the per-request
//! environ mapping.

use crate::gateway::errlog::ErrorLog;
use crate::gateway::input::GatewayInput;
use crate::gateway::latin1::latin1_decode;
use crate::host::HostRequest;
use indexmap::IndexMap;

/// The environ key carrying the request URL scheme.
pub const URL_SCHEME: &str = "gantry.url_scheme";

/// Per-request environment handed to the application.
///
/// String-valued convention variables live in an ordered map; the members
/// the convention types differently (version tuple, capability flags, the
/// input and error handles) are plain fields.
pub struct Environ {
    vars: IndexMap<String, String>,
    /// Convention protocol version.
    pub version: (u16, u16),
    /// The host may invoke the gateway from multiple threads at once.
    pub multithread: bool,
    /// The gateway is not replicated across processes.
    pub multiprocess: bool,
    /// The application may be invoked more than once per process.
    pub run_once: bool,
    /// Request body reader.
    pub input: GatewayInput,
    /// Error-stream handle.
    pub errors: ErrorLog,
}

impl Environ {
    /// Look up a string variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Whether a string variable is present.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Set a string variable (applications may extend the environ).
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Iterate string variables in insertion order.
    pub fn vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Process-wide environ template, built once at initialization and copied
/// into each request's environ. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct EnvironBuilder {
    version: (u16, u16),
    multithread: bool,
    multiprocess: bool,
    run_once: bool,
}

impl Default for EnvironBuilder {
    fn default() -> Self {
        Self {
            version: (1, 0),
            multithread: true,
            multiprocess: false,
            run_once: false,
        }
    }
}

impl EnvironBuilder {
    /// Create a builder with the convention's default capability flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the environ for one request.
    ///
    /// Optional host values that are absent become empty strings, never a
    /// missing key; the one exception is `CONTENT_LENGTH`, which is
    /// omitted entirely when the host does not know the body length.
    pub fn build<R: HostRequest>(&self, req: &mut R, errors: ErrorLog) -> Environ {
        let mut vars = IndexMap::new();
        vars.insert("REQUEST_METHOD".to_string(), req.method().to_string());
        vars.insert("SCRIPT_NAME".to_string(), req.script_name().to_string());
        vars.insert(
            "PATH_INFO".to_string(),
            req.path_info().unwrap_or("").to_string(),
        );
        vars.insert(
            "QUERY_STRING".to_string(),
            req.query_string().unwrap_or("").to_string(),
        );
        vars.insert(
            "CONTENT_TYPE".to_string(),
            req.content_type().unwrap_or("").to_string(),
        );
        vars.insert("REMOTE_ADDR".to_string(), req.remote_addr().to_string());
        vars.insert("REMOTE_HOST".to_string(), req.remote_host().to_string());
        vars.insert("REMOTE_PORT".to_string(), req.remote_port().to_string());
        vars.insert("SERVER_NAME".to_string(), req.server_name().to_string());
        vars.insert("SERVER_PORT".to_string(), req.server_port().to_string());
        vars.insert("SERVER_PROTOCOL".to_string(), req.protocol().to_string());
        vars.insert(URL_SCHEME.to_string(), req.scheme().to_string());

        if let Some(length) = req.content_length() {
            vars.insert("CONTENT_LENGTH".to_string(), length.to_string());
        }

        for name in req.header_names() {
            let values = req.header_values(&name);
            if values.is_empty() {
                continue;
            }
            let joined = values
                .iter()
                .map(|v| latin1_decode(v))
                .collect::<Vec<_>>()
                .join(",");
            vars.insert(client_header_key(&name), joined);
        }

        Environ {
            vars,
            version: self.version,
            multithread: self.multithread,
            multiprocess: self.multiprocess,
            run_once: self.run_once,
            input: GatewayInput::new(req.take_input()),
            errors,
        }
    }
}

/// Normalize a client header name: uppercase, non-alphanumerics replaced
/// with underscore, prefixed to keep clear of the convention's own keys.
fn client_header_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len() + 5);
    key.push_str("HTTP_");
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c.to_ascii_uppercase());
        } else {
            key.push('_');
        }
    }
    key
}
