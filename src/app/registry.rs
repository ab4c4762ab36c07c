//! Application registry: maps fully-qualified identifiers to applications.

use crate::app::handler::{GantryError, GatewayApp};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Registry of gateway applications keyed by fully-qualified identifier.
///
/// An identifier names an application the way a deployment descriptor
/// would: at least two non-empty dot-separated segments, e.g.
/// `"demo.hello"`. Resolution happens once at initialization; a malformed
/// or unknown identifier is a fatal configuration error, never a
/// per-request failure.
pub struct AppRegistry {
    apps: RwLock<HashMap<String, Arc<dyn GatewayApp>>>,
}

impl AppRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            apps: RwLock::new(HashMap::new()),
        }
    }

    /// Register an application under a fully-qualified identifier.
    pub fn register(
        &self,
        identifier: impl Into<String>,
        app: Arc<dyn GatewayApp>,
    ) -> Result<(), GantryError> {
        let identifier = identifier.into();
        validate_identifier(&identifier)?;

        let mut apps = self.apps.write().unwrap_or_else(|e| e.into_inner());
        if apps.contains_key(&identifier) {
            return Err(GantryError::config(format!(
                "application '{}' is already registered",
                identifier
            )));
        }

        apps.insert(identifier.clone(), app);
        info!("Registered application: {}", identifier);
        Ok(())
    }

    /// Resolve an identifier to an application.
    pub fn resolve(&self, identifier: &str) -> Result<Arc<dyn GatewayApp>, GantryError> {
        validate_identifier(identifier)?;

        let apps = self.apps.read().unwrap_or_else(|e| e.into_inner());
        apps.get(identifier).cloned().ok_or_else(|| {
            GantryError::config(format!("application '{}' not found", identifier))
        })
    }

    /// List all registered identifiers.
    pub fn list(&self) -> Vec<String> {
        let apps = self.apps.read().unwrap_or_else(|e| e.into_inner());
        apps.keys().cloned().collect()
    }

    /// Remove an application from the registry.
    pub fn remove(&self, identifier: &str) -> Result<(), GantryError> {
        let mut apps = self.apps.write().unwrap_or_else(|e| e.into_inner());
        apps.remove(identifier).ok_or_else(|| {
            GantryError::config(format!("application '{}' not found", identifier))
        })?;
        info!("Removed application: {}", identifier);
        Ok(())
    }
}

impl Default for AppRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// An identifier must have at least two dot-separated segments, all
/// non-empty.
fn validate_identifier(identifier: &str) -> Result<(), GantryError> {
    let parts: Vec<&str> = identifier.split('.').collect();
    if parts.len() < 2 || parts.iter().any(|p| p.is_empty()) {
        return Err(GantryError::config(format!(
            "handler not configured properly: '{}'",
            identifier
        )));
    }
    Ok(())
}
