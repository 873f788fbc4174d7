//! Global State Management
//!
//! This module manages the state shared across routes:
//! - UI configuration, embedded at build time
//! - Tenant login configuration
//! - Current session info
//!
//! Screen-local state (the assignment directory, form values) lives in the
//! components that own it.

use std::rc::Rc;

use leptos::*;
use tracing::{info, warn};

use gatehouse_shared::{CurrentUser, GatehouseConfig, SameOriginPolicy, StatusClient, TenantConfig};

use crate::client::{ClientError, GatehouseClient, SessionClient};

/// Configuration bundled with the UI
const BUNDLED_CONFIG: &str = include_str!("../../gatehouse.toml");

/// Global application state
#[derive(Clone)]
pub struct AppState {
    /// UI configuration, read once at startup
    pub config: StoredValue<GatehouseConfig>,

    /// Tenant login configuration from the backend
    pub tenant: RwSignal<TenantConfig>,

    /// Current session, once loaded
    pub current_user: RwSignal<Option<CurrentUser>>,

    /// Error from the last session refresh
    pub error: RwSignal<Option<String>>,
}

impl AppState {
    /// Create a new app state with the bundled configuration
    pub fn new() -> Self {
        Self {
            config: store_value(load_config(BUNDLED_CONFIG)),
            tenant: create_rw_signal(TenantConfig::default()),
            current_user: create_rw_signal(None),
            error: create_rw_signal(None),
        }
    }

    /// Page origin, e.g. `https://gatehouse.example.com`
    pub fn origin() -> Option<String> {
        web_sys::window().and_then(|w| w.location().origin().ok())
    }

    /// Client for the backend serving this page
    pub fn client(&self) -> SessionClient {
        let origin = Self::origin().unwrap_or_default();
        self.config
            .with_value(|c| SessionClient::new(&origin, &c.auth_watch.status_endpoint))
    }

    /// Status client handed to the authentication watcher
    pub fn status_client(&self) -> Rc<dyn StatusClient> {
        Rc::new(self.client())
    }

    /// Redirect policy for the current origin.
    ///
    /// `None` without a readable origin, in which case every redirect
    /// target is dropped.
    pub fn redirect_policy(&self) -> Option<SameOriginPolicy> {
        let origin = Self::origin()?;
        let hosts = self.config.with_value(|c| c.redirect.allowed_hosts.clone());
        match SameOriginPolicy::from_origin(&origin, hosts) {
            Ok(policy) => Some(policy),
            Err(e) => {
                warn!(%origin, error = %e, "could not parse page origin");
                None
            }
        }
    }

    /// Load tenant config and session info
    pub async fn refresh_session(&self) -> Result<(), ClientError> {
        let client = self.client();

        let tenant = client.tenant_config().await?;
        self.tenant.set(tenant);

        let user = client.current_user().await?;
        info!(empty_instance = user.empty_instance, "session loaded");
        self.current_user.set(Some(user));
        self.error.set(None);

        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse configuration, falling back to defaults when it is invalid
pub fn load_config(source: &str) -> GatehouseConfig {
    match GatehouseConfig::from_toml(source) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "invalid bundled configuration, using defaults");
            GatehouseConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_parses() {
        assert!(GatehouseConfig::from_toml(BUNDLED_CONFIG).is_ok());
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let config = load_config("[auth_watch]\nreload_delay_ms = []");
        assert_eq!(config, GatehouseConfig::default());
    }
}
