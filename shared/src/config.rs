//! Gatehouse configuration
//!
//! Settings for the login page and the authentication watcher. Loaded
//! from TOML; every field has a default so partial files are accepted.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Complete UI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatehouseConfig {
    pub login: LoginSettings,
    pub auth_watch: AuthWatchSettings,
    pub redirect: RedirectSettings,
}

impl GatehouseConfig {
    /// Parse from TOML string
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Convert to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Login page routes and titles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginSettings {
    /// Path under `/api/v1/` the credential form posts to
    pub login_submit_path: String,

    pub signup_url: String,
    pub forgot_password_url: String,

    /// Route shown when the instance has no users yet
    pub setup_url: String,

    /// Prefix of third-party sign-in links, followed by the provider name
    pub oauth_authorization_path: String,

    /// Page title when branding is off
    pub default_title: String,
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            login_submit_path: "login".to_string(),
            signup_url: "/user/signup".to_string(),
            forgot_password_url: "/user/forgotPassword".to_string(),
            setup_url: "/setup/welcome".to_string(),
            oauth_authorization_path: "/oauth2/authorization".to_string(),
            default_title: "Gatehouse".to_string(),
        }
    }
}

/// What to do when the status request fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadPolicy {
    /// Reload after every status request, successful or not
    #[default]
    Always,
    /// Reload only after a successful status request
    OnSuccess,
}

/// Authentication watcher settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthWatchSettings {
    /// Local-storage key holding the bearer token
    pub storage_key: String,

    /// Endpoint queried with the stored token
    pub status_endpoint: String,

    /// Delay between the status response and the page reload
    pub reload_delay_ms: u64,

    pub reload_policy: ReloadPolicy,

    /// Page shown in the external login overlay
    pub external_login_url: String,
}

impl AuthWatchSettings {
    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms)
    }
}

impl Default for AuthWatchSettings {
    fn default() -> Self {
        Self {
            storage_key: "user".to_string(),
            status_endpoint: "/api/v1/users/me".to_string(),
            reload_delay_ms: 5000,
            reload_policy: ReloadPolicy::Always,
            external_login_url: "about:blank".to_string(),
        }
    }
}

/// Redirect safety settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectSettings {
    /// Hosts besides the application origin that may be redirected to
    pub allowed_hosts: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatehouseConfig::default();
        assert_eq!(config.auth_watch.storage_key, "user");
        assert_eq!(config.auth_watch.reload_delay(), Duration::from_secs(5));
        assert_eq!(config.auth_watch.reload_policy, ReloadPolicy::Always);
        assert_eq!(config.login.login_submit_path, "login");
    }

    #[test]
    fn test_partial_toml() {
        let config = GatehouseConfig::from_toml(
            r#"
            [auth_watch]
            status_endpoint = "/api/v1/session"
            reload_policy = "on_success"

            [redirect]
            allowed_hosts = ["docs.example.com"]
            "#,
        )
        .unwrap();

        assert_eq!(config.auth_watch.status_endpoint, "/api/v1/session");
        assert_eq!(config.auth_watch.reload_policy, ReloadPolicy::OnSuccess);
        assert_eq!(config.auth_watch.storage_key, "user");
        assert_eq!(config.redirect.allowed_hosts, vec!["docs.example.com"]);
        assert_eq!(config.login, LoginSettings::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = GatehouseConfig::from_toml("[auth_watch]\nreload_delay_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_round_trip() {
        let config = GatehouseConfig::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[auth_watch]"));
        assert_eq!(GatehouseConfig::from_toml(&toml).unwrap(), config);
    }
}
