//! Login page state
//!
//! Query-string handling, error notices, page title and third-party
//! sign-in links for the login page. Tenant and session types returned by
//! the backend live here too.

use serde::{Deserialize, Serialize};

use crate::config::LoginSettings;
use crate::redirect::{LoginUrls, REDIRECT_PARAM};

pub const INVALID_CREDENTIALS_MESSAGE: &str =
    "It looks like you may have entered incorrect/invalid credentials. Please try again or reset password using the button below.";

/// Query parameters read by the login page. All are untrusted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub message: Option<String>,
    pub redirect_url: Option<String>,
}

impl LoginQuery {
    /// Parse a location search string, with or without the leading `?`
    pub fn parse(search: &str) -> Self {
        let mut query = Self::default();
        let raw = search.strip_prefix('?').unwrap_or(search);

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match &*key {
                "error" => &mut query.error,
                "message" => &mut query.message,
                REDIRECT_PARAM => &mut query.redirect_url,
                _ => continue,
            };
            // First occurrence wins
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        query
    }

    /// Error notice to show above the form, if the backend sent one back
    pub fn notice(&self) -> Option<LoginNotice> {
        let error = self.error.as_deref().filter(|e| !e.is_empty())?;
        let text = self
            .message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(error);

        // The backend sends `error=true` for plain bad credentials
        if text == "true" {
            Some(LoginNotice {
                text: INVALID_CREDENTIALS_MESSAGE.to_string(),
                show_forgot_password: true,
            })
        } else {
            Some(LoginNotice {
                text: text.to_string(),
                show_forgot_password: false,
            })
        }
    }
}

/// Error callout shown on the login page. Rendered as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginNotice {
    pub text: String,
    pub show_forgot_password: bool,
}

/// Tenant-level login configuration served by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TenantConfig {
    pub instance_name: Option<String>,
    pub branding_enabled: bool,
    pub form_login_enabled: bool,

    /// Enabled third-party providers, e.g. `google`, `github`
    pub third_party_auths: Vec<String>,
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            instance_name: None,
            branding_enabled: false,
            form_login_enabled: true,
            third_party_auths: Vec::new(),
        }
    }
}

/// Session info for the current visitor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentUser {
    pub email: Option<String>,

    /// Set when the instance has no users and must go through setup
    pub empty_instance: bool,
}

/// Browser title for the login page
pub fn page_title(settings: &LoginSettings, tenant: &TenantConfig) -> String {
    match tenant.instance_name.as_deref().map(str::trim) {
        Some(name) if tenant.branding_enabled && !name.is_empty() => name.to_string(),
        _ => settings.default_title.clone(),
    }
}

/// A third-party sign-in button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderLink {
    pub provider: String,
    pub label: String,
    pub href: String,
}

/// Sign-in links for the tenant's providers, carrying the accepted redirect
pub fn provider_links(
    settings: &LoginSettings,
    tenant: &TenantConfig,
    urls: &LoginUrls,
) -> Vec<ProviderLink> {
    tenant
        .third_party_auths
        .iter()
        .map(|provider| provider.trim().to_lowercase())
        .filter(|provider| !provider.is_empty())
        .map(|provider| {
            let base = format!(
                "{}/{}",
                settings.oauth_authorization_path.trim_end_matches('/'),
                urlencoding::encode(&provider)
            );
            ProviderLink {
                label: provider_label(&provider),
                href: urls.with_redirect(&base),
                provider,
            }
        })
        .collect()
}

fn provider_label(provider: &str) -> String {
    match provider {
        "google" => "Continue with Google".to_string(),
        "github" => "Continue with GitHub".to_string(),
        "oidc" => "Continue with OIDC SSO".to_string(),
        "saml" => "Continue with SAML SSO".to_string(),
        other => {
            let mut chars = other.chars();
            let name = match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            };
            format!("Continue with {name}")
        }
    }
}
