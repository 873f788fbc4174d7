//! Redirect handling for the login page
//!
//! The `redirectUrl` query parameter is untrusted. It is forwarded to the
//! login and sign-up URLs only when a [`RedirectPolicy`] accepts it and is
//! dropped silently otherwise.

use tracing::debug;
use url::Url;

use crate::config::LoginSettings;

/// Query parameter carrying the post-login destination
pub const REDIRECT_PARAM: &str = "redirectUrl";

/// Decides whether a redirect target may be followed after login
pub trait RedirectPolicy {
    fn is_safe(&self, target: &str) -> bool;
}

impl<F> RedirectPolicy for F
where
    F: Fn(&str) -> bool,
{
    fn is_safe(&self, target: &str) -> bool {
        self(target)
    }
}

/// Accepts same-origin paths and URLs, plus URLs on allow-listed hosts
#[derive(Debug, Clone)]
pub struct SameOriginPolicy {
    origin: Url,
    allowed_hosts: Vec<String>,
}

impl SameOriginPolicy {
    pub fn new(origin: Url, allowed_hosts: Vec<String>) -> Self {
        let allowed_hosts = allowed_hosts
            .into_iter()
            .map(|h| h.to_ascii_lowercase())
            .collect();
        Self {
            origin,
            allowed_hosts,
        }
    }

    /// Parse the application origin (e.g. `window.location.origin`)
    pub fn from_origin(origin: &str, allowed_hosts: Vec<String>) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(origin)?, allowed_hosts))
    }
}

impl RedirectPolicy for SameOriginPolicy {
    fn is_safe(&self, target: &str) -> bool {
        let target = target.trim();

        // Resolve paths against the origin the way a browser does; tabs,
        // newlines and backslashes can turn a path into `//host`
        let url = match Url::parse(target) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) if target.starts_with('/') => {
                match self.origin.join(target) {
                    Ok(url) => url,
                    Err(_) => return false,
                }
            }
            Err(_) => return false,
        };
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        if url.origin() == self.origin.origin() {
            return true;
        }
        url.host_str()
            .is_some_and(|host| self.allowed_hosts.iter().any(|h| h == host))
    }
}

/// Destinations linked from the login page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginUrls {
    /// Form action for the credential POST
    pub login: String,

    /// Sign-up link in the page footer
    pub signup: String,

    /// Query suffix shared by both, e.g. `?redirectUrl=%2Fapp`
    pub redirect_query: Option<String>,
}

impl LoginUrls {
    /// Build the login and sign-up URLs, forwarding `redirect` only when
    /// `policy` accepts it.
    pub fn build(
        settings: &LoginSettings,
        redirect: Option<&str>,
        policy: &dyn RedirectPolicy,
    ) -> Self {
        let mut login = format!("/api/v1/{}", settings.login_submit_path.trim_start_matches('/'));
        let mut signup = settings.signup_url.clone();

        let redirect_query = match redirect {
            Some(target) if policy.is_safe(target) => {
                Some(format!("?{}={}", REDIRECT_PARAM, urlencoding::encode(target)))
            }
            Some(target) => {
                debug!(target, "dropping unsafe redirect");
                None
            }
            None => None,
        };

        if let Some(query) = &redirect_query {
            login.push_str(query);
            signup.push_str(query);
        }

        Self {
            login,
            signup,
            redirect_query,
        }
    }

    /// Like [`LoginUrls::build`]; with no policy every redirect is dropped.
    pub fn build_or_drop(
        settings: &LoginSettings,
        redirect: Option<&str>,
        policy: Option<&dyn RedirectPolicy>,
    ) -> Self {
        match policy {
            Some(policy) => Self::build(settings, redirect, policy),
            None => Self::build(settings, redirect, &|_: &str| false),
        }
    }

    /// Append the accepted redirect, if any, to another entry point
    pub fn with_redirect(&self, base: &str) -> String {
        match &self.redirect_query {
            Some(query) => format!("{base}{query}"),
            None => base.to_string(),
        }
    }
}

/// Forgot-password link, pre-filled with the typed email when present
pub fn forgot_password_url(settings: &LoginSettings, email: &str) -> String {
    let email = email.trim();
    if email.is_empty() {
        settings.forgot_password_url.clone()
    } else {
        format!("{}?email={}", settings.forgot_password_url, urlencoding::encode(email))
    }
}
