//! Session Client
//!
//! Same-origin HTTP client for the Gatehouse REST API.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

use gatehouse_shared::{
    bearer_authorization, AuthWatchError, CurrentUser, StatusClient, TenantConfig,
    AUTHORIZATION_HEADER,
};

use super::{ClientError, GatehouseClient};

/// HTTP client for the Gatehouse backend
#[derive(Debug, Clone)]
pub struct SessionClient {
    /// API origin, without trailing slash
    base_url: String,

    /// Path queried by the authentication watcher
    status_endpoint: String,
}

impl SessionClient {
    /// Create a new session client
    pub fn new(base_url: &str, status_endpoint: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            status_endpoint: status_endpoint.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn tenant_url(&self) -> String {
        self.url("/api/v1/tenants/current")
    }

    fn user_url(&self) -> String {
        self.url("/api/v1/users/me")
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|e| ClientError::ConnectionFailed(e.to_string()))?;

        if !response.ok() {
            return Err(ClientError::RequestFailed(format!(
                "HTTP {}: {}",
                response.status(),
                response.status_text()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait::async_trait(?Send)]
impl GatehouseClient for SessionClient {
    async fn tenant_config(&self) -> Result<TenantConfig, ClientError> {
        self.get_json(&self.tenant_url()).await
    }

    async fn current_user(&self) -> Result<CurrentUser, ClientError> {
        self.get_json(&self.user_url()).await
    }
}

#[async_trait::async_trait(?Send)]
impl StatusClient for SessionClient {
    async fn fetch_status(&self, token: &str) -> Result<serde_json::Value, AuthWatchError> {
        let response: Response = Request::get(&self.url(&self.status_endpoint))
            .header(AUTHORIZATION_HEADER, &bearer_authorization(token))
            .send()
            .await
            .map_err(|e| AuthWatchError::RequestFailed(e.to_string()))?;

        if !response.ok() {
            return Err(AuthWatchError::HttpStatus(response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| AuthWatchError::InvalidResponse(e.to_string()))
    }
}
