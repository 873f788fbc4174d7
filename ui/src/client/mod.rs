//! Backend Client Layer
//!
//! This module provides the interface the UI uses to reach the Gatehouse
//! backend and the browser facilities the authentication watcher needs.
//!
//! # Pieces
//!
//! - **SessionClient**: HTTP client for tenant config, session info and the
//!   bearer-token status check
//! - **browser**: `localStorage`, timers, page reload and task spawning
//!   behind the watcher's capability traits

mod browser;
mod session;

pub use browser::{
    browser_capabilities, LocalTokenStore, TimeoutScheduler, WasmSpawner, WindowReloader,
};
pub use session::SessionClient;

use async_trait::async_trait;
use gatehouse_shared::{CurrentUser, TenantConfig};

/// Error types for backend client operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Calls the login page makes before rendering
#[async_trait(?Send)]
pub trait GatehouseClient {
    /// Tenant branding and enabled sign-in methods
    async fn tenant_config(&self) -> Result<TenantConfig, ClientError>;

    /// Who is signed in, and whether the instance still needs setup
    async fn current_user(&self) -> Result<CurrentUser, ClientError>;
}
