//! Shared logic for the Gatehouse UI
//!
//! Browser-free building blocks of the access administration and login
//! screens:
//! - Access model types and assignment editing
//! - Login form validation and redirect handling
//! - The authentication watcher state machine
//! - Configuration

pub mod assignment;
pub mod auth_watch;
pub mod config;
pub mod login;
pub mod models;
pub mod redirect;
pub mod validation;

pub use assignment::*;
pub use auth_watch::*;
pub use config::*;
pub use login::*;
pub use models::*;
pub use redirect::*;
pub use validation::*;
