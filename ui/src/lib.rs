//! Gatehouse UI Library
//!
//! This crate provides the Gatehouse user interface: the login page and the
//! access administration screen.
//!
//! # Modules
//!
//! - [`app`]: Root application component and routing
//! - [`client`]: Backend HTTP client and browser capability adapters
//! - [`components`]: UI components (login, access management, shared widgets)
//! - [`state`]: Global state management

pub mod app;
pub mod client;
pub mod components;
pub mod state;

pub use app::App;
