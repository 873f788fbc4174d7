//! UI Components
//!
//! This module contains all UI components organized by feature:
//! - `access`: Role and permission assignment
//! - `login`: Login page, credential form and external login overlay
//! - `common`: Shared/reusable components

pub mod access;
pub mod common;
pub mod login;
