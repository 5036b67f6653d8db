//! Core use-case services.
//!
//! # Responsibility
//! - Validate and normalize caller input into use-case level APIs.
//! - Keep HTTP/CLI layers decoupled from storage details.

pub mod department_sync_service;
pub mod organization_service;
