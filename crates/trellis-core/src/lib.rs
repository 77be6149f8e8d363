//! Core data model for Trellis.
//!
//! Defines the immutable [`WidgetIdentity`], the resolved [`RuntimeOptions`],
//! and the [`AuthorizationResult`] wire shape shared by the authorization
//! flow (`trellis-auth`) and the lifecycle runtime (`trellis-runtime`).
//! This crate performs no I/O.

pub mod authorization;
pub mod error;
pub mod identity;
pub mod options;

pub use authorization::{AppMetadata, AuthorizationResult, WebsiteMetadata, PREVIEW_TOKEN};
pub use error::ConfigError;
pub use identity::WidgetIdentity;
pub use options::RuntimeOptions;
