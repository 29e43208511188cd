//! Storefront Edge Gateway Library
//!
//! Sits in front of the storefront's rendering backend, applies the
//! security/header pipeline to every page request, resolves the visitor's
//! theme, and forwards the request upstream unchanged.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod theme;

pub use config::EdgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
