//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (exempt-path check; otherwise generate nonce,
//!       propagate x-nonce to the renderer)
//!     → [upstream forwarding]
//!     → headers.rs (attach CSP built from csp.rs + fixed headers,
//!       HSTS in production)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - CSP is rebuilt per request because it embeds the nonce; everything
//!   static about it lives in a policy struct resolved once per config load
//! - A malformed API base URL degrades to a default origin, never a 5xx
//! - Static asset paths skip the pipeline entirely

pub mod csp;
pub mod headers;
pub mod nonce;

pub use csp::CspConfig;
pub use nonce::{Nonce, X_NONCE};
