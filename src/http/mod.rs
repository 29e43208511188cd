//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (x-request-id generation/propagation)
//!     → security pipeline + theme negotiation (middleware)
//!     → server.rs (forward to rendering backend, single attempt)
//!     → response.rs (strip hop-by-hop headers)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, EdgePolicy, HttpServer};
